use crate::state::messages::{LoadRequest, LoadResponse};
use crate::state::snapshot::BracketSnapshot;
use anyhow::Context;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Reads bracket snapshots off the UI task and reports back over a channel.
pub struct LoadWorker {
    requests: mpsc::Receiver<LoadRequest>,
    responses: mpsc::Sender<LoadResponse>,
    is_loading: Arc<AtomicBool>,
    source: Option<PathBuf>,
    modified: Option<SystemTime>,
}

impl LoadWorker {
    pub fn new(requests: mpsc::Receiver<LoadRequest>, responses: mpsc::Sender<LoadResponse>) -> Self {
        Self {
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
            source: None,
            modified: None,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                LoadRequest::LoadSnapshot { path } => self.handle_load(path).await,
                LoadRequest::Refresh => self.handle_refresh().await,
            };

            debug!("load request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| LoadResponse::Error {
                message: format!("{err:#}"),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send load response: {e}");
                break;
            }
        }
    }

    async fn handle_load(&mut self, path: Option<PathBuf>) -> anyhow::Result<LoadResponse> {
        let Some(path) = path else {
            info!("no snapshot configured, showing the demo bracket");
            self.source = None;
            self.modified = None;
            let bracket = BracketSnapshot::demo().into_bracket(None)?;
            return Ok(LoadResponse::BracketLoaded { bracket: Box::new(bracket) });
        };

        debug!("loading snapshot {}", path.display());
        let modified = modified_at(&path).await;
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("{}: read failed", path.display()))?;
        let bracket = BracketSnapshot::parse(&content)
            .with_context(|| path.display().to_string())?
            .into_bracket(Some(path.clone()))?;

        info!("loaded {:?} from {}", bracket.name, path.display());
        self.source = Some(path);
        self.modified = modified;
        Ok(LoadResponse::BracketLoaded { bracket: Box::new(bracket) })
    }

    async fn handle_refresh(&mut self) -> anyhow::Result<LoadResponse> {
        let Some(path) = self.source.clone() else {
            return Ok(LoadResponse::Unchanged);
        };
        let modified = modified_at(&path).await;
        if modified.is_some() && modified == self.modified {
            debug!("{} unchanged", path.display());
            return Ok(LoadResponse::Unchanged);
        }
        self.handle_load(Some(path)).await
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(LoadResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(LoadResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(LoadResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_core::BracketModel;

    fn worker() -> LoadWorker {
        let (_req_tx, req_rx) = mpsc::channel(1);
        let (resp_tx, _resp_rx) = mpsc::channel(1);
        LoadWorker::new(req_rx, resp_tx)
    }

    #[tokio::test]
    async fn test_load_demo_without_path() {
        let mut worker = worker();
        match worker.handle_load(None).await.unwrap() {
            LoadResponse::BracketLoaded { bracket } => {
                assert_eq!(bracket.model.row_counts(), vec![8, 4, 2, 1]);
                assert_eq!(bracket.source, None);
            }
            other => panic!("unexpected response {other:?}"),
        }
        assert!(matches!(worker.handle_refresh().await.unwrap(), LoadResponse::Unchanged));
    }

    #[tokio::test]
    async fn test_load_and_refresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cup.json");
        std::fs::write(&path, r#"{ "name": "Cup", "entries": ["a", "b", "c", "d"] }"#).unwrap();

        let mut worker = worker();
        let response = worker.handle_load(Some(path.clone())).await.unwrap();
        assert!(matches!(response, LoadResponse::BracketLoaded { .. }));
        assert!(matches!(worker.handle_refresh().await.unwrap(), LoadResponse::Unchanged));

        // Force a different mtime so the refresh sees a change.
        worker.modified = Some(SystemTime::UNIX_EPOCH);
        match worker.handle_refresh().await.unwrap() {
            LoadResponse::BracketLoaded { bracket } => assert_eq!(bracket.name, "Cup"),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut worker = worker();
        let err = worker.handle_load(Some(path)).await.unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
        assert!(worker.handle_load(Some(dir.path().join("missing.json"))).await.is_err());
    }

    #[tokio::test]
    async fn test_run_answers_requests() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let task = tokio::spawn(LoadWorker::new(req_rx, resp_tx).run());

        req_tx.send(LoadRequest::LoadSnapshot { path: None }).await.unwrap();
        let mut loaded = false;
        while let Some(response) = resp_rx.recv().await {
            match response {
                LoadResponse::BracketLoaded { .. } => {
                    loaded = true;
                    break;
                }
                LoadResponse::LoadingStateChanged { .. } => {}
                other => panic!("unexpected response {other:?}"),
            }
        }
        assert!(loaded);
        task.abort();
    }
}
