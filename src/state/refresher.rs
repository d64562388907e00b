use crate::state::messages::LoadRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Asks the loader to re-read the snapshot on a fixed interval.
pub struct PeriodicRefresher {
    load_requests: mpsc::Sender<LoadRequest>,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(load_requests: mpsc::Sender<LoadRequest>, every: Duration) -> Self {
        Self { load_requests, every }
    }

    pub async fn run(self) {
        let mut reload_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        reload_interval.tick().await;

        loop {
            reload_interval.tick().await;
            if self.load_requests.send(LoadRequest::Refresh).await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sends_refresh_after_interval() {
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(PeriodicRefresher::new(tx, Duration::from_secs(10)).run());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(matches!(rx.recv().await, Some(LoadRequest::Refresh)));
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let task = tokio::spawn(PeriodicRefresher::new(tx, Duration::from_secs(1)).run());
        assert!(tokio::time::timeout(Duration::from_secs(3), task).await.is_ok());
    }
}
