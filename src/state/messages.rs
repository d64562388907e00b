use crate::state::loader::LoadingState;
use crate::state::snapshot::LoadedBracket;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum LoadRequest {
    /// Load a snapshot file, or the built-in demo when `path` is `None`.
    LoadSnapshot { path: Option<PathBuf> },
    /// Re-read the current snapshot if it changed on disk.
    Refresh,
}

#[derive(Debug)]
pub enum LoadResponse {
    LoadingStateChanged { loading_state: LoadingState },
    BracketLoaded { bracket: Box<LoadedBracket> },
    Unchanged,
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
