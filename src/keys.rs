use crate::app::{App, Direction, MenuItem};
use crate::state::messages::LoadRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Details),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),
        (MenuItem::Details, KeyCode::Esc, _) => guard.update_tab(MenuItem::Bracket),

        // Bracket navigation
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_move(Direction::Left),
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_move(Direction::Right),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_move(Direction::Down),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_move(Direction::Up),
        (MenuItem::Bracket, KeyCode::PageUp, _) => guard.bracket_page_up(),
        (MenuItem::Bracket, KeyCode::PageDown, _) => guard.bracket_page_down(),

        // Bracket edits
        (MenuItem::Bracket, KeyCode::Enter, _) => guard.bracket_advance(),
        (MenuItem::Bracket, KeyCode::Backspace, _) => guard.bracket_clear(),

        // Presentation
        (_, Char('m'), _) => guard.bracket_cycle_routing_mode(),
        (_, Char('s'), _) => guard.bracket_toggle_strategy(),
        (_, Char('r'), _) => {
            let path = guard.settings.snapshot.clone();
            drop(guard);
            let _ = load_requests.send(LoadRequest::LoadSnapshot { path }).await;
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
