use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::snapshot::LoadedBracket;
use log::{info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Details,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        log::set_max_level(settings.log_level);
        tui_logger::set_default_level(settings.log_level);

        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Loader response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_bracket_loaded(&mut self, bracket: LoadedBracket) {
        self.state.last_error = None;
        self.state.bracket.load(bracket);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Bracket actions, delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_move(&mut self, direction: Direction) {
        let bracket = &mut self.state.bracket;
        match direction {
            Direction::Up => bracket.move_up(),
            Direction::Down => bracket.move_down(),
            Direction::Left => bracket.move_left(),
            Direction::Right => bracket.move_right(),
        }
        bracket.follow_selection();
    }

    pub fn bracket_advance(&mut self) {
        match self.state.bracket.advance_selected() {
            Ok(Some(_)) => {
                self.state.last_error = None;
                self.state.bracket.follow_selection();
            }
            Ok(None) => info!("nothing to advance at {}", self.state.bracket.selected),
            Err(e) => {
                warn!("advance failed: {e:#}");
                self.on_error(format!("{e:#}"));
            }
        }
    }

    pub fn bracket_clear(&mut self) {
        if let Err(e) = self.state.bracket.clear_selected() {
            warn!("clear failed: {e:#}");
            self.on_error(format!("{e:#}"));
        }
    }

    pub fn bracket_cycle_routing_mode(&mut self) {
        self.state.bracket.cycle_routing_mode();
    }

    pub fn bracket_toggle_strategy(&mut self) {
        self.state.bracket.toggle_strategy();
        self.state.bracket.follow_selection();
    }

    pub fn bracket_page_up(&mut self) {
        self.state.bracket.page_up();
    }

    pub fn bracket_page_down(&mut self) {
        self.state.bracket.page_down();
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
