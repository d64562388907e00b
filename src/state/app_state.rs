use crate::app::MenuItem;
use crate::state::snapshot::LoadedBracket;
use bracket_core::{
    BracketModel, CellBounds, DefaultBracketModel, GridPosition, LayoutConfig, LocatorKind,
    position_of,
};
use log::info;
use std::path::PathBuf;

/// Rows moved by PageUp / PageDown.
pub const PAGE_ROWS: u16 = 10;

/// Layout tuned for terminal cells: one layout unit is one character cell.
pub fn terminal_layout() -> LayoutConfig {
    LayoutConfig::builder()
        .cell_size(18, 3)
        .line_thickness(1)
        .gaps(4, 1)
        .origin_pad(1, 0)
        .build()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct BracketState {
    pub name: String,
    pub model: DefaultBracketModel<String>,
    pub config: LayoutConfig,
    pub strategy: LocatorKind,
    pub selected: GridPosition,
    pub scroll_x: u16,
    pub scroll_y: u16,
    /// Size of the bracket pane at the last draw.
    pub viewport: (u16, u16),
    pub source: Option<PathBuf>,
    pub loaded: bool,
}

impl Default for BracketState {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: DefaultBracketModel::default(),
            config: terminal_layout(),
            strategy: LocatorKind::Elimination,
            selected: GridPosition::default(),
            scroll_x: 0,
            scroll_y: 0,
            viewport: (0, 0),
            source: None,
            loaded: false,
        }
    }
}

impl BracketState {
    /// Swap in a freshly loaded bracket. A reload of the same source keeps the
    /// selection and scroll position when they are still valid.
    pub fn load(&mut self, bracket: LoadedBracket) {
        let same_source = self.loaded && self.source == bracket.source;

        self.config = bracket
            .layout
            .unwrap_or_else(|| terminal_layout().with_routing_mode(self.config.routing_mode()));
        if let Some(strategy) = bracket.strategy {
            self.strategy = strategy;
        }
        self.name = bracket.name;
        self.model = bracket.model;
        self.source = bracket.source;
        self.loaded = true;

        if !same_source || !self.contains(self.selected) {
            self.selected = GridPosition::default();
            self.scroll_x = 0;
            self.scroll_y = 0;
        }
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        self.model.contains(position)
    }

    pub fn selected_value(&self) -> Option<&String> {
        self.model.value_at(self.selected.column, self.selected.row)
    }

    pub fn last_column(&self) -> Option<usize> {
        self.model.column_count().checked_sub(1)
    }

    // -- selection ----------------------------------------------------------

    pub fn move_up(&mut self) {
        self.selected.row = self.selected.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let rows = self.model.row_count(self.selected.column);
        if self.selected.row + 1 < rows {
            self.selected.row += 1;
        }
    }

    /// Toward the first column: the upper cell feeding this one.
    pub fn move_left(&mut self) {
        let Some(column) = self.selected.column.checked_sub(1) else {
            return;
        };
        let row = match self.strategy {
            LocatorKind::Elimination => self.selected.row * 2,
            LocatorKind::Grid => self.selected.row,
        };
        self.select_clamped(column, row);
    }

    /// Toward the final: the cell this one feeds.
    pub fn move_right(&mut self) {
        if self.last_column().is_none_or(|last| self.selected.column >= last) {
            return;
        }
        let target = match self.strategy {
            LocatorKind::Elimination => self.selected.parent(),
            LocatorKind::Grid => GridPosition::new(self.selected.column + 1, self.selected.row),
        };
        self.select_clamped(target.column, target.row);
    }

    fn select_clamped(&mut self, column: usize, row: usize) {
        let rows = self.model.row_count(column);
        if rows == 0 {
            return;
        }
        self.selected = GridPosition::new(column, row.min(rows - 1));
    }

    // -- edits --------------------------------------------------------------

    /// Copy the selected entry into the slot it advances to, then select that slot.
    pub fn advance_selected(&mut self) -> anyhow::Result<Option<GridPosition>> {
        if self.last_column() == Some(self.selected.column) {
            return Ok(None);
        }
        let Some(entry) = self.selected_value().cloned() else {
            return Ok(None);
        };
        let Some(next) = self.model.next_position(|value| *value == entry) else {
            return Ok(None);
        };
        self.model.set_value_at(next.column, next.row, entry.clone())?;
        info!("{entry} advances to {next}");
        self.selected = next;
        Ok(Some(next))
    }

    pub fn clear_selected(&mut self) -> anyhow::Result<Option<String>> {
        let removed = self.model.clear_value_at(self.selected.column, self.selected.row)?;
        if let Some(entry) = &removed {
            info!("cleared {entry} from {}", self.selected);
        }
        Ok(removed)
    }

    // -- presentation -------------------------------------------------------

    pub fn cycle_routing_mode(&mut self) {
        let next = self.config.routing_mode().next();
        self.config = self.config.with_routing_mode(next);
        info!("routing mode: {next}");
    }

    pub fn toggle_strategy(&mut self) {
        self.strategy = self.strategy.toggle();
        info!("layout strategy: {}", self.strategy);
    }

    pub fn page_up(&mut self) {
        self.scroll_y = self.scroll_y.saturating_sub(PAGE_ROWS);
    }

    pub fn page_down(&mut self) {
        self.scroll_y = self.scroll_y.saturating_add(PAGE_ROWS);
    }

    pub fn selected_bounds(&self) -> Option<CellBounds> {
        if !self.contains(self.selected) {
            return None;
        }
        let origin =
            position_of(self.selected.column, self.selected.row, &self.config, &self.strategy)
                .ok()?;
        Some(CellBounds::at(origin, &self.config))
    }

    /// Scroll just enough to bring the selected cell into the last drawn viewport.
    pub fn follow_selection(&mut self) {
        let Some(bounds) = self.selected_bounds() else {
            return;
        };
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return;
        }
        self.scroll_x = follow_axis(self.scroll_x, bounds.x, bounds.width, width);
        self.scroll_y = follow_axis(self.scroll_y, bounds.y, bounds.height, height);
    }
}

fn follow_axis(scroll: u16, start: i32, len: i32, viewport: u16) -> u16 {
    let viewport = i32::from(viewport);
    let mut offset = i32::from(scroll);
    let end = start.saturating_add(len);
    if end > offset + viewport {
        offset = end - viewport;
    }
    if start < offset {
        offset = start;
    }
    u16::try_from(offset.max(0)).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// Top-level app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub bracket: BracketState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
