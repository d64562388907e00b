use bracket_core::{BracketView, Canvas, CellBounds, CellRenderer, ConnectorSegment, GridPosition};
use log::{error, warn};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::state::app_state::BracketState;

/// Placeholder shown in a slot nobody has reached yet.
pub const EMPTY_SLOT: &str = "TBD";

const LINE_STYLE: Style = Style::new().fg(Color::DarkGray);

// ---------------------------------------------------------------------------
// BufferCanvas: layout units mapped 1:1 onto terminal cells
// ---------------------------------------------------------------------------

/// Draws layout-space rectangles into a ratatui buffer.
///
/// Layout coordinates are shifted by the scroll offsets and clipped to `area`;
/// anything outside is dropped silently.
pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    scroll_x: u16,
    scroll_y: u16,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, scroll_x: u16, scroll_y: u16) -> Self {
        Self { buf, area, scroll_x, scroll_y }
    }

    /// Screen position of a layout coordinate, if it is visible.
    fn to_screen(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let sx = x.saturating_sub(i32::from(self.scroll_x));
        let sy = y.saturating_sub(i32::from(self.scroll_y));
        if sx < 0 || sy < 0 || sx >= i32::from(self.area.width) || sy >= i32::from(self.area.height) {
            return None;
        }
        // Both offsets are below the area size, so they fit in u16.
        Some((self.area.x + sx as u16, self.area.y + sy as u16))
    }

    pub fn put_char(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if let Some((sx, sy)) = self.to_screen(x, y)
            && let Some(cell) = self.buf.cell_mut((sx, sy))
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    }

    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(offset) = i32::try_from(i) else {
                break;
            };
            self.put_char(x.saturating_add(offset), y, ch, style);
        }
    }

    /// Visible columns of `[start, end)`.
    pub fn visible_xs(&self, start: i32, end: i32) -> std::ops::Range<i32> {
        Self::clip(start, end, self.scroll_x, self.area.width)
    }

    /// Visible rows of `[start, end)`.
    pub fn visible_ys(&self, start: i32, end: i32) -> std::ops::Range<i32> {
        Self::clip(start, end, self.scroll_y, self.area.height)
    }

    /// Visible part of `[start, end)` along one axis.
    fn clip(start: i32, end: i32, scroll: u16, len: u16) -> std::ops::Range<i32> {
        let lo = start.max(i32::from(scroll));
        let hi = end.min(i32::from(scroll) + i32::from(len));
        lo..hi.max(lo)
    }
}

impl Canvas<Style> for BufferCanvas<'_> {
    fn fill_rect(&mut self, rect: ConnectorSegment, style: Style) {
        if rect.is_empty() {
            return;
        }
        let ch = if rect.is_horizontal() { '─' } else { '│' };
        let xs = self.visible_xs(rect.x, rect.right());
        let ys = self.visible_ys(rect.y, rect.bottom());
        for y in ys {
            for x in xs.clone() {
                self.put_char(x, y, ch, style);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EntryCellRenderer: one bordered box per slot
// ---------------------------------------------------------------------------

/// Draws a slot as a bordered box with the entry name centred on the middle row:
///
/// ```text
/// ┌────────────────┐
/// │ Gonzaga        │
/// └────────────────┘
/// ```
///
/// Cells shorter than three rows get the name alone on their first row.
pub struct EntryCellRenderer {
    /// Entries in this column are champions and get highlighted.
    pub final_column: Option<usize>,
}

impl EntryCellRenderer {
    pub fn new(final_column: Option<usize>) -> Self {
        Self { final_column }
    }

    fn styles(&self, value: Option<&String>, position: GridPosition, selected: bool) -> (Style, Style) {
        let border = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let text = match value {
            _ if selected => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            None => Style::default().fg(Color::DarkGray),
            Some(_) if self.final_column == Some(position.column) => {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            }
            Some(_) => Style::default().fg(Color::White),
        };
        (border, text)
    }
}

impl<'a> CellRenderer<String, BufferCanvas<'a>> for EntryCellRenderer {
    fn render_cell(
        &self,
        canvas: &mut BufferCanvas<'a>,
        value: Option<&String>,
        position: GridPosition,
        bounds: CellBounds,
        selected: bool,
    ) {
        if bounds.width <= 0 || bounds.height <= 0 {
            return;
        }
        let (border, text) = self.styles(value, position, selected);
        let label = value.map_or(EMPTY_SLOT, String::as_str);

        if bounds.height < 3 || bounds.width < 4 {
            let fitted = fit(label, usize::try_from(bounds.width).unwrap_or(0));
            canvas.put_str(bounds.x, bounds.y, &fitted, text);
            return;
        }

        let inner = usize::try_from(bounds.width - 2).unwrap_or(0);
        let right = bounds.x.saturating_add(bounds.width - 1);
        let bottom = bounds.y.saturating_add(bounds.height - 1);

        // Only the part of the box inside the viewport is touched.
        let xs = canvas.visible_xs(bounds.x, right.saturating_add(1));
        for y in canvas.visible_ys(bounds.y, bottom.saturating_add(1)) {
            for x in xs.clone() {
                let edge = (x == bounds.x, x == right, y == bounds.y, y == bottom);
                let (ch, style) = match edge {
                    (true, _, true, _) => ('┌', border),
                    (_, true, true, _) => ('┐', border),
                    (true, _, _, true) => ('└', border),
                    (_, true, _, true) => ('┘', border),
                    (_, _, true, _) | (_, _, _, true) => ('─', border),
                    (true, _, _, _) | (_, true, _, _) => ('│', border),
                    _ => (' ', text),
                };
                canvas.put_char(x, y, ch, style);
            }
        }

        let middle = bounds.y.saturating_add(bounds.height / 2);
        let name = fit(label, inner.saturating_sub(1));
        canvas.put_str(bounds.x.saturating_add(2), middle, &name, text);
    }
}

/// Truncate to `width` characters, marking the cut with `…`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// BracketPane widget
// ---------------------------------------------------------------------------

/// Renders the current bracket through the core render pass.
pub struct BracketPane<'a> {
    pub state: &'a BracketState,
}

impl<'a> BracketPane<'a> {
    pub fn new(state: &'a BracketState) -> Self {
        Self { state }
    }
}

impl Widget for BracketPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let state = self.state;
        let view = BracketView::new(state.config, LINE_STYLE)
            .with_locator(state.strategy)
            .with_selected(Some(state.selected));
        let cells = EntryCellRenderer::new(state.last_column());

        let result = {
            let mut canvas = BufferCanvas::new(buf, area, state.scroll_x, state.scroll_y);
            view.paint(&state.model, &mut canvas, &cells)
        };

        if let Err(e) = result {
            if e.is_fatal() {
                error!("bracket render failed: {e}");
            } else {
                warn!("bracket render stopped: {e}");
            }
            buf.set_string(
                area.x,
                area.y,
                format!("render failed: {e}"),
                Style::default().fg(Color::Red),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
