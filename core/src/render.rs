use crate::config::LayoutConfig;
use crate::error::Result;
use crate::locator::{BracketLocator, LocatorKind};
use crate::model::BracketModel;
use crate::router::{ConnectorRouter, DefaultRouter};
use crate::table::PositionTable;
use crate::{CellBounds, ConnectorSegment, GridPosition};
use log::debug;

// ---------------------------------------------------------------------------
// Drawing seams
// ---------------------------------------------------------------------------

/// The single drawing primitive a render pass is expressed in.
pub trait Canvas<C> {
    fn fill_rect(&mut self, rect: ConnectorSegment, color: C);
}

/// Draws the content of one cell into its bounds.
pub trait CellRenderer<T, K: ?Sized> {
    fn render_cell(
        &self,
        canvas: &mut K,
        value: Option<&T>,
        position: GridPosition,
        bounds: CellBounds,
        selected: bool,
    );
}

impl<T, K: ?Sized, F> CellRenderer<T, K> for F
where
    F: Fn(&mut K, Option<&T>, GridPosition, CellBounds, bool),
{
    fn render_cell(
        &self,
        canvas: &mut K,
        value: Option<&T>,
        position: GridPosition,
        bounds: CellBounds,
        selected: bool,
    ) {
        self(canvas, value, position, bounds, selected)
    }
}

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub cells: usize,
    pub segments: usize,
}

// ---------------------------------------------------------------------------
// BracketView: the render pipeline
// ---------------------------------------------------------------------------

/// Lays out and paints a whole bracket: cell origins from the locator, cell
/// content from a [`CellRenderer`], connector strokes from the router.
pub struct BracketView<C> {
    config: LayoutConfig,
    locator: Box<dyn BracketLocator>,
    router: Box<dyn ConnectorRouter>,
    line_color: C,
    selected: Option<GridPosition>,
}

impl<C: Copy> BracketView<C> {
    /// Elimination layout with the default router.
    pub fn new(config: LayoutConfig, line_color: C) -> Self {
        Self {
            config,
            locator: Box::new(LocatorKind::Elimination),
            router: Box::new(DefaultRouter),
            line_color,
            selected: None,
        }
    }

    pub fn with_locator(mut self, locator: impl BracketLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_router(mut self, router: impl ConnectorRouter + 'static) -> Self {
        self.router = Box::new(router);
        self
    }

    pub fn with_selected(mut self, selected: Option<GridPosition>) -> Self {
        self.selected = selected;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// One full render pass over `model`.
    ///
    /// The model is borrowed for the whole pass and its shape is read once, so
    /// the traversal cannot observe a shape change. The first error aborts the
    /// pass; there is no partial result.
    pub fn paint<T, M, K, R>(&self, model: &M, canvas: &mut K, cells: &R) -> Result<PaintStats>
    where
        M: BracketModel<T> + ?Sized,
        K: Canvas<C>,
        R: CellRenderer<T, K> + ?Sized,
    {
        self.config.validate()?;

        let row_counts = model.row_counts();
        let Some(last_column) = row_counts.len().checked_sub(1) else {
            return Ok(PaintStats::default());
        };
        let table = PositionTable::build(self.locator.as_ref(), &self.config, &row_counts)?;

        let mut stats = PaintStats::default();
        for (column, &rows) in row_counts.iter().enumerate() {
            for row in 0..rows {
                let position = GridPosition::new(column, row);
                let origin = table.position(column, row)?;
                cells.render_cell(
                    canvas,
                    model.value_at(column, row),
                    position,
                    CellBounds::at(origin, &self.config),
                    self.selected == Some(position),
                );
                stats.cells += 1;

                let segments = self.router.route(column, row, &self.config, &table, last_column)?;
                for segment in segments.into_iter().filter(|s| !s.is_empty()) {
                    canvas.fill_rect(segment, self.line_color);
                    stats.segments += 1;
                }
            }
        }

        debug!(
            "painted {} cells and {} connector segments ({} routing)",
            stats.cells,
            stats.segments,
            self.config.routing_mode()
        );
        Ok(stats)
    }

    /// Size of the area the bracket needs: every column wide, as tall as the first column.
    pub fn preferred_size<T, M>(&self, model: &M) -> (i32, i32)
    where
        M: BracketModel<T> + ?Sized,
    {
        let columns = i32::try_from(model.column_count()).unwrap_or(i32::MAX);
        let rows = i32::try_from(model.row_count(0)).unwrap_or(i32::MAX);
        let width = self
            .config
            .origin_pad_x()
            .saturating_add(columns.saturating_mul(self.config.column_stride()));
        let height = self
            .config
            .origin_pad_y()
            .saturating_add(rows.saturating_mul(self.config.row_stride()));
        (width, height)
    }
}

// ---------------------------------------------------------------------------
// RecordingCanvas: headless canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall<C> {
    pub rect: ConnectorSegment,
    pub color: C,
}

/// Canvas that records every fill instead of drawing it.
#[derive(Debug, Clone)]
pub struct RecordingCanvas<C> {
    pub calls: Vec<DrawCall<C>>,
}

impl<C> Default for RecordingCanvas<C> {
    fn default() -> Self {
        Self { calls: Vec::new() }
    }
}

impl<C> RecordingCanvas<C> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> Canvas<C> for RecordingCanvas<C> {
    fn fill_rect(&mut self, rect: ConnectorSegment, color: C) {
        self.calls.push(DrawCall { rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingMode;
    use crate::locator::GridLocator;
    use crate::model::DefaultBracketModel;
    use crate::LayoutError;

    const LINE: u8 = 1;
    const CELL: u8 = 2;

    fn outline(canvas: &mut RecordingCanvas<u8>, _value: Option<&&str>, _pos: GridPosition, b: CellBounds, _sel: bool) {
        canvas.fill_rect(ConnectorSegment::new(b.x, b.y, b.width, b.height), CELL);
    }

    fn config(mode: RoutingMode) -> LayoutConfig {
        LayoutConfig::builder()
            .cell_size(150, 75)
            .gaps(50, 40)
            .routing_mode(mode)
            .build()
            .unwrap()
    }

    fn lines(canvas: &RecordingCanvas<u8>) -> usize {
        canvas.calls.iter().filter(|c| c.color == LINE).count()
    }

    #[test]
    fn test_paint_centered_four_entries() {
        let model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        let view = BracketView::new(config(RoutingMode::Centered), LINE);
        let mut canvas = RecordingCanvas::new();
        let stats = view.paint(&model, &mut canvas, &outline).unwrap();
        // 7 cells; column 0 rows 0 and 2 plus column 1 row 0 each route 4 strokes.
        assert_eq!(stats, PaintStats { cells: 7, segments: 12 });
        assert_eq!(lines(&canvas), 12);
        assert_eq!(canvas.calls.len(), 19);
    }

    #[test]
    fn test_paint_above_routes_every_non_final_cell() {
        let model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        let view = BracketView::new(config(RoutingMode::Above), LINE);
        let mut canvas = RecordingCanvas::new();
        let stats = view.paint(&model, &mut canvas, &outline).unwrap();
        assert_eq!(stats.segments, 12);
    }

    #[test]
    fn test_paint_cell_bounds_follow_layout() {
        let model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        let view = BracketView::new(config(RoutingMode::Below), LINE);
        let mut canvas = RecordingCanvas::new();
        view.paint(&model, &mut canvas, &outline).unwrap();
        let cells: Vec<ConnectorSegment> =
            canvas.calls.iter().filter(|c| c.color == CELL).map(|c| c.rect).collect();
        assert_eq!(cells[4], ConnectorSegment::new(200, 57, 150, 75));
        assert_eq!(cells[6], ConnectorSegment::new(400, 172, 150, 75));
    }

    #[test]
    fn test_paint_skips_degenerate_segments() {
        let model = DefaultBracketModel::grid(0..8, 2, 4).unwrap();
        let view = BracketView::new(config(RoutingMode::Above), LINE).with_locator(GridLocator);
        let mut canvas: RecordingCanvas<u8> = RecordingCanvas::new();
        let noop = |_: &mut RecordingCanvas<u8>, _: Option<&i32>, _: GridPosition, _: CellBounds, _: bool| {};
        let stats = view.paint(&model, &mut canvas, &noop).unwrap();
        assert!(canvas.calls.iter().all(|c| !c.rect.is_empty()));
        assert_eq!(stats.segments, canvas.calls.len());
        assert!(stats.segments < 8);
    }

    #[test]
    fn test_paint_marks_selection() {
        let model = DefaultBracketModel::from_entries(["a", "b"]).unwrap();
        let view = BracketView::new(config(RoutingMode::Centered), LINE)
            .with_selected(Some(GridPosition::new(0, 1)));
        let mut canvas: RecordingCanvas<u8> = RecordingCanvas::new();
        let marker = |c: &mut RecordingCanvas<u8>, _: Option<&&str>, _: GridPosition, b: CellBounds, selected: bool| {
            if selected {
                c.fill_rect(ConnectorSegment::new(b.x, b.y, 1, 1), 9);
            }
        };
        view.paint(&model, &mut canvas, &marker).unwrap();
        let marked: Vec<_> = canvas.calls.iter().filter(|c| c.color == 9).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].rect.y, 115);
    }

    #[test]
    fn test_paint_empty_model() {
        let model = DefaultBracketModel::<&str>::new(0);
        let view = BracketView::new(LayoutConfig::default(), LINE);
        let mut canvas = RecordingCanvas::new();
        assert_eq!(view.paint(&model, &mut canvas, &outline).unwrap(), PaintStats::default());
    }

    #[test]
    fn test_paint_aborts_on_locator_error() {
        struct Broken;
        impl BracketLocator for Broken {
            fn x(&self, _: usize, _: &LayoutConfig) -> i32 {
                0
            }
            fn y(&self, column: usize, row: usize, _: &LayoutConfig) -> Result<i32> {
                Err(LayoutError::out_of_range(column, row))
            }
        }
        let model = DefaultBracketModel::from_entries(["a", "b"]).unwrap();
        let view = BracketView::new(LayoutConfig::default(), LINE).with_locator(Broken);
        let mut canvas = RecordingCanvas::new();
        assert!(view.paint(&model, &mut canvas, &outline).is_err());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn test_preferred_size() {
        let model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        let view = BracketView::new(config(RoutingMode::Centered), LINE);
        assert_eq!(view.preferred_size(&model), (600, 460));
    }
}
