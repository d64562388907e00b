use crate::config::{LayoutConfig, RoutingMode};
use crate::error::{LayoutError, Result};
use crate::locator::BracketLocator;
use crate::ConnectorSegment;

// ---------------------------------------------------------------------------
// ConnectorRouter: pluggable connector geometry
// ---------------------------------------------------------------------------

/// Produces the strokes linking cell (`column`, `row`) to the cell it feeds in
/// the next column. Pure: no state survives between calls.
pub trait ConnectorRouter: Send + Sync {
    fn route(
        &self,
        column: usize,
        row: usize,
        config: &LayoutConfig,
        locator: &dyn BracketLocator,
        last_column: usize,
    ) -> Result<Vec<ConnectorSegment>>;
}

/// Routes according to [`LayoutConfig::routing_mode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRouter;

impl ConnectorRouter for DefaultRouter {
    fn route(
        &self,
        column: usize,
        row: usize,
        config: &LayoutConfig,
        locator: &dyn BracketLocator,
        last_column: usize,
    ) -> Result<Vec<ConnectorSegment>> {
        match config.routing_mode() {
            RoutingMode::Above => route_above(column, row, config, locator, last_column),
            RoutingMode::Centered => route_centered(column, row, config, locator, last_column),
            RoutingMode::Below => route_below(column, row, config, locator, last_column),
        }
    }
}

/// `routeFrom`: connector strokes for one cell under the configured routing mode.
pub fn route_from(
    column: usize,
    row: usize,
    config: &LayoutConfig,
    locator: &dyn BracketLocator,
    last_column: usize,
) -> Result<Vec<ConnectorSegment>> {
    DefaultRouter.route(column, row, config, locator, last_column)
}

fn is_terminal(column: usize, last_column: usize) -> bool {
    column >= last_column
}

/// Stroke arithmetic runs in i64; a segment that leaves the i32 plane is
/// reported against the routed cell.
fn segment(
    column: usize,
    row: usize,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
) -> Result<ConnectorSegment> {
    let coord =
        |value: i64| i32::try_from(value).map_err(|_| LayoutError::out_of_range(column, row));
    Ok(ConnectorSegment::new(coord(x)?, coord(y)?, coord(width)?, coord(height)?))
}

/// Stub out of the right edge of every cell, then a vertical stroke onto the
/// top edge of the next cell (even rows) or its bottom edge (odd rows).
///
/// ```text
/// +-----------+
/// | Bracket 1 +------------+
/// +-----------+            |
///                    +-----+-----+
///                    | Bracket 3 |
///                    +-----+-----+
/// +-----------+            |
/// | Bracket 2 +------------+
/// +-----------+
/// ```
pub fn route_above(
    column: usize,
    row: usize,
    config: &LayoutConfig,
    locator: &dyn BracketLocator,
    last_column: usize,
) -> Result<Vec<ConnectorSegment>> {
    if is_terminal(column, last_column) {
        return Ok(Vec::new());
    }

    let t = i64::from(config.line_thickness());
    let cell_width = i64::from(config.cell_width());
    let cell_height = i64::from(config.cell_height());
    let base_x = i64::from(locator.x(column, config)) + cell_width;
    let base_y = i64::from(locator.y(column, row, config)?) + cell_height / 2;
    let width = i64::from(config.horizontal_gap()) + cell_width / 2;

    let mut end_y = i64::from(locator.y(column + 1, row / 2, config)?);
    let mut height = end_y - base_y;

    let stub = segment(column, row, base_x, base_y, width, t)?;
    let drop = if row % 2 == 0 {
        segment(column, row, base_x + width, base_y, t, height + t)?
    } else {
        // Rise onto the bottom edge of the target instead of its top-left origin.
        end_y += cell_height;
        height = height.max(base_y - end_y);
        segment(column, row, base_x + width, end_y, t, height + t)?
    };

    Ok(vec![stub, drop])
}

/// Even rows only: a bar down from the bottom of the cell to its odd sibling,
/// branching right at the midpoint.
///
/// ```text
/// +-----------+
/// | Bracket 1 |
/// +-----+-----+
///       |            +-----------+
///       +------------+ Bracket 3 |
///       |            +-----------+
/// +-----+-----+
/// | Bracket 2 |
/// +-----------+
/// ```
pub fn route_below(
    column: usize,
    row: usize,
    config: &LayoutConfig,
    locator: &dyn BracketLocator,
    last_column: usize,
) -> Result<Vec<ConnectorSegment>> {
    if row % 2 != 0 || is_terminal(column, last_column) {
        return Ok(Vec::new());
    }

    let t = i64::from(config.line_thickness());
    let half_width = i64::from(config.cell_width()) / 2;
    let base_x = i64::from(locator.x(column, config)) + half_width;
    let base_y = i64::from(locator.y(column, row, config)?) + i64::from(config.cell_height());

    let end_y = i64::from(locator.y(column, row + 1, config)?);
    let height = end_y - base_y;
    let width = half_width + i64::from(config.horizontal_gap());
    let mid_y = (base_y + end_y).div_euclid(2);

    Ok(vec![
        segment(column, row, base_x, base_y, t, height)?,
        segment(column, row, base_x, mid_y, width, t)?,
    ])
}

/// Even rows only: stubs out of both siblings joined by a vertical bar, with a
/// stroke from the bar's midpoint toward the next column.
///
/// ```text
/// +-----------+
/// | Bracket 1 +--+
/// +-----------+  |
///                |   +-----------+
///                +---+ Bracket 3 |
///                |   +-----------+
/// +-----------+  |
/// | Bracket 2 +--+
/// +-----------+
/// ```
pub fn route_centered(
    column: usize,
    row: usize,
    config: &LayoutConfig,
    locator: &dyn BracketLocator,
    last_column: usize,
) -> Result<Vec<ConnectorSegment>> {
    if row % 2 != 0 || is_terminal(column, last_column) {
        return Ok(Vec::new());
    }

    let t = i64::from(config.line_thickness());
    let half_height = i64::from(config.cell_height()) / 2;
    let base_x = i64::from(locator.x(column, config)) + i64::from(config.cell_width());
    let base_y = i64::from(locator.y(column, row, config)?) + half_height;
    let end_y = i64::from(locator.y(column, row + 1, config)?) + half_height;

    let width = i64::from(config.horizontal_gap()) / 2;
    let height = (end_y - base_y) + t;
    let bar_x = base_x + width;

    Ok(vec![
        segment(column, row, base_x, base_y, width, t)?,
        segment(column, row, base_x, end_y, width, t)?,
        segment(column, row, bar_x, base_y, t, height)?,
        segment(column, row, bar_x, (end_y + base_y).div_euclid(2), width, t)?,
    ])
}
