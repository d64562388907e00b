pub mod config;
pub mod error;
pub mod locator;
pub mod model;
pub mod render;
pub mod router;
pub mod table;

use std::fmt;

pub use config::{LayoutConfig, LayoutConfigBuilder, MAX_DIMENSION, RoutingMode};
pub use error::{LayoutError, Result};
pub use locator::{BracketLocator, EliminationLocator, GridLocator, LocatorKind, position_of};
pub use model::{BracketModel, DefaultBracketModel};
pub use render::{BracketView, Canvas, CellRenderer, DrawCall, PaintStats, RecordingCanvas};
pub use router::{ConnectorRouter, DefaultRouter, route_from};
pub use table::PositionTable;

// ---------------------------------------------------------------------------
// Geometry types shared by the layout engine, router and render pass
// ---------------------------------------------------------------------------

/// A cell address: column index left → right, row index top → bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    pub column: usize,
    pub row: usize,
}

impl GridPosition {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// The cell this one feeds into in the next column of an elimination bracket.
    pub fn parent(&self) -> Self {
        Self { column: self.column + 1, row: self.row / 2 }
    }

    pub fn is_even_row(&self) -> bool {
        self.row % 2 == 0
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Top-left origin of a cell's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One straight stroke of a connector, expressed as a filled rectangle.
///
/// Width and height are the raw results of the routing arithmetic and can be
/// zero or negative in degenerate layouts; such segments paint nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConnectorSegment {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ConnectorSegment {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the stroke runs left → right (wider than tall).
    pub fn is_horizontal(&self) -> bool {
        self.width >= self.height
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }
}

/// Target rectangle handed to a cell renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellBounds {
    pub fn at(origin: PixelPoint, config: &LayoutConfig) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: config.cell_width(),
            height: config.cell_height(),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_halves_row() {
        assert_eq!(GridPosition::new(0, 5).parent(), GridPosition::new(1, 2));
        assert_eq!(GridPosition::new(2, 0).parent(), GridPosition::new(3, 0));
    }

    #[test]
    fn test_segment_emptiness() {
        assert!(ConnectorSegment::new(0, 0, 0, 1).is_empty());
        assert!(ConnectorSegment::new(0, 0, 4, -2).is_empty());
        assert!(!ConnectorSegment::new(0, 0, 4, 1).is_empty());
    }

    #[test]
    fn test_cell_bounds_contains_origin_not_far_edge() {
        let bounds = CellBounds { x: 2, y: 3, width: 4, height: 2 };
        assert!(bounds.contains(2, 3));
        assert!(bounds.contains(5, 4));
        assert!(!bounds.contains(6, 4));
        assert!(!bounds.contains(5, 5));
    }
}
