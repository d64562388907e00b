use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::PixelPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BracketLocator: pluggable position strategy
// ---------------------------------------------------------------------------

/// Computes the top-left origin of a cell from its column/row and the layout
/// configuration. Implementations must be pure: identical inputs give identical
/// outputs and no call observes or mutates shared state.
///
/// The locator never consults the data source. Bounds checking against a model
/// shape is done by [`crate::PositionTable::position`] or by the caller.
pub trait BracketLocator: Send + Sync {
    /// X origin of every cell in `column`.
    fn x(&self, column: usize, config: &LayoutConfig) -> i32;

    /// Y origin of the cell at (`column`, `row`).
    fn y(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<i32>;

    fn locate(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<PixelPoint> {
        Ok(PixelPoint::new(self.x(column, config), self.y(column, row, config)?))
    }

    /// Y origins of rows `0..rows` of `column`, given the already computed
    /// origins of the previous column (if any). Used to fill a
    /// [`crate::PositionTable`] one column at a time.
    fn column_ys(
        &self,
        column: usize,
        rows: usize,
        _previous: Option<&[i32]>,
        config: &LayoutConfig,
    ) -> Result<Vec<i32>> {
        (0..rows).map(|row| self.y(column, row, config)).collect()
    }
}

/// `positionOf`: origin of (`column`, `row`) under `locator`.
pub fn position_of(
    column: usize,
    row: usize,
    config: &LayoutConfig,
    locator: &dyn BracketLocator,
) -> Result<PixelPoint> {
    locator.locate(column, row, config)
}

fn column_x(column: usize, config: &LayoutConfig) -> i32 {
    let column = i32::try_from(column).unwrap_or(i32::MAX);
    config
        .origin_pad_x()
        .saturating_add(column.saturating_mul(config.column_stride()))
}

fn leaf_y(row: usize, config: &LayoutConfig) -> i128 {
    i128::from(config.origin_pad_y()) + row as i128 * i128::from(config.row_stride())
}

fn to_coord(value: i128, column: usize, row: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| LayoutError::out_of_range(column, row))
}

fn midpoint(a: i64, b: i64) -> i64 {
    (a + b).div_euclid(2)
}

// ---------------------------------------------------------------------------
// GridLocator
// ---------------------------------------------------------------------------

/// Uniform grid: every column has its rows at the same heights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridLocator;

impl BracketLocator for GridLocator {
    fn x(&self, column: usize, config: &LayoutConfig) -> i32 {
        column_x(column, config)
    }

    fn y(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<i32> {
        to_coord(leaf_y(row, config), column, row)
    }
}

// ---------------------------------------------------------------------------
// EliminationLocator
// ---------------------------------------------------------------------------

/// Elimination topology: a cell sits at the midpoint of the two cells feeding it.
///
/// ```text
///   y(0, r) = padY + r * (cellHeight + verticalGap)
///   y(c, r) = floor((y(c-1, 2r) + y(c-1, 2r+1)) / 2)
/// ```
///
/// Precondition: `rowCount(c) == ceil(rowCount(c-1) / 2)`. Other shapes still
/// produce numbers (the formula does not look at the model) but they do not
/// describe a bracket.
///
/// Column 0 is an arithmetic progression, so the recursion has a closed form:
/// the two children of a level `L` node are `2^(L-1) * stride` apart, and their
/// floored midpoint is the upper child plus half that distance. A lookup costs
/// O(column) whatever the model shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliminationLocator;

impl BracketLocator for EliminationLocator {
    fn x(&self, column: usize, config: &LayoutConfig) -> i32 {
        column_x(column, config)
    }

    fn y(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<i32> {
        let overflow = || LayoutError::out_of_range(column, row);
        // Every leaf under the cell must be addressable.
        let span = u32::try_from(column)
            .ok()
            .and_then(|shift| 1i64.checked_shl(shift))
            .filter(|span| *span > 0)
            .ok_or_else(overflow)?;
        let first = i64::try_from(row)
            .ok()
            .and_then(|row| row.checked_mul(span))
            .filter(|first| first.checked_add(span - 1).is_some())
            .ok_or_else(overflow)?;

        let stride = i128::from(config.row_stride());
        let mut value = i128::from(config.origin_pad_y()) + i128::from(first) * stride;
        let mut sibling_distance = stride;
        for _ in 0..column {
            value += sibling_distance.div_euclid(2);
            sibling_distance *= 2;
        }

        to_coord(value, column, row)
    }

    fn column_ys(
        &self,
        column: usize,
        rows: usize,
        previous: Option<&[i32]>,
        config: &LayoutConfig,
    ) -> Result<Vec<i32>> {
        let Some(previous) = previous.filter(|_| column > 0) else {
            return (0..rows).map(|row| self.y(column, row, config)).collect();
        };

        (0..rows)
            .map(|row| {
                let top = previous.get(2 * row);
                let bottom = previous.get(2 * row + 1);
                match (top, bottom) {
                    (Some(&a), Some(&b)) => {
                        to_coord(midpoint(a.into(), b.into()).into(), column, row)
                    }
                    // Non-halving shape: the sibling is not in the table.
                    _ => self.y(column, row, config),
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// LocatorKind: built-in strategies selectable from configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    Grid,
    #[default]
    Elimination,
}

impl LocatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocatorKind::Grid => "grid",
            LocatorKind::Elimination => "elimination",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LocatorKind::Grid => LocatorKind::Elimination,
            LocatorKind::Elimination => LocatorKind::Grid,
        }
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl BracketLocator for LocatorKind {
    fn x(&self, column: usize, config: &LayoutConfig) -> i32 {
        match self {
            LocatorKind::Grid => GridLocator.x(column, config),
            LocatorKind::Elimination => EliminationLocator.x(column, config),
        }
    }

    fn y(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<i32> {
        match self {
            LocatorKind::Grid => GridLocator.y(column, row, config),
            LocatorKind::Elimination => EliminationLocator.y(column, row, config),
        }
    }

    fn column_ys(
        &self,
        column: usize,
        rows: usize,
        previous: Option<&[i32]>,
        config: &LayoutConfig,
    ) -> Result<Vec<i32>> {
        match self {
            LocatorKind::Grid => GridLocator.column_ys(column, rows, previous, config),
            LocatorKind::Elimination => EliminationLocator.column_ys(column, rows, previous, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config() -> LayoutConfig {
        LayoutConfig::builder()
            .cell_size(150, 75)
            .gaps(50, 40)
            .origin_pad(0, 0)
            .build()
            .unwrap()
    }

    /// Direct transcription of the recursive definition.
    fn naive_y(column: usize, row: usize, config: &LayoutConfig) -> i128 {
        if column == 0 {
            leaf_y(row, config)
        } else {
            let a = naive_y(column - 1, row * 2, config);
            let b = naive_y(column - 1, row * 2 + 1, config);
            (a + b) / 2
        }
    }

    #[test]
    fn test_grid_x_third_column() {
        let point = position_of(2, 0, &demo_config(), &GridLocator).unwrap();
        assert_eq!(point.x, 400);
        assert_eq!(point.y, 0);
    }

    #[test]
    fn test_grid_y_ignores_column() {
        let config = demo_config();
        assert_eq!(GridLocator.y(0, 3, &config).unwrap(), 345);
        assert_eq!(GridLocator.y(5, 3, &config).unwrap(), 345);
    }

    #[test]
    fn test_elimination_leaf_column() {
        let config = demo_config();
        let ys: Vec<i32> = (0..4).map(|r| EliminationLocator.y(0, r, &config).unwrap()).collect();
        assert_eq!(ys, vec![0, 115, 230, 345]);
    }

    #[test]
    fn test_elimination_second_column_floors_midpoint() {
        let config = demo_config();
        assert_eq!(EliminationLocator.y(1, 0, &config).unwrap(), 57);
        assert_eq!(EliminationLocator.y(1, 1, &config).unwrap(), 287);
        assert_eq!(EliminationLocator.y(2, 0, &config).unwrap(), 172);
    }

    #[test]
    fn test_elimination_x_matches_grid() {
        let config = demo_config();
        for column in 0..6 {
            assert_eq!(EliminationLocator.x(column, &config), GridLocator.x(column, &config));
        }
    }

    #[test]
    fn test_padding_shifts_both_axes() {
        let config = LayoutConfig::builder()
            .cell_size(10, 3)
            .gaps(2, 1)
            .origin_pad(5, 7)
            .build()
            .unwrap();
        let point = EliminationLocator.locate(1, 0, &config).unwrap();
        assert_eq!(point, PixelPoint::new(17, 9));
    }

    #[test]
    fn test_elimination_matches_naive_recursion() {
        let config = LayoutConfig::builder()
            .cell_size(7, 3)
            .gaps(2, 1)
            .origin_pad(1, 1)
            .build()
            .unwrap();
        for column in 0..8 {
            for row in 0..(1usize << (8 - column)) {
                assert_eq!(
                    i128::from(EliminationLocator.y(column, row, &config).unwrap()),
                    naive_y(column, row, &config),
                    "column={column} row={row}"
                );
            }
        }
    }

    #[test]
    fn test_column_ys_from_previous_matches_direct() {
        let config = demo_config();
        let leaves = EliminationLocator.column_ys(0, 8, None, &config).unwrap();
        let next = EliminationLocator.column_ys(1, 4, Some(&leaves), &config).unwrap();
        let direct: Vec<i32> = (0..4).map(|r| EliminationLocator.y(1, r, &config).unwrap()).collect();
        assert_eq!(next, direct);
    }

    #[test]
    fn test_column_ys_falls_back_for_missing_sibling() {
        let config = demo_config();
        // 3 leaves but 2 rows in the next column: row 1 has no sibling in the table.
        let leaves = EliminationLocator.column_ys(0, 3, None, &config).unwrap();
        let next = EliminationLocator.column_ys(1, 2, Some(&leaves), &config).unwrap();
        assert_eq!(next[1], EliminationLocator.y(1, 1, &config).unwrap());
    }

    #[test]
    fn test_elimination_overflow_is_out_of_range() {
        let config = demo_config();
        let err = EliminationLocator.y(200, 0, &config).unwrap_err();
        assert_eq!(err, LayoutError::out_of_range(200, 0));
        assert!(EliminationLocator.y(40, usize::MAX / 2, &config).is_err());
    }

    #[test]
    fn test_elimination_deep_column_closed_form() {
        let config = LayoutConfig::builder()
            .cell_size(1, 1)
            .gaps(0, 0)
            .origin_pad(0, 3)
            .build()
            .unwrap();
        // Stride 1: y(c, 0) = 3 + 2^(c-1) - 1, y(c, 1) one full span below.
        assert_eq!(EliminationLocator.y(30, 0, &config).unwrap(), 3 + (1 << 29) - 1);
        assert_eq!(EliminationLocator.y(30, 1, &config).unwrap(), 3 + (1 << 30) + (1 << 29) - 1);
        assert_eq!(
            EliminationLocator.y(31, 1, &config).unwrap_err(),
            LayoutError::out_of_range(31, 1)
        );
    }

    #[test]
    fn test_elimination_zero_stride_reaches_last_addressable_column() {
        let config = LayoutConfig::builder()
            .cell_size(10, 0)
            .gaps(2, 0)
            .origin_pad(0, 7)
            .build()
            .unwrap();
        assert_eq!(EliminationLocator.y(62, 1, &config).unwrap(), 7);
        assert!(EliminationLocator.y(63, 0, &config).is_err());
    }

    #[test]
    fn test_grid_huge_row_is_out_of_range() {
        let config = demo_config();
        assert_eq!(
            GridLocator.y(0, usize::MAX, &config).unwrap_err(),
            LayoutError::out_of_range(0, usize::MAX)
        );
    }

    #[test]
    fn test_locator_kind_dispatch_and_toggle() {
        let config = demo_config();
        assert_eq!(LocatorKind::Grid.y(1, 1, &config).unwrap(), 115);
        assert_eq!(LocatorKind::Elimination.y(1, 1, &config).unwrap(), 287);
        assert_eq!(LocatorKind::Grid.toggle(), LocatorKind::Elimination);
        assert_eq!(LocatorKind::Elimination.toggle(), LocatorKind::Grid);
    }

    #[test]
    fn test_locate_is_idempotent() {
        let config = demo_config();
        let a = EliminationLocator.locate(3, 1, &config).unwrap();
        let b = EliminationLocator.locate(3, 1, &config).unwrap();
        assert_eq!(a, b);
    }
}
