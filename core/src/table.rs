use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::locator::BracketLocator;
use crate::PixelPoint;
use log::{debug, warn};

/// Dense per-column position table for one model shape and one configuration.
///
/// Built column 0 first, each later column derived from the previous one, so a
/// full table costs O(total cells). Also acts as a memoizing [`BracketLocator`]:
/// lookups for the configuration and shape it was built for come from the table,
/// anything else is delegated to the wrapped strategy.
pub struct PositionTable<'a> {
    locator: &'a dyn BracketLocator,
    config: LayoutConfig,
    xs: Vec<i32>,
    ys: Vec<Vec<i32>>,
}

impl<'a> PositionTable<'a> {
    /// Fill the table for `row_counts[c]` rows in each column `c`.
    pub fn build(
        locator: &'a dyn BracketLocator,
        config: &LayoutConfig,
        row_counts: &[usize],
    ) -> Result<Self> {
        config.validate()?;

        if !is_halving(row_counts) {
            warn!(
                "row counts {row_counts:?} do not halve per column; positions follow the formula, not the model"
            );
        }

        let mut xs = Vec::with_capacity(row_counts.len());
        let mut ys: Vec<Vec<i32>> = Vec::with_capacity(row_counts.len());
        for (column, &rows) in row_counts.iter().enumerate() {
            xs.push(locator.x(column, config));
            let previous = ys.last().map(Vec::as_slice);
            let column_ys = locator.column_ys(column, rows, previous, config)?;
            ys.push(column_ys);
        }

        debug!(
            "position table built: {} columns, {} cells",
            xs.len(),
            row_counts.iter().sum::<usize>()
        );

        Ok(Self { locator, config: *config, xs, ys })
    }

    /// Bounds-checked origin of (`column`, `row`) within the built shape.
    pub fn position(&self, column: usize, row: usize) -> Result<PixelPoint> {
        let x = self.xs.get(column);
        let y = self.ys.get(column).and_then(|col| col.get(row));
        match (x, y) {
            (Some(&x), Some(&y)) => Ok(PixelPoint::new(x, y)),
            _ => Err(LayoutError::out_of_range(column, row)),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn column_count(&self) -> usize {
        self.xs.len()
    }

    pub fn row_count(&self, column: usize) -> usize {
        self.ys.get(column).map_or(0, Vec::len)
    }

    /// Index of the last column, `None` for an empty table.
    pub fn last_column(&self) -> Option<usize> {
        self.column_count().checked_sub(1)
    }

    fn cached(&self, config: &LayoutConfig) -> bool {
        *config == self.config
    }
}

impl BracketLocator for PositionTable<'_> {
    fn x(&self, column: usize, config: &LayoutConfig) -> i32 {
        match self.xs.get(column) {
            Some(&x) if self.cached(config) => x,
            _ => self.locator.x(column, config),
        }
    }

    fn y(&self, column: usize, row: usize, config: &LayoutConfig) -> Result<i32> {
        match self.ys.get(column).and_then(|col| col.get(row)) {
            Some(&y) if self.cached(config) => Ok(y),
            _ => self.locator.y(column, row, config),
        }
    }
}

/// `rows[c] == ceil(rows[c-1] / 2)` for every column after the first.
pub fn is_halving(row_counts: &[usize]) -> bool {
    row_counts
        .windows(2)
        .all(|pair| pair[1] == pair[0].div_ceil(2))
}
