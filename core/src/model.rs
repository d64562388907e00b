use crate::error::{LayoutError, Result};
use crate::GridPosition;

// ---------------------------------------------------------------------------
// BracketModel: the data source a render pass reads
// ---------------------------------------------------------------------------

/// Column/row indexed cell storage. The layout core only reads counts and values;
/// it never mutates a model.
pub trait BracketModel<T> {
    fn column_count(&self) -> usize;

    /// Rows in `column`; 0 for a column that does not exist.
    fn row_count(&self, column: usize) -> usize;

    fn value_at(&self, column: usize, row: usize) -> Option<&T>;

    /// Row counts of every column, taken in one go so a pass sees one shape.
    fn row_counts(&self) -> Vec<usize> {
        (0..self.column_count()).map(|c| self.row_count(c)).collect()
    }

    /// Total number of cells across all columns.
    fn cell_count(&self) -> usize {
        (0..self.column_count()).map(|c| self.row_count(c)).sum()
    }

    fn contains(&self, position: GridPosition) -> bool {
        position.column < self.column_count() && position.row < self.row_count(position.column)
    }
}

/// In-memory model: a list of columns, each a list of optional slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultBracketModel<T> {
    columns: Vec<Vec<Option<T>>>,
}

impl<T> Default for DefaultBracketModel<T> {
    fn default() -> Self {
        Self { columns: Vec::new() }
    }
}

impl<T> DefaultBracketModel<T> {
    /// `columns` empty columns.
    pub fn new(columns: usize) -> Self {
        Self { columns: (0..columns).map(|_| Vec::new()).collect() }
    }

    /// Empty elimination bracket: `initial_rows` in the first column, halving
    /// (rounded up) per column until a single cell remains.
    pub fn elimination(initial_rows: usize) -> Result<Self> {
        if initial_rows == 0 {
            return Err(LayoutError::invalid("an elimination bracket needs at least one row"));
        }
        let mut columns = Vec::new();
        let mut rows = initial_rows;
        loop {
            columns.push((0..rows).map(|_| None).collect());
            if rows == 1 {
                break;
            }
            rows = rows.div_ceil(2);
        }
        Ok(Self { columns })
    }

    /// Elimination bracket seeded column-major with `entries`; later rounds stay empty
    /// unless there are more entries than first-column slots.
    pub fn from_entries(entries: impl IntoIterator<Item = T>) -> Result<Self> {
        let entries: Vec<T> = entries.into_iter().collect();
        let mut model = Self::elimination(entries.len())?;
        model.fill(entries);
        Ok(model)
    }

    /// Uniform `columns` × `rows` grid, filled column-major; missing entries stay empty.
    pub fn grid(entries: impl IntoIterator<Item = T>, columns: usize, rows: usize) -> Result<Self> {
        if columns == 0 {
            return Err(LayoutError::invalid("column count has to be > 0"));
        }
        if rows == 0 {
            return Err(LayoutError::invalid("row count has to be > 0"));
        }
        let mut model = Self {
            columns: (0..columns).map(|_| (0..rows).map(|_| None).collect()).collect(),
        };
        model.fill(entries);
        Ok(model)
    }

    /// Explicit shape.
    pub fn from_columns(columns: Vec<Vec<Option<T>>>) -> Self {
        Self { columns }
    }

    fn fill(&mut self, entries: impl IntoIterator<Item = T>) {
        let mut entries = entries.into_iter();
        for slot in self.columns.iter_mut().flatten() {
            match entries.next() {
                Some(value) => *slot = Some(value),
                None => return,
            }
        }
    }

    /// Replace the value at an existing slot, or append when `row` is one past the end.
    pub fn set_value_at(&mut self, column: usize, row: usize, value: T) -> Result<()> {
        let col = self
            .columns
            .get_mut(column)
            .ok_or_else(|| LayoutError::out_of_range(column, row))?;
        match row.cmp(&col.len()) {
            std::cmp::Ordering::Less => col[row] = Some(value),
            std::cmp::Ordering::Equal => col.push(Some(value)),
            std::cmp::Ordering::Greater => return Err(LayoutError::out_of_range(column, row)),
        }
        Ok(())
    }

    /// Empty a slot, returning what it held.
    pub fn clear_value_at(&mut self, column: usize, row: usize) -> Result<Option<T>> {
        self.columns
            .get_mut(column)
            .and_then(|col| col.get_mut(row))
            .map(Option::take)
            .ok_or_else(|| LayoutError::out_of_range(column, row))
    }

    /// Where the first value matching `predicate` advances to.
    ///
    /// Scans from the second-to-last column backwards so the furthest-advanced
    /// occurrence wins; returns the parent slot `(column + 1, row / 2)`.
    pub fn next_position(&self, predicate: impl Fn(&T) -> bool) -> Option<GridPosition> {
        let scan = self.columns.len().checked_sub(1)?;
        (0..scan).rev().find_map(|column| {
            self.columns[column]
                .iter()
                .position(|slot| slot.as_ref().is_some_and(&predicate))
                .map(|row| GridPosition::new(column, row).parent())
        })
    }

    /// Iterate every slot with its position, column-major.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, Option<&T>)> {
        self.columns.iter().enumerate().flat_map(|(column, rows)| {
            rows.iter()
                .enumerate()
                .map(move |(row, slot)| (GridPosition::new(column, row), slot.as_ref()))
        })
    }
}

impl<T> BracketModel<T> for DefaultBracketModel<T> {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self, column: usize) -> usize {
        self.columns.get(column).map_or(0, Vec::len)
    }

    fn value_at(&self, column: usize, row: usize) -> Option<&T> {
        self.columns.get(column)?.get(row)?.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elimination_shape_halves_rounding_up() {
        let model = DefaultBracketModel::<u8>::elimination(8).unwrap();
        assert_eq!(model.row_counts(), vec![8, 4, 2, 1]);
        let odd = DefaultBracketModel::<u8>::elimination(5).unwrap();
        assert_eq!(odd.row_counts(), vec![5, 3, 2, 1]);
        let single = DefaultBracketModel::<u8>::elimination(1).unwrap();
        assert_eq!(single.row_counts(), vec![1]);
    }

    #[test]
    fn test_elimination_rejects_zero_rows() {
        assert!(DefaultBracketModel::<u8>::elimination(0).unwrap_err().is_fatal());
    }

    #[test]
    fn test_from_entries_fills_first_column() {
        let model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        assert_eq!(model.row_counts(), vec![4, 2, 1]);
        assert_eq!(model.value_at(0, 3), Some(&"d"));
        assert_eq!(model.value_at(1, 0), None);
        assert_eq!(model.cell_count(), 7);
    }

    #[test]
    fn test_grid_shape_and_fill() {
        let model = DefaultBracketModel::grid(1..=5, 2, 3).unwrap();
        assert_eq!(model.row_counts(), vec![3, 3]);
        assert_eq!(model.value_at(1, 1), Some(&5));
        assert_eq!(model.value_at(1, 2), None);
        assert!(DefaultBracketModel::grid(1..=5, 0, 3).is_err());
        assert!(DefaultBracketModel::grid(1..=5, 2, 0).is_err());
    }

    #[test]
    fn test_out_of_range_reads() {
        let model = DefaultBracketModel::from_entries(["a", "b"]).unwrap();
        assert_eq!(model.row_count(9), 0);
        assert_eq!(model.value_at(9, 0), None);
        assert_eq!(model.value_at(0, 9), None);
        assert!(!model.contains(GridPosition::new(1, 1)));
        assert!(model.contains(GridPosition::new(1, 0)));
    }

    #[test]
    fn test_set_value_replaces_or_appends() {
        let mut model = DefaultBracketModel::<&str>::new(2);
        model.set_value_at(0, 0, "a").unwrap();
        model.set_value_at(0, 1, "b").unwrap();
        model.set_value_at(0, 0, "z").unwrap();
        assert_eq!(model.value_at(0, 0), Some(&"z"));
        assert_eq!(model.row_count(0), 2);
        assert_eq!(
            model.set_value_at(0, 5, "x").unwrap_err(),
            LayoutError::out_of_range(0, 5)
        );
        assert!(model.set_value_at(4, 0, "x").is_err());
    }

    #[test]
    fn test_clear_value() {
        let mut model = DefaultBracketModel::from_entries(["a", "b"]).unwrap();
        assert_eq!(model.clear_value_at(0, 1).unwrap(), Some("b"));
        assert_eq!(model.value_at(0, 1), None);
        assert!(model.clear_value_at(3, 0).is_err());
    }

    #[test]
    fn test_next_position_prefers_furthest_column() {
        let mut model = DefaultBracketModel::from_entries(["a", "b", "c", "d"]).unwrap();
        assert_eq!(model.next_position(|v| *v == "c"), Some(GridPosition::new(1, 1)));
        model.set_value_at(1, 1, "c").unwrap();
        assert_eq!(model.next_position(|v| *v == "c"), Some(GridPosition::new(2, 0)));
        // The champion slot is never scanned: nowhere left to advance.
        model.set_value_at(2, 0, "c").unwrap();
        assert_eq!(model.next_position(|v| *v == "c"), Some(GridPosition::new(2, 0)));
        assert_eq!(model.next_position(|v| *v == "q"), None);
    }

    #[test]
    fn test_iter_is_column_major() {
        let model = DefaultBracketModel::from_entries([1, 2]).unwrap();
        let positions: Vec<GridPosition> = model.iter().map(|(p, _)| p).collect();
        assert_eq!(
            positions,
            vec![GridPosition::new(0, 0), GridPosition::new(0, 1), GridPosition::new(1, 0)]
        );
    }
}
