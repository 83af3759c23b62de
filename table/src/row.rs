//! Table rows and row keyed maps.
use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use indexmap::IndexMap;

use crate::{
    cell::{CellData, CellIO},
    hash::RowHasher,
};

/// An insertion ordered map from input rows to output rows.
pub type RowMap = IndexMap<TruthTableRow, TruthTableRow, RowHasher>;

/// An ordered sequence of `(CellIO, CellData)` pairs.
///
/// The column list is shared between all rows of a table, so a row is a pointer to its schema
/// plus one cell per column. Equality and hashing use the canonical encoding of the pairs in
/// order, which makes rows usable as map keys.
#[derive(Clone)]
pub struct TruthTableRow {
    ios: Arc<[CellIO]>,
    cells: Vec<CellData>,
}

impl TruthTableRow {
    /// Creates a row.
    ///
    /// Panics if the number of cells differs from the number of columns.
    pub fn new(ios: Arc<[CellIO]>, cells: Vec<CellData>) -> Self {
        assert_eq!(ios.len(), cells.len(), "row cell count must match its columns");
        Self { ios, cells }
    }

    /// The row's columns.
    pub fn ios(&self) -> &Arc<[CellIO]> {
        &self.ios
    }

    /// The row's cells, in column order.
    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for a row without columns.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the `(column, cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&CellIO, &CellData)> + '_ {
        self.ios.iter().zip(self.cells.iter())
    }

    /// Index of `io` within the row.
    pub fn position(&self, io: &CellIO) -> Option<usize> {
        self.ios.iter().position(|candidate| candidate == io)
    }

    /// The cell for `io`.
    pub fn cell(&self, io: &CellIO) -> Option<&CellData> {
        self.position(io).map(|index| &self.cells[index])
    }

    /// Returns `true` if both rows list the same columns in the same order.
    pub fn same_shape(&self, other: &TruthTableRow) -> bool {
        Arc::ptr_eq(&self.ios, &other.ios) || self.ios == other.ios
    }

    /// A copy of this row with the cell at `index` replaced.
    pub fn with_cell(&self, index: usize, cell: CellData) -> Self {
        let mut cells = self.cells.clone();
        cells[index] = cell;
        Self {
            ios: self.ios.clone(),
            cells,
        }
    }

    /// Returns `true` if this row, read as a pattern, covers the `concrete` row.
    ///
    /// See [`CellData::matches`] for the per-cell rule.
    pub fn matches(&self, concrete: &TruthTableRow) -> bool {
        self.same_shape(concrete)
            && self
                .cells
                .iter()
                .zip(concrete.cells.iter())
                .all(|(pattern, cell)| pattern.matches(cell))
    }
}

impl PartialEq for TruthTableRow {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other) && self.cells == other.cells
    }
}

impl Eq for TruthTableRow {}

impl Hash for TruthTableRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Rows of one map share their columns, so only the cells carry information. Equality
        // still compares the columns.
        self.cells.hash(state);
    }
}

impl std::fmt::Debug for TruthTableRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_value;

    #[test]
    fn rows_compare_by_columns_and_cells() {
        let ios: Arc<[CellIO]> =
            Arc::from(vec![CellIO::input("a", 1, 0), CellIO::input("b", 2, 1)]);
        let other_ios: Arc<[CellIO]> = Arc::from(ios.to_vec());

        let row = TruthTableRow::new(ios.clone(), vec![CellData::bits(1, 1), CellData::bits(2, 2)]);
        let same = TruthTableRow::new(other_ios, vec![CellData::bits(1, 1), CellData::bits(2, 2)]);
        assert_eq!(row, same);
        assert_eq!(hash_value(&row), hash_value(&same));

        let renamed: Arc<[CellIO]> =
            Arc::from(vec![CellIO::input("a", 1, 0), CellIO::input("c", 2, 1)]);
        let different = TruthTableRow::new(renamed, row.cells().to_vec());
        assert_ne!(row, different);
        assert!(!row.same_shape(&different));

        assert_eq!(row.cell(&CellIO::input("b", 2, 1)), Some(&CellData::bits(2, 2)));
        assert_eq!(row.cell(&CellIO::output("b", 2, 1)), None);
    }

    #[test]
    fn pattern_rows() {
        let ios: Arc<[CellIO]> =
            Arc::from(vec![CellIO::input("a", 2, 0), CellIO::input("b", 1, 1)]);
        let pattern = TruthTableRow::new(
            ios.clone(),
            vec![CellData::bits(0b10, 2).with_dont_care_bit(0), CellData::DC],
        );
        for (a, b, expected) in [(2, 0, true), (3, 1, true), (1, 1, false)] {
            let row =
                TruthTableRow::new(ios.clone(), vec![CellData::bits(a, 2), CellData::bits(b, 1)]);
            assert_eq!(pattern.matches(&row), expected, "a={a} b={b}");
        }
    }
}
