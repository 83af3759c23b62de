//! Hashing helpers shared by the row maps and the don't-care reducer.
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use zwohash::ZwoHasher;

use crate::cell::CellData;

/// The hasher used for every row keyed collection in this crate.
pub type RowHasher = BuildHasherDefault<ZwoHasher>;

/// Hashes `value` with [`RowHasher`].
#[inline]
pub fn hash_value<T: Hash>(value: T) -> u64 {
    RowHasher::default().hash_one(value)
}

/// Hashes a cell sequence as if the cell at `index` were `replacement`.
///
/// Two sequences that differ only at `index` hash identically when given the same replacement,
/// which is how the reducer buckets merge partners without building the masked rows.
pub fn hash_cells_replacing(cells: &[CellData], index: usize, replacement: &CellData) -> u64 {
    let mut hasher = RowHasher::default().build_hasher();
    cells.len().hash(&mut hasher);
    for (i, cell) in cells.iter().enumerate() {
        if i == index {
            replacement.hash(&mut hasher);
        } else {
            cell.hash(&mut hasher);
        }
    }
    hasher.finish()
}
