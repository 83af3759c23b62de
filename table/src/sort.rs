//! The single-key sort stage.
use crate::{
    cell::{compare_cell_data, CellData, CellIO},
    error::{InvariantViolation, TableError},
    row::RowMap,
};

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// The active sort key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// Column to sort by, either an input or an output.
    pub column: CellIO,
    /// Direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort by `column`, smallest first.
    pub fn ascending(column: CellIO) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Sort by `column`, largest first.
    pub fn descending(column: CellIO) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Orders the rows at the `kept` indices of `map`.
///
/// Without a sort key the order of `kept` is retained. Otherwise rows are stably sorted by
/// [`compare_cell_data`] on the key column. Descending order is the exact reverse of the
/// ascending result.
pub fn sort_rows(
    map: &RowMap,
    inputs: &[CellIO],
    outputs: &[CellIO],
    kept: &[usize],
    spec: Option<&SortSpec>,
) -> Result<Vec<usize>, TableError> {
    let mut sorted = kept.to_vec();
    let Some(spec) = spec else {
        return Ok(sorted);
    };

    let keys: Vec<&CellData> = if let Some(column) = position(inputs, &spec.column) {
        map.keys().map(|input| &input.cells()[column]).collect()
    } else if let Some(column) = position(outputs, &spec.column) {
        map.values().map(|output| &output.cells()[column]).collect()
    } else {
        return Err(InvariantViolation::UnknownColumn {
            column: spec.column.clone(),
            operation: "sort",
        }
        .into());
    };

    sorted.sort_by(|&a, &b| compare_cell_data(keys[a], keys[b]));
    if spec.direction == SortDirection::Descending {
        sorted.reverse();
    }
    Ok(sorted)
}

fn position(columns: &[CellIO], column: &CellIO) -> Option<usize> {
    columns.iter().position(|candidate| candidate == column)
}
