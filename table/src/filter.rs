//! The output constraint filter.
use crate::{
    cell::CellIO,
    constraint::{Constraint, ConstraintDiagnostic, ConstraintSet},
    row::{RowMap, TruthTableRow},
};

/// The result of [`filter_rows`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filtered {
    /// Indices of the retained rows, ascending.
    pub kept: Vec<usize>,
    /// Constraints that could not be evaluated and were ignored.
    pub diagnostics: Vec<ConstraintDiagnostic>,
}

/// Returns `true` if `row` satisfies every constraint.
///
/// A constraint whose column does not appear in the row is satisfied vacuously, otherwise some
/// cell of that column has to pass the constraint's test.
pub fn row_passes(row: &TruthTableRow, constraints: &[Constraint]) -> bool {
    constraints.iter().all(|constraint| {
        let mut cells = row
            .iter()
            .filter(|(io, _)| *io == constraint.io())
            .map(|(_, cell)| cell)
            .peekable();
        cells.peek().is_none() || cells.any(|cell| constraint.test(cell))
    })
}

/// Selects the rows of `map` whose output rows satisfy all `constraints`.
///
/// Constraints that cannot be evaluated against `outputs` are reported and do not filter.
pub fn filter_rows(map: &RowMap, outputs: &[CellIO], constraints: &ConstraintSet) -> Filtered {
    let (active, diagnostics) = constraints.split_valid(outputs);

    let kept = if active.is_empty() {
        (0..map.len()).collect()
    } else {
        map.values()
            .enumerate()
            .filter(|(_, output)| row_passes(output, &active))
            .map(|(index, _)| index)
            .collect()
    };

    Filtered { kept, diagnostics }
}
