//! Error types.
//!
//! Three kinds of failures are kept apart:
//!
//! * [`TableError::AlgebraNotImplemented`] is a user facing failure of the symbolic evaluator.
//!   Generation aborts and the previous table stays in place.
//! * [`TableError::Invariant`] signals a caller bug such as operating on a table before one was
//!   generated. A correct caller never sees it.
//! * [`ConstraintError`] describes why a single constraint cannot be evaluated. It never aborts a
//!   pipeline run; the constraint is reported and treated as non-binding.
use std::fmt;

use crate::{cell::CellIO, sim::AlgebraNotImplemented};

/// Errors returned by the table pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The simulation could not resolve an output for an algebraic input assignment.
    AlgebraNotImplemented(AlgebraNotImplemented),
    /// The requested bit limit is outside `1..=MAX_BIT_LIMIT`.
    InvalidBitLimit(u32),
    /// A caller or configuration bug.
    Invariant(InvariantViolation),
}

impl TableError {
    /// Returns `true` for errors that indicate a defect rather than a user facing condition.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, TableError::Invariant(_))
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::AlgebraNotImplemented(err) => fmt::Display::fmt(err, f),
            TableError::InvalidBitLimit(limit) => write!(
                f,
                "bit limit {limit} is outside the supported range 1..={}",
                crate::config::MAX_BIT_LIMIT
            ),
            TableError::Invariant(violation) => {
                write!(f, "internal invariant violated: {violation}")
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::AlgebraNotImplemented(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AlgebraNotImplemented> for TableError {
    fn from(err: AlgebraNotImplemented) -> Self {
        TableError::AlgebraNotImplemented(err)
    }
}

impl From<InvariantViolation> for TableError {
    fn from(violation: InvariantViolation) -> Self {
        TableError::Invariant(violation)
    }
}

/// Conditions that a correct caller never triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An operation needs a generated table but none exists.
    NoTable,
    /// A column is not part of the table.
    UnknownColumn {
        /// The missing column.
        column: CellIO,
        /// The operation that looked it up.
        operation: &'static str,
    },
    /// A hidden column was chosen as sort key.
    HiddenSortColumn {
        /// The hidden column.
        column: CellIO,
    },
    /// The simulation returned the wrong number of output cells.
    OutputShapeMismatch {
        /// Number of output columns the simulation declares.
        expected: usize,
        /// Number of cells it returned.
        found: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::NoTable => write!(f, "no truth table has been generated"),
            InvariantViolation::UnknownColumn { column, operation } => {
                write!(f, "{operation}: column {column:?} is not part of the table")
            }
            InvariantViolation::HiddenSortColumn { column } => {
                write!(f, "cannot sort by hidden column {column:?}")
            }
            InvariantViolation::OutputShapeMismatch { expected, found } => write!(
                f,
                "simulation returned {found} output cells, expected {expected}"
            ),
        }
    }
}

/// Why a constraint cannot be evaluated against the current table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The constrained column is not part of the table.
    UnknownColumn {
        /// The constrained column.
        column: CellIO,
    },
    /// A bound does not fit into the column's width.
    ValueOutOfRange {
        /// The constrained column.
        column: CellIO,
        /// The offending bound.
        value: u64,
    },
    /// The lower bound of an inequality exceeds its upper bound.
    EmptyRange {
        /// The constrained column.
        column: CellIO,
        /// Lower bound.
        lower: u64,
        /// Upper bound.
        upper: u64,
    },
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintError::UnknownColumn { column } => {
                write!(f, "column '{column}' does not exist in this table")
            }
            ConstraintError::ValueOutOfRange { column, value } => write!(
                f,
                "value {value} does not fit into the {} bit column '{column}' (max {})",
                column.width(),
                column.max_value()
            ),
            ConstraintError::EmptyRange {
                column,
                lower,
                upper,
            } => write!(f, "range {lower}..={upper} for column '{column}' is empty"),
        }
    }
}

impl std::error::Error for ConstraintError {}
