//! Truth table derivation for simulated logic designs.
//!
//! The crate turns a [`Simulation`] into a [`TruthTable`] and keeps the table's derived views
//! consistent while the user edits its configuration. The derived state is produced by a fixed
//! chain of stages:
//!
//! 1. [`generate`] enumerates input assignments (truncated to `2^bit_limit` rows) and evaluates
//!    the simulation for each of them.
//! 2. [`reduce`] optionally merges rows into don't-care compressed rows.
//! 3. [`filter`] drops rows whose outputs violate the output constraints.
//! 4. [`sort`] orders the remaining rows by a single column.
//! 5. [`layout`] assigns grid placements to the visible columns.
//!
//! [`TruthTableState`] owns the simulation, the configuration and the table and reruns exactly
//! the stages downstream of every change.
#![warn(missing_docs)]

pub mod cell;
pub mod config;
pub mod constraint;
pub mod display;
pub mod error;
pub mod filter;
pub mod generate;
pub mod hash;
pub mod layout;
pub mod pipeline;
pub mod reduce;
pub mod row;
pub mod sim;
pub mod sort;
pub mod table;

pub use cell::{compare_cell_data, Bits, CellData, CellIO, IoClass};
pub use config::TableConfig;
pub use constraint::{Constraint, ConstraintDiagnostic, ConstraintSet, Equality, Inequality};
pub use display::Radix;
pub use error::{ConstraintError, InvariantViolation, TableError};
pub use layout::{ColumnLayout, LayoutChange, MoveDirection, Placement};
pub use pipeline::{Msg, Notice, Stage, TruthTableState};
pub use row::{RowMap, TruthTableRow};
pub use sim::{AlgebraNotImplemented, FnSimulation, Simulation};
pub use sort::{SortDirection, SortSpec};
pub use table::TruthTable;
