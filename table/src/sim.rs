//! The interface to the circuit simulator.
use std::fmt;

use crate::{
    cell::{CellData, CellIO},
    row::TruthTableRow,
};

/// The simulator could not evaluate an output in the presence of algebraic inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgebraNotImplemented {
    reason: String,
}

impl AlgebraNotImplemented {
    /// Creates the error with a human readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason given by the simulator.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for AlgebraNotImplemented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "algebraic evaluation not implemented: {}", self.reason)
    }
}

impl std::error::Error for AlgebraNotImplemented {}

/// Simulation data consumed by the table generator.
///
/// Implementations must be pure: evaluating the same assignment twice yields the same outputs.
pub trait Simulation {
    /// The design's inputs, in table column order.
    fn inputs(&self) -> &[CellIO];

    /// The design's outputs, in table column order.
    fn outputs(&self) -> &[CellIO];

    /// Evaluates the design for one input assignment.
    ///
    /// `assignment` has one cell per entry of [`inputs`](Self::inputs), each either concrete
    /// [`CellData::Bits`] or [`CellData::Algebra`]. The result holds one cell per entry of
    /// [`outputs`](Self::outputs).
    fn evaluate(&self, assignment: &TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented>;
}

impl<S: Simulation + ?Sized> Simulation for &S {
    fn inputs(&self) -> &[CellIO] {
        (**self).inputs()
    }

    fn outputs(&self) -> &[CellIO] {
        (**self).outputs()
    }

    fn evaluate(&self, assignment: &TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented> {
        (**self).evaluate(assignment)
    }
}

/// A [`Simulation`] backed by a closure.
pub struct FnSimulation<F> {
    inputs: Vec<CellIO>,
    outputs: Vec<CellIO>,
    eval: F,
}

impl<F> FnSimulation<F>
where
    F: Fn(&TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented>,
{
    /// Wraps `eval` as a simulation with the given ports.
    pub fn new(inputs: Vec<CellIO>, outputs: Vec<CellIO>, eval: F) -> Self {
        debug_assert!(inputs.iter().all(CellIO::is_input));
        debug_assert!(outputs.iter().all(|io| !io.is_input()));
        Self {
            inputs,
            outputs,
            eval,
        }
    }
}

impl<F> Simulation for FnSimulation<F>
where
    F: Fn(&TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented>,
{
    fn inputs(&self) -> &[CellIO] {
        &self.inputs
    }

    fn outputs(&self) -> &[CellIO] {
        &self.outputs
    }

    fn evaluate(&self, assignment: &TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented> {
        (self.eval)(assignment)
    }
}
