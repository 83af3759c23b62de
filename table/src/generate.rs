//! Enumeration of input assignments and evaluation of the simulation.
use std::sync::Arc;

use crate::{
    cell::{CellData, CellIO},
    config::TableConfig,
    constraint::{Constraint, ConstraintDiagnostic},
    error::{InvariantViolation, TableError},
    row::{RowMap, TruthTableRow},
    sim::Simulation,
};

/// The result of [`generate`].
#[derive(Debug)]
pub struct Generated {
    /// The input columns.
    pub inputs: Arc<[CellIO]>,
    /// The output columns.
    pub outputs: Arc<[CellIO]>,
    /// Input rows in enumeration order, mapped to the simulated outputs.
    pub map: RowMap,
    /// Set when fewer rows than `input_space` were generated.
    pub truncated: bool,
    /// Number of concrete input assignments admitted by the input constraints.
    pub input_space: u128,
    /// Input constraints that were ignored.
    pub diagnostics: Vec<ConstraintDiagnostic>,
}

/// The values enumerated for one input column.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Domain {
    Algebra(Arc<str>),
    Range { lower: u64, upper: u64, width: u32 },
    Empty,
}

impl Domain {
    fn for_input(io: &CellIO, config: &TableConfig, constraints: &[Constraint]) -> Self {
        if config.is_algebraic(io) {
            return Domain::Algebra(io.label().into());
        }
        let (mut lower, mut upper) = (0, io.max_value());
        for constraint in constraints.iter().filter(|constraint| constraint.io() == io) {
            let (min, max) = constraint.bounds();
            lower = lower.max(min);
            upper = upper.min(max);
        }
        if lower > upper {
            Domain::Empty
        } else {
            Domain::Range {
                lower,
                upper,
                width: io.width(),
            }
        }
    }

    fn len(&self) -> u128 {
        match *self {
            Domain::Algebra(_) => 1,
            Domain::Range { lower, upper, .. } => (upper - lower) as u128 + 1,
            Domain::Empty => 0,
        }
    }
}

/// Steps through the cross product of the domains, last column fastest.
struct Odometer<'a> {
    domains: &'a [Domain],
    values: Vec<u64>,
}

impl<'a> Odometer<'a> {
    fn new(domains: &'a [Domain]) -> Self {
        let values = domains
            .iter()
            .map(|domain| match *domain {
                Domain::Range { lower, .. } => lower,
                _ => 0,
            })
            .collect();
        Self { domains, values }
    }

    fn cells(&self) -> Vec<CellData> {
        self.domains
            .iter()
            .zip(&self.values)
            .map(|(domain, &value)| match domain {
                Domain::Algebra(name) => CellData::Algebra(name.clone()),
                Domain::Range { width, .. } => CellData::bits(value, *width),
                Domain::Empty => unreachable!("empty domains produce no rows"),
            })
            .collect()
    }

    fn advance(&mut self) {
        for (domain, value) in self.domains.iter().zip(&mut self.values).rev() {
            if let Domain::Range { lower, upper, .. } = *domain {
                if *value < upper {
                    *value += 1;
                    return;
                }
                *value = lower;
            }
        }
    }
}

/// Builds the base mapping of a truth table.
///
/// Input columns are enumerated in ascending value order with the last column varying fastest.
/// Algebraic inputs contribute a single [`CellData::Algebra`] cell named after the column and do
/// not count towards the input space. Input constraints narrow the enumerated values of the
/// column they target. If more than `2^bit_limit` assignments remain, only the first
/// `2^bit_limit` are generated.
///
/// The result only depends on the arguments, so repeated calls produce identical maps. Fails
/// with [`TableError::InvalidBitLimit`] if the configured bit limit is out of range.
pub fn generate(
    simulation: &impl Simulation,
    config: &TableConfig,
) -> Result<Generated, TableError> {
    let bit_limit = TableConfig::check_bit_limit(config.bit_limit)?;
    let inputs: Arc<[CellIO]> = simulation.inputs().into();
    let outputs: Arc<[CellIO]> = simulation.outputs().into();

    let (constraints, diagnostics) = config.input_constraints.split_valid(&inputs);

    let domains: Vec<Domain> = inputs
        .iter()
        .map(|io| Domain::for_input(io, config, &constraints))
        .collect();

    let input_space = domains
        .iter()
        .fold(1u128, |space, domain| space.saturating_mul(domain.len()));
    let limit = 1u128 << bit_limit;
    let truncated = input_space > limit;
    let row_count = input_space.min(limit) as usize;

    log::debug!(
        "enumerating {row_count} of {input_space} input assignments ({} algebraic inputs)",
        config.algebraic.len()
    );

    let mut map = RowMap::with_capacity_and_hasher(row_count, Default::default());
    let mut odometer = Odometer::new(&domains);

    for _ in 0..row_count {
        let input_row = TruthTableRow::new(inputs.clone(), odometer.cells());
        let cells = simulation.evaluate(&input_row)?;
        if cells.len() != outputs.len() {
            return Err(InvariantViolation::OutputShapeMismatch {
                expected: outputs.len(),
                found: cells.len(),
            }
            .into());
        }
        let previous = map.insert(input_row, TruthTableRow::new(outputs.clone(), cells));
        debug_assert!(previous.is_none(), "enumeration repeated an assignment");
        odometer.advance();
    }

    if truncated {
        log::info!("truth table truncated to {row_count} of {input_space} rows");
    }

    Ok(Generated {
        inputs,
        outputs,
        map,
        truncated,
        input_space,
        diagnostics,
    })
}
