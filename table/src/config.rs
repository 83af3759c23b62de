//! The table's configuration object.
use zwohash::HashSet;

use crate::{
    cell::CellIO, constraint::ConstraintSet, display::Radix, error::TableError,
    layout::ColumnLayout, sim::Simulation, sort::SortSpec,
};

/// Bit limit used when none is configured.
pub const DEFAULT_BIT_LIMIT: u32 = 10;

/// Largest accepted bit limit. Tables with more than `2^MAX_BIT_LIMIT` rows are not materialized.
pub const MAX_BIT_LIMIT: u32 = 32;

/// Everything the user can change about a table.
///
/// Each pipeline stage reads the parts it needs from here; derived data lives in
/// [`TruthTable`](crate::TruthTable).
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// At most `2^bit_limit` input assignments are enumerated.
    pub bit_limit: u32,
    /// Inputs that are kept symbolic instead of being enumerated.
    pub algebraic: HashSet<CellIO>,
    /// Restricts which input rows are generated.
    pub input_constraints: ConstraintSet,
    /// Restricts which rows are visible.
    pub output_constraints: ConstraintSet,
    /// The active sort key.
    pub sort: Option<SortSpec>,
    /// Whether the don't-care reduced map was requested.
    pub reduce: bool,
    /// Column order and visibility.
    pub layout: ColumnLayout,
    /// Numeric base used when presenting cells.
    pub radix: Radix,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bit_limit: DEFAULT_BIT_LIMIT,
            algebraic: Default::default(),
            input_constraints: Default::default(),
            output_constraints: Default::default(),
            sort: None,
            reduce: false,
            layout: ColumnLayout::default(),
            radix: Radix::default(),
        }
    }
}

impl TableConfig {
    /// Default configuration for a table of `simulation`, using the given bit limit.
    pub fn for_simulation(simulation: &impl Simulation, bit_limit: u32) -> Self {
        Self {
            bit_limit,
            layout: ColumnLayout::new(simulation.inputs(), simulation.outputs()),
            ..Self::default()
        }
    }

    /// Checks a bit limit before it is stored.
    pub fn check_bit_limit(bit_limit: u32) -> Result<u32, TableError> {
        if (1..=MAX_BIT_LIMIT).contains(&bit_limit) {
            Ok(bit_limit)
        } else {
            Err(TableError::InvalidBitLimit(bit_limit))
        }
    }

    /// Drops settings that refer to columns no longer produced by `simulation`.
    ///
    /// Constraints are kept; the generator and filter report the ones that became invalid.
    pub fn sync_columns(&mut self, simulation: &impl Simulation) {
        let (inputs, outputs) = (simulation.inputs(), simulation.outputs());
        self.layout.sync_columns(inputs, outputs);
        self.algebraic.retain(|io| inputs.contains(io));
        if let Some(sort) = &self.sort {
            if !inputs.contains(&sort.column) && !outputs.contains(&sort.column) {
                log::debug!("dropping sort by removed column {:?}", sort.column);
                self.sort = None;
            }
        }
    }

    /// Returns `true` if `io` is kept symbolic.
    pub fn is_algebraic(&self, io: &CellIO) -> bool {
        self.algebraic.contains(io)
    }
}
