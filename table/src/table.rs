//! The truth table aggregate and its derived views.
use std::sync::Arc;

use crate::{
    cell::CellIO,
    generate::Generated,
    row::{RowMap, TruthTableRow},
};

/// A generated truth table.
///
/// Holds the base mapping produced by the generator together with the derived views: the
/// optional don't-care reduced map, the filtered rows and their sorted order. The derived views
/// are index lists into the active map, which is the reduced map when present and the base
/// mapping otherwise.
#[derive(Clone, Debug)]
pub struct TruthTable {
    inputs: Arc<[CellIO]>,
    outputs: Arc<[CellIO]>,
    base: RowMap,
    truncated: bool,
    input_space: u128,
    dc_map: Option<RowMap>,
    filtered: Vec<usize>,
    sorted: Vec<usize>,
}

impl TruthTable {
    /// Wraps the generator's output. All rows start out visible in enumeration order.
    pub fn from_generated(generated: Generated) -> Self {
        let all: Vec<usize> = (0..generated.map.len()).collect();
        Self {
            inputs: generated.inputs,
            outputs: generated.outputs,
            base: generated.map,
            truncated: generated.truncated,
            input_space: generated.input_space,
            dc_map: None,
            filtered: all.clone(),
            sorted: all,
        }
    }

    /// The input columns in simulation order.
    pub fn inputs(&self) -> &Arc<[CellIO]> {
        &self.inputs
    }

    /// The output columns in simulation order.
    pub fn outputs(&self) -> &Arc<[CellIO]> {
        &self.outputs
    }

    /// Returns `true` if `io` is one of the table's columns.
    pub fn has_column(&self, io: &CellIO) -> bool {
        self.inputs.contains(io) || self.outputs.contains(io)
    }

    /// The generated mapping from input rows to output rows.
    pub fn base(&self) -> &RowMap {
        &self.base
    }

    /// Number of generated rows.
    pub fn row_count(&self) -> usize {
        self.base.len()
    }

    /// Whether the enumeration stopped at the bit limit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of concrete input assignments, including those cut off by truncation.
    pub fn input_space(&self) -> u128 {
        self.input_space
    }

    /// The don't-care reduced map, if reduction was requested.
    pub fn dc_map(&self) -> Option<&RowMap> {
        self.dc_map.as_ref()
    }

    /// The map the filter and sort stages operate on.
    pub fn active(&self) -> &RowMap {
        self.dc_map.as_ref().unwrap_or(&self.base)
    }

    /// Indices of the rows of [`active`](Self::active) passing the output constraints.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// The rows passing the output constraints, in map order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = (&TruthTableRow, &TruthTableRow)> + '_ {
        let active = self.active();
        self.filtered
            .iter()
            .filter_map(move |&index| active.get_index(index))
    }

    /// The visible rows in display order.
    pub fn sorted_rows(&self) -> impl Iterator<Item = (&TruthTableRow, &TruthTableRow)> + '_ {
        let active = self.active();
        self.sorted
            .iter()
            .filter_map(move |&index| active.get_index(index))
    }

    /// Number of visible rows.
    pub fn visible_len(&self) -> usize {
        self.sorted.len()
    }

    /// The output row for a concrete input assignment.
    ///
    /// Looks the assignment up in the base mapping, falling back to the reduced row covering it.
    pub fn lookup(&self, input: &TruthTableRow) -> Option<&TruthTableRow> {
        self.base.get(input).or_else(|| {
            self.dc_map.as_ref().and_then(|dc_map| {
                dc_map
                    .iter()
                    .find(|(pattern, _)| pattern.matches(input))
                    .map(|(_, output)| output)
            })
        })
    }

    pub(crate) fn set_dc_map(&mut self, dc_map: Option<RowMap>) {
        self.dc_map = dc_map;
    }

    pub(crate) fn set_filtered(&mut self, filtered: Vec<usize>) {
        self.filtered = filtered;
    }

    pub(crate) fn set_sorted(&mut self, sorted: Vec<usize>) {
        self.sorted = sorted;
    }
}
