//! Don't-care reduction of a truth table.
//!
//! Rows are merged pairwise: two rows whose input rows differ in exactly one bit of one column
//! and whose output rows are identical are replaced by a single row with that bit marked
//! don't-care. Passes repeat until a fixed point is reached, so merges on different bits compose
//! into rows with several don't-care bits. A column whose bits all became don't-care turns into a
//! whole-cell [`CellData::DC`].
//!
//! The rows of the base map are pairwise disjoint and stay so after every merge, which means a
//! candidate bucket never holds more than the two halves of a merge.
use hashbrown::HashTable;

use crate::{
    cell::CellData,
    hash::hash_cells_replacing,
    row::{RowMap, TruthTableRow},
};

/// Counters describing a reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReduceStats {
    /// Number of passes, including the final pass that found nothing to merge.
    pub passes: usize,
    /// Total number of merges.
    pub merges: usize,
}

#[derive(Clone, Copy, Debug)]
struct Position {
    column: usize,
    bit: u32,
}

/// Reduces `map` to a don't-care compressed map.
///
/// Every concrete assignment covered by `map` is covered by exactly one row of the result, which
/// maps it to the same output row.
pub fn reduce(map: &RowMap) -> RowMap {
    reduce_with_stats(map).0
}

/// Like [`reduce`], but also returns counters.
pub fn reduce_with_stats(map: &RowMap) -> (RowMap, ReduceStats) {
    let mut stats = ReduceStats::default();
    let Some((first, _)) = map.first() else {
        return (RowMap::default(), stats);
    };

    let positions: Vec<Position> = first
        .ios()
        .iter()
        .enumerate()
        .flat_map(|(column, io)| (0..io.width()).rev().map(move |bit| Position { column, bit }))
        .collect();

    let mut rows: Vec<(TruthTableRow, TruthTableRow)> = map
        .iter()
        .map(|(input, output)| (input.clone(), output.clone()))
        .collect();

    loop {
        stats.passes += 1;
        let merges = run_pass(&mut rows, &positions);
        log::trace!(
            "reduction pass {}: {merges} merges, {} rows",
            stats.passes,
            rows.len()
        );
        stats.merges += merges;
        if merges == 0 {
            break;
        }
    }

    log::debug!(
        "reduced {} rows to {} in {} passes",
        map.len(),
        rows.len(),
        stats.passes
    );

    (rows.into_iter().collect(), stats)
}

/// The value of the bit at `position`, if the input row has a concrete bit there.
fn concrete_bit(input: &TruthTableRow, position: Position) -> Option<bool> {
    match &input.cells()[position.column] {
        CellData::Bits(bits) => bits.bit(position.bit),
        _ => None,
    }
}

fn masked_cell(input: &TruthTableRow, position: Position) -> CellData {
    input.cells()[position.column].with_dont_care_bit(position.bit)
}

fn masked_hash(input: &TruthTableRow, position: Position) -> u64 {
    hash_cells_replacing(input.cells(), position.column, &masked_cell(input, position))
}

fn masked_eq(a: &TruthTableRow, b: &TruthTableRow, position: Position) -> bool {
    a.same_shape(b)
        && a.cells()
            .iter()
            .zip(b.cells())
            .enumerate()
            .all(|(column, (a_cell, b_cell))| {
                column == position.column || a_cell == b_cell
            })
        && masked_cell(a, position) == masked_cell(b, position)
}

/// Runs one pass over all positions and returns the number of merges.
///
/// Each row takes part in at most one merge per pass. A merged row takes the place of the
/// earlier of its two halves, so the relative order of rows is preserved.
fn run_pass(rows: &mut Vec<(TruthTableRow, TruthTableRow)>, positions: &[Position]) -> usize {
    let mut consumed = vec![false; rows.len()];
    let mut merged: Vec<Option<TruthTableRow>> = vec![None; rows.len()];
    let mut merges = 0;

    let mut candidates: HashTable<usize> = HashTable::new();

    for &position in positions {
        candidates.clear();
        for index in 0..rows.len() {
            if consumed[index] {
                continue;
            }
            let Some(bit) = concrete_bit(&rows[index].0, position) else {
                continue;
            };
            let hash = masked_hash(&rows[index].0, position);

            let partner = candidates
                .find(hash, |&other| {
                    !consumed[other] && masked_eq(&rows[other].0, &rows[index].0, position)
                })
                .copied();

            match partner {
                Some(other) => {
                    debug_assert_ne!(concrete_bit(&rows[other].0, position), Some(bit));
                    if rows[other].1 == rows[index].1 {
                        let input = &rows[other].0;
                        merged[other] =
                            Some(input.with_cell(position.column, masked_cell(input, position)));
                        consumed[other] = true;
                        consumed[index] = true;
                        merges += 1;
                    }
                }
                None => {
                    candidates.insert_unique(hash, index, |&other| {
                        masked_hash(&rows[other].0, position)
                    });
                }
            }
        }
    }

    if merges == 0 {
        return 0;
    }

    let old_rows = std::mem::take(rows);
    for ((input, output), (was_consumed, merged_input)) in
        old_rows.into_iter().zip(consumed.into_iter().zip(merged))
    {
        match merged_input {
            Some(merged_input) => rows.push((merged_input, output)),
            None if !was_consumed => rows.push((input, output)),
            None => {}
        }
    }

    merges
}
