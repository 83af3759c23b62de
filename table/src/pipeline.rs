//! The event-driven state container.
//!
//! Every [`Msg`] edits the [`TableConfig`] and then reruns the first affected [`Stage`] and all
//! stages after it. Stages before it keep their cached results.
use quanta::Instant;

use crate::{
    cell::CellIO,
    config::{TableConfig, DEFAULT_BIT_LIMIT},
    constraint::{Constraint, ConstraintDiagnostic},
    display::Radix,
    error::{InvariantViolation, TableError},
    filter::filter_rows,
    generate::generate,
    layout::{LayoutChange, MoveDirection},
    reduce::reduce,
    sim::{AlgebraNotImplemented, Simulation},
    sort::{sort_rows, SortSpec},
    table::TruthTable,
};

/// A step of the derivation chain, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Enumerate and simulate.
    Generate,
    /// Don't-care reduction, only when requested.
    Reduce,
    /// Output constraints.
    Filter,
    /// Sort key.
    Sort,
    /// Column placements.
    Layout,
}

/// A user event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// Generate the table, or regenerate it with the current configuration.
    GenerateTruthTable,
    /// Discard the table and its configuration. Bit limit and radix are kept.
    CloseTruthTable,
    /// Change the bit limit.
    SetBitLimit(u32),
    /// Toggle whether an input is kept symbolic.
    ToggleAlgebra(CellIO),
    /// Add a constraint restricting the generated inputs.
    AddInputConstraint(Constraint),
    /// Remove an input constraint.
    RemoveInputConstraint(Constraint),
    /// Add a constraint restricting the visible outputs.
    AddOutputConstraint(Constraint),
    /// Remove an output constraint.
    RemoveOutputConstraint(Constraint),
    /// Remove every output constraint.
    ClearOutputConstraints,
    /// Set or clear the sort key.
    SetSort(Option<SortSpec>),
    /// Show the don't-care reduced table.
    RequestDCMap,
    /// Show the full table again.
    ClearDCMap,
    /// Start dragging a column header.
    StartDrag(CellIO),
    /// The dragged header entered another column.
    DragEnter(CellIO),
    /// The drag finished.
    EndDrag,
    /// The drag was aborted.
    CancelDrag,
    /// Hide or show a column.
    ToggleHide(CellIO),
    /// Swap a column with its neighbor.
    MoveColumn(CellIO, MoveDirection),
    /// Change the numeric display base.
    SetRadix(Radix),
}

/// A persistent message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The table shows only the first `rows` of `input_space` assignments.
    Truncated {
        /// Number of generated rows.
        rows: usize,
        /// Number of assignments without truncation.
        input_space: u128,
    },
    /// The last generation failed; the table shown is from before the change.
    SymbolicEvaluation(AlgebraNotImplemented),
}

/// Owns a simulation, the table's configuration and the derived table.
pub struct TruthTableState<S> {
    simulation: S,
    config: TableConfig,
    table: Option<TruthTable>,
    input_diagnostics: Vec<ConstraintDiagnostic>,
    output_diagnostics: Vec<ConstraintDiagnostic>,
    notices: Vec<Notice>,
    last_run: Vec<Stage>,
    revision: u64,
}

impl<S: Simulation> TruthTableState<S> {
    /// A state without a table, using the default configuration.
    pub fn new(simulation: S) -> Self {
        let config = TableConfig::for_simulation(&simulation, DEFAULT_BIT_LIMIT);
        Self::with_config(simulation, config)
    }

    /// A state without a table, using `config` for the first generation.
    pub fn with_config(simulation: S, mut config: TableConfig) -> Self {
        config.sync_columns(&simulation);
        Self {
            simulation,
            config,
            table: None,
            input_diagnostics: vec![],
            output_diagnostics: vec![],
            notices: vec![],
            last_run: vec![],
            revision: 0,
        }
    }

    /// The simulation the table is derived from.
    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    /// The current configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The current table, if one was generated.
    pub fn table(&self) -> Option<&TruthTable> {
        self.table.as_ref()
    }

    /// Input constraints ignored by the last generation.
    pub fn input_diagnostics(&self) -> &[ConstraintDiagnostic] {
        &self.input_diagnostics
    }

    /// Output constraints ignored by the last filter run.
    pub fn output_diagnostics(&self) -> &[ConstraintDiagnostic] {
        &self.output_diagnostics
    }

    /// All constraint diagnostics, input constraints first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &ConstraintDiagnostic> + '_ {
        self.input_diagnostics.iter().chain(&self.output_diagnostics)
    }

    /// Persistent notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The stages run by the last event, in order.
    pub fn last_run(&self) -> &[Stage] {
        &self.last_run
    }

    /// Incremented whenever derived state changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces the simulation and regenerates an existing table.
    ///
    /// Settings referring to columns that disappeared are dropped. If regeneration fails, the
    /// previous simulation, configuration and table are kept.
    pub fn set_simulation(&mut self, simulation: S) -> Result<(), TableError> {
        self.last_run.clear();
        let previous = std::mem::replace(&mut self.simulation, simulation);
        let mut config = self.config.clone();
        config.sync_columns(&self.simulation);
        if self.table.is_none() {
            self.config = config;
            return Ok(());
        }
        let result = self.regenerate(config);
        if result.is_err() {
            self.simulation = previous;
        }
        result
    }

    /// Applies an event.
    ///
    /// Returns [`TableError::Invariant`] for events that need a table while none exists or that
    /// name unknown columns. Such events leave the state unchanged.
    pub fn update(&mut self, msg: Msg) -> Result<(), TableError> {
        log::debug!("update: {msg:?}");
        self.last_run.clear();
        match msg {
            Msg::GenerateTruthTable => self.regenerate(self.config.clone()),
            Msg::CloseTruthTable => {
                let mut config =
                    TableConfig::for_simulation(&self.simulation, self.config.bit_limit);
                config.radix = self.config.radix;
                self.config = config;
                self.table = None;
                self.input_diagnostics.clear();
                self.output_diagnostics.clear();
                self.notices.clear();
                self.revision += 1;
                Ok(())
            }
            Msg::SetBitLimit(bit_limit) => {
                let bit_limit = TableConfig::check_bit_limit(bit_limit)?;
                let mut config = self.config.clone();
                config.bit_limit = bit_limit;
                self.regenerate_if_present(config)
            }
            Msg::ToggleAlgebra(io) => {
                self.require_table()?;
                if !self.simulation.inputs().contains(&io) {
                    return Err(InvariantViolation::UnknownColumn {
                        column: io,
                        operation: "toggle algebra",
                    }
                    .into());
                }
                let mut config = self.config.clone();
                if !config.algebraic.remove(&io) {
                    config.algebraic.insert(io);
                }
                self.regenerate(config)
            }
            Msg::AddInputConstraint(constraint) => {
                self.require_table()?;
                let mut config = self.config.clone();
                if !config.input_constraints.insert(constraint) {
                    return Ok(());
                }
                self.regenerate(config)
            }
            Msg::RemoveInputConstraint(constraint) => {
                self.require_table()?;
                let mut config = self.config.clone();
                if !config.input_constraints.remove(&constraint) {
                    return Ok(());
                }
                self.regenerate(config)
            }
            Msg::AddOutputConstraint(constraint) => {
                self.require_table()?;
                if self.config.output_constraints.insert(constraint) {
                    self.run_from(Stage::Filter)?;
                }
                Ok(())
            }
            Msg::RemoveOutputConstraint(constraint) => {
                self.require_table()?;
                if self.config.output_constraints.remove(&constraint) {
                    self.run_from(Stage::Filter)?;
                }
                Ok(())
            }
            Msg::ClearOutputConstraints => {
                self.require_table()?;
                self.config.output_constraints.clear();
                self.run_from(Stage::Filter)
            }
            Msg::SetSort(spec) => {
                let table = self.require_table()?;
                if let Some(spec) = &spec {
                    if !table.has_column(&spec.column) {
                        return Err(InvariantViolation::UnknownColumn {
                            column: spec.column.clone(),
                            operation: "sort",
                        }
                        .into());
                    }
                    if self.config.layout.is_hidden(&spec.column) {
                        return Err(InvariantViolation::HiddenSortColumn {
                            column: spec.column.clone(),
                        }
                        .into());
                    }
                }
                self.config.sort = spec;
                self.run_from(Stage::Sort)
            }
            Msg::RequestDCMap => {
                self.require_table()?;
                self.config.reduce = true;
                self.run_from(Stage::Reduce)
            }
            Msg::ClearDCMap => {
                self.require_table()?;
                self.config.reduce = false;
                if let Some(table) = &mut self.table {
                    table.set_dc_map(None);
                }
                self.run_from(Stage::Filter)
            }
            Msg::StartDrag(column) => {
                self.require_table()?;
                let change = self.config.layout.start_drag(column)?;
                self.layout_changed(change)
            }
            Msg::DragEnter(column) => {
                self.require_table()?;
                let change = self.config.layout.drag_enter(column)?;
                self.layout_changed(change)
            }
            Msg::EndDrag => {
                self.require_table()?;
                let change = self.config.layout.end_drag();
                self.layout_changed(change)
            }
            Msg::CancelDrag => {
                self.require_table()?;
                let change = self.config.layout.cancel_drag();
                self.layout_changed(change)
            }
            Msg::ToggleHide(column) => {
                self.require_table()?;
                let hidden = self.config.layout.toggle_hide(&column)?;
                let sorted_by_column = self
                    .config
                    .sort
                    .as_ref()
                    .is_some_and(|sort| sort.column == column);
                if hidden && sorted_by_column {
                    log::debug!("hiding {column:?} clears the sort");
                    self.config.sort = None;
                    self.run_from(Stage::Sort)
                } else {
                    self.run_from(Stage::Layout)
                }
            }
            Msg::MoveColumn(column, direction) => {
                self.require_table()?;
                let change = self.config.layout.move_column(&column, direction)?;
                self.layout_changed(change)
            }
            Msg::SetRadix(radix) => {
                self.config.radix = radix;
                Ok(())
            }
        }
    }

    fn require_table(&self) -> Result<&TruthTable, InvariantViolation> {
        self.table.as_ref().ok_or(InvariantViolation::NoTable)
    }

    fn layout_changed(&mut self, change: LayoutChange) -> Result<(), TableError> {
        match change {
            LayoutChange::Unchanged => Ok(()),
            LayoutChange::Hover | LayoutChange::Columns => self.run_from(Stage::Layout),
        }
    }

    fn regenerate_if_present(&mut self, config: TableConfig) -> Result<(), TableError> {
        if self.table.is_some() {
            self.regenerate(config)
        } else {
            self.config = config;
            Ok(())
        }
    }

    /// Installs `config` and runs the whole chain, restoring the previous configuration if that
    /// fails.
    fn regenerate(&mut self, config: TableConfig) -> Result<(), TableError> {
        let previous = std::mem::replace(&mut self.config, config);
        let result = self.run_from(Stage::Generate);
        if let Err(err) = &result {
            self.config = previous;
            match err {
                TableError::AlgebraNotImplemented(err) => {
                    log::warn!("{err}, keeping the previous table");
                    self.notices
                        .retain(|notice| !matches!(notice, Notice::SymbolicEvaluation(_)));
                    self.notices.push(Notice::SymbolicEvaluation(err.clone()));
                }
                err => log::error!("generation failed: {err}"),
            }
        }
        result
    }

    fn run_from(&mut self, first: Stage) -> Result<(), TableError> {
        if first == Stage::Generate {
            let start = Instant::now();
            let mut generated = generate(&self.simulation, &self.config)?;
            log::debug!(
                "{:?}: {} rows in {:?}",
                Stage::Generate,
                generated.map.len(),
                start.elapsed()
            );
            self.last_run.push(Stage::Generate);

            let input_diagnostics = std::mem::take(&mut generated.diagnostics);
            let mut output_diagnostics = vec![];
            let mut table = TruthTable::from_generated(generated);
            run_derived(
                &mut self.config,
                &mut table,
                Stage::Reduce,
                &mut self.last_run,
                &mut output_diagnostics,
            )?;

            self.input_diagnostics = input_diagnostics;
            self.output_diagnostics = output_diagnostics;
            self.notices.clear();
            if table.is_truncated() {
                self.notices.push(Notice::Truncated {
                    rows: table.row_count(),
                    input_space: table.input_space(),
                });
            }
            self.table = Some(table);
        } else {
            let table = self.table.as_mut().ok_or(InvariantViolation::NoTable)?;
            run_derived(
                &mut self.config,
                table,
                first,
                &mut self.last_run,
                &mut self.output_diagnostics,
            )?;
        }
        self.revision += 1;
        Ok(())
    }
}

/// Runs the stages after generation, starting at `first`.
fn run_derived(
    config: &mut TableConfig,
    table: &mut TruthTable,
    first: Stage,
    last_run: &mut Vec<Stage>,
    output_diagnostics: &mut Vec<ConstraintDiagnostic>,
) -> Result<(), TableError> {
    let mut finish = |stage: Stage, start: Instant| {
        log::debug!("{stage:?}: done in {:?}", start.elapsed());
        last_run.push(stage);
    };

    if first <= Stage::Reduce && config.reduce {
        let start = Instant::now();
        table.set_dc_map(Some(reduce(table.base())));
        finish(Stage::Reduce, start);
    }

    if first <= Stage::Filter {
        let start = Instant::now();
        let filtered = filter_rows(table.active(), table.outputs(), &config.output_constraints);
        *output_diagnostics = filtered.diagnostics;
        table.set_filtered(filtered.kept);
        finish(Stage::Filter, start);
    }

    if first <= Stage::Sort {
        let start = Instant::now();
        let sorted = sort_rows(
            table.active(),
            table.inputs(),
            table.outputs(),
            table.filtered_indices(),
            config.sort.as_ref(),
        )?;
        table.set_sorted(sorted);
        finish(Stage::Sort, start);
    }

    let start = Instant::now();
    config.layout.restyle();
    finish(Stage::Layout, start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cell::CellData, row::TruthTableRow, sim::FnSimulation, Placement};

    /// `s = a + b` truncated to the width of `a`, with carry out.
    fn adder(a_width: u32) -> impl Simulation {
        FnSimulation::new(
            vec![CellIO::input("a", a_width, 0), CellIO::input("b", 1, 1)],
            vec![CellIO::output("s", a_width, 0), CellIO::output("cout", 1, 1)],
            move |row: &TruthTableRow| match (row.cells()[0].as_u64(), row.cells()[1].as_u64()) {
                (Some(a), Some(b)) => {
                    let sum = a + b;
                    Ok(vec![
                        CellData::bits(sum, a_width),
                        CellData::bits(sum >> a_width, 1),
                    ])
                }
                (None, Some(0)) => Ok(vec![row.cells()[0].clone(), CellData::bits(0, 1)]),
                _ => Err(AlgebraNotImplemented::new("carry of a symbolic sum")),
            },
        )
    }

    fn generated(a_width: u32) -> TruthTableState<impl Simulation> {
        ttab_logger::test_setup("trace");
        let mut state = TruthTableState::new(adder(a_width));
        state.update(Msg::GenerateTruthTable).unwrap();
        state
    }

    fn columns<S: Simulation>(state: &TruthTableState<S>) -> [CellIO; 4] {
        let sim = state.simulation();
        [
            sim.inputs()[0].clone(),
            sim.inputs()[1].clone(),
            sim.outputs()[0].clone(),
            sim.outputs()[1].clone(),
        ]
    }

    fn visible_inputs<S: Simulation>(state: &TruthTableState<S>) -> Vec<Vec<Option<u64>>> {
        state
            .table()
            .unwrap()
            .sorted_rows()
            .map(|(input, _)| input.cells().iter().map(CellData::as_u64).collect())
            .collect()
    }

    #[test]
    fn events_need_a_table() {
        ttab_logger::test_setup("trace");
        let mut state = TruthTableState::new(adder(2));
        let [_, _, s, _] = columns(&state);
        assert_eq!(
            state.update(Msg::AddOutputConstraint(Constraint::equality(s.clone(), 1))),
            Err(TableError::Invariant(InvariantViolation::NoTable))
        );
        assert!(state.update(Msg::ToggleHide(s)).is_err());
        // configuration only
        state.update(Msg::SetBitLimit(3)).unwrap();
        state.update(Msg::SetRadix(Radix::Hexadecimal)).unwrap();
        assert!(state.last_run().is_empty());
        assert_eq!(state.config().bit_limit, 3);
    }

    #[test]
    fn generate_runs_every_stage() {
        let state = generated(2);
        assert_eq!(
            state.last_run(),
            [Stage::Generate, Stage::Filter, Stage::Sort, Stage::Layout]
        );
        let table = state.table().unwrap();
        assert_eq!(table.row_count(), 8);
        assert_eq!(table.visible_len(), 8);
        assert!(state.notices().is_empty());
    }

    #[test]
    fn stages_run_from_the_first_affected_one() {
        let mut state = generated(2);
        let [a, _, s, cout] = columns(&state);

        state.update(Msg::RequestDCMap).unwrap();
        assert_eq!(
            state.last_run(),
            [Stage::Reduce, Stage::Filter, Stage::Sort, Stage::Layout]
        );

        state
            .update(Msg::AddOutputConstraint(Constraint::equality(cout, 1)))
            .unwrap();
        assert_eq!(state.last_run(), [Stage::Filter, Stage::Sort, Stage::Layout]);

        state
            .update(Msg::SetSort(Some(SortSpec::descending(s))))
            .unwrap();
        assert_eq!(state.last_run(), [Stage::Sort, Stage::Layout]);

        state.update(Msg::MoveColumn(a, MoveDirection::Right)).unwrap();
        assert_eq!(state.last_run(), [Stage::Layout]);

        state.update(Msg::SetRadix(Radix::Decimal)).unwrap();
        assert!(state.last_run().is_empty());

        // reduction stays requested across regeneration
        state.update(Msg::SetBitLimit(8)).unwrap();
        assert_eq!(
            state.last_run(),
            [
                Stage::Generate,
                Stage::Reduce,
                Stage::Filter,
                Stage::Sort,
                Stage::Layout
            ]
        );
        assert_eq!(state.config().radix, Radix::Decimal);
    }

    #[test]
    fn filter_and_sort() {
        let mut state = generated(2);
        let [a, b, _, cout] = columns(&state);

        state
            .update(Msg::AddOutputConstraint(Constraint::equality(cout.clone(), 1)))
            .unwrap();
        assert_eq!(visible_inputs(&state), [[Some(3), Some(1)]]);

        state.update(Msg::ClearOutputConstraints).unwrap();
        state
            .update(Msg::AddInputConstraint(Constraint::equality(b, 0)))
            .unwrap();
        state
            .update(Msg::SetSort(Some(SortSpec::descending(a))))
            .unwrap();
        assert_eq!(
            visible_inputs(&state),
            (0..4).rev().map(|a| vec![Some(a), Some(0)]).collect::<Vec<_>>()
        );
    }

    #[test]
    fn invalid_constraints_are_reported() {
        let mut state = generated(2);
        let [a, _, s, _] = columns(&state);
        state
            .update(Msg::AddOutputConstraint(Constraint::equality(s, 9)))
            .unwrap();
        state
            .update(Msg::AddOutputConstraint(Constraint::equality(a, 1)))
            .unwrap();
        assert_eq!(state.output_diagnostics().len(), 2);
        assert_eq!(state.table().unwrap().visible_len(), 8);
    }

    #[test]
    fn hiding_the_sort_column_clears_the_sort() {
        let mut state = generated(2);
        let [a, b, s, _] = columns(&state);
        state
            .update(Msg::SetSort(Some(SortSpec::ascending(s.clone()))))
            .unwrap();

        state.update(Msg::ToggleHide(b.clone())).unwrap();
        assert_eq!(state.last_run(), [Stage::Layout]);
        assert!(state.config().sort.is_some());
        assert_eq!(state.config().layout.placement(&b), Some(Placement::Hidden));
        assert_eq!(state.config().layout.placement(&s), Some(Placement::Grid(2)));

        state.update(Msg::ToggleHide(s.clone())).unwrap();
        assert_eq!(state.last_run(), [Stage::Sort, Stage::Layout]);
        assert_eq!(state.config().sort, None);

        assert_eq!(
            state.update(Msg::SetSort(Some(SortSpec::ascending(s.clone())))),
            Err(TableError::Invariant(InvariantViolation::HiddenSortColumn {
                column: s
            }))
        );
        state
            .update(Msg::SetSort(Some(SortSpec::ascending(a))))
            .unwrap();
    }

    #[test]
    fn drag_events() {
        let mut state = generated(2);
        let [a, b, s, cout] = columns(&state);

        state.update(Msg::EndDrag).unwrap();
        assert!(state.last_run().is_empty());

        state.update(Msg::StartDrag(a.clone())).unwrap();
        state.update(Msg::DragEnter(s.clone())).unwrap();
        assert_eq!(state.config().layout.order(), [a.clone(), b.clone(), s.clone(), cout.clone()]);
        state.update(Msg::DragEnter(b.clone())).unwrap();
        assert_eq!(state.config().layout.order(), [b.clone(), a.clone(), s.clone(), cout.clone()]);
        state.update(Msg::CancelDrag).unwrap();
        assert_eq!(state.config().layout.order(), [a, b, s, cout]);
    }

    #[test]
    fn truncation_notice() {
        let mut state = generated(4);
        state.update(Msg::SetBitLimit(3)).unwrap();
        assert_eq!(
            state.notices(),
            [Notice::Truncated {
                rows: 8,
                input_space: 32
            }]
        );
        assert_eq!(
            state.update(Msg::SetBitLimit(0)),
            Err(TableError::InvalidBitLimit(0))
        );
        assert_eq!(state.config().bit_limit, 3);

        state.update(Msg::SetBitLimit(5)).unwrap();
        assert!(state.notices().is_empty());
    }

    #[test]
    fn failed_generation_keeps_previous_table() {
        let mut state = generated(2);
        let [a, b, _, _] = columns(&state);
        let revision = state.revision();

        let err = state.update(Msg::ToggleAlgebra(a.clone())).unwrap_err();
        assert!(matches!(err, TableError::AlgebraNotImplemented(_)));
        assert!(!state.config().is_algebraic(&a));
        assert_eq!(state.table().unwrap().row_count(), 8);
        assert_eq!(state.revision(), revision);
        assert!(matches!(state.notices(), [Notice::SymbolicEvaluation(_)]));

        // with b fixed to 0 the simulation can pass `a` through
        state
            .update(Msg::AddInputConstraint(Constraint::equality(b, 0)))
            .unwrap();
        state.update(Msg::ToggleAlgebra(a.clone())).unwrap();
        assert!(state.notices().is_empty());
        let table = state.table().unwrap();
        assert_eq!(table.row_count(), 1);
        let (_, output) = table.sorted_rows().next().unwrap();
        assert_eq!(output.cells()[0], CellData::algebra("a"));
    }

    #[test]
    fn out_of_range_bit_limit_is_reported() {
        ttab_logger::test_setup("trace");
        for bit_limit in [0, 33, 200] {
            let config = TableConfig {
                bit_limit,
                ..TableConfig::default()
            };
            let mut state = TruthTableState::with_config(adder(2), config);
            assert_eq!(
                state.update(Msg::GenerateTruthTable),
                Err(TableError::InvalidBitLimit(bit_limit))
            );
            assert!(state.table().is_none());
            assert_eq!(state.config().bit_limit, bit_limit);
        }
    }

    #[test]
    fn failed_sort_keeps_previous_diagnostics() {
        let mut state = generated(2);
        let [_, _, s, _] = columns(&state);
        state
            .update(Msg::AddOutputConstraint(Constraint::equality(s, 1)))
            .unwrap();
        assert!(state.diagnostics().next().is_none());
        let rows = state.table().unwrap().visible_len();

        let mut config = state.config().clone();
        config
            .output_constraints
            .insert(Constraint::equality(CellIO::output("gone", 1, 7), 0));
        config.sort = Some(SortSpec::ascending(CellIO::output("gone", 1, 7)));
        let err = state.regenerate(config).unwrap_err();
        assert!(err.is_invariant_violation());

        assert!(state.diagnostics().next().is_none());
        assert_eq!(state.config().sort, None);
        assert_eq!(state.table().unwrap().visible_len(), rows);
    }

    #[test]
    fn close_keeps_bit_limit_and_radix() {
        let mut state = generated(2);
        let [_, _, s, _] = columns(&state);
        state.update(Msg::SetBitLimit(6)).unwrap();
        state.update(Msg::SetRadix(Radix::Hexadecimal)).unwrap();
        state
            .update(Msg::AddOutputConstraint(Constraint::equality(s, 1)))
            .unwrap();

        state.update(Msg::CloseTruthTable).unwrap();
        assert!(state.table().is_none());
        assert_eq!(state.config().bit_limit, 6);
        assert_eq!(state.config().radix, Radix::Hexadecimal);
        assert!(state.config().output_constraints.is_empty());
        assert_eq!(
            state.update(Msg::RequestDCMap),
            Err(TableError::Invariant(InvariantViolation::NoTable))
        );
    }

    fn low_bit(
        width: u32,
    ) -> FnSimulation<impl Fn(&TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented>>
    {
        FnSimulation::new(
            vec![CellIO::input("a", width, 0)],
            vec![CellIO::output("y", 1, 0)],
            |row: &TruthTableRow| match row.cells()[0].as_u64() {
                Some(a) => Ok(vec![CellData::bits(a & 1, 1)]),
                None => Err(AlgebraNotImplemented::new("low bit of a symbol")),
            },
        )
    }

    #[test]
    fn simulation_changes_regenerate() {
        ttab_logger::test_setup("trace");
        let mut state = TruthTableState::new(low_bit(2));
        state.update(Msg::GenerateTruthTable).unwrap();
        let y = state.simulation().outputs()[0].clone();
        state.update(Msg::ToggleHide(y.clone())).unwrap();

        state.set_simulation(low_bit(3)).unwrap();
        assert_eq!(state.last_run()[0], Stage::Generate);
        assert_eq!(state.table().unwrap().row_count(), 8);
        assert!(state.config().layout.is_hidden(&y));
        assert_eq!(
            state.config().layout.order(),
            [CellIO::input("a", 3, 0), y]
        );
    }
}
