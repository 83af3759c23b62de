//! Column order, visibility and the interactive drag-reorder protocol.
//!
//! The layout is independent of row data. It is either idle or dragging a column; while
//! dragging, entering another column of the same class moves the dragged column next to it.
//! Inputs and outputs are never interleaved by dragging. Cancelling a drag restores the order
//! from before the drag started.
use zwohash::HashSet;

use crate::{cell::CellIO, error::InvariantViolation};

/// Where a column is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// One-based grid column among the visible columns.
    Grid(usize),
    /// Not rendered.
    Hidden,
}

/// Direction for [`ColumnLayout::move_column`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Towards the start of the order.
    Left,
    /// Towards the end of the order.
    Right,
}

/// What a layout operation changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutChange {
    /// Nothing observable.
    Unchanged,
    /// Only drag state or the hover highlight.
    Hover,
    /// Column order or visibility, placements were recomputed.
    Columns,
}

#[derive(Clone, Debug)]
struct DragState {
    column: CellIO,
    snapshot: Vec<CellIO>,
    hover: Option<CellIO>,
}

/// Column order, hidden columns and drag state.
#[derive(Clone, Debug, Default)]
pub struct ColumnLayout {
    order: Vec<CellIO>,
    hidden: HashSet<CellIO>,
    placements: Vec<Placement>,
    drag: Option<DragState>,
}

impl ColumnLayout {
    /// Inputs followed by outputs, everything visible.
    pub fn new(inputs: &[CellIO], outputs: &[CellIO]) -> Self {
        let mut layout = Self {
            order: inputs.iter().chain(outputs).cloned().collect(),
            ..Self::default()
        };
        layout.restyle();
        layout
    }

    /// The current left-to-right column order.
    pub fn order(&self) -> &[CellIO] {
        &self.order
    }

    /// Returns `true` if `column` is hidden.
    pub fn is_hidden(&self, column: &CellIO) -> bool {
        self.hidden.contains(column)
    }

    /// The hidden columns, in column order.
    pub fn hidden(&self) -> impl Iterator<Item = &CellIO> + '_ {
        self.order.iter().filter(|column| self.hidden.contains(*column))
    }

    /// The visible columns, in column order.
    pub fn visible(&self) -> impl Iterator<Item = &CellIO> + '_ {
        self.order.iter().filter(|column| !self.hidden.contains(*column))
    }

    /// Placement of every column, in column order.
    pub fn placements(&self) -> impl Iterator<Item = (&CellIO, Placement)> + '_ {
        self.order.iter().zip(self.placements.iter().copied())
    }

    /// Placement of one column.
    pub fn placement(&self, column: &CellIO) -> Option<Placement> {
        self.index_of(column).map(|index| self.placements[index])
    }

    /// The column being dragged.
    pub fn dragging(&self) -> Option<&CellIO> {
        self.drag.as_ref().map(|drag| &drag.column)
    }

    /// The column currently highlighted as drop target.
    pub fn hover(&self) -> Option<&CellIO> {
        self.drag.as_ref().and_then(|drag| drag.hover.as_ref())
    }

    fn index_of(&self, column: &CellIO) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == column)
    }

    fn require(
        &self,
        column: &CellIO,
        operation: &'static str,
    ) -> Result<usize, InvariantViolation> {
        self.index_of(column).ok_or_else(|| InvariantViolation::UnknownColumn {
            column: column.clone(),
            operation,
        })
    }

    /// Recomputes placements: visible columns get consecutive grid columns, hidden ones
    /// [`Placement::Hidden`].
    pub fn restyle(&mut self) {
        let mut next = 1;
        self.placements.clear();
        self.placements.extend(self.order.iter().map(|column| {
            if self.hidden.contains(column) {
                Placement::Hidden
            } else {
                next += 1;
                Placement::Grid(next - 1)
            }
        }));
    }

    /// Starts dragging `column`.
    pub fn start_drag(&mut self, column: CellIO) -> Result<LayoutChange, InvariantViolation> {
        self.require(&column, "start drag")?;
        if let Some(drag) = &self.drag {
            log::debug!("ignoring drag start of {column:?}, already dragging {:?}", drag.column);
            return Ok(LayoutChange::Unchanged);
        }
        self.drag = Some(DragState {
            column,
            snapshot: self.order.clone(),
            hover: None,
        });
        Ok(LayoutChange::Hover)
    }

    /// The dragged column enters `target`.
    pub fn drag_enter(&mut self, target: CellIO) -> Result<LayoutChange, InvariantViolation> {
        let to = self.require(&target, "drag enter")?;
        let Some(drag) = &mut self.drag else {
            log::debug!("ignoring drag enter of {target:?} without a drag in progress");
            return Ok(LayoutChange::Unchanged);
        };
        if drag.hover.as_ref() == Some(&target) {
            return Ok(LayoutChange::Unchanged);
        }
        let same_class = drag.column.class() == target.class();
        let dragged = drag.column.clone();
        drag.hover = Some(target);

        if !same_class || dragged == self.order[to] {
            return Ok(LayoutChange::Hover);
        }

        let from = self.require(&dragged, "drag enter")?;
        // Removing the dragged column shifts the target left when moving right, so inserting
        // at the target's old index lands after it; when moving left it lands before it.
        let column = self.order.remove(from);
        self.order.insert(to, column);
        self.restyle();
        Ok(LayoutChange::Columns)
    }

    /// Ends the drag, keeping the current order.
    pub fn end_drag(&mut self) -> LayoutChange {
        match self.drag.take() {
            Some(_) => LayoutChange::Hover,
            None => {
                log::debug!("ignoring drag end without a drag in progress");
                LayoutChange::Unchanged
            }
        }
    }

    /// Ends the drag, restoring the order from before it started.
    pub fn cancel_drag(&mut self) -> LayoutChange {
        let Some(drag) = self.drag.take() else {
            log::debug!("ignoring drag cancel without a drag in progress");
            return LayoutChange::Unchanged;
        };
        if drag.snapshot == self.order {
            return LayoutChange::Hover;
        }
        self.order = drag.snapshot;
        self.restyle();
        LayoutChange::Columns
    }

    /// Hides a visible column or shows a hidden one. Returns whether the column is now hidden.
    pub fn toggle_hide(&mut self, column: &CellIO) -> Result<bool, InvariantViolation> {
        self.require(column, "toggle hide")?;
        let hidden = if self.hidden.remove(column) {
            false
        } else {
            self.hidden.insert(column.clone());
            true
        };
        self.restyle();
        Ok(hidden)
    }

    /// Swaps `column` with its neighbor. Does nothing at either end of the order.
    pub fn move_column(
        &mut self,
        column: &CellIO,
        direction: MoveDirection,
    ) -> Result<LayoutChange, InvariantViolation> {
        let index = self.require(column, "move column")?;
        let neighbor = match direction {
            MoveDirection::Left => index.checked_sub(1),
            MoveDirection::Right => Some(index + 1).filter(|&next| next < self.order.len()),
        };
        let Some(neighbor) = neighbor else {
            return Ok(LayoutChange::Unchanged);
        };
        self.order.swap(index, neighbor);
        self.restyle();
        Ok(LayoutChange::Columns)
    }

    /// Adapts the layout to a new set of columns.
    ///
    /// Columns that still exist keep their relative order and visibility, new columns are
    /// appended to their class. An ongoing drag is cancelled.
    pub fn sync_columns(&mut self, inputs: &[CellIO], outputs: &[CellIO]) {
        self.drag = None;
        let mut order: Vec<CellIO> = vec![];
        for class in [inputs, outputs] {
            order.extend(
                self.order
                    .iter()
                    .filter(|column| class.contains(column))
                    .cloned(),
            );
            order.extend(
                class
                    .iter()
                    .filter(|column| !self.order.contains(column))
                    .cloned(),
            );
        }
        self.hidden.retain(|column| order.contains(column));
        self.order = order;
        self.restyle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abxy() -> (ColumnLayout, [CellIO; 4]) {
        let a = CellIO::input("A", 1, 0);
        let b = CellIO::input("B", 1, 1);
        let x = CellIO::output("X", 1, 0);
        let y = CellIO::output("Y", 1, 1);
        let layout = ColumnLayout::new(&[a.clone(), b.clone()], &[x.clone(), y.clone()]);
        (layout, [a, b, x, y])
    }

    fn three_inputs() -> (ColumnLayout, [CellIO; 3]) {
        let columns = ["A", "B", "C"]
            .into_iter()
            .enumerate()
            .map(|(i, label)| CellIO::input(label, 1, i as u32));
        let [a, b, c]: [CellIO; 3] = columns.collect::<Vec<_>>().try_into().unwrap();
        let layout = ColumnLayout::new(&[a.clone(), b.clone(), c.clone()], &[]);
        (layout, [a, b, c])
    }

    #[test]
    fn cross_class_drag_only_hovers() {
        let (mut layout, [a, b, x, y]) = abxy();
        layout.start_drag(a.clone()).unwrap();
        assert_eq!(layout.drag_enter(x.clone()).unwrap(), LayoutChange::Hover);
        assert_eq!(layout.order(), [a.clone(), b.clone(), x.clone(), y.clone()]);
        assert_eq!(layout.hover(), Some(&x));
        assert_eq!(layout.drag_enter(x.clone()).unwrap(), LayoutChange::Unchanged);
        layout.end_drag();
        assert_eq!(layout.order(), [a, b, x, y]);
        assert_eq!(layout.dragging(), None);
    }

    #[test]
    fn drag_right_inserts_after_target() {
        let (mut layout, [a, b, c]) = three_inputs();
        layout.start_drag(a.clone()).unwrap();
        assert_eq!(layout.drag_enter(b.clone()).unwrap(), LayoutChange::Columns);
        assert_eq!(layout.order(), [b.clone(), a.clone(), c.clone()]);
        assert_eq!(layout.drag_enter(c.clone()).unwrap(), LayoutChange::Columns);
        assert_eq!(layout.order(), [b.clone(), c.clone(), a.clone()]);
        assert_eq!(layout.drag_enter(c.clone()).unwrap(), LayoutChange::Unchanged);
        layout.end_drag();
        assert_eq!(layout.order(), [b.clone(), c.clone(), a.clone()]);
        assert_eq!(layout.placement(&a), Some(Placement::Grid(3)));
    }

    #[test]
    fn drag_left_inserts_before_target() {
        let (mut layout, [a, b, c]) = three_inputs();
        layout.start_drag(c.clone()).unwrap();
        layout.drag_enter(a.clone()).unwrap();
        assert_eq!(layout.order(), [c, a, b]);
    }

    #[test]
    fn cancel_restores_snapshot() {
        let (mut layout, [a, b, c]) = three_inputs();
        layout.move_column(&c, MoveDirection::Left).unwrap();
        let before = layout.order().to_vec();

        layout.start_drag(a.clone()).unwrap();
        layout.drag_enter(c.clone()).unwrap();
        layout.drag_enter(b.clone()).unwrap();
        layout.drag_enter(a.clone()).unwrap();
        assert_ne!(layout.order(), before);

        assert_eq!(layout.cancel_drag(), LayoutChange::Columns);
        assert_eq!(layout.order(), before);
        assert_eq!(layout.placement(&c), Some(Placement::Grid(2)));
        assert_eq!(layout.dragging(), None);
        assert_eq!(layout.hover(), None);
    }

    #[test]
    fn events_without_drag_are_ignored() {
        let (mut layout, [a, b, _]) = three_inputs();
        assert_eq!(layout.drag_enter(b.clone()).unwrap(), LayoutChange::Unchanged);
        assert_eq!(layout.end_drag(), LayoutChange::Unchanged);
        assert_eq!(layout.cancel_drag(), LayoutChange::Unchanged);
        layout.start_drag(a.clone()).unwrap();
        assert_eq!(layout.start_drag(b).unwrap(), LayoutChange::Unchanged);
        assert_eq!(layout.dragging(), Some(&a));
    }

    #[test]
    fn hidden_columns_get_no_grid_position() {
        let (mut layout, [a, b, x, y]) = abxy();
        assert!(layout.toggle_hide(&b).unwrap());
        assert_eq!(
            layout.placements().collect::<Vec<_>>(),
            [
                (&a, Placement::Grid(1)),
                (&b, Placement::Hidden),
                (&x, Placement::Grid(2)),
                (&y, Placement::Grid(3)),
            ]
        );
        assert_eq!(layout.visible().collect::<Vec<_>>(), [&a, &x, &y]);
        assert!(!layout.toggle_hide(&b).unwrap());
        assert_eq!(layout.placement(&y), Some(Placement::Grid(4)));
    }

    #[test]
    fn move_column_swaps_neighbors() {
        let (mut layout, [a, b, x, y]) = abxy();
        assert_eq!(
            layout.move_column(&a, MoveDirection::Left).unwrap(),
            LayoutChange::Unchanged
        );
        assert_eq!(
            layout.move_column(&y, MoveDirection::Right).unwrap(),
            LayoutChange::Unchanged
        );
        layout.move_column(&b, MoveDirection::Right).unwrap();
        assert_eq!(layout.order(), [a.clone(), x.clone(), b.clone(), y.clone()]);
        layout.move_column(&b, MoveDirection::Left).unwrap();
        assert_eq!(layout.order(), [a, b, x, y]);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let (mut layout, _) = abxy();
        let z = CellIO::output("Z", 1, 9);
        assert!(layout.start_drag(z.clone()).is_err());
        assert!(layout.toggle_hide(&z).is_err());
        assert!(layout.move_column(&z, MoveDirection::Left).is_err());
    }

    #[test]
    fn sync_keeps_user_order() {
        let (mut layout, [a, b, x, y]) = abxy();
        layout.move_column(&a, MoveDirection::Right).unwrap();
        layout.toggle_hide(&y).unwrap();
        layout.toggle_hide(&x).unwrap();

        let c = CellIO::input("C", 1, 2);
        layout.sync_columns(&[a.clone(), b.clone(), c.clone()], &[y.clone()]);
        assert_eq!(layout.order(), [b, a, c, y.clone()]);
        assert!(layout.is_hidden(&y));
        assert_eq!(layout.hidden().count(), 1);
    }
}
