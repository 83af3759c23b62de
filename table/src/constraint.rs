//! Numeric constraints on column values.
//!
//! A constraint tests a single cell. Concrete bits are tested directly, [`CellData::Algebra`]
//! cells always fail and [`CellData::DC`] cells always pass, as a compressed row is assumed to
//! contain a satisfying instantiation.
use std::fmt;

use indexmap::IndexSet;

use crate::{
    cell::{CellData, CellIO},
    error::ConstraintError,
    hash::RowHasher,
};

/// The column must hold exactly `value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Equality {
    /// Constrained column.
    pub io: CellIO,
    /// Required value.
    pub value: u64,
}

/// The column's value must lie in `lower..=upper`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Inequality {
    /// Constrained column.
    pub io: CellIO,
    /// Inclusive lower bound.
    pub lower: u64,
    /// Inclusive upper bound.
    pub upper: u64,
}

/// A single constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// See [`Equality`].
    Equality(Equality),
    /// See [`Inequality`].
    Inequality(Inequality),
}

impl Constraint {
    /// `io == value`
    pub fn equality(io: CellIO, value: u64) -> Self {
        Constraint::Equality(Equality { io, value })
    }

    /// `lower <= io <= upper`
    pub fn inequality(io: CellIO, lower: u64, upper: u64) -> Self {
        Constraint::Inequality(Inequality { io, lower, upper })
    }

    /// The constrained column.
    pub fn io(&self) -> &CellIO {
        match self {
            Constraint::Equality(eq) => &eq.io,
            Constraint::Inequality(ineq) => &ineq.io,
        }
    }

    /// The admitted values as an inclusive range.
    pub fn bounds(&self) -> (u64, u64) {
        match self {
            Constraint::Equality(eq) => (eq.value, eq.value),
            Constraint::Inequality(ineq) => (ineq.lower, ineq.upper),
        }
    }

    /// Tests a cell of the constrained column.
    pub fn test(&self, cell: &CellData) -> bool {
        match cell {
            CellData::DC => true,
            CellData::Algebra(_) => false,
            CellData::Bits(bits) => match self {
                Constraint::Equality(eq) => bits.matches(eq.value),
                Constraint::Inequality(ineq) => bits
                    .min_instance_at_least(ineq.lower)
                    .is_some_and(|value| value <= ineq.upper),
            },
        }
    }

    /// Checks that the constraint can be evaluated against a table with the given columns.
    pub fn validate(&self, columns: &[CellIO]) -> Result<(), ConstraintError> {
        let io = self.io();
        if !columns.contains(io) {
            return Err(ConstraintError::UnknownColumn { column: io.clone() });
        }
        let (lower, upper) = self.bounds();
        for value in [lower, upper] {
            if value > io.max_value() {
                return Err(ConstraintError::ValueOutOfRange {
                    column: io.clone(),
                    value,
                });
            }
        }
        if lower > upper {
            return Err(ConstraintError::EmptyRange {
                column: io.clone(),
                lower,
                upper,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Equality(eq) => write!(f, "{} = {}", eq.io, eq.value),
            Constraint::Inequality(ineq) => {
                write!(f, "{} <= {} <= {}", ineq.lower, ineq.io, ineq.upper)
            }
        }
    }
}

impl From<Equality> for Constraint {
    fn from(eq: Equality) -> Self {
        Constraint::Equality(eq)
    }
}

impl From<Inequality> for Constraint {
    fn from(ineq: Inequality) -> Self {
        Constraint::Inequality(ineq)
    }
}

/// A constraint that could not be evaluated and was therefore ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintDiagnostic {
    /// The ignored constraint.
    pub constraint: Constraint,
    /// Why it was ignored.
    pub error: ConstraintError,
}

impl fmt::Display for ConstraintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint '{}' ignored: {}", self.constraint, self.error)
    }
}

/// An unordered collection of equalities and a separate unordered collection of inequalities.
///
/// Duplicates are dropped on insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    equalities: IndexSet<Equality, RowHasher>,
    inequalities: IndexSet<Inequality, RowHasher>,
}

impl ConstraintSet {
    /// Adds a constraint, returning `false` if it was already present.
    pub fn insert(&mut self, constraint: Constraint) -> bool {
        match constraint {
            Constraint::Equality(eq) => self.equalities.insert(eq),
            Constraint::Inequality(ineq) => self.inequalities.insert(ineq),
        }
    }

    /// Removes a constraint, returning `false` if it was not present.
    pub fn remove(&mut self, constraint: &Constraint) -> bool {
        match constraint {
            Constraint::Equality(eq) => self.equalities.swap_remove(eq),
            Constraint::Inequality(ineq) => self.inequalities.swap_remove(ineq),
        }
    }

    /// Removes every constraint.
    pub fn clear(&mut self) {
        self.equalities.clear();
        self.inequalities.clear();
    }

    /// Total number of constraints.
    pub fn len(&self) -> usize {
        self.equalities.len() + self.inequalities.len()
    }

    /// Returns `true` if the set holds no constraint.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The equalities.
    pub fn equalities(&self) -> impl Iterator<Item = &Equality> + '_ {
        self.equalities.iter()
    }

    /// The inequalities.
    pub fn inequalities(&self) -> impl Iterator<Item = &Inequality> + '_ {
        self.inequalities.iter()
    }

    /// All constraints, equalities first.
    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.equalities
            .iter()
            .cloned()
            .map(Constraint::Equality)
            .chain(self.inequalities.iter().cloned().map(Constraint::Inequality))
    }

    /// Splits the set into the constraints that can be evaluated against `columns` and
    /// diagnostics for the ones that cannot.
    pub fn split_valid(&self, columns: &[CellIO]) -> (Vec<Constraint>, Vec<ConstraintDiagnostic>) {
        let mut valid = vec![];
        let mut diagnostics = vec![];
        for constraint in self.iter() {
            match constraint.validate(columns) {
                Ok(()) => valid.push(constraint),
                Err(error) => {
                    log::warn!("ignoring constraint '{constraint}': {error}");
                    diagnostics.push(ConstraintDiagnostic { constraint, error })
                }
            }
        }
        (valid, diagnostics)
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = Constraint>>(iter: T) -> Self {
        let mut set = Self::default();
        for constraint in iter {
            set.insert(constraint);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> CellIO {
        CellIO::output("y", 4, 0)
    }

    #[test]
    fn equality_rules() {
        let eq = Constraint::equality(column(), 5);
        assert!(eq.test(&CellData::bits(5, 4)));
        assert!(!eq.test(&CellData::bits(4, 4)));
        assert!(!eq.test(&CellData::algebra("a")));
        assert!(eq.test(&CellData::DC));
        assert!(eq.test(&CellData::bits(4, 4).with_dont_care_bit(0)));
        assert!(!eq.test(&CellData::bits(0, 4).with_dont_care_bit(0)));
    }

    #[test]
    fn inequality_rules() {
        let ineq = Constraint::inequality(column(), 3, 6);
        for value in 0..16 {
            assert_eq!(ineq.test(&CellData::bits(value, 4)), (3..=6).contains(&value));
        }
        assert!(!ineq.test(&CellData::algebra("a")));
        assert!(ineq.test(&CellData::DC));
        // 1D00 stands for 8 and 12, neither in range
        assert!(!ineq.test(&CellData::bits(8, 4).with_dont_care_bit(2)));
        // 0D00 stands for 0 and 4
        assert!(ineq.test(&CellData::bits(0, 4).with_dont_care_bit(2)));
    }

    #[test]
    fn validation() {
        let columns = [column()];
        assert_eq!(Constraint::equality(column(), 15).validate(&columns), Ok(()));
        assert_eq!(
            Constraint::equality(column(), 16).validate(&columns),
            Err(ConstraintError::ValueOutOfRange {
                column: column(),
                value: 16
            })
        );
        assert!(matches!(
            Constraint::inequality(column(), 4, 3).validate(&columns),
            Err(ConstraintError::EmptyRange { .. })
        ));
        assert!(matches!(
            Constraint::equality(CellIO::output("z", 1, 1), 0).validate(&columns),
            Err(ConstraintError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn set_deduplicates() {
        let mut set = ConstraintSet::default();
        assert!(set.insert(Constraint::equality(column(), 1)));
        assert!(!set.insert(Constraint::equality(column(), 1)));
        assert!(set.insert(Constraint::inequality(column(), 1, 1)));
        assert_eq!(set.len(), 2);

        let (valid, diagnostics) = set.split_valid(&[column()]);
        assert_eq!(valid.len(), 2);
        assert!(diagnostics.is_empty());

        assert!(set.remove(&Constraint::equality(column(), 1)));
        assert!(!set.remove(&Constraint::equality(column(), 1)));
        assert_eq!(set.iter().collect::<Vec<_>>(), [Constraint::inequality(column(), 1, 1)]);
    }
}
