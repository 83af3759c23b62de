//! Word-level terms.
use std::fmt;

/// Reference to the value of a node in a [`Netlist`](crate::Netlist).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub(crate) u32);

impl Var {
    /// The node's position in the netlist.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Bit width of a word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Sort(pub u32);

/// A word-level operation. Operands always refer to earlier nodes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
    /// The `n`-th input port.
    Input(usize),
    /// A constant, already masked to the node's width.
    Const(u64),
    /// Bitwise complement.
    Not(Var),
    /// Bitwise and.
    And([Var; 2]),
    /// Bitwise or.
    Or([Var; 2]),
    /// Bitwise exclusive or.
    Xor([Var; 2]),
    /// Sum, truncated to the node's width.
    Add([Var; 2]),
    /// `1` if both operands are equal.
    Eq([Var; 2]),
    /// `1` if the first operand is smaller, unsigned.
    Ult([Var; 2]),
    /// The node's width of bits starting at the given offset.
    Slice(Var, u32),
    /// The first operand in the high bits, the second in the low bits.
    Concat([Var; 2]),
    /// If-then-else on a one bit condition.
    Ite {
        /// Condition.
        cond: Var,
        /// Selected when `cond` is `1`.
        then: Var,
        /// Selected when `cond` is `0`.
        els: Var,
    },
    /// Parity of all bits.
    Redxor(Var),
}

impl Term {
    /// The operands of the term.
    pub fn operands(&self) -> Vec<Var> {
        match *self {
            Term::Input(_) | Term::Const(_) => vec![],
            Term::Not(a) | Term::Slice(a, _) | Term::Redxor(a) => vec![a],
            Term::And(ab)
            | Term::Or(ab)
            | Term::Xor(ab)
            | Term::Add(ab)
            | Term::Eq(ab)
            | Term::Ult(ab)
            | Term::Concat(ab) => ab.to_vec(),
            Term::Ite { cond, then, els } => vec![cond, then, els],
        }
    }
}

/// A term together with its width.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Node {
    /// The operation.
    pub term: Term,
    /// Width of the result.
    pub sort: Sort,
}
