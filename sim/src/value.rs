//! Word values with symbolic placeholders.
//!
//! A symbolic value stands for an unknown word and is printed as an expression over the names of
//! algebraic inputs. Operations with an identity or absorbing element simplify, so `a ^ 0` stays
//! `a` and `a & 0` becomes the constant `0`. Everything else builds a larger expression, except for
//! operations whose result would depend on individual bits of the unknown word. Those fail with
//! [`AlgebraNotImplemented`].
use std::{fmt, sync::Arc};

use ttab_table::{cell::width_mask, AlgebraNotImplemented, CellData};

/// The value of a node during evaluation.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    /// A concrete word.
    Word(u64),
    /// An unknown word.
    Sym {
        /// Printed form.
        expr: Arc<str>,
        /// Only the low `width` bits may be non-zero.
        width: u32,
    },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Word(word) => write!(f, "{word}"),
            Value::Sym { expr, .. } => f.write_str(expr),
        }
    }
}

fn sym(expr: impl Into<Arc<str>>, width: u32) -> Value {
    Value::Sym {
        expr: expr.into(),
        width,
    }
}

fn unsupported(op: &str, operand: &Value) -> AlgebraNotImplemented {
    AlgebraNotImplemented::new(format!("{op} of symbolic value {operand}"))
}

impl Value {
    /// Reads an input cell.
    pub fn from_cell(cell: &CellData, width: u32) -> Result<Self, AlgebraNotImplemented> {
        match cell {
            CellData::Bits(bits) => bits
                .to_u64()
                .map(Value::Word)
                .ok_or_else(|| AlgebraNotImplemented::new("input with don't-care bits")),
            CellData::Algebra(name) => Ok(sym(name.clone(), width)),
            CellData::DC => Err(AlgebraNotImplemented::new("don't-care input")),
        }
    }

    /// Converts the value of a `width` bit node into an output cell.
    pub fn into_cell(self, width: u32) -> CellData {
        match self {
            Value::Word(word) => CellData::bits(word, width),
            Value::Sym { expr, .. } => CellData::Algebra(expr),
        }
    }

    fn same_symbol(&self, other: &Value) -> bool {
        matches!((self, other), (Value::Sym { expr: a, .. }, Value::Sym { expr: b, .. }) if a == b)
    }

    fn sym_width(&self) -> u32 {
        match self {
            Value::Word(word) => 64 - word.leading_zeros(),
            Value::Sym { width, .. } => *width,
        }
    }

    fn binary(op: &str, a: &Value, b: &Value, width: u32) -> Value {
        sym(format!("({a} {op} {b})"), width)
    }

    /// `!a`
    pub fn not(&self, width: u32) -> Value {
        match self {
            Value::Word(a) => Value::Word(!a & width_mask(width)),
            Value::Sym { expr, .. } => match expr.strip_prefix('~') {
                Some(inner) => sym(inner, width),
                None => sym(format!("~{expr}"), width),
            },
        }
    }

    /// `a & b`
    pub fn and(&self, other: &Value, width: u32) -> Value {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Value::Word(a & b),
            (Value::Word(0), _) | (_, Value::Word(0)) => Value::Word(0),
            (s @ Value::Sym { width: w, .. }, Value::Word(m))
            | (Value::Word(m), s @ Value::Sym { width: w, .. })
                if m & width_mask(*w) == width_mask(*w) =>
            {
                s.clone()
            }
            (a, b) if a.same_symbol(b) => a.clone(),
            (a, b) => Self::binary("&", a, b, a.sym_width().min(b.sym_width()).min(width)),
        }
    }

    /// `a | b`
    pub fn or(&self, other: &Value, width: u32) -> Value {
        let mask = width_mask(width);
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Value::Word(a | b),
            (Value::Word(0), x) | (x, Value::Word(0)) => x.clone(),
            (Value::Word(m), _) | (_, Value::Word(m)) if m & mask == mask => Value::Word(mask),
            (a, b) if a.same_symbol(b) => a.clone(),
            (a, b) => Self::binary("|", a, b, a.sym_width().max(b.sym_width()).min(width)),
        }
    }

    /// `a ^ b`
    pub fn xor(&self, other: &Value, width: u32) -> Value {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Value::Word(a ^ b),
            (Value::Word(0), x) | (x, Value::Word(0)) => x.clone(),
            (a, b) if a.same_symbol(b) => Value::Word(0),
            (a, b) => Self::binary("^", a, b, a.sym_width().max(b.sym_width()).min(width)),
        }
    }

    /// `a + b`, truncated to `width` bits.
    pub fn add(&self, other: &Value, width: u32) -> Value {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Value::Word(a.wrapping_add(*b) & width_mask(width)),
            (Value::Word(0), Value::Sym { expr, width: w })
            | (Value::Sym { expr, width: w }, Value::Word(0)) => sym(expr.clone(), (*w).min(width)),
            (a, b) => {
                let grown = a.sym_width().max(b.sym_width()).saturating_add(1);
                Self::binary("+", a, b, grown.min(width))
            }
        }
    }

    /// `a == b` as a single bit.
    pub fn equal(&self, other: &Value) -> Result<Value, AlgebraNotImplemented> {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Ok(Value::Word((a == b) as u64)),
            (a, b) if a.same_symbol(b) => Ok(Value::Word(1)),
            (Value::Sym { .. }, _) => Err(unsupported("comparison", self)),
            _ => Err(unsupported("comparison", other)),
        }
    }

    /// `a < b` as a single bit.
    pub fn less_than(&self, other: &Value) -> Result<Value, AlgebraNotImplemented> {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => Ok(Value::Word((a < b) as u64)),
            (a, b) if a.same_symbol(b) => Ok(Value::Word(0)),
            (Value::Sym { .. }, _) => Err(unsupported("comparison", self)),
            _ => Err(unsupported("comparison", other)),
        }
    }

    /// `width` bits starting at `offset`.
    pub fn slice(&self, offset: u32, width: u32) -> Result<Value, AlgebraNotImplemented> {
        match self {
            Value::Word(a) => Ok(Value::Word(
                a.checked_shr(offset).unwrap_or(0) & width_mask(width),
            )),
            Value::Sym { width: w, .. } if offset >= *w => Ok(Value::Word(0)),
            Value::Sym { width: w, .. } if offset == 0 && width >= *w => Ok(self.clone()),
            Value::Sym { .. } => Err(unsupported("bit slice", self)),
        }
    }

    /// `hi` in the bits above the `lo_width` bits of `lo`.
    pub fn concat(&self, lo: &Value, lo_width: u32) -> Result<Value, AlgebraNotImplemented> {
        match (self, lo) {
            (Value::Word(hi), Value::Word(lo)) => {
                Ok(Value::Word(hi.checked_shl(lo_width).unwrap_or(0) | lo))
            }
            (Value::Word(0), lo @ Value::Sym { .. }) => Ok(lo.clone()),
            (unknown @ Value::Sym { .. }, _) | (_, unknown) => {
                Err(unsupported("concatenation", unknown))
            }
        }
    }

    /// `cond ? then : els`
    pub fn ite(&self, then: &Value, els: &Value) -> Result<Value, AlgebraNotImplemented> {
        match self {
            Value::Word(0) => Ok(els.clone()),
            Value::Word(_) => Ok(then.clone()),
            Value::Sym { .. } if then == els => Ok(then.clone()),
            Value::Sym { .. } => Err(unsupported("selection on", self)),
        }
    }

    /// Parity of all bits.
    pub fn redxor(&self) -> Result<Value, AlgebraNotImplemented> {
        match self {
            Value::Word(a) => Ok(Value::Word((a.count_ones() & 1) as u64)),
            Value::Sym { .. } => Err(unsupported("parity", self)),
        }
    }
}
