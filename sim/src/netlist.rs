//! A combinational word-level netlist implementing [`Simulation`].
use std::sync::Arc;

use ttab_table::{
    cell::MAX_WIDTH, AlgebraNotImplemented, CellData, CellIO, Simulation, TruthTableRow,
};

use crate::{
    value::Value,
    wordlevel::{Node, Sort, Term, Var},
};

/// A list of word-level nodes in topological order plus named ports.
///
/// The builder methods panic on malformed netlists, such as operands from another netlist or
/// widths outside `1..=64`.
#[derive(Clone, Debug)]
pub struct Netlist {
    name: Arc<str>,
    nodes: Vec<Node>,
    inputs: Vec<CellIO>,
    outputs: Vec<CellIO>,
    output_vars: Vec<Var>,
}

impl Netlist {
    /// An empty netlist.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            nodes: vec![],
            inputs: vec![],
            outputs: vec![],
            output_vars: vec![],
        }
    }

    /// The design's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes, operands first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Width of a node.
    pub fn width(&self, var: Var) -> u32 {
        self.nodes[var.index()].sort.0
    }

    fn add_node(&mut self, term: Term, width: u32) -> Var {
        assert!(
            (1..=MAX_WIDTH).contains(&width),
            "node width {width} is outside 1..={MAX_WIDTH}"
        );
        for operand in term.operands() {
            assert!(operand.index() < self.nodes.len(), "undefined operand {operand:?}");
        }
        let var = Var(self.nodes.len() as u32);
        self.nodes.push(Node {
            term,
            sort: Sort(width),
        });
        var
    }

    /// Adds an input port.
    pub fn input(&mut self, label: &str, width: u32) -> Var {
        let index = self.inputs.len();
        self.inputs.push(CellIO::input(label, width, index as u32));
        self.add_node(Term::Input(index), width)
    }

    /// Exposes `var` as an output port.
    pub fn output(&mut self, label: &str, var: Var) {
        let index = self.outputs.len() as u32;
        self.outputs
            .push(CellIO::output(label, self.width(var), index));
        self.output_vars.push(var);
    }

    /// A constant.
    pub fn constant(&mut self, value: u64, width: u32) -> Var {
        self.add_node(Term::Const(value & ttab_table::cell::width_mask(width)), width)
    }

    /// `!a`
    pub fn not(&mut self, a: Var) -> Var {
        self.add_node(Term::Not(a), self.width(a))
    }

    fn wider(&self, a: Var, b: Var) -> u32 {
        self.width(a).max(self.width(b))
    }

    /// `a & b`
    pub fn and(&mut self, a: Var, b: Var) -> Var {
        self.add_node(Term::And([a, b]), self.wider(a, b))
    }

    /// `a | b`
    pub fn or(&mut self, a: Var, b: Var) -> Var {
        self.add_node(Term::Or([a, b]), self.wider(a, b))
    }

    /// `a ^ b`
    pub fn xor(&mut self, a: Var, b: Var) -> Var {
        self.add_node(Term::Xor([a, b]), self.wider(a, b))
    }

    /// `a + b` with room for the carry, up to 64 bits.
    pub fn add(&mut self, a: Var, b: Var) -> Var {
        let width = (self.wider(a, b) + 1).min(MAX_WIDTH);
        self.add_node(Term::Add([a, b]), width)
    }

    /// `a == b`
    pub fn eq(&mut self, a: Var, b: Var) -> Var {
        self.add_node(Term::Eq([a, b]), 1)
    }

    /// `a < b`, unsigned.
    pub fn ult(&mut self, a: Var, b: Var) -> Var {
        self.add_node(Term::Ult([a, b]), 1)
    }

    /// `width` bits of `a` starting at `offset`.
    pub fn slice(&mut self, a: Var, offset: u32, width: u32) -> Var {
        assert!(
            offset + width <= self.width(a),
            "slice {offset}+{width} out of bounds for {a:?}"
        );
        self.add_node(Term::Slice(a, offset), width)
    }

    /// `hi` above `lo`.
    pub fn concat(&mut self, hi: Var, lo: Var) -> Var {
        self.add_node(Term::Concat([hi, lo]), self.width(hi) + self.width(lo))
    }

    /// `cond ? then : els`
    pub fn ite(&mut self, cond: Var, then: Var, els: Var) -> Var {
        assert_eq!(self.width(cond), 1, "condition must be a single bit");
        self.add_node(Term::Ite { cond, then, els }, self.wider(then, els))
    }

    /// Parity of `a`.
    pub fn redxor(&mut self, a: Var) -> Var {
        self.add_node(Term::Redxor(a), 1)
    }

    fn eval_node(
        &self,
        node: &Node,
        values: &[Value],
        assignment: &TruthTableRow,
    ) -> Result<Value, AlgebraNotImplemented> {
        let value = |var: Var| &values[var.index()];
        let width = node.sort.0;
        Ok(match node.term {
            Term::Input(index) => {
                Value::from_cell(&assignment.cells()[index], self.inputs[index].width())?
            }
            Term::Const(word) => Value::Word(word),
            Term::Not(a) => value(a).not(width),
            Term::And([a, b]) => value(a).and(value(b), width),
            Term::Or([a, b]) => value(a).or(value(b), width),
            Term::Xor([a, b]) => value(a).xor(value(b), width),
            Term::Add([a, b]) => value(a).add(value(b), width),
            Term::Eq([a, b]) => value(a).equal(value(b))?,
            Term::Ult([a, b]) => value(a).less_than(value(b))?,
            Term::Slice(a, offset) => value(a).slice(offset, width)?,
            Term::Concat([hi, lo]) => value(hi).concat(value(lo), self.width(lo))?,
            Term::Ite { cond, then, els } => value(cond).ite(value(then), value(els))?,
            Term::Redxor(a) => value(a).redxor()?,
        })
    }
}

impl Simulation for Netlist {
    fn inputs(&self) -> &[CellIO] {
        &self.inputs
    }

    fn outputs(&self) -> &[CellIO] {
        &self.outputs
    }

    fn evaluate(&self, assignment: &TruthTableRow) -> Result<Vec<CellData>, AlgebraNotImplemented> {
        debug_assert_eq!(assignment.len(), self.inputs.len());
        let mut values = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let value = self.eval_node(node, &values, assignment)?;
            values.push(value);
        }
        Ok(self
            .output_vars
            .iter()
            .zip(&self.outputs)
            .map(|(var, io)| values[var.index()].clone().into_cell(io.width()))
            .collect())
    }
}
