//! Small designs to derive truth tables from.
use std::fmt;

use crate::netlist::Netlist;

/// `S = A + B` with carry out `Cout`.
///
/// `S` is as wide as the wider operand. Panics if that width is 64.
pub fn adder(a_width: u32, b_width: u32) -> Netlist {
    let width = a_width.max(b_width);
    assert!(width < 64, "adder operands must be narrower than 64 bits");
    let mut netlist = Netlist::new("adder");
    let a = netlist.input("A", a_width);
    let b = netlist.input("B", b_width);
    let sum = netlist.add(a, b);
    let s = netlist.slice(sum, 0, width);
    let cout = netlist.slice(sum, width, 1);
    netlist.output("S", s);
    netlist.output("Cout", cout);
    netlist
}

/// `Y = S ? B : A`
pub fn mux(width: u32) -> Netlist {
    let mut netlist = Netlist::new("mux");
    let s = netlist.input("S", 1);
    let a = netlist.input("A", width);
    let b = netlist.input("B", width);
    let y = netlist.ite(s, b, a);
    netlist.output("Y", y);
    netlist
}

/// Unsigned comparison of `A` and `B`.
pub fn comparator(width: u32) -> Netlist {
    let mut netlist = Netlist::new("comparator");
    let a = netlist.input("A", width);
    let b = netlist.input("B", width);
    let eq = netlist.eq(a, b);
    let lt = netlist.ult(a, b);
    let gt = netlist.ult(b, a);
    netlist.output("EQ", eq);
    netlist.output("LT", lt);
    netlist.output("GT", gt);
    netlist
}

/// Parity of `A`.
pub fn parity(width: u32) -> Netlist {
    let mut netlist = Netlist::new("parity");
    let a = netlist.input("A", width);
    let p = netlist.redxor(a);
    netlist.output("P", p);
    netlist
}

/// `Y = A & B` and `Z = ~(A | B)`
pub fn gates(width: u32) -> Netlist {
    let mut netlist = Netlist::new("gates");
    let a = netlist.input("A", width);
    let b = netlist.input("B", width);
    let y = netlist.and(a, b);
    let or = netlist.or(a, b);
    let z = netlist.not(or);
    netlist.output("Y", y);
    netlist.output("Z", z);
    netlist
}

/// The sample designs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Design {
    /// See [`adder`].
    Adder,
    /// See [`mux`].
    Mux,
    /// See [`comparator`].
    Comparator,
    /// See [`parity`].
    Parity,
    /// See [`gates`].
    Gates,
}

impl Design {
    /// Every sample design.
    pub const ALL: [Design; 5] = [
        Design::Adder,
        Design::Mux,
        Design::Comparator,
        Design::Parity,
        Design::Gates,
    ];

    /// Builds the design with operands of the given width.
    pub fn build(self, width: u32) -> Netlist {
        match self {
            Design::Adder => adder(width, width),
            Design::Mux => mux(width),
            Design::Comparator => comparator(width),
            Design::Parity => parity(width),
            Design::Gates => gates(width),
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Design::Adder => "adder",
            Design::Mux => "mux",
            Design::Comparator => "comparator",
            Design::Parity => "parity",
            Design::Gates => "gates",
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use ttab_table::{CellData, Simulation, TruthTableRow};

    use super::*;

    fn eval(netlist: &Netlist, inputs: &[u64]) -> Vec<Option<u64>> {
        let cells = netlist
            .inputs()
            .iter()
            .zip(inputs)
            .map(|(io, &value)| CellData::bits(value, io.width()))
            .collect();
        netlist
            .evaluate(&TruthTableRow::new(netlist.inputs().into(), cells))
            .unwrap()
            .iter()
            .map(CellData::as_u64)
            .collect()
    }

    #[test]
    fn adder_outputs() {
        let netlist = adder(2, 1);
        for a in 0..4 {
            for b in 0..2 {
                let sum = a + b;
                assert_eq!(eval(&netlist, &[a, b]), [Some(sum & 3), Some(sum >> 2)]);
            }
        }
    }

    #[test]
    fn random_samples() {
        let mut rng = SmallRng::seed_from_u64(0);
        let width = 6;
        let mask = (1 << width) - 1;
        for _ in 0..200 {
            let (a, b, s) = (rng.gen_range(0..=mask), rng.gen_range(0..=mask), rng.gen_range(0..2));
            assert_eq!(eval(&mux(width), &[s, a, b]), [Some(if s == 1 { b } else { a })]);
            assert_eq!(
                eval(&comparator(width), &[a, b]),
                [Some((a == b) as u64), Some((a < b) as u64), Some((a > b) as u64)]
            );
            assert_eq!(
                eval(&parity(width), &[a]),
                [Some((a.count_ones() & 1) as u64)]
            );
            assert_eq!(eval(&gates(width), &[a, b]), [Some(a & b), Some(!(a | b) & mask)]);
        }
    }

    #[test]
    fn symbolic_adder() {
        let netlist = adder(2, 1);
        let row = |b| {
            TruthTableRow::new(
                netlist.inputs().into(),
                vec![CellData::algebra("A"), CellData::bits(b, 1)],
            )
        };
        assert_eq!(
            netlist.evaluate(&row(0)),
            Ok(vec![CellData::algebra("A"), CellData::bits(0, 1)])
        );
        assert!(netlist.evaluate(&row(1)).is_err());
    }

    #[test]
    fn every_design_builds() {
        for design in Design::ALL {
            let netlist = design.build(3);
            assert_eq!(netlist.name(), design.name());
            assert!(!netlist.outputs().is_empty());
        }
    }
}
