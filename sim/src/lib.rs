//! A reference word-level simulator.
//!
//! [`Netlist`] evaluates combinational word-level logic and implements
//! [`Simulation`](ttab_table::Simulation), so truth tables can be derived from it. Inputs marked
//! algebraic are evaluated symbolically as far as [`Value`] supports it. [`samples`] holds a few
//! ready-made designs.
#![warn(missing_docs)]

pub mod netlist;
pub mod samples;
pub mod value;
pub mod wordlevel;

pub use netlist::Netlist;
pub use samples::Design;
pub use value::Value;
pub use wordlevel::{Node, Sort, Term, Var};
