#![deny(unsafe_code)]

use std::str::FromStr;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{bail, eyre};
use serde_json::json;
use ttab_sim::{Design, Netlist};
use ttab_table::{
    config::DEFAULT_BIT_LIMIT, display::format_cell, CellIO, Constraint, Msg, Notice, Radix,
    Simulation, SortSpec, TableConfig, TruthTable, TruthTableRow, TruthTableState,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DesignArg {
    Adder,
    Mux,
    Comparator,
    Parity,
    Gates,
}

impl From<DesignArg> for Design {
    fn from(arg: DesignArg) -> Self {
        match arg {
            DesignArg::Adder => Design::Adder,
            DesignArg::Mux => Design::Mux,
            DesignArg::Comparator => Design::Comparator,
            DesignArg::Parity => Design::Parity,
            DesignArg::Gates => Design::Gates,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RadixArg {
    Bin,
    Dec,
    Hex,
}

impl From<RadixArg> for Radix {
    fn from(arg: RadixArg) -> Self {
        match arg {
            RadixArg::Bin => Radix::Binary,
            RadixArg::Dec => Radix::Decimal,
            RadixArg::Hex => Radix::Hexadecimal,
        }
    }
}

/// `NAME=VALUE` or `NAME=LO..HI`
#[derive(Clone, Debug)]
struct ConstraintArg {
    name: String,
    lower: u64,
    upper: u64,
}

fn parse_value(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        text.parse()
    };
    parsed.map_err(|err| format!("invalid value '{text}': {err}"))
}

impl FromStr for ConstraintArg {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, range) = text
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE or NAME=LO..HI, found '{text}'"))?;
        let (lower, upper) = match range.split_once("..") {
            Some((lower, upper)) => (parse_value(lower)?, parse_value(upper)?),
            None => {
                let value = parse_value(range)?;
                (value, value)
            }
        };
        Ok(Self {
            name: name.trim().to_string(),
            lower,
            upper,
        })
    }
}

impl ConstraintArg {
    fn resolve(&self, columns: &[CellIO]) -> color_eyre::Result<Constraint> {
        let io = find_column(columns, &self.name)?;
        Ok(if self.lower == self.upper {
            Constraint::equality(io, self.lower)
        } else {
            Constraint::inequality(io, self.lower, self.upper)
        })
    }
}

/// `NAME`, `NAME:asc` or `NAME:desc`
#[derive(Clone, Debug)]
struct SortArg {
    name: String,
    descending: bool,
}

impl FromStr for SortArg {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, descending) = match text.rsplit_once(':') {
            Some((name, "asc")) => (name, false),
            Some((name, "desc")) => (name, true),
            Some((_, direction)) => return Err(format!("unknown sort direction '{direction}'")),
            None => (text, false),
        };
        Ok(Self {
            name: name.to_string(),
            descending,
        })
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[clap(value_enum)]
    design: DesignArg,
    #[clap(
        short = 'w',
        long,
        default_value = "2",
        value_parser = clap::value_parser!(u32).range(1..64)
    )]
    width: u32,
    #[clap(short = 'b', long, default_value_t = DEFAULT_BIT_LIMIT)]
    bit_limit: u32,

    /// Input to keep symbolic, may be repeated.
    #[clap(short = 'a', long)]
    algebra: Vec<String>,
    /// Input constraint NAME=VALUE or NAME=LO..HI, may be repeated.
    #[clap(short = 'i', long = "input-constraint")]
    input_constraints: Vec<ConstraintArg>,
    /// Output constraint NAME=VALUE or NAME=LO..HI, may be repeated.
    #[clap(short = 'f', long = "filter")]
    filters: Vec<ConstraintArg>,
    /// Show the don't-care reduced table.
    #[clap(short = 'r', long)]
    reduce: bool,
    /// Sort key NAME[:asc|:desc].
    #[clap(short = 's', long)]
    sort: Option<SortArg>,
    /// Column to hide, may be repeated.
    #[clap(long)]
    hide: Vec<String>,
    #[clap(long, value_enum, default_value = "bin")]
    radix: RadixArg,

    #[clap(long)]
    jsonl_output: bool,
}

fn find_column(columns: &[CellIO], name: &str) -> color_eyre::Result<CellIO> {
    columns
        .iter()
        .find(|io| io.label() == name)
        .cloned()
        .ok_or_else(|| {
            let known: Vec<&str> = columns.iter().map(CellIO::label).collect();
            eyre!("no column '{name}', expected one of {}", known.join(", "))
        })
}

fn configure(args: &Args, netlist: &Netlist) -> color_eyre::Result<TableConfig> {
    let inputs = netlist.inputs();
    let outputs = netlist.outputs();

    if let Some(sort) = &args.sort {
        if args.hide.contains(&sort.name) {
            bail!("cannot sort by '{}' while it is hidden", sort.name);
        }
    }

    let mut config =
        TableConfig::for_simulation(netlist, TableConfig::check_bit_limit(args.bit_limit)?);
    config.radix = args.radix.into();
    config.reduce = args.reduce;
    for name in &args.algebra {
        config.algebraic.insert(find_column(inputs, name)?);
    }
    for constraint in &args.input_constraints {
        config.input_constraints.insert(constraint.resolve(inputs)?);
    }
    for constraint in &args.filters {
        config.output_constraints.insert(constraint.resolve(outputs)?);
    }
    Ok(config)
}

fn row_text(
    columns: &[&CellIO],
    input: &TruthTableRow,
    output: &TruthTableRow,
    radix: Radix,
) -> Vec<String> {
    columns
        .iter()
        .map(|io| {
            input
                .cell(io)
                .or_else(|| output.cell(io))
                .map_or_else(String::new, |cell| format_cell(cell, radix))
        })
        .collect()
}

fn print_text(state: &TruthTableState<Netlist>, table: &TruthTable) {
    let radix = state.config().radix;
    let columns: Vec<&CellIO> = state.config().layout.visible().collect();

    let mut grid: Vec<Vec<String>> = vec![columns
        .iter()
        .map(|io| format!("{}[{}]", io.label(), io.width()))
        .collect()];
    for (input, output) in table.sorted_rows() {
        grid.push(row_text(&columns, input, output, radix));
    }

    let widths: Vec<usize> = (0..columns.len())
        .map(|column| grid.iter().map(|row| row[column].len()).max().unwrap_or(0))
        .collect();
    for row in &grid {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:>width$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn print_jsonl(state: &TruthTableState<Netlist>, table: &TruthTable) -> color_eyre::Result<()> {
    let radix = state.config().radix;
    let columns: Vec<&CellIO> = state.config().layout.visible().collect();

    let header: Vec<_> = columns
        .iter()
        .map(|io| json!({ "name": io.label(), "width": io.width(), "input": io.is_input() }))
        .collect();
    println!("{}", serde_json::to_string(&json!({ "columns": header }))?);

    for (input, output) in table.sorted_rows() {
        let cells = row_text(&columns, input, output, radix);
        println!("{}", serde_json::to_string(&json!({ "row": cells }))?);
    }

    println!(
        "{}",
        serde_json::to_string(&json!({
            "rows": table.visible_len(),
            "generated": table.row_count(),
            "truncated": table.is_truncated(),
        }))?
    );
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    ttab_logger::setup();

    let design = Design::from(args.design);
    let netlist = design.build(args.width);
    log::info!(
        "{design}: {} inputs, {} outputs",
        netlist.inputs().len(),
        netlist.outputs().len()
    );

    let config = configure(&args, &netlist)?;
    let columns: Vec<CellIO> = netlist
        .inputs()
        .iter()
        .chain(netlist.outputs())
        .cloned()
        .collect();

    let mut state = TruthTableState::with_config(netlist, config);
    state.update(Msg::GenerateTruthTable)?;

    for name in &args.hide {
        state.update(Msg::ToggleHide(find_column(&columns, name)?))?;
    }
    if let Some(sort) = &args.sort {
        let column = find_column(&columns, &sort.name)?;
        let spec = if sort.descending {
            SortSpec::descending(column)
        } else {
            SortSpec::ascending(column)
        };
        state.update(Msg::SetSort(Some(spec)))?;
    }

    for diagnostic in state.diagnostics() {
        log::warn!("{diagnostic}");
    }
    for notice in state.notices() {
        match notice {
            Notice::Truncated { rows, input_space } => {
                log::warn!("showing the first {rows} of {input_space} input assignments")
            }
            Notice::SymbolicEvaluation(err) => log::warn!("{err}"),
        }
    }

    let Some(table) = state.table() else {
        bail!("no truth table was generated");
    };
    if args.jsonl_output {
        print_jsonl(&state, table)?;
    } else {
        print_text(&state, table);
    }

    Ok(())
}
