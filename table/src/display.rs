//! Rendering of cell values.
use crate::cell::CellData;

/// Numeric base used to render concrete cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Radix {
    /// Zero padded binary.
    #[default]
    Binary,
    /// Unsigned decimal.
    Decimal,
    /// Zero padded hexadecimal.
    Hexadecimal,
}

/// Renders a cell.
///
/// Cells with don't-care bits are always shown in binary with `D` for each don't-care bit, since
/// other bases cannot express them. A whole-cell don't-care renders as `DC` and symbolic cells as
/// their term.
pub fn format_cell(cell: &CellData, radix: Radix) -> String {
    match cell {
        CellData::Bits(bits) => match bits.to_u64() {
            Some(value) => format_value(value, bits.width(), radix),
            None => format!("{bits:?}"),
        },
        CellData::Algebra(name) => name.to_string(),
        CellData::DC => "DC".to_string(),
    }
}

fn format_value(value: u64, width: u32, radix: Radix) -> String {
    let width = width as usize;
    match radix {
        Radix::Binary => format!("{value:0width$b}"),
        Radix::Decimal => value.to_string(),
        Radix::Hexadecimal => format!("{value:0digits$x}", digits = width.div_ceil(4)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radices() {
        let cell = CellData::bits(0x2a, 7);
        assert_eq!(format_cell(&cell, Radix::Binary), "0101010");
        assert_eq!(format_cell(&cell, Radix::Decimal), "42");
        assert_eq!(format_cell(&cell, Radix::Hexadecimal), "2a");
        assert_eq!(format_cell(&CellData::bits(1, 9), Radix::Hexadecimal), "001");
    }

    #[test]
    fn symbolic_and_dont_care() {
        let pattern = CellData::bits(0b10, 2).with_dont_care_bit(0);
        assert_eq!(format_cell(&pattern, Radix::Decimal), "1D");
        assert_eq!(format_cell(&CellData::DC, Radix::Hexadecimal), "DC");
        assert_eq!(format_cell(&CellData::algebra("a"), Radix::Binary), "a");
    }
}
