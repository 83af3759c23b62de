//! Column identities and the ternary cell value domain.
//!
//! A cell holds either concrete [`Bits`], a symbolic [`CellData::Algebra`] placeholder or the
//! whole-cell don't-care [`CellData::DC`]. [`compare_cell_data`] defines the total order used for
//! sorting: `Bits < Algebra < DC`.
use std::{cmp::Ordering, fmt, sync::Arc};

/// Largest supported column width in bits.
pub const MAX_WIDTH: u32 = 64;

/// Whether a column belongs to the input or the output side of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IoClass {
    /// An input of the simulated design.
    Input,
    /// An output of the simulated design.
    Output,
}

/// Identity of one input or output column.
///
/// Two columns are equal only if label, width, class and origin all agree. The origin is the
/// ordinal the simulation assigned to the port, which disambiguates ports sharing a label.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIO {
    class: IoClass,
    origin: u32,
    label: Arc<str>,
    width: u32,
}

impl CellIO {
    /// Creates an input column.
    ///
    /// Panics if `width` is not in `1..=64`.
    pub fn input(label: impl Into<Arc<str>>, width: u32, origin: u32) -> Self {
        Self::new(IoClass::Input, label.into(), width, origin)
    }

    /// Creates an output column.
    ///
    /// Panics if `width` is not in `1..=64`.
    pub fn output(label: impl Into<Arc<str>>, width: u32, origin: u32) -> Self {
        Self::new(IoClass::Output, label.into(), width, origin)
    }

    fn new(class: IoClass, label: Arc<str>, width: u32, origin: u32) -> Self {
        assert!(
            (1..=MAX_WIDTH).contains(&width),
            "column {label} has unsupported width {width}"
        );
        Self {
            class,
            origin,
            label,
            width,
        }
    }

    /// The column's display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width of the column's values in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Input or output side.
    pub fn class(&self) -> IoClass {
        self.class
    }

    /// The simulation assigned port ordinal.
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Returns `true` for input columns.
    pub fn is_input(&self) -> bool {
        self.class == IoClass::Input
    }

    /// The largest value representable in this column.
    pub fn max_value(&self) -> u64 {
        width_mask(self.width)
    }
}

impl fmt::Debug for CellIO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.class {
            IoClass::Input => "in",
            IoClass::Output => "out",
        };
        write!(f, "{}[{}]@{side}{}", self.label, self.width, self.origin)
    }
}

impl fmt::Display for CellIO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Mask with the low `width` bits set.
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A fixed-width bit vector in which individual bits may be don't-care.
///
/// Don't-care bits are always stored as zero in the value, so structural equality coincides
/// with equality of the represented set of concrete values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits {
    value: u64,
    dont_care: u64,
    width: u32,
}

impl Bits {
    /// A concrete value, truncated to `width` bits.
    pub fn new(value: u64, width: u32) -> Self {
        debug_assert!((1..=MAX_WIDTH).contains(&width));
        Self {
            value: value & width_mask(width),
            dont_care: 0,
            width,
        }
    }

    /// The value with its don't-care bits cleared.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Mask of the don't-care bits.
    pub fn dont_care(&self) -> u64 {
        self.dont_care
    }

    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns `true` if no bit is don't-care.
    pub fn is_concrete(&self) -> bool {
        self.dont_care == 0
    }

    /// The unsigned integer value, if no bit is don't-care.
    pub fn to_u64(&self) -> Option<u64> {
        self.is_concrete().then_some(self.value)
    }

    /// The value of a single bit, `None` if that bit is don't-care.
    pub fn bit(&self, bit: u32) -> Option<bool> {
        debug_assert!(bit < self.width);
        if self.dont_care >> bit & 1 != 0 {
            None
        } else {
            Some(self.value >> bit & 1 != 0)
        }
    }

    /// Returns `true` if every bit is don't-care.
    pub fn is_all_dont_care(&self) -> bool {
        self.dont_care == width_mask(self.width)
    }

    /// Marks `bit` as don't-care.
    pub fn with_dont_care_bit(self, bit: u32) -> Self {
        debug_assert!(bit < self.width);
        let mask = 1u64 << bit;
        Self {
            value: self.value & !mask,
            dont_care: self.dont_care | mask,
            width: self.width,
        }
    }

    /// Returns `true` if the concrete `value` is one of the values this pattern stands for.
    pub fn matches(&self, value: u64) -> bool {
        value & !width_mask(self.width) == 0 && (value & !self.dont_care) == self.value
    }

    /// Returns `true` if every concrete value matched by `other` is matched by `self`.
    pub fn covers(&self, other: &Bits) -> bool {
        self.width == other.width
            && other.dont_care & !self.dont_care == 0
            && (other.value & !self.dont_care) == self.value
    }

    /// The smallest concrete instantiation that is not below `lower`.
    pub fn min_instance_at_least(&self, lower: u64) -> Option<u64> {
        let mask = width_mask(self.width);
        if lower > mask {
            return None;
        }
        if self.matches(lower) {
            return Some(lower);
        }
        let care = !self.dont_care & mask;
        // Any larger instantiation agrees with `lower` above some bit `i`, has bit `i` set where
        // `lower` has it clear, and is minimal below `i`. Lower choices of `i` are smaller.
        for i in 0..self.width {
            let bit = 1u64 << i;
            if lower & bit != 0 {
                continue;
            }
            if care & bit != 0 && self.value & bit == 0 {
                continue;
            }
            let above = mask & !(width_mask(i + 1));
            if (lower ^ self.value) & care & above != 0 {
                continue;
            }
            let below = width_mask(i);
            return Some((lower & above) | bit | (self.value & below));
        }
        None
    }
}

impl PartialOrd for Bits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(self.dont_care.cmp(&other.dont_care))
            .then(self.width.cmp(&other.width))
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            let c = match self.bit(i) {
                Some(false) => '0',
                Some(true) => '1',
                None => 'D',
            };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// The value of a single table cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CellData {
    /// A concrete (possibly partially don't-care) bit vector.
    Bits(Bits),
    /// A symbolic placeholder for an input that was not enumerated.
    Algebra(Arc<str>),
    /// Matches any concrete value.
    DC,
}

impl CellData {
    /// A concrete cell.
    pub fn bits(value: u64, width: u32) -> Self {
        CellData::Bits(Bits::new(value, width))
    }

    /// A symbolic cell.
    pub fn algebra(name: impl Into<Arc<str>>) -> Self {
        CellData::Algebra(name.into())
    }

    /// The unsigned integer value of a fully concrete cell.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            CellData::Bits(bits) => bits.to_u64(),
            _ => None,
        }
    }

    /// Returns `true` for whole-cell don't-care.
    pub fn is_dc(&self) -> bool {
        matches!(self, CellData::DC)
    }

    /// Marks one bit of a [`CellData::Bits`] cell as don't-care.
    ///
    /// The result is normalized to [`CellData::DC`] once every bit is don't-care. Other variants
    /// are returned unchanged.
    pub fn with_dont_care_bit(&self, bit: u32) -> Self {
        match self {
            CellData::Bits(bits) => {
                let bits = bits.with_dont_care_bit(bit);
                if bits.is_all_dont_care() {
                    CellData::DC
                } else {
                    CellData::Bits(bits)
                }
            }
            other => other.clone(),
        }
    }

    /// Returns `true` if `self`, read as a pattern, stands for the cell `concrete`.
    ///
    /// `DC` matches everything, partially don't-care bits match the concrete values agreeing on
    /// the cared-for bits and `Algebra` only matches the identical term.
    pub fn matches(&self, concrete: &CellData) -> bool {
        match (self, concrete) {
            (CellData::DC, _) => true,
            (CellData::Bits(pattern), CellData::Bits(bits)) => pattern.covers(bits),
            (CellData::Algebra(a), CellData::Algebra(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for CellData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellData::Bits(bits) => fmt::Debug::fmt(bits, f),
            CellData::Algebra(name) => write!(f, "{name:?}"),
            CellData::DC => f.write_str("DC"),
        }
    }
}

/// Total order on cell values: `Bits < Algebra < DC`.
///
/// Bits compare by unsigned value, then by don't-care mask; algebraic terms compare
/// lexicographically by name.
pub fn compare_cell_data(a: &CellData, b: &CellData) -> Ordering {
    fn rank(cell: &CellData) -> u8 {
        match cell {
            CellData::Bits(_) => 0,
            CellData::Algebra(_) => 1,
            CellData::DC => 2,
        }
    }

    match (a, b) {
        (CellData::Bits(a), CellData::Bits(b)) => a.cmp(b),
        (CellData::Algebra(a), CellData::Algebra(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

impl PartialOrd for CellData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellData {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_cell_data(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_order() {
        let mut cells = vec![
            CellData::DC,
            CellData::algebra("b"),
            CellData::bits(7, 3),
            CellData::algebra("a"),
            CellData::bits(0, 3),
        ];
        cells.sort();
        assert_eq!(
            cells,
            [
                CellData::bits(0, 3),
                CellData::bits(7, 3),
                CellData::algebra("a"),
                CellData::algebra("b"),
                CellData::DC,
            ]
        );
    }

    #[test]
    fn bits_truncate_to_width() {
        assert_eq!(CellData::bits(0b1_0110, 4).as_u64(), Some(0b0110));
        assert_eq!(Bits::new(u64::MAX, 64).value(), u64::MAX);
    }

    #[test]
    fn dont_care_bits_normalize_to_dc() {
        let cell = CellData::bits(0b10, 2).with_dont_care_bit(0);
        assert_eq!(format!("{cell:?}"), "1D");
        assert_eq!(cell.as_u64(), None);
        assert_eq!(cell.with_dont_care_bit(1), CellData::DC);
    }

    #[test]
    fn patterns_match_concrete_values() {
        let CellData::Bits(pattern) = CellData::bits(0b100, 3).with_dont_care_bit(0) else {
            unreachable!()
        };
        assert!(pattern.matches(0b100));
        assert!(pattern.matches(0b101));
        assert!(!pattern.matches(0b110));
        assert!(!pattern.matches(0b1100));

        let cell = CellData::Bits(pattern);
        assert!(cell.matches(&CellData::bits(0b101, 3)));
        assert!(!cell.matches(&CellData::algebra("a")));
        assert!(CellData::DC.matches(&CellData::algebra("a")));
    }

    #[test]
    fn min_instance_search() {
        // 1D0D: instantiations 8, 9, 12, 13
        let pattern = Bits::new(0b1000, 4)
            .with_dont_care_bit(0)
            .with_dont_care_bit(2);
        assert_eq!(pattern.min_instance_at_least(0), Some(8));
        assert_eq!(pattern.min_instance_at_least(9), Some(9));
        assert_eq!(pattern.min_instance_at_least(10), Some(12));
        assert_eq!(pattern.min_instance_at_least(14), None);
        assert_eq!(pattern.min_instance_at_least(100), None);

        for lower in 0..16 {
            let expected = (lower..16).find(|&v| pattern.matches(v));
            assert_eq!(pattern.min_instance_at_least(lower), expected, "lower {lower}");
        }
    }

    #[test]
    fn column_identity() {
        let a = CellIO::input("a", 2, 0);
        assert_eq!(a, CellIO::input("a", 2, 0));
        assert_ne!(a, CellIO::input("a", 2, 1));
        assert_ne!(a, CellIO::output("a", 2, 0));
        assert_eq!(a.max_value(), 3);
        assert_eq!(format!("{a:?}"), "a[2]@in0");
    }
}
