//! Named character classes.
//!
//! Table-driven classes are built once per process and shared by every matcher.

use once_cell::sync::Lazy;

use super::CharPredicate;
use crate::precompute::BitSet;
use crate::types::CodeUnit;

/// Sorted, non-overlapping inclusive ranges
#[derive(Debug)]
struct RangeTable {
    starts: Vec<CodeUnit>,
    ends: Vec<CodeUnit>,
}

impl RangeTable {
    fn new(starts: &[CodeUnit], ends: &[CodeUnit]) -> Self {
        debug_assert_eq!(starts.len(), ends.len());
        Self {
            starts: starts.to_vec(),
            ends: ends.to_vec(),
        }
    }

    fn contains(&self, c: CodeUnit) -> bool {
        match self.starts.binary_search(&c) {
            Ok(_) => true,
            Err(0) => false,
            Err(i) => c <= self.ends[i - 1],
        }
    }

    fn set_bits(&self, table: &mut BitSet) {
        for (&lo, &hi) in self.starts.iter().zip(&self.ends) {
            table.set_range(lo, hi);
        }
    }
}

/// Zero digit of every decimal digit block in the BMP; each block spans ten units.
const DIGIT_ZEROES: &[CodeUnit] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10,
];

static DIGIT: Lazy<RangeTable> = Lazy::new(|| {
    let ends: Vec<CodeUnit> = DIGIT_ZEROES.iter().map(|&zero| zero + 9).collect();
    RangeTable::new(DIGIT_ZEROES, &ends)
});

static INVISIBLE: Lazy<RangeTable> = Lazy::new(|| {
    RangeTable::new(
        &[
            0x0000, 0x007F, 0x00AD, 0x0600, 0x061C, 0x06DD, 0x070F, 0x08E2, 0x1680, 0x180E,
            0x2000, 0x2028, 0x205F, 0x2066, 0x3000, 0xD800, 0xFEFF, 0xFFF9,
        ],
        &[
            0x0020, 0x00A0, 0x00AD, 0x0605, 0x061C, 0x06DD, 0x070F, 0x08E2, 0x1680, 0x180E,
            0x200F, 0x202F, 0x2064, 0x206F, 0x3000, 0xF8FF, 0xFEFF, 0xFFFB,
        ],
    )
});

static SINGLE_WIDTH: Lazy<RangeTable> = Lazy::new(|| {
    RangeTable::new(
        &[
            0x0000, 0x05BE, 0x05D0, 0x05F3, 0x0600, 0x0750, 0x0E00, 0x1E00, 0x2100, 0xFB50,
            0xFE70, 0xFF61,
        ],
        &[
            0x04F9, 0x05BE, 0x05EA, 0x05F4, 0x06FF, 0x077F, 0x0E7F, 0x20AF, 0x213A, 0xFDFF,
            0xFEFF, 0xFFDC,
        ],
    )
});

/// Built-in character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    /// Unicode White_Space code units of the BMP
    Whitespace,
    /// Whitespace that permits a line break; excludes the no-break spaces
    BreakingWhitespace,
    /// U+0000..=U+007F
    Ascii,
    /// Decimal digits of the BMP digit blocks
    Digit,
    /// Controls, formatting characters, separators and surrogate/private-use units
    Invisible,
    /// Characters rendered in a single terminal cell (conservative)
    SingleWidth,
    /// U+0000..=U+001F and U+007F..=U+009F
    IsoControl,
    Alphabetic,
    Alphanumeric,
    Uppercase,
    Lowercase,
}

impl Classifier {
    /// Factory name used in diagnostic rendering
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Whitespace => "whitespace",
            Classifier::BreakingWhitespace => "breaking_whitespace",
            Classifier::Ascii => "ascii",
            Classifier::Digit => "digit",
            Classifier::Invisible => "invisible",
            Classifier::SingleWidth => "single_width",
            Classifier::IsoControl => "iso_control",
            Classifier::Alphabetic => "alphabetic",
            Classifier::Alphanumeric => "alphanumeric",
            Classifier::Uppercase => "uppercase",
            Classifier::Lowercase => "lowercase",
        }
    }

    /// Branch-light classes that gain nothing from precomputation
    pub(crate) fn is_fast(&self) -> bool {
        matches!(
            self,
            Classifier::Whitespace | Classifier::Ascii | Classifier::IsoControl
        )
    }

    fn ranges(&self) -> Option<&'static RangeTable> {
        match self {
            Classifier::Digit => Some(&*DIGIT),
            Classifier::Invisible => Some(&*INVISIBLE),
            Classifier::SingleWidth => Some(&*SINGLE_WIDTH),
            _ => None,
        }
    }

    pub(crate) fn set_bits(&self, table: &mut BitSet) {
        match self {
            Classifier::Ascii => table.set_range(0x00, 0x7F),
            Classifier::IsoControl => {
                table.set_range(0x00, 0x1F);
                table.set_range(0x7F, 0x9F);
            }
            _ => match self.ranges() {
                Some(ranges) => ranges.set_bits(table),
                None => {
                    for c in 0..=CodeUnit::MAX {
                        if self.matches(c) {
                            table.set(c);
                        }
                    }
                }
            },
        }
    }
}

/// Apply a `char` property; surrogate code units never match
#[inline]
fn char_property(c: CodeUnit, property: fn(char) -> bool) -> bool {
    char::from_u32(c as u32).is_some_and(property)
}

impl CharPredicate for Classifier {
    fn matches(&self, c: CodeUnit) -> bool {
        match self {
            Classifier::Whitespace => matches!(
                c,
                0x0009..=0x000D
                    | 0x0020
                    | 0x0085
                    | 0x00A0
                    | 0x1680
                    | 0x2000..=0x200A
                    | 0x2028
                    | 0x2029
                    | 0x202F
                    | 0x205F
                    | 0x3000
            ),
            Classifier::BreakingWhitespace => matches!(
                c,
                0x0009..=0x000D
                    | 0x0020
                    | 0x0085
                    | 0x1680
                    | 0x2000..=0x2006
                    | 0x2008..=0x200A
                    | 0x2028
                    | 0x2029
                    | 0x205F
                    | 0x3000
            ),
            Classifier::Ascii => c <= 0x7F,
            Classifier::IsoControl => c <= 0x1F || (0x7F..=0x9F).contains(&c),
            Classifier::Digit => DIGIT.contains(c),
            Classifier::Invisible => INVISIBLE.contains(c),
            Classifier::SingleWidth => SINGLE_WIDTH.contains(c),
            Classifier::Alphabetic => char_property(c, char::is_alphabetic),
            Classifier::Alphanumeric => char_property(c, char::is_alphanumeric),
            Classifier::Uppercase => char_property(c, char::is_uppercase),
            Classifier::Lowercase => char_property(c, char::is_lowercase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Classifier; 11] = [
        Classifier::Whitespace,
        Classifier::BreakingWhitespace,
        Classifier::Ascii,
        Classifier::Digit,
        Classifier::Invisible,
        Classifier::SingleWidth,
        Classifier::IsoControl,
        Classifier::Alphabetic,
        Classifier::Alphanumeric,
        Classifier::Uppercase,
        Classifier::Lowercase,
    ];

    #[test]
    fn test_breaking_whitespace_is_subset() {
        for c in 0..=u16::MAX {
            if Classifier::BreakingWhitespace.matches(c) {
                assert!(Classifier::Whitespace.matches(c), "code unit {c:#06X}");
            }
        }
        assert!(Classifier::Whitespace.matches(0x2007));
        assert!(!Classifier::BreakingWhitespace.matches(0x2007));
        assert!(!Classifier::BreakingWhitespace.matches(0x00A0));
    }

    #[test]
    fn test_whitespace_agrees_with_char() {
        for c in 0..=u16::MAX {
            let expected = char_property(c, char::is_whitespace);
            assert_eq!(Classifier::Whitespace.matches(c), expected, "code unit {c:#06X}");
        }
    }

    #[test]
    fn test_iso_control_agrees_with_char() {
        for c in 0..=u16::MAX {
            let expected = char_property(c, char::is_control);
            assert_eq!(Classifier::IsoControl.matches(c), expected, "code unit {c:#06X}");
        }
    }

    #[test]
    fn test_digit() {
        for c in "0123456789\u{0ED0}\u{1B59}\u{FF19}".encode_utf16() {
            assert!(Classifier::Digit.matches(c), "code unit {c:#06X}");
        }
        for c in "\tAz()/:\u{0ECF}\u{FF1A}".encode_utf16() {
            assert!(!Classifier::Digit.matches(c), "code unit {c:#06X}");
        }
    }

    #[test]
    fn test_range_table_boundaries() {
        assert!(Classifier::SingleWidth.matches(0x0000));
        assert!(Classifier::SingleWidth.matches(0x04F9));
        assert!(!Classifier::SingleWidth.matches(0x04FA));
        assert!(Classifier::SingleWidth.matches(0x2111));
        assert!(!Classifier::SingleWidth.matches(0x05BF));
        assert!(!Classifier::SingleWidth.matches(0x3000));
        assert!(Classifier::Invisible.matches(0xD800));
        assert!(Classifier::Invisible.matches(0x00AD));
        assert!(!Classifier::Invisible.matches(b'a' as u16));
    }

    #[test]
    fn test_char_properties_reject_surrogates() {
        for c in [0xD800u16, 0xDBFF, 0xDC00, 0xDFFF] {
            assert!(!Classifier::Alphabetic.matches(c));
            assert!(!Classifier::Alphanumeric.matches(c));
        }
        assert!(Classifier::Uppercase.matches(b'Q' as u16));
        assert!(Classifier::Lowercase.matches(b'q' as u16));
        assert!(Classifier::Alphanumeric.matches(b'7' as u16));
    }

    #[test]
    fn test_set_bits_exact() {
        for classifier in ALL {
            let mut table = BitSet::new();
            classifier.set_bits(&mut table);
            for c in 0..=u16::MAX {
                assert_eq!(
                    table.get(c),
                    classifier.matches(c),
                    "{} at {c:#06X}",
                    classifier.name()
                );
            }
        }
    }
}
