use crate::error::{MatchError, Result};

/// A single UTF-16 code unit, the unit every matcher classifies.
pub type CodeUnit = u16;

/// Number of distinct code units (`0..=0xFFFF`).
pub const DISTINCT_CHARS: usize = 1 << 16;

/// Encode a string as UTF-16 code units.
pub fn utf16(text: &str) -> Vec<CodeUnit> {
    text.encode_utf16().collect()
}

/// Check whether `seq[index]` starts a valid surrogate pair.
///
/// Out-of-range indices are never valid.
pub fn valid_surrogate_pair_at(seq: &[CodeUnit], index: usize) -> bool {
    match (seq.get(index), seq.get(index.wrapping_add(1))) {
        (Some(&high), Some(&low)) => is_high_surrogate(high) && is_low_surrogate(low),
        _ => false,
    }
}

/// Decode UTF-16 code units into a `String`.
///
/// Fails with the position of the first surrogate that is not part of a valid pair.
pub fn decode(seq: &[CodeUnit]) -> Result<String> {
    let mut i = 0;
    while i < seq.len() {
        let unit = seq[i];
        if valid_surrogate_pair_at(seq, i) {
            i += 2;
            continue;
        }
        if is_high_surrogate(unit) || is_low_surrogate(unit) {
            return Err(MatchError::UnpairedSurrogate { index: i });
        }
        i += 1;
    }
    String::from_utf16(seq).map_err(|_| MatchError::UnpairedSurrogate { index: 0 })
}

#[inline]
pub(crate) fn is_high_surrogate(unit: CodeUnit) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: CodeUnit) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}
