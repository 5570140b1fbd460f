#![forbid(unsafe_code)]

//! Column width of a single code point.
//!
//! Classification follows Markus Kuhn's `wcwidth`:
//!
//! - U+0000 has width 0.
//! - C0/C1 controls and DEL have no width ([`code_point_width`] returns
//!   `None`).
//! - Non-spacing and enclosing marks (Mn, Me), format characters (Cf) other
//!   than SOFT HYPHEN, ZERO WIDTH SPACE, and the Hangul Jamo medial vowels
//!   and final consonants (U+1160..U+11FF) have width 0.
//! - East Asian Wide and Fullwidth characters have width 2.
//! - Everything else has width 1.
//!
//! Both lookup tables are sorted, disjoint, read-only, and searched by
//! bisection.

/// An inclusive range of code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Lowest code point in the range.
    pub first: u32,
    /// Highest code point in the range, inclusive.
    pub last: u32,
}

impl Interval {
    #[must_use]
    pub const fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, cp: u32) -> bool {
        self.first <= cp && cp <= self.last
    }
}

const fn iv(first: u32, last: u32) -> Interval {
    Interval::new(first, last)
}

/// Zero-width code points.
///
/// Generated by `uniset +cat=Me +cat=Mn +cat=Cf -00AD +1160-11FF +200B c`.
#[rustfmt::skip]
pub static COMBINING: &[Interval] = &[
    iv(0x0300, 0x0357), iv(0x035D, 0x036F), iv(0x0483, 0x0486),
    iv(0x0488, 0x0489), iv(0x0591, 0x05A1), iv(0x05A3, 0x05B9),
    iv(0x05BB, 0x05BD), iv(0x05BF, 0x05BF), iv(0x05C1, 0x05C2),
    iv(0x05C4, 0x05C4), iv(0x0600, 0x0603), iv(0x0610, 0x0615),
    iv(0x064B, 0x0658), iv(0x0670, 0x0670), iv(0x06D6, 0x06E4),
    iv(0x06E7, 0x06E8), iv(0x06EA, 0x06ED), iv(0x070F, 0x070F),
    iv(0x0711, 0x0711), iv(0x0730, 0x074A), iv(0x07A6, 0x07B0),
    iv(0x0901, 0x0902), iv(0x093C, 0x093C), iv(0x0941, 0x0948),
    iv(0x094D, 0x094D), iv(0x0951, 0x0954), iv(0x0962, 0x0963),
    iv(0x0981, 0x0981), iv(0x09BC, 0x09BC), iv(0x09C1, 0x09C4),
    iv(0x09CD, 0x09CD), iv(0x09E2, 0x09E3), iv(0x0A01, 0x0A02),
    iv(0x0A3C, 0x0A3C), iv(0x0A41, 0x0A42), iv(0x0A47, 0x0A48),
    iv(0x0A4B, 0x0A4D), iv(0x0A70, 0x0A71), iv(0x0A81, 0x0A82),
    iv(0x0ABC, 0x0ABC), iv(0x0AC1, 0x0AC5), iv(0x0AC7, 0x0AC8),
    iv(0x0ACD, 0x0ACD), iv(0x0AE2, 0x0AE3), iv(0x0B01, 0x0B01),
    iv(0x0B3C, 0x0B3C), iv(0x0B3F, 0x0B3F), iv(0x0B41, 0x0B43),
    iv(0x0B4D, 0x0B4D), iv(0x0B56, 0x0B56), iv(0x0B82, 0x0B82),
    iv(0x0BC0, 0x0BC0), iv(0x0BCD, 0x0BCD), iv(0x0C3E, 0x0C40),
    iv(0x0C46, 0x0C48), iv(0x0C4A, 0x0C4D), iv(0x0C55, 0x0C56),
    iv(0x0CBC, 0x0CBC), iv(0x0CBF, 0x0CBF), iv(0x0CC6, 0x0CC6),
    iv(0x0CCC, 0x0CCD), iv(0x0D41, 0x0D43), iv(0x0D4D, 0x0D4D),
    iv(0x0DCA, 0x0DCA), iv(0x0DD2, 0x0DD4), iv(0x0DD6, 0x0DD6),
    iv(0x0E31, 0x0E31), iv(0x0E34, 0x0E3A), iv(0x0E47, 0x0E4E),
    iv(0x0EB1, 0x0EB1), iv(0x0EB4, 0x0EB9), iv(0x0EBB, 0x0EBC),
    iv(0x0EC8, 0x0ECD), iv(0x0F18, 0x0F19), iv(0x0F35, 0x0F35),
    iv(0x0F37, 0x0F37), iv(0x0F39, 0x0F39), iv(0x0F71, 0x0F7E),
    iv(0x0F80, 0x0F84), iv(0x0F86, 0x0F87), iv(0x0F90, 0x0F97),
    iv(0x0F99, 0x0FBC), iv(0x0FC6, 0x0FC6), iv(0x102D, 0x1030),
    iv(0x1032, 0x1032), iv(0x1036, 0x1037), iv(0x1039, 0x1039),
    iv(0x1058, 0x1059), iv(0x1160, 0x11FF), iv(0x1712, 0x1714),
    iv(0x1732, 0x1734), iv(0x1752, 0x1753), iv(0x1772, 0x1773),
    iv(0x17B4, 0x17B5), iv(0x17B7, 0x17BD), iv(0x17C6, 0x17C6),
    iv(0x17C9, 0x17D3), iv(0x17DD, 0x17DD), iv(0x180B, 0x180D),
    iv(0x18A9, 0x18A9), iv(0x1920, 0x1922), iv(0x1927, 0x1928),
    iv(0x1932, 0x1932), iv(0x1939, 0x193B), iv(0x200B, 0x200F),
    iv(0x202A, 0x202E), iv(0x2060, 0x2063), iv(0x206A, 0x206F),
    iv(0x20D0, 0x20EA), iv(0x302A, 0x302F), iv(0x3099, 0x309A),
    iv(0xFB1E, 0xFB1E), iv(0xFE00, 0xFE0F), iv(0xFE20, 0xFE23),
    iv(0xFEFF, 0xFEFF), iv(0xFFF9, 0xFFFB), iv(0x1D167, 0x1D169),
    iv(0x1D173, 0x1D182), iv(0x1D185, 0x1D18B), iv(0x1D1AA, 0x1D1AD),
    iv(0xE0001, 0xE0001), iv(0xE0020, 0xE007F), iv(0xE0100, 0xE01EF),
];

/// Double-width code points.
pub static WIDE: &[Interval] = &[
    // Hangul Jamo initial consonants
    iv(0x1100, 0x115F),
    // angle brackets
    iv(0x2329, 0x232A),
    // CJK radicals .. Yi, minus U+303F HALF FILL SPACE
    iv(0x2E80, 0x303E),
    iv(0x3040, 0xA4CF),
    // Hangul syllables
    iv(0xAC00, 0xD7A3),
    // CJK compatibility ideographs
    iv(0xF900, 0xFAFF),
    // CJK compatibility forms
    iv(0xFE30, 0xFE6F),
    // fullwidth forms
    iv(0xFF00, 0xFF60),
    iv(0xFFE0, 0xFFE6),
    // supplementary and tertiary ideographic planes
    iv(0x20000, 0x2FFFD),
    iv(0x30000, 0x3FFFD),
];

/// Whether `cp` falls inside any interval of the sorted, disjoint `table`.
#[must_use]
pub fn bisearch(cp: u32, table: &[Interval]) -> bool {
    let (Some(head), Some(tail)) = (table.first(), table.last()) else {
        return false;
    };
    if cp < head.first || cp > tail.last {
        return false;
    }

    let mut lo = 0;
    let mut hi = table.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let range = table[mid];
        if cp > range.last {
            lo = mid + 1;
        } else if cp < range.first {
            hi = mid;
        } else {
            return true;
        }
    }
    false
}

/// Whether `cp` is a C0/C1 control character or DEL.
#[inline]
#[must_use]
pub const fn is_control(cp: u32) -> bool {
    (cp != 0 && cp < 0x20) || (cp >= 0x7F && cp < 0xA0)
}

/// Display columns taken by `cp`: `Some(0)`, `Some(1)`, or `Some(2)`.
///
/// Returns `None` for control characters, which have no meaningful width.
#[must_use]
pub fn code_point_width(cp: u32) -> Option<usize> {
    if cp == 0 {
        return Some(0);
    }
    if is_control(cp) {
        return None;
    }
    if bisearch(cp, COMBINING) {
        return Some(0);
    }
    Some(1 + usize::from(cp >= 0x1100 && bisearch(cp, WIDE)))
}

/// [`code_point_width`] for a `char`.
#[inline]
#[must_use]
pub fn char_width(c: char) -> Option<usize> {
    code_point_width(u32::from(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted_disjoint(table: &[Interval]) {
        for range in table {
            assert!(range.first <= range.last, "{range:?} is inverted");
        }
        for pair in table.windows(2) {
            assert!(
                pair[0].last < pair[1].first,
                "{:?} overlaps or precedes {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn tables_are_sorted_and_disjoint() {
        assert_sorted_disjoint(COMBINING);
        assert_sorted_disjoint(WIDE);
    }

    #[test]
    fn bisearch_matches_linear_scan() {
        for cp in (0..0x4_0000).step_by(7) {
            let linear = COMBINING.iter().any(|r| r.contains(cp));
            assert_eq!(bisearch(cp, COMBINING), linear, "U+{cp:04X}");
        }
    }

    #[test]
    fn bisearch_edges() {
        assert!(bisearch(0x0300, COMBINING));
        assert!(bisearch(0xE01EF, COMBINING));
        assert!(!bisearch(0x02FF, COMBINING));
        assert!(!bisearch(0xE01F0, COMBINING));
        assert!(!bisearch(0x41, &[]));
    }

    #[test]
    fn nul_is_zero() {
        assert_eq!(code_point_width(0), Some(0));
    }

    #[test]
    fn controls_have_no_width() {
        for cp in [0x01, 0x09, 0x0A, 0x1B, 0x1F, 0x7F, 0x80, 0x9F] {
            assert_eq!(code_point_width(cp), None, "U+{cp:04X}");
        }
        assert_eq!(code_point_width(0xA0), Some(1));
        assert_eq!(code_point_width(0x20), Some(1));
    }

    #[test]
    fn combining_marks_are_zero() {
        assert_eq!(char_width('\u{0301}'), Some(0));
        assert_eq!(char_width('\u{200B}'), Some(0));
        assert_eq!(char_width('\u{FEFF}'), Some(0));
        assert_eq!(char_width('\u{1160}'), Some(0));
        assert_eq!(char_width('\u{11FF}'), Some(0));
    }

    #[test]
    fn soft_hyphen_is_narrow() {
        assert_eq!(char_width('\u{00AD}'), Some(1));
    }

    #[test]
    fn wide_ranges() {
        assert_eq!(char_width('\u{1100}'), Some(2));
        assert_eq!(char_width('\u{115F}'), Some(2));
        assert_eq!(char_width('\u{2329}'), Some(2));
        assert_eq!(char_width('中'), Some(2));
        assert_eq!(char_width('한'), Some(2));
        assert_eq!(char_width('\u{FF21}'), Some(2));
        assert_eq!(char_width('\u{20000}'), Some(2));
        assert_eq!(char_width('\u{3FFFD}'), Some(2));
    }

    #[test]
    fn wide_range_holes() {
        assert_eq!(char_width('\u{303F}'), Some(1));
        assert_eq!(char_width('\u{FF61}'), Some(1));
        assert_eq!(char_width('\u{2FFFE}'), Some(1));
        // combining marks inside the CJK block stay zero
        assert_eq!(char_width('\u{302A}'), Some(0));
        assert_eq!(char_width('\u{3099}'), Some(0));
    }

    #[test]
    fn narrow_defaults() {
        assert_eq!(char_width('a'), Some(1));
        assert_eq!(char_width('é'), Some(1));
        assert_eq!(char_width('\u{1F600}'), Some(1));
        assert_eq!(code_point_width(0x10FFFF), Some(1));
    }
}
