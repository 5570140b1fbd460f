#![forbid(unsafe_code)]

//! Strict, bounded UTF-8 decoding.
//!
//! [`decode_at`] picks one code point off a byte slice without looking past
//! an optional byte budget. It rejects everything the standard library's
//! `str::from_utf8` rejects and additionally the non-characters U+FFFE and
//! U+FFFF, so text that passes here is safe to measure column by column.
//!
//! [`Utf8Cursor`] wraps the same decoder in a cursor that advances through a
//! slice and decrements its remaining budget. Once it has seen a malformed
//! sequence it refuses to continue: callers either stop or switch to
//! treating the input as raw bytes.
//!
//! # Example
//! ```
//! use termtext::decode::{decode, Utf8Cursor};
//!
//! let d = decode("é".as_bytes()).unwrap();
//! assert_eq!((d.code_point, d.len), (0xE9, 2));
//!
//! let mut cursor = Utf8Cursor::new(b"a\xE2\x82");
//! assert_eq!(cursor.next_code_point(), Ok(u32::from(b'a')));
//! assert!(cursor.next_code_point().is_err());
//! assert!(cursor.is_invalid());
//! ```

use crate::error::{DecodeError, DecodeErrorKind};
use crate::escape::escape_run_len;

/// One decoded code point and the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The scalar value.
    pub code_point: u32,
    /// Bytes consumed, 1 through 4.
    pub len: usize,
}

/// Decode the code point at the start of `bytes`.
///
/// # Errors
/// Returns a [`DecodeError`] at offset 0 if the leading bytes are not a
/// well-formed UTF-8 sequence.
#[inline]
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    decode_prefix(bytes).map_err(|kind| DecodeError::new(0, kind))
}

/// Decode the code point at `offset`, reading at most `budget` bytes.
///
/// `None` means "up to the end of the slice". A budget larger than what is
/// left of the slice is clamped to it, so decoding never reads out of
/// bounds.
///
/// # Errors
/// Returns a [`DecodeError`] carrying `offset` when the sequence is
/// truncated by the budget or malformed.
pub fn decode_at(
    bytes: &[u8],
    offset: usize,
    budget: Option<usize>,
) -> Result<Decoded, DecodeError> {
    let window = bounded(bytes, offset, budget);
    decode_prefix(window).map_err(|kind| DecodeError::new(offset, kind))
}

fn bounded(bytes: &[u8], offset: usize, budget: Option<usize>) -> &[u8] {
    let rest = bytes.get(offset..).unwrap_or_default();
    match budget {
        Some(limit) if limit < rest.len() => &rest[..limit],
        _ => rest,
    }
}

#[inline]
fn continuation(b: u8) -> Result<u32, DecodeErrorKind> {
    if b & 0xC0 == 0x80 {
        Ok(u32::from(b & 0x3F))
    } else {
        Err(DecodeErrorKind::BadContinuation)
    }
}

fn decode_prefix(s: &[u8]) -> Result<Decoded, DecodeErrorKind> {
    let Some(&b0) = s.first() else {
        return Err(DecodeErrorKind::Exhausted);
    };

    if b0 < 0x80 {
        // 0xxxxxxx
        return Ok(Decoded {
            code_point: u32::from(b0),
            len: 1,
        });
    }

    if b0 & 0xE0 == 0xC0 {
        // 110XXXXx 10xxxxxx
        let &[_, b1, ..] = s else {
            return Err(DecodeErrorKind::Truncated);
        };
        let c1 = continuation(b1)?;
        if b0 & 0xFE == 0xC0 {
            return Err(DecodeErrorKind::Overlong);
        }
        return Ok(Decoded {
            code_point: (u32::from(b0 & 0x1F) << 6) | c1,
            len: 2,
        });
    }

    if b0 & 0xF0 == 0xE0 {
        // 1110XXXX 10Xxxxxx 10xxxxxx
        let &[_, b1, b2, ..] = s else {
            return Err(DecodeErrorKind::Truncated);
        };
        let c1 = continuation(b1)?;
        let c2 = continuation(b2)?;
        if b0 == 0xE0 && b1 & 0xE0 == 0x80 {
            return Err(DecodeErrorKind::Overlong);
        }
        if b0 == 0xED && b1 & 0xE0 == 0xA0 {
            return Err(DecodeErrorKind::Surrogate);
        }
        if b0 == 0xEF && b1 == 0xBF && b2 & 0xFE == 0xBE {
            return Err(DecodeErrorKind::NonCharacter);
        }
        return Ok(Decoded {
            code_point: (u32::from(b0 & 0x0F) << 12) | (c1 << 6) | c2,
            len: 3,
        });
    }

    if b0 & 0xF8 == 0xF0 {
        // 11110XXX 10XXxxxx 10xxxxxx 10xxxxxx
        let &[_, b1, b2, b3, ..] = s else {
            return Err(DecodeErrorKind::Truncated);
        };
        let c1 = continuation(b1)?;
        let c2 = continuation(b2)?;
        let c3 = continuation(b3)?;
        if b0 == 0xF0 && b1 & 0xF0 == 0x80 {
            return Err(DecodeErrorKind::Overlong);
        }
        if b0 > 0xF4 || (b0 == 0xF4 && b1 > 0x8F) {
            return Err(DecodeErrorKind::OutOfRange);
        }
        return Ok(Decoded {
            code_point: (u32::from(b0 & 0x07) << 18) | (c1 << 12) | (c2 << 6) | c3,
            len: 4,
        });
    }

    Err(DecodeErrorKind::InvalidLead)
}

/// A position in a byte slice plus an optional remaining-byte budget.
///
/// The budget never underflows: each successful decode subtracts exactly the
/// bytes it consumed. After the first malformed sequence the cursor is
/// invalid and every further decode returns that same error.
#[derive(Debug, Clone)]
pub struct Utf8Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    remaining: Option<usize>,
    error: Option<DecodeError>,
}

impl<'a> Utf8Cursor<'a> {
    /// Cursor over the whole slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            remaining: None,
            error: None,
        }
    }

    /// Cursor allowed to consume at most `budget` bytes.
    #[must_use]
    pub fn with_budget(bytes: &'a [u8], budget: usize) -> Self {
        Self {
            remaining: Some(budget),
            ..Self::new(bytes)
        }
    }

    /// Byte offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still allowed by the budget, if one was given.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }

    /// Whether a malformed sequence has been hit.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// The error that invalidated the cursor, if any.
    #[must_use]
    pub fn error(&self) -> Option<DecodeError> {
        self.error
    }

    /// Unread bytes within the budget.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        bounded(self.bytes, self.pos, self.remaining)
    }

    /// True when nothing is left to read, either because the slice or the
    /// budget ran out.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.rest().is_empty()
    }

    /// Decode the next code point and advance past it.
    ///
    /// # Errors
    /// Returns the [`DecodeError`] for a malformed or truncated sequence,
    /// or the stored one if the cursor is already invalid.
    pub fn next_decoded(&mut self) -> Result<Decoded, DecodeError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        match decode_at(self.bytes, self.pos, self.remaining) {
            Ok(decoded) => {
                self.consume(decoded.len);
                Ok(decoded)
            }
            Err(err) => {
                self.error = Some(err);
                Err(err)
            }
        }
    }

    /// Decode the next code point and advance past it.
    ///
    /// # Errors
    /// Same as [`Utf8Cursor::next_decoded`].
    pub fn next_code_point(&mut self) -> Result<u32, DecodeError> {
        self.next_decoded().map(|d| d.code_point)
    }

    /// Step over any display-mode escape sequences at the cursor, returning
    /// how many bytes were skipped.
    pub fn skip_escapes(&mut self) -> usize {
        if self.error.is_some() {
            return 0;
        }
        let n = escape_run_len(self.rest());
        self.consume(n);
        n
    }

    /// Step over one byte without decoding it.
    ///
    /// Returns `false` at the end of the input.
    pub fn skip_byte(&mut self) -> bool {
        if self.error.is_some() || self.is_at_end() {
            return false;
        }
        self.consume(1);
        true
    }

    fn consume(&mut self, n: usize) {
        self.pos += n;
        if let Some(rem) = self.remaining.as_mut() {
            *rem -= n;
        }
    }
}

impl Iterator for Utf8Cursor<'_> {
    type Item = Result<u32, DecodeError>;

    /// Yields code points until the end, or a single error and then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() || self.is_at_end() {
            return None;
        }
        Some(self.next_code_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(bytes: &[u8]) -> DecodeErrorKind {
        decode(bytes).unwrap_err().kind
    }

    #[test]
    fn ascii() {
        assert_eq!(
            decode(b"A"),
            Ok(Decoded {
                code_point: 0x41,
                len: 1
            })
        );
        assert_eq!(decode(b"\0").map(|d| d.code_point), Ok(0));
    }

    #[test]
    fn two_byte() {
        assert_eq!(
            decode(&[0xC3, 0xA9]),
            Ok(Decoded {
                code_point: 0xE9,
                len: 2
            })
        );
        assert_eq!(decode(&[0xC2, 0x80]).map(|d| d.code_point), Ok(0x80));
        assert_eq!(decode(&[0xDF, 0xBF]).map(|d| d.code_point), Ok(0x7FF));
    }

    #[test]
    fn three_byte() {
        assert_eq!(
            decode(&[0xE4, 0xB8, 0xAD]),
            Ok(Decoded {
                code_point: 0x4E2D,
                len: 3
            })
        );
        assert_eq!(decode(&[0xE0, 0xA0, 0x80]).map(|d| d.code_point), Ok(0x800));
        assert_eq!(decode(&[0xEF, 0xBF, 0xBD]).map(|d| d.code_point), Ok(0xFFFD));
    }

    #[test]
    fn four_byte() {
        assert_eq!(
            decode(&[0xF0, 0x9F, 0x98, 0x80]),
            Ok(Decoded {
                code_point: 0x1F600,
                len: 4
            })
        );
        assert_eq!(
            decode(&[0xF4, 0x8F, 0xBF, 0xBF]).map(|d| d.code_point),
            Ok(0x10FFFF)
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(kind(b""), DecodeErrorKind::Exhausted);
    }

    #[test]
    fn truncated() {
        assert_eq!(kind(&[0xC3]), DecodeErrorKind::Truncated);
        assert_eq!(kind(&[0xE2, 0x82]), DecodeErrorKind::Truncated);
        assert_eq!(kind(&[0xF0, 0x9F, 0x98]), DecodeErrorKind::Truncated);
    }

    #[test]
    fn bad_continuation() {
        assert_eq!(kind(&[0xC3, 0x41]), DecodeErrorKind::BadContinuation);
        assert_eq!(kind(&[0xE4, 0xB8, 0xC0]), DecodeErrorKind::BadContinuation);
        assert_eq!(kind(&[0xC3, 0x00]), DecodeErrorKind::BadContinuation);
    }

    #[test]
    fn overlong() {
        assert_eq!(kind(&[0xC0, 0x80]), DecodeErrorKind::Overlong);
        assert_eq!(kind(&[0xC1, 0xBF]), DecodeErrorKind::Overlong);
        assert_eq!(kind(&[0xE0, 0x80, 0x80]), DecodeErrorKind::Overlong);
        assert_eq!(kind(&[0xE0, 0x9F, 0xBF]), DecodeErrorKind::Overlong);
        assert_eq!(kind(&[0xF0, 0x8F, 0xBF, 0xBF]), DecodeErrorKind::Overlong);
    }

    #[test]
    fn surrogates() {
        assert_eq!(kind(&[0xED, 0xA0, 0x80]), DecodeErrorKind::Surrogate);
        assert_eq!(kind(&[0xED, 0xBF, 0xBF]), DecodeErrorKind::Surrogate);
        assert_eq!(decode(&[0xED, 0x9F, 0xBF]).map(|d| d.code_point), Ok(0xD7FF));
    }

    #[test]
    fn non_characters() {
        assert_eq!(kind(&[0xEF, 0xBF, 0xBE]), DecodeErrorKind::NonCharacter);
        assert_eq!(kind(&[0xEF, 0xBF, 0xBF]), DecodeErrorKind::NonCharacter);
    }

    #[test]
    fn above_max_code_point() {
        assert_eq!(kind(&[0xF4, 0x90, 0x80, 0x80]), DecodeErrorKind::OutOfRange);
        assert_eq!(kind(&[0xF5, 0x80, 0x80, 0x80]), DecodeErrorKind::OutOfRange);
        assert_eq!(kind(&[0xF7, 0xBF, 0xBF, 0xBF]), DecodeErrorKind::OutOfRange);
    }

    #[test]
    fn invalid_leads() {
        assert_eq!(kind(&[0x80]), DecodeErrorKind::InvalidLead);
        assert_eq!(kind(&[0xBF, 0x80]), DecodeErrorKind::InvalidLead);
        assert_eq!(kind(&[0xF8, 0x88, 0x80, 0x80, 0x80]), DecodeErrorKind::InvalidLead);
        assert_eq!(kind(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80]), DecodeErrorKind::InvalidLead);
        assert_eq!(kind(&[0xFF]), DecodeErrorKind::InvalidLead);
    }

    #[test]
    fn budget_limits_read() {
        let bytes = [0xE4, 0xB8, 0xAD];
        let err = decode_at(&bytes, 0, Some(2)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Truncated);
        assert!(decode_at(&bytes, 0, Some(3)).is_ok());
        assert!(decode_at(&bytes, 0, Some(10)).is_ok());
        assert_eq!(
            decode_at(&bytes, 0, Some(0)).unwrap_err().kind,
            DecodeErrorKind::Exhausted
        );
    }

    #[test]
    fn offset_reported() {
        let bytes = b"ab\xC3";
        let err = decode_at(bytes, 2, None).unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.kind, DecodeErrorKind::Truncated);
        assert_eq!(
            decode_at(bytes, 7, None).unwrap_err().kind,
            DecodeErrorKind::Exhausted
        );
    }

    #[test]
    fn cursor_walks_and_counts_budget() {
        let text = "aé中😀".as_bytes();
        let mut cursor = Utf8Cursor::with_budget(text, text.len());
        let mut points = Vec::new();
        while !cursor.is_at_end() {
            points.push(cursor.next_code_point().unwrap());
        }
        assert_eq!(points, vec![0x61, 0xE9, 0x4E2D, 0x1F600]);
        assert_eq!(cursor.position(), text.len());
        assert_eq!(cursor.remaining(), Some(0));
        assert!(!cursor.is_invalid());
    }

    #[test]
    fn cursor_stops_at_budget() {
        let mut cursor = Utf8Cursor::with_budget(b"abc", 2);
        assert_eq!(cursor.by_ref().collect::<Result<Vec<_>, _>>(), Ok(vec![0x61, 0x62]));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn cursor_budget_cuts_sequence() {
        let bytes = "中".as_bytes();
        let mut cursor = Utf8Cursor::with_budget(bytes, 2);
        let err = cursor.next_code_point().unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Truncated);
        assert_eq!(cursor.remaining(), Some(2));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn cursor_stays_invalid() {
        let mut cursor = Utf8Cursor::new(b"\xFFabc");
        let first = cursor.next_code_point().unwrap_err();
        assert!(cursor.is_invalid());
        assert_eq!(cursor.next_code_point(), Err(first));
        assert_eq!(cursor.error(), Some(first));
        assert!(!cursor.skip_byte());
        assert_eq!(cursor.skip_escapes(), 0);
    }

    #[test]
    fn iterator_yields_one_error() {
        let items: Vec<_> = Utf8Cursor::new(b"a\xC0\x80b").collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Ok(0x61));
        assert_eq!(items[1].unwrap_err().offset, 1);
    }

    #[test]
    fn cursor_skips_escapes_within_budget() {
        let mut cursor = Utf8Cursor::with_budget(b"\x1b[31mx", 4);
        assert_eq!(cursor.skip_escapes(), 0);
        let mut cursor = Utf8Cursor::new(b"\x1b[31m\x1b[0mx");
        assert_eq!(cursor.skip_escapes(), 9);
        assert_eq!(cursor.next_code_point(), Ok(0x78));
    }
}
