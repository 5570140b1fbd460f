#![forbid(unsafe_code)]

//! Display width and validity of byte strings.
//!
//! Widths are computed assuming UTF-8. Each character adds its column width
//! to a signed total; a control character adds -1. When the input turns out
//! not to be UTF-8, [`strnwidth`] answers with the byte length instead, so a
//! caller lining up columns always gets a usable number.
//!
//! # Example
//! ```
//! use termtext::measure::{is_utf8, strnwidth, strwidth};
//!
//! assert_eq!(strwidth("é"), 1);
//! assert_eq!(strwidth("中"), 2);
//! assert_eq!(strwidth("foo\n"), 2);
//! assert_eq!(strnwidth(b"\x1b[1mbold\x1b[m", true), 4);
//! assert_eq!(strwidth(b"\xE2\x82"), 2);
//! assert!(!is_utf8(b"\xE2\x82"));
//! ```

use crate::decode::Utf8Cursor;
use crate::error::DecodeError;
use crate::width::code_point_width;

/// Decode the character under `cursor` and return its width.
///
/// `Ok(None)` is a control character. On malformed input the cursor is left
/// invalid and the error is returned.
///
/// # Errors
/// Returns the [`DecodeError`] for the malformed sequence.
#[inline]
pub fn next_char_width(cursor: &mut Utf8Cursor<'_>) -> Result<Option<usize>, DecodeError> {
    cursor.next_code_point().map(code_point_width)
}

/// What a character of the given width adds to a running column count:
/// the width itself, or -1 for a control character.
#[inline]
#[must_use]
pub fn column_delta(width: Option<usize>) -> isize {
    width.map_or(-1, |n| n as isize)
}

/// Display width of `bytes`, or `None` if they are not valid UTF-8.
///
/// Every control character subtracts one column, so the total can be
/// negative. With `skip_ansi`, display-mode escape sequences are stepped
/// over without being counted.
#[must_use]
pub fn try_strnwidth(bytes: &[u8], skip_ansi: bool) -> Option<isize> {
    let mut cursor = Utf8Cursor::new(bytes);
    let mut width = 0;
    loop {
        if skip_ansi {
            cursor.skip_escapes();
        }
        if cursor.is_at_end() {
            return Some(width);
        }
        width += column_delta(next_char_width(&mut cursor).ok()?);
    }
}

/// Display width of `bytes`, falling back to `bytes.len()` when they are
/// not valid UTF-8.
#[must_use]
pub fn strnwidth(bytes: &[u8], skip_ansi: bool) -> isize {
    try_strnwidth(bytes, skip_ansi).unwrap_or_else(|| byte_columns(bytes))
}

#[inline]
fn byte_columns(bytes: &[u8]) -> isize {
    isize::try_from(bytes.len()).unwrap_or(isize::MAX)
}

/// [`strnwidth`] without escape skipping.
#[inline]
#[must_use]
pub fn strwidth(text: impl AsRef<[u8]>) -> isize {
    strnwidth(text.as_ref(), false)
}

/// Whether `bytes` is well-formed UTF-8.
///
/// `\n`, `\t`, and `\r` are always accepted; every other byte sequence must
/// decode.
#[must_use]
pub fn is_utf8(bytes: &[u8]) -> bool {
    let mut cursor = Utf8Cursor::new(bytes);
    while let Some(&b) = cursor.rest().first() {
        if matches!(b, b'\n' | b'\t' | b'\r') {
            cursor.skip_byte();
        } else if cursor.next_code_point().is_err() {
            return false;
        }
    }
    true
}
