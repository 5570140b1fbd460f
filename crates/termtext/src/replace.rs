#![forbid(unsafe_code)]

//! Replace a range of display columns in a buffer.
//!
//! Every character whose starting column falls in `[pos, pos + width)` is
//! dropped, and the replacement literal is written once in place of the
//! first of them. Zero-width characters are never dropped. Control
//! characters count -1 columns, the same as in [`strnwidth`], so one inside
//! the range is dropped and shifts the columns after it. Display-mode
//! escape sequences anywhere in the buffer are kept verbatim.
//!
//! [`strnwidth`]: crate::measure::strnwidth
//!
//! # Example
//! ```
//! use termtext::replace::replace_columns;
//!
//! let mut buf = "中文ab".as_bytes().to_vec();
//! replace_columns(&mut buf, 2, 2, Some(b"..")).unwrap();
//! assert_eq!(buf, "中..ab".as_bytes());
//! ```

use crate::decode::Utf8Cursor;
use crate::error::DecodeError;
use crate::measure::{column_delta, next_char_width};

/// Replace display columns `[pos, pos + width)` of `buf` with `subst`.
///
/// With `subst` set to `None` the columns are simply removed.
///
/// # Errors
/// Returns the [`DecodeError`] if `buf` is not valid UTF-8; `buf` is then
/// left exactly as it was.
pub fn replace_columns(
    buf: &mut Vec<u8>,
    pos: usize,
    width: usize,
    subst: Option<&[u8]>,
) -> Result<(), DecodeError> {
    match substituted(buf, pos, width, subst) {
        Ok(out) => {
            *buf = out;
            Ok(())
        }
        Err(err) => {
            tracing::debug!(
                offset = err.offset,
                kind = ?err.kind,
                "buffer is not UTF-8, leaving it unchanged"
            );
            Err(err)
        }
    }
}

fn substituted(
    src: &[u8],
    pos: usize,
    width: usize,
    mut subst: Option<&[u8]>,
) -> Result<Vec<u8>, DecodeError> {
    let pos = isize::try_from(pos).unwrap_or(isize::MAX);
    let end = pos.saturating_add(isize::try_from(width).unwrap_or(isize::MAX));
    let mut dst = Vec::with_capacity(src.len() + subst.map_or(0, <[u8]>::len));
    let mut cursor = Utf8Cursor::new(src);
    let mut column: isize = 0;

    loop {
        let start = cursor.position();
        let skipped = cursor.skip_escapes();
        dst.extend_from_slice(&src[start..start + skipped]);
        if cursor.is_at_end() {
            return Ok(dst);
        }

        let old = cursor.position();
        let n = column_delta(next_char_width(&mut cursor)?);
        if n != 0 && (pos..end).contains(&column) {
            if let Some(literal) = subst.take() {
                dst.extend_from_slice(literal);
            }
        } else {
            dst.extend_from_slice(&src[old..cursor.position()]);
        }
        column += n;
    }
}
