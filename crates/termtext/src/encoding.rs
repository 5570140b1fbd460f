#![forbid(unsafe_code)]

//! Encoding names, re-encoding, and per-encoding character lengths.
//!
//! UTF-8 is the only encoding this crate measures. Anything else is handed
//! to a [`Transcoder`]; the default one is backed by `encoding_rs` and knows
//! the WHATWG encoding labels.
//!
//! # Example
//! ```
//! use termtext::encoding::{reencode, same_encoding};
//!
//! assert!(same_encoding("UTF8", "utf-8"));
//! let latin1 = reencode("café".as_bytes(), Some("utf-8"), "ISO-8859-1").unwrap();
//! assert_eq!(latin1, b"caf\xE9");
//! ```

use encoding_rs::Encoding;

use crate::decode::decode;
use crate::error::ReencodeError;

/// The spelling of UTF-8 every converter is expected to understand.
pub const CANONICAL_UTF8: &str = "UTF-8";

/// Whether `name` denotes UTF-8. A missing name defaults to UTF-8.
#[must_use]
pub fn is_encoding_utf8(name: Option<&str>) -> bool {
    name.is_none_or(|n| n.eq_ignore_ascii_case("utf-8") || n.eq_ignore_ascii_case("utf8"))
}

/// Whether `src` and `dst` name the same encoding.
#[must_use]
pub fn same_encoding(src: &str, dst: &str) -> bool {
    (is_encoding_utf8(Some(src)) && is_encoding_utf8(Some(dst))) || src.eq_ignore_ascii_case(dst)
}

/// A byte-to-byte converter between named encodings.
pub trait Transcoder {
    /// Convert all of `input` from `from` to `to`.
    ///
    /// # Errors
    /// Returns [`ReencodeError::Unsupported`] when either name is unknown,
    /// or another [`ReencodeError`] when the bytes cannot be converted. No
    /// partial output is returned.
    fn transcode(&self, input: &[u8], from: &str, to: &str) -> Result<Vec<u8>, ReencodeError>;
}

/// [`Transcoder`] over `encoding_rs`.
///
/// Targets whose output encoding differs from themselves (UTF-16LE/BE,
/// `replacement`) are reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingRsTranscoder;

impl Transcoder for EncodingRsTranscoder {
    fn transcode(&self, input: &[u8], from: &str, to: &str) -> Result<Vec<u8>, ReencodeError> {
        let unsupported = || ReencodeError::Unsupported {
            from: from.to_owned(),
            to: to.to_owned(),
        };
        let src = Encoding::for_label_no_replacement(from.as_bytes()).ok_or_else(unsupported)?;
        let dst = Encoding::for_label_no_replacement(to.as_bytes()).ok_or_else(unsupported)?;
        if dst.output_encoding() != dst {
            return Err(unsupported());
        }

        let text = src
            .decode_without_bom_handling_and_without_replacement(input)
            .ok_or_else(|| ReencodeError::Malformed {
                encoding: from.to_owned(),
            })?;
        let (bytes, _, unmappable) = dst.encode(&text);
        if unmappable {
            return Err(ReencodeError::Unmappable {
                encoding: to.to_owned(),
            });
        }
        Ok(bytes.into_owned())
    }
}

/// Re-encode `input` from `from` to `to` with the default transcoder.
///
/// # Errors
/// See [`reencode_with`].
pub fn reencode(input: &[u8], from: Option<&str>, to: &str) -> Result<Vec<u8>, ReencodeError> {
    reencode_with(&EncodingRsTranscoder, input, from, to)
}

/// Re-encode `input` from `from` to `to` using `transcoder`.
///
/// Equal encodings (including any two spellings of UTF-8) are copied as is.
/// If the transcoder does not understand the names given, the conversion is
/// tried once more with UTF-8 spelled [`CANONICAL_UTF8`].
///
/// # Errors
/// [`ReencodeError::MissingSourceEncoding`] when `from` is `None`, otherwise
/// whatever the transcoder reports on its last attempt.
pub fn reencode_with<T: Transcoder + ?Sized>(
    transcoder: &T,
    input: &[u8],
    from: Option<&str>,
    to: &str,
) -> Result<Vec<u8>, ReencodeError> {
    let Some(from) = from else {
        return Err(ReencodeError::MissingSourceEncoding);
    };
    if same_encoding(from, to) {
        return Ok(input.to_vec());
    }

    let err = match transcoder.transcode(input, from, to) {
        Err(err @ ReencodeError::Unsupported { .. }) => err,
        done => return done,
    };

    let (retry_from, retry_to) = (canonical_name(from), canonical_name(to));
    if retry_from == from && retry_to == to {
        tracing::debug!(from, to, "no conversion between encodings");
        return Err(err);
    }

    tracing::debug!(
        from,
        to,
        retry_from,
        retry_to,
        "retrying conversion with canonical UTF-8 spelling"
    );
    transcoder
        .transcode(input, retry_from, retry_to)
        .inspect_err(|err| tracing::debug!(%err, "conversion failed"))
}

fn canonical_name(name: &str) -> &str {
    if is_encoding_utf8(Some(name)) {
        CANONICAL_UTF8
    } else {
        name
    }
}

/// Byte length of the first character of `bytes` in `encoding`.
///
/// Returns 0 for empty input. For UTF-8 (or `None`) this is the decoded
/// length, or 1 when the bytes are not valid UTF-8 and have to be taken one
/// at a time. Every other encoding is treated as one byte per character.
#[must_use]
pub fn char_len(bytes: &[u8], encoding: Option<&str>) -> usize {
    if bytes.is_empty() {
        0
    } else if is_encoding_utf8(encoding) {
        decode(bytes).map_or(1, |d| d.len)
    } else {
        1
    }
}

/// Split `bytes` into per-character runs as measured by [`char_len`].
pub fn char_runs<'a>(
    bytes: &'a [u8],
    encoding: Option<&'a str>,
) -> impl Iterator<Item = &'a [u8]> + 'a {
    let mut rest = bytes;
    std::iter::from_fn(move || {
        let n = char_len(rest, encoding);
        if n == 0 {
            return None;
        }
        let (head, tail) = rest.split_at(n);
        rest = tail;
        Some(head)
    })
}
