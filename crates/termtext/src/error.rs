#![forbid(unsafe_code)]

//! Error types.
//!
//! Malformed UTF-8 is the only failure the text pipeline can hit; every
//! caller in this crate turns it into its documented fallback. Conversion
//! between encodings fails with [`ReencodeError`].

use std::fmt;

/// Why a UTF-8 sequence was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// No bytes left in the slice or budget.
    Exhausted,
    /// The lead byte announces more bytes than remain.
    Truncated,
    /// A continuation byte is not of the form `10xxxxxx`.
    BadContinuation,
    /// The value fits in a shorter encoding.
    Overlong,
    /// A UTF-16 surrogate (U+D800..U+DFFF) encoded in three bytes.
    Surrogate,
    /// U+FFFE or U+FFFF.
    NonCharacter,
    /// A stray continuation byte, or a lead byte for a 5- or 6-byte form.
    InvalidLead,
    /// A four-byte form above U+10FFFF.
    OutOfRange,
}

impl DecodeErrorKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Exhausted => "no bytes left to decode",
            Self::Truncated => "truncated multi-byte sequence",
            Self::BadContinuation => "invalid continuation byte",
            Self::Overlong => "overlong encoding",
            Self::Surrogate => "encoded UTF-16 surrogate",
            Self::NonCharacter => "non-character U+FFFE/U+FFFF",
            Self::InvalidLead => "invalid lead byte",
            Self::OutOfRange => "code point above U+10FFFF",
        }
    }
}

/// Malformed UTF-8 at a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeError {
    /// Offset of the offending sequence's first byte, relative to the
    /// slice the caller handed in.
    pub offset: usize,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    #[must_use]
    pub const fn new(offset: usize, kind: DecodeErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid UTF-8 at byte {}: {}",
            self.offset,
            self.kind.describe()
        )
    }
}

impl std::error::Error for DecodeError {}

/// Failure of the text-conversion collaborator.
///
/// No partial output is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReencodeError {
    /// No source encoding was given.
    MissingSourceEncoding,
    /// The converter does not know how to go from `from` to `to`.
    Unsupported { from: String, to: String },
    /// The input is not valid in its declared encoding.
    Malformed { encoding: String },
    /// The input holds characters the target encoding cannot represent.
    Unmappable { encoding: String },
}

impl fmt::Display for ReencodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSourceEncoding => write!(f, "no source encoding given"),
            Self::Unsupported { from, to } => {
                write!(f, "conversion from {from} to {to} is not supported")
            }
            Self::Malformed { encoding } => write!(f, "input is not valid {encoding}"),
            Self::Unmappable { encoding } => {
                write!(f, "input contains characters not representable in {encoding}")
            }
        }
    }
}

impl std::error::Error for ReencodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = DecodeError::new(3, DecodeErrorKind::Overlong);
        assert_eq!(err.to_string(), "invalid UTF-8 at byte 3: overlong encoding");
    }

    #[test]
    fn reencode_error_display() {
        let err = ReencodeError::Unsupported {
            from: "EBCDIC".into(),
            to: "UTF-8".into(),
        };
        assert_eq!(
            err.to_string(),
            "conversion from EBCDIC to UTF-8 is not supported"
        );
        assert_eq!(
            ReencodeError::MissingSourceEncoding.to_string(),
            "no source encoding given"
        );
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&DecodeError::new(0, DecodeErrorKind::Truncated));
        assert_error(&ReencodeError::Malformed {
            encoding: "ISO-8859-1".into(),
        });
    }
}
