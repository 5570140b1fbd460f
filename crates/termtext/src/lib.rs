#![forbid(unsafe_code)]

//! Column-aware UTF-8 text handling for terminal output.
//!
//! Everything here works on byte slices that are *usually* UTF-8:
//! - [`escape`] - recognizes display-mode escape sequences (`ESC [ ... m`)
//! - [`decode`] - strict bounded UTF-8 decoding and [`Utf8Cursor`]
//! - [`width`] - per-code-point display width
//! - [`measure`] - string width and validity
//! - [`wrap`] - word wrapping with indents, falling back to raw bytes
//! - [`replace`] - substituting a range of display columns
//! - [`encoding`] - encoding names, re-encoding, character length lookup
//! - [`sink`] - formatted output that reports its width
//! - [`WidthCache`] - LRU memo of string widths
//!
//! # Example
//! ```
//! use termtext::{replace_columns, strwidth, wrap_text, WrapOptions};
//!
//! assert_eq!(strwidth("中文ab"), 6);
//!
//! let wrapped = wrap_text("aaaa bbbb cccc", &WrapOptions::new(5));
//! assert_eq!(wrapped, "aaaa\nbbbb\ncccc");
//!
//! let mut buf = "中文ab".as_bytes().to_vec();
//! replace_columns(&mut buf, 0, 2, Some(b"..")).unwrap();
//! assert_eq!(buf, "..文ab".as_bytes());
//! ```

pub mod decode;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod measure;
pub mod replace;
pub mod sink;
pub mod width;
pub mod width_cache;
pub mod wrap;

pub use decode::{Decoded, Utf8Cursor, decode_at};
pub use encoding::{
    EncodingRsTranscoder, Transcoder, char_len, is_encoding_utf8, reencode, reencode_with,
    same_encoding,
};
pub use error::{DecodeError, DecodeErrorKind, ReencodeError};
pub use escape::escape_sequence_len;
pub use measure::{column_delta, is_utf8, strnwidth, strwidth, try_strnwidth};
pub use replace::replace_columns;
pub use sink::write_width;
pub use width::{char_width, code_point_width};
pub use width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, WidthCache};
#[cfg(feature = "thread_local_cache")]
pub use width_cache::{cached_width, clear_thread_cache};
pub use wrap::{
    FirstLineIndent, WrapOptions, add_indented_text, add_wrapped_bytes, add_wrapped_text,
    wrap_text,
};
