#![forbid(unsafe_code)]

//! Formatted output that reports how many columns it took.

use std::fmt;
use std::io::{self, Write};

use crate::measure::strwidth;

/// Format `args`, write the result to `sink`, and return its display width.
///
/// The width is [`strwidth`] of exactly the bytes written: control
/// characters count -1. Formatting always yields valid UTF-8, so the
/// byte-length fallback only applies when the text holds U+FFFE or U+FFFF.
///
/// # Errors
/// Any error from `sink` is returned as is; nothing is measured then.
pub fn write_width<W: Write + ?Sized>(
    sink: &mut W,
    args: fmt::Arguments<'_>,
) -> io::Result<isize> {
    let text = fmt::format(args);
    sink.write_all(text.as_bytes())?;
    Ok(strwidth(&text))
}

/// `write!` that evaluates to the display width written.
///
/// ```
/// use termtext::write_width;
///
/// let mut out = Vec::new();
/// let columns = write_width!(out, "{}: {}", "名前", 42).unwrap();
/// assert_eq!(columns, 8);
/// ```
#[macro_export]
macro_rules! write_width {
    ($sink:expr, $($arg:tt)*) => {
        $crate::sink::write_width(&mut $sink, ::std::format_args!($($arg)*))
    };
}
