#![forbid(unsafe_code)]

//! Greedy word wrapping into a byte buffer.
//!
//! Lines are broken at ASCII whitespace once the running column count goes
//! past the target width. Widths come from the UTF-8 classifier, and
//! display-mode escape sequences are copied but never counted. Single
//! newlines followed by a letter or digit are folded into a space so
//! hard-wrapped paragraphs reflow. A blank line or a newline followed by
//! anything else (a list bullet, indentation) is kept as a break.
//!
//! If the text turns out not to be UTF-8, everything this call appended is
//! discarded and the text is wrapped again counting one column per byte.
//! The output is never a mix of the two.
//!
//! # Example
//! ```
//! use termtext::wrap::{add_wrapped_text, WrapOptions};
//!
//! let mut buf = Vec::new();
//! add_wrapped_text(&mut buf, b"aaaa bbbb cccc", &WrapOptions::new(5));
//! assert_eq!(buf, b"aaaa\nbbbb\ncccc");
//!
//! let mut buf = Vec::new();
//! let options = WrapOptions::new(12).first_indent(2).indent(4);
//! add_wrapped_text(&mut buf, b"one two three four", &options);
//! assert_eq!(buf, b"  one two\n    three\n    four");
//! ```

use bstr::ByteSlice;

use crate::decode::decode_at;
use crate::error::DecodeError;
use crate::escape::escape_run_len;
use crate::measure::column_delta;
use crate::width::code_point_width;

/// Where the first line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLineIndent {
    /// Write this many spaces before the first line.
    Columns(usize),
    /// This many columns are already taken by text the caller wrote; write
    /// no indent and count them against the first line.
    Consumed(usize),
}

impl Default for FirstLineIndent {
    fn default() -> Self {
        Self::Columns(0)
    }
}

/// Options for [`add_wrapped_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOptions {
    /// Target width in columns. Zero disables wrapping: lines are only
    /// indented.
    pub width: usize,
    /// Indent of the first line.
    pub first: FirstLineIndent,
    /// Indent of every following line.
    pub indent: usize,
}

impl WrapOptions {
    /// Wrap at `width` columns with no indentation.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            first: FirstLineIndent::default(),
            indent: 0,
        }
    }

    /// Options that only indent.
    #[must_use]
    pub fn unwrapped() -> Self {
        Self::new(0)
    }

    /// Indent the first line by `columns` spaces.
    #[must_use]
    pub fn first_indent(mut self, columns: usize) -> Self {
        self.first = FirstLineIndent::Columns(columns);
        self
    }

    /// Treat `columns` of the first line as already written.
    #[must_use]
    pub fn consumed(mut self, columns: usize) -> Self {
        self.first = FirstLineIndent::Consumed(columns);
        self
    }

    /// Indent continuation lines by `columns` spaces.
    #[must_use]
    pub fn indent(mut self, columns: usize) -> Self {
        self.indent = columns;
        self
    }

    /// Build options from the signed convention used by command-line
    /// callers: a negative `indent1` means `-indent1` columns are already
    /// consumed, a negative `indent2` is treated as zero, and `width <= 0`
    /// disables wrapping.
    #[must_use]
    pub fn from_signed(indent1: i32, indent2: i32, width: i32) -> Self {
        let clamp = |n: i32| usize::try_from(n).unwrap_or(0);
        let first = if indent1 < 0 {
            FirstLineIndent::Consumed(usize::try_from(indent1.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            FirstLineIndent::Columns(clamp(indent1))
        };
        Self {
            width: clamp(width),
            first,
            indent: clamp(indent2),
        }
    }

    /// Whether wrapping is disabled.
    #[must_use]
    pub fn is_unwrapped(&self) -> bool {
        self.width == 0
    }

    fn first_columns(&self) -> usize {
        match self.first {
            FirstLineIndent::Columns(n) => n,
            FirstLineIndent::Consumed(_) => 0,
        }
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(80)
    }
}

/// How characters are measured during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapMode {
    /// Decode UTF-8 and classify each code point.
    Utf8,
    /// One column per byte.
    Raw,
}

/// Append `text` to `buf`, wrapped according to `options`.
///
/// Never fails: text that is not UTF-8 is wrapped as raw bytes.
pub fn add_wrapped_text(buf: &mut Vec<u8>, text: &[u8], options: &WrapOptions) {
    if options.is_unwrapped() {
        add_indented_text(buf, text, options.first_columns(), options.indent);
        return;
    }

    let checkpoint = buf.len();
    if let Err(err) = wrap_pass(buf, text, options, WrapMode::Utf8) {
        tracing::debug!(
            offset = err.offset,
            kind = ?err.kind,
            "text is not UTF-8, wrapping as raw bytes"
        );
        buf.truncate(checkpoint);
        let raw = wrap_pass(buf, text, options, WrapMode::Raw);
        debug_assert!(raw.is_ok(), "raw-byte wrapping cannot fail");
    }
}

/// [`add_wrapped_text`] for a byte run that may carry a NUL terminator.
///
/// Only the bytes before the first NUL are wrapped.
pub fn add_wrapped_bytes(buf: &mut Vec<u8>, data: &[u8], options: &WrapOptions) {
    let text = data.find_byte(0).map_or(data, |nul| &data[..nul]);
    add_wrapped_text(buf, text, options);
}

/// Wrap a string, returning the result as a new `String`.
#[must_use]
pub fn wrap_text(text: &str, options: &WrapOptions) -> String {
    let mut buf = Vec::with_capacity(text.len() + text.len() / 8);
    add_wrapped_text(&mut buf, text.as_bytes(), options);
    // Breaks only ever land on ASCII bytes, so this is still UTF-8.
    String::from_utf8(buf).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

/// Copy `text` line by line, prefixing the first line with `indent1`
/// spaces and every later line with `indent2`.
pub fn add_indented_text(buf: &mut Vec<u8>, text: &[u8], indent1: usize, indent2: usize) {
    let mut indent = indent1;
    for line in text.lines_with_terminator() {
        push_spaces(buf, indent);
        buf.extend_from_slice(line);
        indent = indent2;
    }
}

#[inline]
fn push_spaces(buf: &mut Vec<u8>, n: usize) {
    buf.resize(buf.len() + n, b' ');
}

#[inline]
fn signed(columns: usize) -> isize {
    isize::try_from(columns).unwrap_or(isize::MAX)
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Per-line bookkeeping of one wrapping pass.
#[derive(Debug)]
struct WrapState {
    /// Input offset where the current output line starts.
    bol: usize,
    /// Input offset of the latest break candidate on this line.
    space: Option<usize>,
    /// Columns used so far on this line. Controls count -1, so this can
    /// drop below the indent.
    column: isize,
    /// Spaces still owed to this line before its first text.
    indent: usize,
}

impl WrapState {
    fn new(first: FirstLineIndent) -> Self {
        match first {
            FirstLineIndent::Columns(n) => Self {
                bol: 0,
                space: None,
                column: signed(n),
                indent: n,
            },
            FirstLineIndent::Consumed(n) => Self {
                bol: 0,
                space: Some(0),
                column: signed(n),
                indent: 0,
            },
        }
    }

    /// End the output line and restart at the break `at`, skipping one
    /// whitespace byte there. Returns the input offset to resume from.
    fn break_line(&mut self, buf: &mut Vec<u8>, text: &[u8], at: usize, indent: usize) -> usize {
        buf.push(b'\n');
        self.bol = at + usize::from(text.get(at).copied().is_some_and(is_space));
        self.space = None;
        self.column = signed(indent);
        self.indent = indent;
        self.bol
    }
}

fn wrap_pass(
    buf: &mut Vec<u8>,
    text: &[u8],
    options: &WrapOptions,
    mode: WrapMode,
) -> Result<(), DecodeError> {
    let mut state = WrapState::new(options.first);
    let width = signed(options.width);
    let mut pos = 0;

    loop {
        pos += escape_run_len(&text[pos..]);
        let c = text.get(pos).copied();

        if c.is_some_and(|b| !is_space(b)) {
            match mode {
                WrapMode::Utf8 => {
                    let decoded = decode_at(text, pos, None)?;
                    state.column += column_delta(code_point_width(decoded.code_point));
                    pos += decoded.len;
                }
                WrapMode::Raw => {
                    state.column += 1;
                    pos += 1;
                }
            }
            continue;
        }

        // At whitespace or the end of the text.
        if let Some(brk) = state.space.filter(|_| state.column > width) {
            pos = state.break_line(buf, text, brk, options.indent);
            continue;
        }

        let Some(c) = c else {
            if pos > state.bol {
                emit(buf, text, &mut state, pos);
            }
            return Ok(());
        };
        emit(buf, text, &mut state, pos);
        state.space = Some(pos);

        match c {
            b'\t' => state.column |= 0x07,
            b'\n' => {
                let next = pos + 1;
                state.space = Some(next);
                match text.get(next) {
                    Some(b'\n') => {
                        buf.push(b'\n');
                        pos = state.break_line(buf, text, next, options.indent);
                        continue;
                    }
                    Some(b) if b.is_ascii_alphanumeric() => buf.push(b' '),
                    _ => {
                        pos = state.break_line(buf, text, next, options.indent);
                        continue;
                    }
                }
            }
            _ => {}
        }
        state.column += 1;
        pos += 1;
    }
}

/// Copy the pending span of the current line, up to `pos`.
fn emit(buf: &mut Vec<u8>, text: &[u8], state: &mut WrapState, pos: usize) {
    let start = match state.space {
        Some(brk) => brk,
        None => {
            push_spaces(buf, state.indent);
            state.bol
        }
    };
    buf.extend_from_slice(&text[start..pos]);
}
