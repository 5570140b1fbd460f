#![forbid(unsafe_code)]

//! Display-mode escape sequences.
//!
//! Only the SGR form `ESC [ <digits and ;> m` is recognized. Width
//! computations step over these sequences without counting them, and every
//! operation that copies text copies them verbatim.
//!
//! | Input | Length |
//! |-------|--------|
//! | `ESC [ m` | 3 |
//! | `ESC [ 1 ; 31 m` | 7 |
//! | `ESC [ 2 J` | 0 (not SGR) |
//! | `ESC ] 8 ; ; url` | 0 |

/// The escape byte that opens every sequence.
pub const ESC: u8 = 0x1b;

/// Length in bytes of the SGR sequence at the start of `bytes`, or 0.
///
/// Any deviation from `ESC [ [0-9;]* m` yields 0, including a sequence cut
/// off by the end of the slice.
#[inline]
#[must_use]
pub fn escape_sequence_len(bytes: &[u8]) -> usize {
    let [ESC, b'[', params @ ..] = bytes else {
        return 0;
    };
    let digits = params
        .iter()
        .take_while(|&&b| b.is_ascii_digit() || b == b';')
        .count();
    match params.get(digits) {
        Some(b'm') => digits + 3,
        _ => 0,
    }
}

/// Total length of the run of back-to-back SGR sequences at the start of
/// `bytes`.
#[inline]
#[must_use]
pub fn escape_run_len(bytes: &[u8]) -> usize {
    let mut pos = 0;
    loop {
        match escape_sequence_len(&bytes[pos..]) {
            0 => return pos,
            n => pos += n,
        }
    }
}
