//! Grid reference grammar
//!
//! `<letter><major: 1-2 digits>[K<keypad digits: 1+>]`
//!
//! The letter position accepts any word character; whether it names a real
//! column is decided by `GridReference::new`. Zeros inside the keypad run
//! are skipped rather than rejected, so `A1K05` is the same as `A1K5`.

use crate::constants::{KEYPAD_SEPARATOR, MAJOR_MAX_DIGITS};
use crate::error::{ParseError, TargetingError};
use crate::grid_ref::GridReference;

/// Parse and validate a grid reference
pub fn parse(text: &str) -> Result<GridReference, TargetingError> {
    let (letter, major, keypads) = split(text)?;
    let grid = GridReference::new(letter, major, keypads)?;
    tracing::trace!(input = text, grid = %grid, "parsed grid reference");
    Ok(grid)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Break the text into its raw parts without range validation
fn split(text: &str) -> Result<(char, u32, Vec<u8>), ParseError> {
    let mut chars = text.chars();

    let letter = match chars.next() {
        Some(c) if is_word_char(c) => c,
        Some(_) => return Err(ParseError::new(text, "expected a grid letter")),
        None => return Err(ParseError::new(text, "empty grid reference")),
    };

    let rest = chars.as_str();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (major_digits, rest) = rest.split_at(digits_end);

    if major_digits.is_empty() {
        return Err(ParseError::new(text, "missing major index"));
    }
    if major_digits.len() > MAJOR_MAX_DIGITS {
        return Err(ParseError::new(text, "major index has more than 2 digits"));
    }
    let major = major_digits
        .parse::<u32>()
        .map_err(|_| ParseError::new(text, "invalid major index"))?;

    if rest.is_empty() {
        return Ok((letter, major, Vec::new()));
    }

    let keypad_digits = match rest.strip_prefix(KEYPAD_SEPARATOR) {
        Some(digits) => digits,
        None => return Err(ParseError::new(text, "expected `K` after the major index")),
    };
    if keypad_digits.is_empty() {
        return Err(ParseError::new(text, "`K` must be followed by keypad digits"));
    }
    if !keypad_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(text, "keypads must be decimal digits"));
    }

    let keypads = keypad_digits
        .bytes()
        .filter(|&b| b != b'0')
        .map(|b| b - b'0')
        .collect();

    Ok((letter, major, keypads))
}
