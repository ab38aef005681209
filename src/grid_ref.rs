//! Grid reference entity
//!
//! A reference is an immutable identity (letter, major cell, keypad run).
//! Its position is derived from that identity and memoized on first read.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use nalgebra::Vector2;
use once_cell::sync::OnceCell;

use crate::constants::{BASE_GRID, KEYPAD_DIVISIONS, KEYPAD_MAX, KEYPAD_MIN, KEYPAD_SEPARATOR};
use crate::error::{GridError, TargetingError};
use crate::vector;

#[derive(Debug, Clone)]
pub struct GridReference {
    letter: char,
    major: u32,
    keypads: Vec<u8>,
    /// Filled once, from the identity above; never observable except as a value
    position: OnceCell<Vector2<f64>>,
}

impl GridReference {
    /// Build a reference from its parts.
    ///
    /// The letter is normalized to uppercase. Fails if the letter is not A-Z
    /// or any keypad is outside 1-9; no instance exists on failure.
    pub fn new(letter: char, major: u32, keypads: Vec<u8>) -> Result<Self, GridError> {
        let upper = letter.to_ascii_uppercase();
        if vector::letter_index(upper).is_none() {
            return Err(GridError::LetterOutOfRange { letter });
        }
        if let Some(&value) = keypads
            .iter()
            .find(|&&k| !(KEYPAD_MIN..=KEYPAD_MAX).contains(&k))
        {
            return Err(GridError::KeypadOutOfRange { value });
        }

        Ok(GridReference {
            letter: upper,
            major,
            keypads,
            position: OnceCell::new(),
        })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Column number of the letter, `A` = 1
    pub fn letter_index(&self) -> u32 {
        // validated in `new`
        self.letter as u32 - 'A' as u32 + 1
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn keypads(&self) -> &[u8] {
        &self.keypads
    }

    /// Number of keypad subdivisions
    pub fn depth(&self) -> usize {
        self.keypads.len()
    }

    /// Side length of the smallest cell this reference pins down
    pub fn cell_size(&self) -> f64 {
        BASE_GRID / f64::from(KEYPAD_DIVISIONS).powi(self.depth() as i32)
    }

    /// Planar position of the reference, computed at most once per instance
    pub fn position(&self) -> Vector2<f64> {
        *self.position.get_or_init(|| {
            let pos = vector::resolve_parts(self.letter_index(), self.major, &self.keypads);
            tracing::trace!(grid = %self, x = pos.x, y = pos.y, "resolved grid reference");
            pos
        })
    }
}

impl PartialEq for GridReference {
    fn eq(&self, other: &Self) -> bool {
        self.letter == other.letter && self.major == other.major && self.keypads == other.keypads
    }
}

impl Eq for GridReference {}

impl Hash for GridReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.letter.hash(state);
        self.major.hash(state);
        self.keypads.hash(state);
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.major)?;
        if !self.keypads.is_empty() {
            write!(f, "{KEYPAD_SEPARATOR}")?;
            for kp in &self.keypads {
                write!(f, "{kp}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for GridReference {
    type Err = TargetingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}
