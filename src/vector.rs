//! Resolution of a grid reference to a planar position.
//!
//! A major cell is `BASE_GRID` units square. Each keypad level splits the
//! current cell into a 3x3 block laid out like a phone keypad:
//!
//! ```text
//!   1 2 3     (-1,+1) (0,+1) (+1,+1)
//!   4 5 6  -> (-1, 0) (0, 0) (+1, 0)
//!   7 8 9     (-1,-1) (0,-1) (+1,-1)
//! ```
//!
//! and moves the point by that offset times `BASE_GRID / 3^(level+1)`.

use nalgebra::Vector2;

use crate::constants::{BASE_GRID, KEYPAD_DIVISIONS};
use crate::grid_ref::GridReference;

/// 1-based column index of an uppercase letter (`A` = 1 ... `Z` = 26)
pub fn letter_index(letter: char) -> Option<u32> {
    if letter.is_ascii_uppercase() {
        Some(letter as u32 - 'A' as u32 + 1)
    } else {
        None
    }
}

/// Unit offset of a keypad digit within its parent cell
pub fn keypad_offset(kp: u8) -> Vector2<f64> {
    let k = i32::from(kp) - 1;
    let dx = k.rem_euclid(3) - 1;
    let dy = 1 - k.div_euclid(3);
    Vector2::new(f64::from(dx), f64::from(dy))
}

/// Centre of the major cell at (`letter_index`, `major`)
pub fn cell_centre(letter_index: u32, major: u32) -> Vector2<f64> {
    Vector2::new(f64::from(letter_index) - 0.5, f64::from(major) - 0.5) * BASE_GRID
}

/// Position of a grid reference, computed afresh from its identity
pub fn resolve(grid: &GridReference) -> Vector2<f64> {
    resolve_parts(grid.letter_index(), grid.major(), grid.keypads())
}

/// Position from raw parts.
///
/// Callers guarantee every keypad is in 1-9; the function is total over
/// such input and deterministic.
pub fn resolve_parts(letter_index: u32, major: u32, keypads: &[u8]) -> Vector2<f64> {
    let divisions = f64::from(KEYPAD_DIVISIONS);
    keypads
        .iter()
        .enumerate()
        .fold(cell_centre(letter_index, major), |pos, (level, &kp)| {
            let scale = BASE_GRID / divisions.powi(level as i32 + 1);
            pos + keypad_offset(kp) * scale
        })
}
