/// Constants shared by grid resolution and the firing computation

/// Side length of one major grid cell, in distance units (metres on the map)
pub const BASE_GRID: f64 = 300.0;

/// Each keypad level splits a cell into this many parts per axis
pub const KEYPAD_DIVISIONS: u32 = 3;

/// Lowest and highest valid keypad digit
pub const KEYPAD_MIN: u8 = 1;
pub const KEYPAD_MAX: u8 = 9;

/// Separator between the major index and the keypad run
pub const KEYPAD_SEPARATOR: char = 'K';

/// Maximum number of digits in the major index
pub const MAJOR_MAX_DIGITS: usize = 2;

// Numerical stability constants
/// Minimum threshold for preventing division by zero in interpolation
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
