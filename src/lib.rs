//! # Mortar Engine
//!
//! Firing solutions between map grid references: bearing, range and
//! barrel elevation from a calibration table.
//!
//! ```
//! use mortar_engine::solve;
//!
//! let solution = solve("A1", "B1").unwrap();
//! assert!((solution.bearing_degrees - 90.0).abs() < 1e-9);
//! assert!((solution.distance_units - 300.0).abs() < 1e-9);
//! assert_eq!(solution.elevation(), Some(1475.0));
//! ```

// Re-export the main types and functions
pub use bearing::{bearing, bearing_range, range};
pub use cli_api::{solve, FiringSolver, SolverConfig, TargetingSolution};
pub use constants::BASE_GRID;
pub use elevation::{elevation, CubicSpline, ElevationResult, ElevationTable, InterpolationMode};
pub use error::{GridError, ParseError, TableError, TargetingError};
pub use grid_ref::GridReference;
pub use parser::parse;
pub use vector::{resolve, resolve_parts};

// Module declarations
pub mod cli_api;
pub mod constants;
pub mod vector;
mod bearing;
mod elevation;
mod error;
mod grid_ref;
mod parser;
