// CLI API module - solution assembly for the command-line tool and library callers
use std::borrow::Cow;
use std::path::PathBuf;

use nalgebra::Vector2;
use serde::Serialize;

use crate::bearing::bearing_range;
use crate::elevation::{ElevationTable, InterpolationMode};
use crate::error::TargetingError;
use crate::grid_ref::GridReference;
use crate::parser::parse;

/// Solver settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    pub mode: InterpolationMode,
    /// CSV calibration table to use instead of the built-in one
    pub table_path: Option<PathBuf>,
}

/// Firing solution between two positions
///
/// `elevation_mils` is NaN (serialized as `null`) when `reachable` is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetingSolution {
    pub bearing_degrees: f64,
    pub distance_units: f64,
    pub reachable: bool,
    pub elevation_mils: f64,
}

impl TargetingSolution {
    /// Elevation when the target is in range
    pub fn elevation(&self) -> Option<f64> {
        self.reachable.then_some(self.elevation_mils)
    }
}

/// Computes firing solutions against one calibration table
#[derive(Debug, Clone)]
pub struct FiringSolver {
    table: Cow<'static, ElevationTable>,
    mode: InterpolationMode,
}

impl Default for FiringSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FiringSolver {
    /// Built-in table, spline interpolation
    pub fn new() -> Self {
        FiringSolver {
            table: Cow::Borrowed(ElevationTable::standard()),
            mode: InterpolationMode::Spline,
        }
    }

    pub fn with_table(table: ElevationTable, mode: InterpolationMode) -> Self {
        FiringSolver {
            table: Cow::Owned(table),
            mode,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Result<Self, TargetingError> {
        let solver = match &config.table_path {
            Some(path) => Self::with_table(ElevationTable::from_csv_path(path)?, config.mode),
            None => Self::new().with_mode(config.mode),
        };
        Ok(solver)
    }

    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn table(&self) -> &ElevationTable {
        &self.table
    }

    /// Parse both references and solve
    pub fn solve(&self, base: &str, target: &str) -> Result<TargetingSolution, TargetingError> {
        let base = parse(base)?;
        let target = parse(target)?;
        Ok(self.solve_refs(&base, &target))
    }

    pub fn solve_refs(&self, base: &GridReference, target: &GridReference) -> TargetingSolution {
        let solution = self.solve_positions(&base.position(), &target.position());
        if !solution.reachable {
            tracing::warn!(
                base = %base,
                target = %target,
                distance = solution.distance_units,
                "target outside calibrated range"
            );
        }
        solution
    }

    pub fn solve_positions(&self, from: &Vector2<f64>, to: &Vector2<f64>) -> TargetingSolution {
        let (bearing, distance) = bearing_range(from, to);
        let elevation = self.table.elevation(distance, self.mode);

        tracing::debug!(
            bearing,
            distance,
            reachable = elevation.reachable,
            mils = elevation.mils,
            mode = %self.mode,
            "assembled firing solution"
        );

        TargetingSolution {
            bearing_degrees: bearing,
            distance_units: distance,
            reachable: elevation.reachable,
            elevation_mils: elevation.mils,
        }
    }
}

/// Solve with the built-in table and spline interpolation
pub fn solve(base: &str, target: &str) -> Result<TargetingSolution, TargetingError> {
    FiringSolver::new().solve(base, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_same_cell() {
        let solution = solve("A1", "A1").unwrap();
        assert_eq!(solution.bearing_degrees, 0.0);
        assert_eq!(solution.distance_units, 0.0);
        assert!(!solution.reachable);
        assert_eq!(solution.elevation(), None);
    }

    #[test]
    fn test_solve_one_cell_east() {
        let solution = solve("A1", "B1").unwrap();
        assert!((solution.bearing_degrees - 90.0).abs() < 1e-10);
        assert!((solution.distance_units - 300.0).abs() < 1e-10);
        assert!(solution.reachable);
        assert_eq!(solution.elevation(), Some(1475.0));
    }

    #[test]
    fn test_solve_north() {
        // decreasing major moves toward bearing 0
        let solution = solve("C5", "C3").unwrap();
        assert!(solution.bearing_degrees.abs() < 1e-10);
        assert!((solution.distance_units - 600.0).abs() < 1e-10);
        assert_eq!(solution.elevation(), Some(1341.0));
    }

    #[test]
    fn test_solve_propagates_errors() {
        assert!(solve("1A", "A1").unwrap_err().is_parse());
        assert!(solve("A1", "AK5").unwrap_err().is_parse());
        assert!(solve("_1", "A1").unwrap_err().is_grid());
    }

    #[test]
    fn test_linear_mode_solver() {
        let solver = FiringSolver::new().with_mode(InterpolationMode::Linear);
        assert_eq!(solver.mode(), InterpolationMode::Linear);
        // A1K5 -> A1K6 is 100 units, A1K4 -> A1K6 is 200
        let solution = solver.solve("A1K4", "A1K6").unwrap();
        assert!((solution.distance_units - 200.0).abs() < 1e-10);
        assert_eq!(solution.elevation(), Some(1517.0));
    }

    #[test]
    fn test_custom_table_solver() {
        let table = ElevationTable::new(&[(0.0, 1600.0), (1000.0, 800.0)]).unwrap();
        let solver = FiringSolver::with_table(table, InterpolationMode::Spline);
        let solution = solver.solve("A1", "A1").unwrap();
        assert!(solution.reachable);
        assert_eq!(solution.elevation(), Some(1600.0));
        assert_eq!(solver.table().len(), 2);
    }

    #[test]
    fn test_from_default_config() {
        let solver = FiringSolver::from_config(&SolverConfig::default()).unwrap();
        assert_eq!(solver.mode(), InterpolationMode::Spline);
        assert_eq!(solver.table().len(), 25);
    }

    #[test]
    fn test_from_config_missing_table() {
        let config = SolverConfig {
            mode: InterpolationMode::Linear,
            table_path: Some(PathBuf::from("/nonexistent/calibration.csv")),
        };
        let err = FiringSolver::from_config(&config).unwrap_err();
        assert!(matches!(err, TargetingError::Table(_)));
    }

    #[test]
    fn test_solution_serializes_unreachable_as_null() {
        let solution = solve("A1", "Z1").unwrap();
        assert!(!solution.reachable);
        let json = serde_json::to_value(solution).unwrap();
        assert!(json["elevation_mils"].is_null());
        assert_eq!(json["reachable"], false);
    }
}
