//! Range to elevation lookup from a calibration table.
//!
//! The built-in table maps firing distance to barrel elevation in mils at
//! 50-unit steps from 50 to 1250. Between knots the elevation comes from a
//! natural cubic spline through every point (or straight segments in
//! linear mode). Distances outside the table are not extrapolated.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::constants::MIN_DIVISION_THRESHOLD;
use crate::error::TableError;

/// Built-in calibration: (distance, mils)
const CALIBRATION_DATA: [(f64, f64); 25] = [
    (50.0, 1579.0),
    (100.0, 1558.0),
    (150.0, 1538.0),
    (200.0, 1517.0),
    (250.0, 1496.0),
    (300.0, 1475.0),
    (350.0, 1453.0),
    (400.0, 1431.0),
    (450.0, 1409.0),
    (500.0, 1387.0),
    (550.0, 1364.0),
    (600.0, 1341.0),
    (650.0, 1317.0),
    (700.0, 1292.0),
    (750.0, 1267.0),
    (800.0, 1240.0),
    (850.0, 1212.0),
    (900.0, 1183.0),
    (950.0, 1152.0),
    (1000.0, 1118.0),
    (1050.0, 1081.0),
    (1100.0, 1039.0),
    (1150.0, 988.0),
    (1200.0, 918.0),
    (1250.0, 800.0),
];

/// Built-in table, fitted once per process
static DEFAULT_TABLE: Lazy<ElevationTable> = Lazy::new(|| {
    let (distances, mils): (Vec<f64>, Vec<f64>) = CALIBRATION_DATA.iter().copied().unzip();
    let spline = CubicSpline::fit(&distances, &mils);
    ElevationTable {
        distances,
        mils,
        spline,
    }
});

/// How to fill in elevation between calibration points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Spline,
    Linear,
}

impl InterpolationMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spline" | "cubic" => Some(InterpolationMode::Spline),
            "linear" => Some(InterpolationMode::Linear),
            _ => None,
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationMode::Spline => write!(f, "spline"),
            InterpolationMode::Linear => write!(f, "linear"),
        }
    }
}

/// Result of an elevation lookup
///
/// `mils` is NaN when the distance is not reachable; check `reachable` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationResult {
    pub reachable: bool,
    pub mils: f64,
}

impl ElevationResult {
    fn unreachable() -> Self {
        ElevationResult {
            reachable: false,
            mils: f64::NAN,
        }
    }

    /// Elevation only when the distance was reachable
    pub fn mils(&self) -> Option<f64> {
        self.reachable.then_some(self.mils)
    }
}

/// Natural cubic spline through a set of knots.
///
/// Second derivative is zero at both ends; the curve is C2 across every
/// interior knot.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural spline through (`x`, `y`).
    ///
    /// `x` must be finite and strictly increasing with at least two points,
    /// and `y` finite and of the same length.
    pub fn natural(x: &[f64], y: &[f64]) -> Result<Self, TableError> {
        check_knots(x, y)?;
        Ok(Self::fit(x, y))
    }

    /// Fit without checking; callers pass knots that satisfy `check_knots`
    fn fit(x: &[f64], y: &[f64]) -> Self {
        let n = x.len();
        let mut m = vec![0.0; n];

        if n > 2 {
            // Tridiagonal system for the interior second derivatives,
            // solved with the Thomas algorithm.
            let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
            let size = n - 2;
            let mut diag = vec![0.0; size];
            let mut upper = vec![0.0; size];
            let mut rhs = vec![0.0; size];

            for i in 0..size {
                let k = i + 1;
                diag[i] = 2.0 * (h[k - 1] + h[k]);
                upper[i] = h[k];
                rhs[i] = 6.0 * ((y[k + 1] - y[k]) / h[k] - (y[k] - y[k - 1]) / h[k - 1]);
            }

            // forward sweep; lower[i] == h[i] for row i
            for i in 1..size {
                let w = h[i] / diag[i - 1];
                diag[i] -= w * upper[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }

            m[size] = rhs[size - 1] / diag[size - 1];
            for i in (0..size - 1).rev() {
                m[i + 1] = (rhs[i] - upper[i] * m[i + 2]) / diag[i];
            }
        }

        CubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        }
    }

    /// Index of the segment `[x[i], x[i+1]]` used for `t`
    fn segment(&self, t: f64) -> usize {
        let n = self.x.len();
        self.x
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(n - 2)
    }

    /// Evaluate the spline. Knots return their tabulated value exactly;
    /// outside the knot range the end cubics are extended.
    pub fn evaluate(&self, t: f64) -> f64 {
        if let Ok(i) = self.x.binary_search_by(|k| k.total_cmp(&t)) {
            return self.y[i];
        }

        let i = self.segment(t);
        let h = self.x[i + 1] - self.x[i];
        if h.abs() < MIN_DIVISION_THRESHOLD {
            return self.y[i];
        }
        let a = self.x[i + 1] - t;
        let b = t - self.x[i];

        self.m[i] * a * a * a / (6.0 * h)
            + self.m[i + 1] * b * b * b / (6.0 * h)
            + (self.y[i] / h - self.m[i] * h / 6.0) * a
            + (self.y[i + 1] / h - self.m[i + 1] * h / 6.0) * b
    }

    /// First derivative of the spline at `t`
    pub fn derivative(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let h = self.x[i + 1] - self.x[i];
        let a = self.x[i + 1] - t;
        let b = t - self.x[i];

        -self.m[i] * a * a / (2.0 * h) + self.m[i + 1] * b * b / (2.0 * h)
            + (self.y[i + 1] - self.y[i]) / h
            - (self.m[i + 1] - self.m[i]) * h / 6.0
    }

    /// Second derivative at each knot
    pub fn knot_curvature(&self) -> &[f64] {
        &self.m
    }
}

/// Knot layout every spline and table must satisfy
fn check_knots(x: &[f64], y: &[f64]) -> Result<(), TableError> {
    if x.len() != y.len() {
        return Err(TableError::LengthMismatch {
            distances: x.len(),
            mils: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(TableError::TooFewPoints(x.len()));
    }
    for row in 0..x.len() {
        if !x[row].is_finite() || !y[row].is_finite() {
            return Err(TableError::NonFinite { row });
        }
        if row > 0 && x[row] <= x[row - 1] {
            return Err(TableError::NotIncreasing { row });
        }
    }
    Ok(())
}

/// Calibration table with a fitted spline
#[derive(Debug, Clone)]
pub struct ElevationTable {
    distances: Vec<f64>,
    mils: Vec<f64>,
    spline: CubicSpline,
}

impl ElevationTable {
    /// The built-in calibration table
    pub fn standard() -> &'static ElevationTable {
        &DEFAULT_TABLE
    }

    /// Build a table from (distance, mils) points.
    ///
    /// Distances must be finite and strictly increasing, at least two points.
    pub fn new(points: &[(f64, f64)]) -> Result<Self, TableError> {
        let (distances, mils): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let spline = CubicSpline::natural(&distances, &mils)?;
        Ok(ElevationTable {
            distances,
            mils,
            spline,
        })
    }

    /// Load `distance,mils` records (with a header row) from CSV
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // a numeric first row means the header is missing and would eat a point
        let headers = csv_reader.headers()?;
        if !headers.is_empty() && headers.iter().all(|field| field.parse::<f64>().is_ok()) {
            return Err(TableError::MissingHeader);
        }

        let mut points = Vec::new();
        for record in csv_reader.deserialize::<(f64, f64)>() {
            points.push(record?);
        }
        Self::new(&points)
    }

    /// Load a calibration table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_csv_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            points = table.len(),
            min = table.min_distance(),
            max = table.max_distance(),
            "loaded calibration table"
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn min_distance(&self) -> f64 {
        self.distances[0]
    }

    pub fn max_distance(&self) -> f64 {
        self.distances[self.distances.len() - 1]
    }

    /// Tabulated (distance, mils) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.distances.iter().copied().zip(self.mils.iter().copied())
    }

    /// True iff the distance lies inside the calibrated band, ends included
    pub fn is_reachable(&self, distance: f64) -> bool {
        (self.min_distance()..=self.max_distance()).contains(&distance)
    }

    /// Linear interpolation between the two knots around `distance`
    pub fn linear_interpolate(&self, distance: f64) -> f64 {
        let n = self.distances.len();
        let idx = self
            .distances
            .partition_point(|&d| d <= distance)
            .saturating_sub(1)
            .min(n - 2);

        let x0 = self.distances[idx];
        let x1 = self.distances[idx + 1];
        let y0 = self.mils[idx];
        let y1 = self.mils[idx + 1];

        if (x1 - x0).abs() < MIN_DIVISION_THRESHOLD {
            return y0;
        }

        let t = (distance - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }

    pub fn spline(&self) -> &CubicSpline {
        &self.spline
    }

    /// Elevation needed to reach `distance`
    pub fn elevation(&self, distance: f64, mode: InterpolationMode) -> ElevationResult {
        if !self.is_reachable(distance) {
            return ElevationResult::unreachable();
        }

        let mils = match mode {
            InterpolationMode::Spline => self.spline.evaluate(distance),
            InterpolationMode::Linear => self.linear_interpolate(distance),
        };
        ElevationResult {
            reachable: true,
            mils,
        }
    }
}

/// Spline elevation from the built-in calibration table
pub fn elevation(distance: f64) -> ElevationResult {
    DEFAULT_TABLE.elevation(distance, InterpolationMode::Spline)
}
