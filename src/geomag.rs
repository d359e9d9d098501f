//! Spherical Harmonic Geomagnetic Model
//!
//! Evaluates Earth's magnetic field at a coordinate and date from a
//! truncated spherical-harmonic expansion with linear secular variation,
//! the algorithm behind NOAA's World Magnetic Model series. The declination
//! derived here is what turns a raw magnetic compass heading into a true
//! bearing.
//!
//! References:
//! - Chulliat, A. et al. (2020). "The US/UK World Magnetic Model for
//!   2020-2025". NOAA NCEI / British Geological Survey technical report
//! - Langel, R. A. (1987). "Main field". In Geomagnetism, Vol. 1,
//!   Academic Press

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

use crate::geo::GeoCoordinate;

// ===================== CONSTANTS =====================

/// Geomagnetic reference sphere radius in kilometers, the `a` of the
/// harmonic expansion (not the WGS84 equatorial radius)
pub const GEOMAGNETIC_RADIUS_KM: f64 = 6371.2;

/// WGS84 semi-major axis (equatorial radius) in kilometers
const WGS84_A_KM: f64 = 6378.137;

/// WGS84 semi-minor axis (polar radius) in kilometers
const WGS84_B_KM: f64 = 6356.752_314_245;

/// Latitudes closer to a pole than this are nudged toward the equator
/// before evaluation so the east-component 1/sin(colatitude) term stays
/// finite
const POLE_LATITUDE_LIMIT: f64 = 89.999_999;

// ===================== DECIMAL YEAR =====================

/// Convert a calendar date to a decimal year, leap-year aware.
///
/// The fraction is elapsed days over days in that year, so July 2 of a leap
/// year lands exactly on the half year: `decimal_year(2020-07-02) == 2020.5`.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    f64::from(date.year()) + f64::from(date.ordinal() - 1) / days_in_year
}

// ===================== MODEL DATA =====================

/// One Gauss coefficient of the expansion together with its linear secular
/// variation rate.
///
/// `g` and `h` are in nanotesla at the model epoch; `g_dot` and `h_dot` in
/// nanotesla per year. Order 0 terms have `h == h_dot == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticCoefficient {
    /// Harmonic degree n, 1 or greater
    pub degree: u32,
    /// Harmonic order m, 0 through n
    pub order: u32,
    pub g: f64,
    pub h: f64,
    pub g_dot: f64,
    pub h_dot: f64,
}

impl MagneticCoefficient {
    /// Const constructor so coefficient tables can live in `const` arrays.
    pub const fn new(degree: u32, order: u32, g: f64, h: f64, g_dot: f64, h_dot: f64) -> Self {
        Self { degree, order, g, h, g_dot, h_dot }
    }
}

/// Magnetic field vector in the local geodetic tangent plane, nanotesla.
///
/// Axes: `north` toward true (geographic) north, `east` toward geographic
/// east, `down` toward Earth's center.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MagneticFieldVector {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}

impl MagneticFieldVector {
    /// Declination in degrees: the angle from true north to magnetic north,
    /// positive when magnetic north lies east of true north, [-180, 180].
    pub fn declination(&self) -> f64 {
        self.east.atan2(self.north).to_degrees()
    }

    /// Inclination (dip) in degrees: the angle of the field below the
    /// horizontal plane, positive downward, [-90, 90].
    pub fn inclination(&self) -> f64 {
        self.down.atan2(self.horizontal_intensity()).to_degrees()
    }

    /// Horizontal field intensity H in nanotesla.
    pub fn horizontal_intensity(&self) -> f64 {
        self.north.hypot(self.east)
    }

    /// Total field intensity F in nanotesla.
    pub fn total_intensity(&self) -> f64 {
        (self.north * self.north + self.east * self.east + self.down * self.down).sqrt()
    }
}

// ===================== MODEL =====================

/// An immutable spherical-harmonic geomagnetic model.
///
/// Construct once and share freely; evaluation only reads the coefficient
/// table, so one instance can serve any number of threads. A newer model
/// release is a new instance, never an in-place update.
#[derive(Debug, Clone)]
pub struct MagneticModel {
    epoch: f64,
    validity_years: f64,
    coefficients: Vec<MagneticCoefficient>,
    max_degree: u32,
}

impl MagneticModel {
    /// Build a model from an epoch (decimal year), a validity window in
    /// years, and a Gauss coefficient table covering degrees 1 through N.
    pub fn new(epoch: f64, validity_years: f64, coefficients: Vec<MagneticCoefficient>) -> Self {
        debug_assert!(
            coefficients.iter().all(|c| c.degree >= 1 && c.order <= c.degree),
            "coefficient table must satisfy n >= 1 and 0 <= m <= n"
        );
        let max_degree = coefficients.iter().map(|c| c.degree).max().unwrap_or(0);
        Self { epoch, validity_years, coefficients, max_degree }
    }

    /// The built-in WMM2020 model: epoch 2020.0, degree 12, 5-year window.
    pub fn wmm2020() -> Self {
        Self::new(
            crate::wmm2020::EPOCH,
            crate::wmm2020::VALIDITY_YEARS,
            crate::wmm2020::coefficients(),
        )
    }

    /// Reference epoch as a decimal year.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Length of the calibrated validity window in years.
    pub fn validity_years(&self) -> f64 {
        self.validity_years
    }

    /// Highest harmonic degree present in the coefficient table.
    pub fn max_degree(&self) -> u32 {
        self.max_degree
    }

    /// True when `date` falls inside the calibrated window, epoch through
    /// epoch + validity in decimal years, both ends inclusive.
    ///
    /// Outside the window evaluation still works by linear extrapolation
    /// with growing error; callers should surface a low-confidence hint
    /// rather than fail.
    pub fn is_within_validity(&self, date: NaiveDate) -> bool {
        let t = decimal_year(date);
        t >= self.epoch && t <= self.epoch + self.validity_years
    }

    /// Evaluate the field at a coordinate and date, at sea level.
    ///
    /// The pipeline: interpolate each coefficient linearly to the date's
    /// decimal year, convert the geodetic coordinate to geocentric latitude
    /// and radius on the WGS84 ellipsoid, run the Schmidt semi-normalized
    /// Legendre recurrence at the geocentric colatitude, accumulate the
    /// harmonic series term by term, and rotate the result back into the
    /// local geodetic north/east/down frame.
    ///
    /// Pure: identical inputs give bit-for-bit identical output.
    pub fn evaluate(&self, at: GeoCoordinate, date: NaiveDate) -> MagneticFieldVector {
        let dt = decimal_year(date) - self.epoch;

        let lat_deg = at.latitude().clamp(-POLE_LATITUDE_LIMIT, POLE_LATITUDE_LIMIT);
        let lon_rad = at.longitude().to_radians();
        let (gc_lat_rad, radius_km) = geodetic_to_geocentric(lat_deg);
        let colat_rad = FRAC_PI_2 - gc_lat_rad;

        let n_max = self.max_degree as usize;
        let legendre = SchmidtLegendre::new(n_max, colat_rad);

        // (a/r)^(n+2) radial attenuation, indexed by the power
        let ratio = GEOMAGNETIC_RADIUS_KM / radius_km;
        let mut radial = vec![1.0; n_max + 3];
        for k in 1..radial.len() {
            radial[k] = radial[k - 1] * ratio;
        }

        // Longitude harmonics cos(mλ) and sin(mλ)
        let mut cos_mlon = Vec::with_capacity(n_max + 1);
        let mut sin_mlon = Vec::with_capacity(n_max + 1);
        for m in 0..=n_max {
            let ml = m as f64 * lon_rad;
            cos_mlon.push(ml.cos());
            sin_mlon.push(ml.sin());
        }

        let inv_sin_colat = 1.0 / colat_rad.sin();

        // Accumulate in geocentric axes: bx toward geographic north, by
        // east, bz down toward Earth's center
        let mut bx = 0.0;
        let mut by = 0.0;
        let mut bz = 0.0;
        for c in &self.coefficients {
            let n = c.degree as usize;
            let m = c.order as usize;
            let g = c.g + c.g_dot * dt;
            let h = c.h + c.h_dot * dt;
            let ar = radial[n + 2];
            let along = g * cos_mlon[m] + h * sin_mlon[m];

            bx += ar * along * legendre.dp(n, m);
            by += ar * (m as f64) * (g * sin_mlon[m] - h * cos_mlon[m])
                * legendre.p(n, m)
                * inv_sin_colat;
            bz -= ar * ((n + 1) as f64) * along * legendre.p(n, m);
        }

        // Rotate (north, down) through the angle between geodetic and
        // geocentric latitude; east needs no correction
        let psi = lat_deg.to_radians() - gc_lat_rad;
        MagneticFieldVector {
            north: bx * psi.cos() + bz * psi.sin(),
            east: by,
            down: -bx * psi.sin() + bz * psi.cos(),
        }
    }

    /// Magnetic declination at a coordinate and date, degrees in
    /// [-180, 180], positive east.
    pub fn declination(&self, at: GeoCoordinate, date: NaiveDate) -> f64 {
        self.evaluate(at, date).declination()
    }

    /// Total field strength at a coordinate and date, nanotesla.
    pub fn field_strength(&self, at: GeoCoordinate, date: NaiveDate) -> f64 {
        self.evaluate(at, date).total_intensity()
    }
}

/// Convert a geodetic latitude in degrees, at sea level, to geocentric
/// latitude in radians and geocentric radius in kilometers on the WGS84
/// ellipsoid.
fn geodetic_to_geocentric(lat_deg: f64) -> (f64, f64) {
    let phi = lat_deg.to_radians();
    let cos = phi.cos();
    let sin = phi.sin();
    let a2 = WGS84_A_KM * WGS84_A_KM;
    let b2 = WGS84_B_KM * WGS84_B_KM;

    let gc_lat = (phi.tan() * b2 / a2).atan();
    let radius = ((a2 * a2 * cos * cos + b2 * b2 * sin * sin)
        / (a2 * cos * cos + b2 * sin * sin))
        .sqrt();
    (gc_lat, radius)
}

// ===================== LEGENDRE RECURRENCE =====================

/// Schmidt semi-normalized associated Legendre functions P̄(n,m) and their
/// derivatives with respect to colatitude, for all n, m up to a maximum
/// degree.
///
/// Built in two stages: the general three-term recurrence on Gauss
/// quasi-normalized values, then a scale to the Schmidt convention. The
/// recurrence is closed over n and m, so any truncation degree works
/// without per-degree code.
struct SchmidtLegendre {
    p: Vec<Vec<f64>>,
    dp: Vec<Vec<f64>>,
}

impl SchmidtLegendre {
    fn new(max_degree: usize, colat_rad: f64) -> Self {
        let cos = colat_rad.cos();
        let sin = colat_rad.sin();

        let mut p: Vec<Vec<f64>> = Vec::with_capacity(max_degree + 1);
        let mut dp: Vec<Vec<f64>> = Vec::with_capacity(max_degree + 1);
        p.push(vec![1.0]);
        dp.push(vec![0.0]);

        for n in 1..=max_degree {
            let mut p_row = vec![0.0; n + 1];
            let mut dp_row = vec![0.0; n + 1];
            for m in 0..=n {
                if m == n {
                    // Diagonal raises degree and order together
                    p_row[m] = sin * p[n - 1][m - 1];
                    dp_row[m] = sin * dp[n - 1][m - 1] + cos * p[n - 1][m - 1];
                } else if n == 1 || m == n - 1 {
                    // Two-term recurrence just below the diagonal
                    p_row[m] = cos * p[n - 1][m];
                    dp_row[m] = cos * dp[n - 1][m] - sin * p[n - 1][m];
                } else {
                    let k = (((n - 1) * (n - 1) - m * m) as f64)
                        / (((2 * n - 1) * (2 * n - 3)) as f64);
                    p_row[m] = cos * p[n - 1][m] - k * p[n - 2][m];
                    dp_row[m] = cos * dp[n - 1][m] - sin * p[n - 1][m] - k * dp[n - 2][m];
                }
            }
            p.push(p_row);
            dp.push(dp_row);
        }

        // Scale from quasi-normalized to Schmidt semi-normalized
        let factors = schmidt_factors(max_degree);
        for n in 0..=max_degree {
            for m in 0..=n {
                p[n][m] *= factors[n][m];
                dp[n][m] *= factors[n][m];
            }
        }

        Self { p, dp }
    }

    /// P̄(n,m) at the colatitude the table was built for.
    fn p(&self, n: usize, m: usize) -> f64 {
        self.p[n][m]
    }

    /// dP̄(n,m)/dθ at the colatitude the table was built for.
    fn dp(&self, n: usize, m: usize) -> f64 {
        self.dp[n][m]
    }
}

/// Factors relating the recurrence-friendly quasi-normalized functions to
/// the Schmidt semi-normalized convention used by published Gauss
/// coefficients.
fn schmidt_factors(max_degree: usize) -> Vec<Vec<f64>> {
    let mut s: Vec<Vec<f64>> = Vec::with_capacity(max_degree + 1);
    s.push(vec![1.0]);
    for n in 1..=max_degree {
        let mut row = vec![0.0; n + 1];
        row[0] = s[n - 1][0] * ((2 * n - 1) as f64) / (n as f64);
        for m in 1..=n {
            let twofold = if m == 1 { 2.0 } else { 1.0 };
            row[m] = row[m - 1] * (((n - m + 1) as f64 * twofold) / ((n + m) as f64)).sqrt();
        }
        s.push(row);
    }
    s
}

// ===================== TESTS =====================
