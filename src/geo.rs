//! Geodesy Primitives Module
//!
//! Validated geographic coordinates plus the great-circle bearing, distance,
//! and angle-normalization functions the direction finder is built on.
//! Distances use a spherical Earth of mean radius 6371.0 km, which stays
//! within about 0.5% of ellipsoidal results over qibla-scale distances.

use serde::Serialize;
use thiserror::Error;

// ===================== CONSTANTS =====================

/// Mean Earth radius in kilometers (spherical model)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ===================== COORDINATE TYPE =====================

/// Error returned when a coordinate is constructed from out-of-range values.
///
/// Construction is the single validation gate: every function taking a
/// [`GeoCoordinate`] assumes the bounds hold and never re-checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidCoordinate {
    /// Latitude outside [-90, 90] degrees (NaN included)
    #[error("latitude {0} is outside the valid range -90 to 90 degrees")]
    Latitude(f64),
    /// Longitude outside [-180, 180] degrees (NaN included)
    #[error("longitude {0} is outside the valid range -180 to 180 degrees")]
    Longitude(f64),
}

/// A validated geographic coordinate in decimal degrees.
///
/// Fields are private so the range invariant established by
/// [`GeoCoordinate::new`] cannot be bypassed; invalid input is rejected at
/// construction, never clamped. Immutable value type, cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, validating both bounds.
    ///
    /// # Arguments
    /// * `latitude` - Degrees north of the equator, -90 to 90
    /// * `longitude` - Degrees east of the prime meridian, -180 to 180
    ///
    /// # Errors
    /// Returns [`InvalidCoordinate`] if either value is out of range or NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Construct without validation. Only for compile-time constants whose
    /// values are already known to be in range (the Kaaba coordinate).
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in decimal degrees, guaranteed within [-90, 90].
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees, guaranteed within [-180, 180].
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

// ===================== ANGLE UTILITIES =====================

/// Normalize an angle in degrees to the half-open range [0, 360).
///
/// Works for any finite input, including negatives and values beyond one
/// full turn; `normalize_degrees(360.0)` is exactly 0.0.
pub fn normalize_degrees(x: f64) -> f64 {
    let r = x.rem_euclid(360.0);
    // rem_euclid of a tiny negative can round up to exactly 360.0
    if r == 360.0 { 0.0 } else { r }
}

/// Signed shortest rotation from `b` to `a`, in degrees within (-180, 180].
///
/// Positive means `a` lies clockwise of `b`. Antisymmetric
/// (`angular_difference(a, b) == -angular_difference(b, a)`) except when the
/// two angles are exactly 180° apart; both ways around are then equally
/// short and both argument orders return +180.
///
/// Intended for compass-needle deltas: stepping from 350° to 10° yields +20,
/// not -340, so an animated needle never swings the long way around.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    // f64 remainder is exact, so d is exactly sign-symmetric in (a, b)
    let d = (a - b) % 360.0;
    if d > 180.0 {
        d - 360.0
    } else if d <= -180.0 {
        d + 360.0
    } else {
        d
    }
}

// ===================== GREAT-CIRCLE FUNCTIONS =====================

/// Initial great-circle bearing from `from` to `to`, in degrees clockwise
/// from true north, [0, 360).
///
/// Uses the standard forward-azimuth formula
/// `atan2(sin Δλ·cos φ2, cos φ1·sin φ2 − sin φ1·cos φ2·cos Δλ)`.
/// The bearing is undefined for identical points; that case (exact equality
/// of both fields) returns 0.0 by convention.
///
/// # Arguments
/// * `from` - Observer position
/// * `to` - Target position
pub fn bearing(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    if from == to {
        return 0.0;
    }
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Great-circle distance between two points in kilometers, by the haversine
/// formula on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// The spherical approximation is good to about 0.5% of the ellipsoidal
/// distance, ample for pointing a compass. Identical points give exactly 0.
pub fn distance(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> GeoCoordinate {
        GeoCoordinate::new(40.7128, -74.0060).unwrap()
    }

    fn kaaba() -> GeoCoordinate {
        GeoCoordinate::new(21.422487, 39.826206).unwrap()
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        assert_eq!(GeoCoordinate::new(90.1, 0.0), Err(InvalidCoordinate::Latitude(90.1)));
        assert_eq!(GeoCoordinate::new(-91.0, 0.0), Err(InvalidCoordinate::Latitude(-91.0)));
        assert_eq!(GeoCoordinate::new(0.0, 180.5), Err(InvalidCoordinate::Longitude(180.5)));
        assert_eq!(GeoCoordinate::new(0.0, -200.0), Err(InvalidCoordinate::Longitude(-200.0)));
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::NAN).is_err());

        // Boundary values are valid, not clamped away
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_bearing_nyc_to_kaaba() {
        // Independent geodesic calculators give ≈ 58.5° for this pair
        let b = bearing(nyc(), kaaba());
        assert!((b - 58.5).abs() < 1.0, "NYC to Kaaba bearing should be ≈58.5°, got {}", b);
    }

    #[test]
    fn test_bearing_london_and_jakarta_to_kaaba() {
        let london = GeoCoordinate::new(51.5074, -0.1278).unwrap();
        let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();

        // Reference qibla bearings: ~119.0° (ESE) and ~295.2° (WNW)
        let b_london = bearing(london, kaaba());
        let b_jakarta = bearing(jakarta, kaaba());
        assert!((b_london - 119.0).abs() < 1.0, "London bearing {}", b_london);
        assert!((b_jakarta - 295.2).abs() < 1.0, "Jakarta bearing {}", b_jakarta);
    }

    #[test]
    fn test_bearing_not_naively_antisymmetric() {
        // On a sphere the return bearing differs from forward+180 by the
        // meridian convergence, ≈57° for the NYC/London pair
        let london = GeoCoordinate::new(51.5074, -0.1278).unwrap();
        let fwd = bearing(nyc(), london);
        let back = bearing(london, nyc());
        let naive_back = normalize_degrees(fwd + 180.0);
        assert!(
            (back - naive_back).abs() > 10.0,
            "expected strong meridian convergence, fwd={} back={} naive={}",
            fwd,
            back,
            naive_back
        );
    }

    #[test]
    fn test_bearing_special_cases_are_antisymmetric() {
        // Two points on the equator: the great circle is the equator itself
        let a = GeoCoordinate::new(0.0, 10.0).unwrap();
        let b = GeoCoordinate::new(0.0, 50.0).unwrap();
        assert!((bearing(a, b) - 90.0).abs() < 1e-9);
        assert!((bearing(b, a) - 270.0).abs() < 1e-9);

        // Same meridian: due north and due south
        let south = GeoCoordinate::new(10.0, 25.0).unwrap();
        let north = GeoCoordinate::new(60.0, 25.0).unwrap();
        assert!(bearing(south, north).abs() < 1e-9);
        assert!((bearing(north, south) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_self_is_zero() {
        assert_eq!(bearing(nyc(), nyc()), 0.0);
        assert_eq!(bearing(kaaba(), kaaba()), 0.0);
    }

    #[test]
    fn test_distance_nyc_to_kaaba() {
        // Haversine on R=6371 gives ≈10,306 km for this pair
        let d = distance(nyc(), kaaba());
        assert!((10_200.0..=10_400.0).contains(&d), "NYC to Kaaba distance {} km", d);
    }

    #[test]
    fn test_distance_one_longitude_degree_at_equator() {
        let a = GeoCoordinate::new(0.0, 0.0).unwrap();
        let b = GeoCoordinate::new(0.0, 1.0).unwrap();
        // 2π·6371/360 ≈ 111.19 km
        let d = distance(a, b);
        assert!((d - 111.19).abs() < 0.05, "got {}", d);
    }

    #[test]
    fn test_distance_symmetry_and_self() {
        let london = GeoCoordinate::new(51.5074, -0.1278).unwrap();
        assert_eq!(distance(nyc(), london), distance(london, nyc()));
        assert_eq!(distance(nyc(), nyc()), 0.0);
    }

    #[test]
    fn test_normalize_degrees_range_and_edges() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(361.5), 1.5);
        assert_eq!(normalize_degrees(-720.5), 359.5);

        // Tiny negatives must not escape as 360.0
        for x in [-1e-300, -1e-17, 1e9 + 0.25, -359.999_999_999] {
            let n = normalize_degrees(x);
            assert!((0.0..360.0).contains(&n), "normalize({}) = {} out of range", x, n);
        }
    }

    #[test]
    fn test_angular_difference_shortest_path() {
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
        assert_eq!(angular_difference(350.0, 10.0), -20.0);
        assert_eq!(angular_difference(0.0, 0.0), 0.0);
        assert_eq!(angular_difference(270.0, 90.0), 180.0);
        // Both orders of the exact opposite return +180 (documented tie)
        assert_eq!(angular_difference(90.0, 270.0), 180.0);
    }

    #[test]
    fn test_angular_difference_antisymmetry() {
        let pairs = [(0.0, 90.0), (33.3, 290.1), (359.0, 1.0), (123.4, 123.5), (58.49, 287.0)];
        for (a, b) in pairs {
            assert_eq!(
                angular_difference(a, b),
                -angular_difference(b, a),
                "antisymmetry failed for ({}, {})",
                a,
                b
            );
        }
    }
}
