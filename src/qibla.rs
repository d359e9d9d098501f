//! Qibla Direction Service
//!
//! Combines the geodesy primitives with the geomagnetic model to answer the
//! question the crate exists for: from this position, on this date, which
//! way is the Kaaba, both relative to true north and as a reading on an
//! uncorrected magnetic compass.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compass::{self, CompassPoint};
use crate::geo::{self, GeoCoordinate};
use crate::geomag::MagneticModel;

// ===================== TARGET =====================

/// The Kaaba in Mecca, the fixed target of every qibla computation.
pub const KAABA: GeoCoordinate = GeoCoordinate::new_unchecked(21.422487, 39.826206);

// ===================== RESULT =====================

/// A complete qibla answer for one observer position and instant.
///
/// Built fresh by every [`QiblaFinder::compute`] call and never mutated;
/// when the location or time changes, request a new one.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QiblaResult {
    /// Great-circle bearing to the Kaaba, degrees from true north, [0, 360)
    pub direction: f64,
    /// Great-circle distance to the Kaaba in kilometers
    pub distance_km: f64,
    /// Magnetic declination at the observer, degrees, positive east
    pub declination_deg: f64,
    /// Total geomagnetic field strength at the observer, nanotesla
    pub field_strength_nt: f64,
    /// The instant the result was computed for
    pub observed_at: DateTime<Utc>,
    /// False when the date lies outside the model's calibrated window and
    /// the declination is a lower-confidence linear extrapolation
    pub within_model_validity: bool,
}

impl QiblaResult {
    /// The qibla as a reading on an uncorrected magnetic compass: the true
    /// bearing minus the local declination (see the compass module for the
    /// sign convention), [0, 360).
    pub fn magnetic_direction(&self) -> f64 {
        compass::to_magnetic_heading(self.direction, self.declination_deg)
    }

    /// Compass-rose label for the true direction.
    pub fn compass_point(&self) -> CompassPoint {
        CompassPoint::from_bearing(self.direction)
    }
}

// ===================== FINDER =====================

/// Qibla computation service over an injected, immutable magnetic model.
///
/// One instance per process is plenty; `compute` is pure and the model
/// table never changes at runtime, so the finder can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct QiblaFinder {
    model: MagneticModel,
}

impl QiblaFinder {
    pub fn new(model: MagneticModel) -> Self {
        Self { model }
    }

    /// The magnetic model this finder evaluates.
    pub fn model(&self) -> &MagneticModel {
        &self.model
    }

    /// Compute the qibla for an observer at an instant.
    ///
    /// Never fails: the coordinate was validated at construction, and a
    /// date outside the model window only clears `within_model_validity`.
    /// Identical inputs give bit-for-bit identical results.
    pub fn compute(&self, observer: GeoCoordinate, at: DateTime<Utc>) -> QiblaResult {
        let date = at.date_naive();
        let field = self.model.evaluate(observer, date);

        QiblaResult {
            direction: geo::bearing(observer, KAABA),
            distance_km: geo::distance(observer, KAABA),
            declination_deg: field.declination(),
            field_strength_nt: field.total_intensity(),
            observed_at: at,
            within_model_validity: self.model.is_within_validity(date),
        }
    }
}

impl Default for QiblaFinder {
    /// A finder over the built-in WMM2020 model.
    fn default() -> Self {
        Self::new(MagneticModel::wmm2020())
    }
}

// ===================== FORMATTING =====================

/// Format a bearing with its compass-rose label, like "58.5° ENE".
pub fn format_bearing(bearing: f64) -> String {
    format!("{:.1}° {}", bearing, CompassPoint::from_bearing(bearing))
}

/// Format a distance in kilometers with a precision that fits its size.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{:.1} km", km)
    } else {
        format!("{:.0} km", km)
    }
}

/// Format a declination with its east/west wording, like "12.9° W".
pub fn format_declination(declination: f64) -> String {
    if declination.abs() < 0.05 {
        "0.0° (magnetic north aligns with true north)".to_string()
    } else if declination > 0.0 {
        format!("{:.1}° E (magnetic north east of true north)", declination)
    } else {
        format!("{:.1}° W (magnetic north west of true north)", -declination)
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn finder() -> QiblaFinder {
        QiblaFinder::default()
    }

    fn nyc() -> GeoCoordinate {
        GeoCoordinate::new(40.7128, -74.0060).unwrap()
    }

    fn mid_2022() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_kaaba_constant_is_a_valid_coordinate() {
        assert!(GeoCoordinate::new(KAABA.latitude(), KAABA.longitude()).is_ok());
        assert_eq!(KAABA.latitude(), 21.422487);
        assert_eq!(KAABA.longitude(), 39.826206);
    }

    #[test]
    fn test_new_york_end_to_end() {
        let r = finder().compute(nyc(), mid_2022());

        assert!((58.0..=60.0).contains(&r.direction), "direction {}", r.direction);
        assert!((10_200.0..=10_400.0).contains(&r.distance_km), "distance {}", r.distance_km);
        assert!(
            (-14.0..=-11.0).contains(&r.declination_deg),
            "declination {}",
            r.declination_deg
        );
        assert!(
            (45_000.0..=58_000.0).contains(&r.field_strength_nt),
            "field {}",
            r.field_strength_nt
        );
        assert!(r.within_model_validity);
        assert_eq!(r.compass_point(), CompassPoint::ENE);

        // Western declination: the compass dial reads clockwise of true
        let mag = r.magnetic_direction();
        assert!(mag > r.direction, "magnetic {} vs true {}", mag, r.direction);
        assert!((69.0..=74.0).contains(&mag), "magnetic direction {}", mag);
    }

    #[test]
    fn test_standing_at_the_kaaba() {
        let r = finder().compute(KAABA, mid_2022());
        assert_eq!(r.distance_km, 0.0);
        assert_eq!(r.direction, 0.0);
        assert!(r.within_model_validity);
    }

    #[test]
    fn test_compute_bit_for_bit_idempotent() {
        let f = finder();
        let a = f.compute(nyc(), mid_2022());
        let b = f.compute(nyc(), mid_2022());
        assert_eq!(a.direction.to_bits(), b.direction.to_bits());
        assert_eq!(a.distance_km.to_bits(), b.distance_km.to_bits());
        assert_eq!(a.declination_deg.to_bits(), b.declination_deg.to_bits());
        assert_eq!(a.field_strength_nt.to_bits(), b.field_strength_nt.to_bits());
        assert_eq!(a.within_model_validity, b.within_model_validity);
    }

    #[test]
    fn test_magnetic_direction_round_trip() {
        let r = finder().compute(nyc(), mid_2022());
        let recovered = compass::correct_heading(r.magnetic_direction(), r.declination_deg);
        assert!(
            geo::angular_difference(recovered, r.direction).abs() < 1e-9,
            "recovered {} vs true {}",
            recovered,
            r.direction
        );
    }

    #[test]
    fn test_stale_date_flags_low_confidence() {
        let at = Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap();
        let r = finder().compute(nyc(), at);
        assert!(!r.within_model_validity);
        assert!(r.declination_deg.is_finite());
        assert!(r.direction.is_finite());
    }

    #[test]
    fn test_injected_model_is_used() {
        // A degree-1 model gives a different declination than the full one
        use crate::geomag::MagneticCoefficient;
        let dipole = MagneticModel::new(
            2020.0,
            5.0,
            vec![
                MagneticCoefficient::new(1, 0, -29404.5, 0.0, 0.0, 0.0),
                MagneticCoefficient::new(1, 1, -1450.7, 4652.9, 0.0, 0.0),
            ],
        );
        let a = QiblaFinder::new(dipole).compute(nyc(), mid_2022());
        let b = finder().compute(nyc(), mid_2022());
        assert_ne!(a.declination_deg, b.declination_deg);
        // Geometry is model-independent
        assert_eq!(a.direction, b.direction);
        assert_eq!(a.distance_km, b.distance_km);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_distance(0.4), "400 m");
        assert_eq!(format_distance(42.5), "42.5 km");
        assert_eq!(format_distance(10_306.4), "10306 km");
        assert_eq!(format_bearing(0.0), "0.0° N");
        assert_eq!(format_bearing(58.5), "58.5° ENE");
        assert_eq!(format_declination(-12.9), "12.9° W (magnetic north west of true north)");
        assert_eq!(format_declination(3.6), "3.6° E (magnetic north east of true north)");
    }
}
