//! Compass Rose and Heading Correction Module
//!
//! The 16-point compass rose used for labeling bearings, and the pure
//! declination corrections applied to raw compass headings.
//!
//! Sign convention, used consistently across this crate: positive
//! declination means magnetic north lies east of true north. Converting a
//! magnetic heading to a true heading therefore adds the declination;
//! converting a true heading to a magnetic one subtracts it.

use serde::Serialize;
use std::fmt;

use crate::geo::normalize_degrees;

// ===================== COMPASS ROSE =====================

/// One of the 16 points of the compass rose, 22.5° apart starting at north.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// All 16 points in clockwise order from north.
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    /// Map a bearing in degrees to the nearest compass point.
    ///
    /// Sector boundaries fall on odd multiples of 11.25°; a bearing exactly
    /// on a boundary belongs to the clockwise-higher point, so 348.75°
    /// already wraps around to N.
    pub fn from_bearing(bearing: f64) -> Self {
        let index = (normalize_degrees(bearing) / 22.5).round() as usize % 16;
        Self::ALL[index]
    }

    /// Short label like "NNE".
    pub fn abbreviation(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }

    /// Spelled-out name like "north-northeast".
    pub fn name(self) -> &'static str {
        match self {
            CompassPoint::N => "north",
            CompassPoint::NNE => "north-northeast",
            CompassPoint::NE => "northeast",
            CompassPoint::ENE => "east-northeast",
            CompassPoint::E => "east",
            CompassPoint::ESE => "east-southeast",
            CompassPoint::SE => "southeast",
            CompassPoint::SSE => "south-southeast",
            CompassPoint::S => "south",
            CompassPoint::SSW => "south-southwest",
            CompassPoint::SW => "southwest",
            CompassPoint::WSW => "west-southwest",
            CompassPoint::W => "west",
            CompassPoint::WNW => "west-northwest",
            CompassPoint::NW => "northwest",
            CompassPoint::NNW => "north-northwest",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// ===================== HEADING CORRECTION =====================

/// Correct a raw magnetic compass heading to a true heading.
///
/// Declination is positive when magnetic north is east of true north, so
/// the correction is an addition. Pure; call once per sensor sample.
///
/// # Arguments
/// * `raw_magnetic_heading` - Device compass heading in degrees
/// * `declination` - Local magnetic declination in degrees
///
/// # Returns
/// True heading in degrees, [0, 360)
pub fn correct_heading(raw_magnetic_heading: f64, declination: f64) -> f64 {
    normalize_degrees(raw_magnetic_heading + declination)
}

/// Express a true heading as the equivalent reading on an uncorrected
/// magnetic compass. Exact inverse of [`correct_heading`] under the shared
/// sign convention.
pub fn to_magnetic_heading(true_heading: f64, declination: f64) -> f64 {
    normalize_degrees(true_heading - declination)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::angular_difference;

    #[test]
    fn test_compass_point_sector_centers() {
        for (i, point) in CompassPoint::ALL.iter().enumerate() {
            let center = i as f64 * 22.5;
            assert_eq!(CompassPoint::from_bearing(center), *point, "center {}°", center);
        }
    }

    #[test]
    fn test_compass_point_boundaries() {
        use CompassPoint::*;
        assert_eq!(CompassPoint::from_bearing(0.0), N);
        assert_eq!(CompassPoint::from_bearing(11.24), N);
        // A bearing exactly on a boundary goes to the clockwise point
        assert_eq!(CompassPoint::from_bearing(11.25), NNE);
        assert_eq!(CompassPoint::from_bearing(22.6), NNE);
        assert_eq!(CompassPoint::from_bearing(33.75), NE);
        // The last boundary wraps back to N
        assert_eq!(CompassPoint::from_bearing(348.75), N);
        assert_eq!(CompassPoint::from_bearing(348.7), NNW);
        assert_eq!(CompassPoint::from_bearing(359.9), N);
    }

    #[test]
    fn test_compass_point_accepts_unnormalized_bearings() {
        use CompassPoint::*;
        assert_eq!(CompassPoint::from_bearing(-11.0), N);
        assert_eq!(CompassPoint::from_bearing(-90.0), W);
        assert_eq!(CompassPoint::from_bearing(720.0 + 90.0), E);
    }

    #[test]
    fn test_compass_point_labels() {
        assert_eq!(CompassPoint::ENE.abbreviation(), "ENE");
        assert_eq!(CompassPoint::ENE.name(), "east-northeast");
        assert_eq!(format!("{}", CompassPoint::NNW), "NNW");
    }

    #[test]
    fn test_correct_heading_wraps() {
        // East-of-true declination rotates the reading clockwise
        assert_eq!(correct_heading(350.0, 20.0), 10.0);
        assert_eq!(correct_heading(10.0, -20.0), 350.0);
        assert_eq!(to_magnetic_heading(10.0, 20.0), 350.0);
        assert_eq!(to_magnetic_heading(350.0, -20.0), 10.0);
    }

    #[test]
    fn test_heading_round_trips() {
        let headings = [0.0, 10.1, 90.0, 180.0, 350.0, 359.9];
        let declinations = [-25.5, -12.87, -0.2, 0.0, 3.6, 13.2];
        for h in headings {
            for d in declinations {
                let there = to_magnetic_heading(correct_heading(h, d), d);
                assert!(
                    angular_difference(there, h).abs() < 1e-9,
                    "magnetic round trip failed for h={} d={}: {}",
                    h,
                    d,
                    there
                );
                let back = correct_heading(to_magnetic_heading(h, d), d);
                assert!(
                    angular_difference(back, h).abs() < 1e-9,
                    "true round trip failed for h={} d={}: {}",
                    h,
                    d,
                    back
                );
            }
        }
    }
}
