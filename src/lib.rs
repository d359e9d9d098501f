//! Qibla direction and geomagnetic declination library.
//!
//! Computes the great-circle bearing and distance from an observer to the
//! Kaaba and the local magnetic declination from a built-in World Magnetic
//! Model, so a raw compass heading can be corrected to a true bearing.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use qibla_compass::{GeoCoordinate, MagneticModel, QiblaFinder};
//!
//! let observer = GeoCoordinate::new(40.7128, -74.0060)?;
//! let finder = QiblaFinder::new(MagneticModel::wmm2020());
//! let when = Utc.with_ymd_and_hms(2022, 6, 15, 12, 0, 0).unwrap();
//! let result = finder.compute(observer, when);
//!
//! // From New York the qibla points east-northeast
//! assert!(result.direction > 58.0 && result.direction < 60.0);
//! // Magnetic north is west of true north there, so the declination is negative
//! assert!(result.declination_deg < 0.0);
//! # Ok::<(), qibla_compass::InvalidCoordinate>(())
//! ```

pub mod compass;
pub mod geo;
pub mod geomag;
pub mod qibla;
pub mod wmm2020;

pub use compass::{CompassPoint, correct_heading, to_magnetic_heading};
pub use geo::{
    EARTH_RADIUS_KM, GeoCoordinate, InvalidCoordinate, angular_difference, bearing, distance,
    normalize_degrees,
};
pub use geomag::{MagneticCoefficient, MagneticFieldVector, MagneticModel, decimal_year};
pub use qibla::{KAABA, QiblaFinder, QiblaResult};
