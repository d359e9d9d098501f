//! Output Formatting Module
//!
//! Terminal and JSON rendering of qibla results.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

use qibla_compass::compass::{self, CompassPoint};
use qibla_compass::geo::{self, GeoCoordinate};
use qibla_compass::qibla::{self, QiblaResult};

// ===================== TERMINAL OUTPUT =====================

/// Print the full text report for one computation.
///
/// # Arguments
/// * `observer` - Validated observer coordinate
/// * `result` - The computed qibla answer
/// * `local_time` - The observation instant in the display timezone
/// * `model_name` - Identifier of the magnetic model in use
/// * `epoch` - The model's reference epoch as a decimal year
/// * `validity_years` - Length of the model's calibrated window
pub fn print_report(
    observer: GeoCoordinate,
    result: &QiblaResult,
    local_time: DateTime<Tz>,
    model_name: &str,
    epoch: f64,
    validity_years: f64,
) {
    println!("Location : lat={:.6}, lon={:.6}", observer.latitude(), observer.longitude());
    println!("Timezone : {}", local_time.timezone());
    println!("Date     : {}", local_time.date_naive());
    println!(
        "Model    : {} (epoch {:.1}, valid to {:.1})",
        model_name,
        epoch,
        epoch + validity_years
    );
    println!();

    println!("=== Qibla ===");
    println!("True bearing    : {:7.2}° {}", result.direction, result.compass_point());
    let mag = result.magnetic_direction();
    println!("Compass bearing : {:7.2}° {}", mag, CompassPoint::from_bearing(mag));
    println!("Distance        : {}", qibla::format_distance(result.distance_km));
    println!();

    println!("=== Magnetic field ===");
    println!("Declination     : {}", qibla::format_declination(result.declination_deg));
    println!("Field strength  : {:.0} nT", result.field_strength_nt);
    if !result.within_model_validity {
        println!("Note            : date outside the model window, declination extrapolated");
    }
}

/// Print the corrected-heading block for a raw compass reading.
///
/// Positive turn angles mean clockwise; the guidance always takes the
/// shorter way around.
pub fn print_heading_guidance(raw_heading: f64, result: &QiblaResult) {
    let true_heading = compass::correct_heading(raw_heading, result.declination_deg);
    let turn = geo::angular_difference(result.direction, true_heading);

    println!();
    println!("=== Compass heading ===");
    println!("Raw heading     : {:7.2}°", geo::normalize_degrees(raw_heading));
    println!("True heading    : {}", qibla::format_bearing(true_heading));
    if turn.abs() < 0.5 {
        println!("You are facing the qibla.");
    } else if turn > 0.0 {
        println!("Turn right {:.1}° to face the qibla.", turn);
    } else {
        println!("Turn left {:.1}° to face the qibla.", -turn);
    }
}

// ===================== JSON OUTPUT =====================

/// Print the result as one pretty-printed JSON document on stdout.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json(
    observer: GeoCoordinate,
    result: &QiblaResult,
    raw_heading: Option<f64>,
    model_name: &str,
    epoch: f64,
    validity_years: f64,
) -> Result<(), serde_json::Error> {
    let mut doc = serde_json::json!({
        "observer": observer,
        "observed_at": observed_at_rfc3339(result.observed_at),
        "qibla": {
            "true_bearing_deg": result.direction,
            "magnetic_bearing_deg": result.magnetic_direction(),
            "compass_point": result.compass_point(),
            "distance_km": result.distance_km,
        },
        "magnetic_field": {
            "declination_deg": result.declination_deg,
            "field_strength_nt": result.field_strength_nt,
            "within_model_validity": result.within_model_validity,
        },
        "model": {
            "name": model_name,
            "epoch": epoch,
            "valid_until": epoch + validity_years,
        },
    });

    if let Some(raw) = raw_heading {
        let true_heading = compass::correct_heading(raw, result.declination_deg);
        doc["heading"] = serde_json::json!({
            "raw_deg": geo::normalize_degrees(raw),
            "true_deg": true_heading,
            "turn_deg": geo::angular_difference(result.direction, true_heading),
        });
    }

    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn observed_at_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_at_rfc3339_is_utc_with_z_suffix() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2022, 6, 15, 12, 30, 45).unwrap();
        assert_eq!(observed_at_rfc3339(at), "2022-06-15T12:30:45Z");
    }
}
