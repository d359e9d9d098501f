//! Time and Timezone Utilities Module
//!
//! Timezone resolution for the command-line front end: the system zone, or
//! the zone covering the observer's coordinates.

use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

// tzf-rs DefaultFinder is pre-compiled and very fast
static TZF_FINDER: OnceLock<DefaultFinder> = OnceLock::new();

// ===================== TIMEZONE UTILITIES =====================

/// Get the system's configured timezone.
///
/// Falls back to UTC if the system timezone cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|s| s.parse().ok()).unwrap_or(Tz::UTC)
}

/// Resolve timezone from geographic coordinates.
///
/// # Arguments
/// * `lon` - Longitude in degrees
/// * `lat` - Latitude in degrees
///
/// # Returns
/// The IANA timezone covering that position, or UTC if resolution fails
pub fn resolve_timezone(lon: f64, lat: f64) -> Tz {
    let finder = TZF_FINDER.get_or_init(DefaultFinder::new);

    // Get the IANA string (e.g., "Asia/Riyadh")
    let tzid = finder.get_tz_name(lon, lat);

    // Parse into chrono_tz::Tz to get historical correctness
    tzid.parse::<Tz>().unwrap_or(Tz::UTC)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_timezone_mecca() {
        use chrono_tz::Asia::Riyadh;
        // The Kaaba's coordinates land in Saudi time
        assert_eq!(resolve_timezone(39.826206, 21.422487), Riyadh);
    }

    #[test]
    fn test_resolve_timezone_new_york() {
        use chrono_tz::America::New_York;
        assert_eq!(resolve_timezone(-74.0060, 40.7128), New_York);
    }

    #[test]
    fn test_resolve_timezone_jakarta() {
        use chrono_tz::Asia::Jakarta;
        assert_eq!(resolve_timezone(106.8456, -6.2088), Jakarta);
    }

    #[test]
    fn test_resolve_timezone_open_ocean_falls_back() {
        // The middle of the South Pacific has no country zone of its own;
        // the dataset answers with an Etc/GMT offset zone, which parses fine
        let tz = resolve_timezone(-120.0, -40.0);
        assert!(!tz.name().is_empty());
    }

    #[test]
    fn test_system_timezone_never_panics() {
        let _ = system_timezone();
    }
}
