//! qibla-compass command-line tool
//!
//! Computes the qibla (true and compass bearing to the Kaaba), great-circle
//! distance, and local magnetic declination for a coordinate and date.

use chrono::Utc;
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use clap::Parser;

use qibla_compass::geo::GeoCoordinate;
use qibla_compass::geomag::MagneticModel;
use qibla_compass::qibla::QiblaFinder;
use qibla_compass::wmm2020;

mod cli;
mod output;
mod time;

use cli::Args;
use time::{resolve_timezone, system_timezone};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.show_build_info {
        println!("Built from Git commit: {}\n", env!("APP_GIT_HASH"));
        print!("{}", include_str!(env!("DEPS_INFO_PATH")));
        return Ok(());
    }

    // clap enforces these unless --show-build-info was given
    let (latitude, longitude) = match (args.latitude, args.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err("latitude and longitude are required".into()),
    };
    let observer = GeoCoordinate::new(latitude, longitude)?;

    let tz = if args.utc {
        Tz::UTC
    } else {
        match args.timezone.as_str() {
            "system" => system_timezone(),
            "location" => resolve_timezone(longitude, latitude),
            other => other.parse().unwrap_or(Tz::UTC),
        }
    };

    // Anchor 'today' to the target timezone
    let anchor_time = Utc::now().with_timezone(&tz);
    let local_time = match &args.date {
        Some(s) => parse_date_string(s, anchor_time, Dialect::Us)?.with_timezone(&tz),
        None => anchor_time,
    };

    let finder = QiblaFinder::new(MagneticModel::wmm2020());
    let result = finder.compute(observer, local_time.with_timezone(&Utc));

    if !result.within_model_validity {
        eprintln!(
            "Warning: {} is outside the {} validity window ({:.1}-{:.1}); declination is extrapolated.",
            local_time.date_naive(),
            wmm2020::MODEL_NAME,
            finder.model().epoch(),
            finder.model().epoch() + finder.model().validity_years(),
        );
    }

    if args.json {
        output::print_json(
            observer,
            &result,
            args.heading,
            wmm2020::MODEL_NAME,
            finder.model().epoch(),
            finder.model().validity_years(),
        )?;
        return Ok(());
    }

    output::print_report(
        observer,
        &result,
        local_time,
        wmm2020::MODEL_NAME,
        finder.model().epoch(),
        finder.model().validity_years(),
    );

    if let Some(raw) = args.heading {
        output::print_heading_guidance(raw, &result);
    }

    Ok(())
}
