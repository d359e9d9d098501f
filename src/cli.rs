//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the qibla-compass
//! application.

use clap::Parser;

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Observer latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude,
          env = "QIBLA_LATITUDE", required_unless_present = "show_build_info")]
    pub latitude: Option<f64>,
    /// Observer longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude,
          env = "QIBLA_LONGITUDE", required_unless_present = "show_build_info")]
    pub longitude: Option<f64>,
    /// Time zone to use ("system", "location", or IANA time zone name)
    #[arg(long, default_value = "system", env = "QIBLA_TIMEZONE")]
    pub timezone: String,

    /// Date for the declination model (e.g., "2024-12-25" or "today"); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Use UTC time zone
    #[arg(long)]
    pub utc: bool,

    /// Raw magnetic compass heading in degrees, to correct and compare
    /// against the qibla
    #[arg(long, allow_hyphen_values = true, value_parser = parse_heading)]
    pub heading: Option<f64>,

    /// Print the result as a JSON document instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Show build info from Cargo.lock at time of building
    #[arg(long)]
    pub show_build_info: bool,
}

// ===================== CLI VALUE PARSERS =====================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

fn parse_heading(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if !v.is_finite() {
        return Err(format!("Heading must be a finite angle in degrees, got {}", s));
    }
    Ok(v)
}

// ===================== TESTS =====================
