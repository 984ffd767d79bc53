use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::geo::{CoordError, GeoPoint};
use crate::locate::{DEFAULT_LOCATE_URL, DEFAULT_LOCATE_TIMEOUT};
use crate::source::{DEFAULT_DATA_FILE, DEFAULT_OVERPASS_URL, DEFAULT_RADIUS_M};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Bundled JSON data file
    Static,
    /// Live Overpass API query around your position
    Overpass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "biergarten")]
#[command(about = "Find the nearest Biergarten to where you are.", long_about = None)]
pub struct Cli {
    /// Your latitude. Without --lat/--lon your position is looked up by IP.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Your longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Where candidates come from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Static)]
    pub source: SourceKind,

    /// Path to the bundled Biergarten data file
    #[arg(short, long, default_value_t = String::from(DEFAULT_DATA_FILE))]
    pub data: String,

    #[arg(long, default_value_t = String::from(DEFAULT_OVERPASS_URL))]
    pub overpass_url: String,

    /// Search radius in meters for the Overpass query
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_M)]
    pub radius: u32,

    /// IP geolocation endpoint
    #[arg(long, default_value_t = String::from(DEFAULT_LOCATE_URL))]
    pub locate_url: String,

    /// Seconds to wait for a position
    #[arg(long, default_value_t = DEFAULT_LOCATE_TIMEOUT.as_secs())]
    pub locate_timeout: u64,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write every candidate ranked by distance to this CSV file
    #[arg(short, long)]
    pub out: Option<String>,
}

impl Cli {
    /// The position given on the command line, if any.
    pub fn fixed_position(&self) -> Result<Option<GeoPoint>, CoordError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    pub fn locate_timeout(&self) -> Duration {
        Duration::from_secs(self.locate_timeout)
    }
}
