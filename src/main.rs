use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use skyview::geocoding::{self, LocationInput, LocationParser};
use skyview::radar::RAINVIEWER_MAPS_URL;
use skyview::units::format_unix_clock;
use skyview::weather::parse_local_time;
use skyview::{
    AirQualitySeries, ForecastAggregator, Location, RadarFeed, RawForecast, SkyviewConfig,
    SkyviewError, logging,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "skyview", version)]
#[command(about = "Forecast aggregation and radar tiles from Open-Meteo and RainViewer payloads")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate a forecast payload into hourly and daily records
    Forecast {
        /// Open-Meteo forecast JSON
        #[arg(long)]
        weather: PathBuf,

        /// Open-Meteo air-quality JSON
        #[arg(long)]
        air_quality: PathBuf,

        /// Coordinates ("lat,lon"), place name or ZIP code
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,

        /// Nominatim reverse (for coordinates) or search (for names) JSON
        #[arg(long)]
        geocode: Option<PathBuf>,

        /// Feed-local time, e.g. 2024-06-01T14:00
        #[arg(long)]
        now: Option<String>,
    },

    /// Select radar frames around now and list their tiles
    Radar {
        /// RainViewer weather-maps JSON
        #[arg(long)]
        feed: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Unix timestamp in seconds
        #[arg(long)]
        now: Option<i64>,

        /// Overrides the configured zoom
        #[arg(long)]
        zoom: Option<u8>,

        /// IANA time zone for frame labels
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },

    /// Print the base map tile grid around a point
    Tiles {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Overrides the configured zoom
        #[arg(long)]
        zoom: Option<u8>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<SkyviewError>() {
                eprintln!("{}", err.user_message());
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SkyviewConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;
    info!("Starting skyview v{}", skyview::VERSION);

    let output = match cli.command {
        Command::Forecast {
            weather,
            air_quality,
            location,
            geocode,
            now,
        } => forecast(&weather, &air_quality, location.as_deref(), geocode.as_deref(), now.as_deref())?,
        Command::Radar {
            feed,
            lat,
            lon,
            now,
            zoom,
            timezone,
        } => {
            if let Some(zoom) = zoom {
                config.radar.zoom = zoom;
                config.validate()?;
            }
            radar(&config, &feed, coordinates(lat, lon)?, now, &timezone)?
        }
        Command::Tiles { lat, lon, zoom } => {
            if let Some(zoom) = zoom {
                config.radar.zoom = zoom;
                config.validate()?;
            }
            let (lat, lon) = coordinates(lat, lon)?;
            let grid = config.radar.referencer().grid(lat, lon)?;
            json!({
                "zoom": grid.zoom,
                "base": grid.base,
                "tiles": grid.tiles,
                "bounds": grid.bounds(),
                "urls": grid.basemap_urls(&config.basemap.tile_url),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_payload(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Both coordinates, or the fallback location when neither is given
fn coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<(f64, f64)> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        (None, None) => {
            let fallback = Location::fallback();
            Ok((fallback.latitude, fallback.longitude))
        }
        _ => bail!("--lat and --lon must be given together"),
    }
}

fn resolve_location(input: Option<&str>, geocode: Option<&Path>) -> Result<Location> {
    let Some(input) = input else {
        debug!("No location given, using fallback");
        return Ok(Location::fallback());
    };

    match LocationParser::parse(input)? {
        LocationInput::Coordinates(lat, lon) => match geocode {
            Some(path) => Ok(geocoding::decode_reverse(&read_payload(path)?)?),
            None => Ok(Location::new(lat, lon, format!("{lat:.4}, {lon:.4}"))),
        },
        LocationInput::Name(query) | LocationInput::PostalCode(query) => {
            let Some(path) = geocode else {
                bail!(
                    "'{query}' needs a search result; fetch {} and pass it with --geocode",
                    geocoding::search_url(&query)
                );
            };
            geocoding::decode_search(&read_payload(path)?)?
                .into_iter()
                .next()
                .with_context(|| format!("Location not found: {query}"))
        }
    }
}

fn forecast(
    weather: &Path,
    air_quality: &Path,
    location: Option<&str>,
    geocode: Option<&Path>,
    now: Option<&str>,
) -> Result<serde_json::Value> {
    let location = resolve_location(location, geocode)?;
    let raw = RawForecast::from_json(&read_payload(weather)?)
        .with_context(|| format!("Invalid forecast payload in {}", weather.display()))?;
    let aqi = AirQualitySeries::from_json(&read_payload(air_quality)?)
        .with_context(|| format!("Invalid air-quality payload in {}", air_quality.display()))?;

    let now: NaiveDateTime = match now {
        Some(value) => parse_local_time(value)?,
        None => Utc::now().naive_utc() + Duration::seconds(i64::from(raw.utc_offset_seconds)),
    };

    let model = ForecastAggregator::aggregate(location, &raw, &aqi, now)?;
    Ok(serde_json::to_value(model)?)
}

fn radar(
    config: &SkyviewConfig,
    feed: &Path,
    (lat, lon): (f64, f64),
    now: Option<i64>,
    timezone: &str,
) -> Result<serde_json::Value> {
    let feed = RadarFeed::from_json(&read_payload(feed)?)
        .with_context(|| format!("Invalid radar feed; expected the payload of {RAINVIEWER_MAPS_URL}"))?;
    let now = now.unwrap_or_else(|| Utc::now().timestamp());
    let frames = config.radar.selector().select_from_feed(&feed, now);
    let referencer = config.radar.referencer();
    let time_format = config.units.preferences().time;

    let frames = frames
        .iter()
        .map(|frame| -> Result<serde_json::Value> {
            let grid = referencer.radar_grid(lat, lon, &frame.path)?;
            Ok(json!({
                "time": frame.time,
                "label": format_unix_clock(frame.time, timezone, time_format),
                "path": frame.path,
                "tiles": grid.radar_urls().unwrap_or_default(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Selected {} radar frames", frames.len());
    Ok(json!({ "now": now, "frames": frames }))
}
