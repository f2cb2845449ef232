//! CLI entry point for the PurpleAir AQI tool.
//!
//! Provides subcommands for a one-shot fetch, a polling watch loop that
//! retains the last good sample across failed refreshes, and a direct
//! concentration-to-AQI conversion.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use purpleair_aqi::aqi::{Category, pm25_aqi};
use purpleair_aqi::client::PurpleAirClient;
use purpleair_aqi::config::{AqiConfig, DistanceUnit, SearchMode};
use purpleair_aqi::correction::Correction;
use purpleair_aqi::fetch::BasicClient;
use purpleair_aqi::geo::Coordinates;
use purpleair_aqi::output::{AqiRecord, append_record, print_json, print_pretty};
use purpleair_aqi::report::AqiReport;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "purpleair_aqi")]
#[command(about = "Estimate a representative AQI from PurpleAir sensors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Sensor-selection and pipeline flags shared by `fetch` and `watch`.
#[derive(Args, Clone)]
struct SensorArgs {
    /// Search center latitude (region mode)
    #[arg(long)]
    latitude: Option<f64>,

    /// Search center longitude (region mode)
    #[arg(long)]
    longitude: Option<f64>,

    /// Search radius around the center
    #[arg(long, default_value_t = 1.5)]
    radius: f64,

    /// Unit of the search radius
    #[arg(long, value_enum, default_value_t = DistanceUnit::Miles)]
    unit: DistanceUnit,

    /// Weight readings by distance to the center (region mode only)
    #[arg(long, default_value_t = false)]
    weighted: bool,

    /// Query one specific sensor by index instead of searching
    #[arg(long)]
    sensor_index: Option<u32>,

    /// Query private sensors behind a shared read key
    #[arg(long)]
    read_key: Option<String>,

    /// PM2.5 correction method (US EPA, Woodsmoke, AQ&U, LRAPA, CF=1, none)
    #[arg(long, default_value = "US EPA")]
    correction: String,

    /// Minutes between samples in watch mode
    #[arg(long, default_value_t = 10)]
    interval: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once and print the result
    Fetch {
        #[command(flatten)]
        sensor: SensorArgs,

        /// Optional CSV file to append the sample to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Poll on the configured interval, keeping the last good sample
    Watch {
        #[command(flatten)]
        sensor: SensorArgs,

        /// CSV file to append samples to
        #[arg(short, long, default_value = "aqi.csv")]
        output: String,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_samples: usize,
    },
    /// Convert a PM2.5 concentration (µg/m³) directly to an AQI
    Aqi {
        /// Concentration in µg/m³
        #[arg(value_name = "CONCENTRATION")]
        concentration: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/purpleair_aqi.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("purpleair_aqi.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { sensor, output } => {
            let config = build_config(&sensor)?;
            let client = PurpleAirClient::new(BasicClient::new(), config);

            let report = client.fetch().await?;
            print_pretty(&report);
            print_json(&report)?;

            if let Some(path) = output {
                append_record(&path, &AqiRecord::from_report(&report, None))?;
            }
        }
        Commands::Watch {
            sensor,
            output,
            num_samples,
        } => {
            let config = build_config(&sensor)?;
            watch(config, &output, num_samples).await?;
        }
        Commands::Aqi { concentration } => match pm25_aqi(concentration) {
            Some(aqi) => {
                let category = Category::from_aqi(aqi);
                info!(
                    concentration,
                    aqi,
                    category = %category,
                    level = category.level(),
                    color = category.color(),
                    "Converted"
                );
            }
            None => warn!(concentration, "Concentration outside the AQI table"),
        },
    }

    Ok(())
}

/// Builds the fetch configuration from CLI flags and the environment.
///
/// The API key always comes from `PURPLEAIR_API_KEY`. A sensor index or
/// read key selects direct mode; otherwise both center coordinates are
/// required for a region search.
fn build_config(args: &SensorArgs) -> Result<AqiConfig> {
    let api_key =
        std::env::var("PURPLEAIR_API_KEY").expect("PURPLEAIR_API_KEY must be set");

    let search = if args.sensor_index.is_some() || args.read_key.is_some() {
        SearchMode::Direct {
            sensor_index: args.sensor_index,
            read_key: args.read_key.clone(),
        }
    } else {
        match (args.latitude, args.longitude) {
            (Some(latitude), Some(longitude)) => SearchMode::Region {
                center: Coordinates {
                    latitude,
                    longitude,
                },
                radius: args.radius,
                unit: args.unit,
            },
            _ => bail!(
                "either --latitude and --longitude, or --sensor-index/--read-key, must be given"
            ),
        }
    };

    Ok(AqiConfig {
        api_key,
        search,
        weighted: args.weighted,
        correction: Correction::from_name(&args.correction),
        update_interval_minutes: args.interval,
    })
}

/// Polls the pipeline on the configured interval.
///
/// A failed refresh is logged and recorded, and the previous successful
/// sample is retained; the loop itself never retries within a cycle.
#[tracing::instrument(skip(config), fields(output, num_samples))]
async fn watch(config: AqiConfig, output: &str, num_samples: usize) -> Result<()> {
    let interval_minutes = config.update_interval_minutes;
    let client = PurpleAirClient::new(BasicClient::new(), config);

    if num_samples == 0 {
        info!(interval_minutes, "Sampling infinitely. Press Ctrl+C to stop.");
    } else {
        info!(num_samples, interval_minutes, "Starting sample collection");
    }

    let mut last_good: Option<AqiReport> = None;
    let mut sample_count = 0;

    loop {
        sample_count += 1;
        info!(sample = sample_count, "Starting sample");

        match client.fetch().await {
            Ok(report) => {
                let previous_aqi = last_good.as_ref().and_then(|r| r.aqi);
                let record = AqiRecord::from_report(&report, previous_aqi);
                if let Err(e) = append_record(output, &record) {
                    error!(error = %e, "Failed to write sample record");
                }
                print_pretty(&report);
                last_good = Some(report);
            }
            Err(e) => {
                error!(error = %e, "Refresh failed, keeping last good sample");
                let _ = append_record(output, &AqiRecord::from_error(&e));
                if let Some(prev) = &last_good {
                    info!(aqi = prev.aqi, "Last good sample still current");
                }
            }
        }

        if num_samples > 0 && sample_count >= num_samples {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_secs(interval_minutes * 60)).await;
    }

    info!(samples = sample_count, "Finished watching");
    Ok(())
}
