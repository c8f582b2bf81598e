use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use fleet_tracks::config::Config;
use fleet_tracks::generator::{self, City};
use fleet_tracks::geo::GeoPoint;
use fleet_tracks::playback::{InstantPlayback, Playback, RealTimePlayback};
use fleet_tracks::route::{OpenRouteService, RouteRequest};
use fleet_tracks::track::{TrackAssembler, VehicleRef};
use fleet_tracks::store::{FileStore, TrackStore};
use fleet_tracks::{polyline, web};

type CliResult = Result<ExitCode, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "fleet-tracks")]
#[command(about = "Synthetic vehicle GPS track generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        config: Option<String>,
    },
    /// Generate random trips and store them instantly
    Generate {
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        city: City,
        /// Comma separated vehicle IDs
        #[arg(long, value_delimiter = ',', required = true)]
        vehicles: Vec<u32>,
        /// Tracks per vehicle
        #[arg(long, default_value_t = 1)]
        tracks: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play one route as a live feed until it ends or Ctrl-C
    Live {
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        vehicle: u32,
        /// Start as lon,lat
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// Destination as lon,lat
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
        #[arg(long, default_value_t = 90)]
        max_speed: u32,
        /// Pause between points, e.g. "10s"; overrides the config
        #[arg(long, value_parser = humantime::parse_duration)]
        delay: Option<Duration>,
    },
    /// Decode an encoded polyline and print the points as JSON
    Decode {
        polyline: String,
        #[arg(long)]
        elevation: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Generate {
            config,
            city,
            vehicles,
            tracks,
            seed,
        } => generate(config.as_deref(), city, &vehicles, tracks, seed).await,
        Commands::Live {
            config,
            vehicle,
            from,
            to,
            max_speed,
            delay,
        } => {
            let request = RouteRequest::new(from, to, max_speed);
            live(config.as_deref(), VehicleRef(vehicle), request, delay).await
        }
        Commands::Decode {
            polyline,
            elevation,
        } => decode(&polyline, elevation),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    GeoPoint::from_lon_lat(s).ok_or_else(|| format!("expected lon,lat but got '{}'", s))
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => {
            log::info!("No config file given, using defaults");
            Ok(Config::default())
        }
    }
}

fn file_store(config: &Config) -> Result<Arc<dyn TrackStore>, Box<dyn Error>> {
    let folder = config.storage.require_folder()?;
    log::info!("Storing tracks under {}", folder.display());
    Ok(Arc::new(FileStore::new(folder.to_path_buf())))
}

fn assembler(config: &Config) -> Result<TrackAssembler<OpenRouteService>, Box<dyn Error>> {
    let provider = OpenRouteService::from_config(&config.provider)?;
    Ok(TrackAssembler::with_interval(
        provider,
        config.playback.interval_seconds,
    )?)
}

async fn serve(config: Option<&str>) -> CliResult {
    let config = load_config(config)?;
    web::run_server(config).await?;
    Ok(ExitCode::SUCCESS)
}

async fn generate(
    config: Option<&str>,
    city: City,
    vehicles: &[u32],
    tracks: usize,
    seed: Option<u64>,
) -> CliResult {
    let config = load_config(config)?;
    let store = file_store(&config)?;
    let assembler = Arc::new(assembler(&config)?);
    let playback = Arc::new(InstantPlayback::new(store));

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let vehicles: Vec<VehicleRef> = vehicles.iter().copied().map(VehicleRef).collect();
    let plans = generator::plan_trips(&mut rng, &vehicles, city, tracks);
    log::info!(
        "Generating {} trips in {} for {} vehicles",
        plans.len(),
        city,
        vehicles.len()
    );

    let summary =
        generator::generate(assembler, playback, plans, config.generator.concurrency).await;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn live(
    config: Option<&str>,
    vehicle: VehicleRef,
    request: RouteRequest,
    delay: Option<Duration>,
) -> CliResult {
    let config = load_config(config)?;
    let store = file_store(&config)?;
    let assembler = assembler(&config)?;
    let track = assembler
        .assemble(vehicle, &request, chrono::Utc::now())
        .await?;

    let playback = RealTimePlayback::new(store, delay.unwrap_or(config.playback.delay));
    let cancel = playback.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping playback");
            cancel.cancel();
        }
    });

    let report = playback.play(track).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

fn decode(encoded: &str, elevation: bool) -> CliResult {
    let points = polyline::decode(encoded, elevation)?;
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(ExitCode::SUCCESS)
}
