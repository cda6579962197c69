//! site-scout: site analysis service
//!
//! This is the main entry point for the control-socket daemon and the
//! one-shot lookup commands.
//!
//! # Usage
//!
//! ```bash
//! # Serve the control socket with default configuration
//! ./site-scout
//!
//! # Run with custom configuration
//! ./site-scout -c /path/to/config.json
//!
//! # One-shot zoning resolution
//! ./site-scout --resolve 42.33,-83.045
//!
//! # Run with environment overrides
//! SITE_SCOUT_LOG_LEVEL=debug ./site-scout
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use site_scout::config::{apply_env_overrides, load_config_with_env, Config};
use site_scout::ipc::{IpcHandler, IpcServer};
use site_scout::site::{SiteQuery, SiteService};
use site_scout::zoning::Coordinate;

const DEFAULT_CONFIG_PATH: &str = "/etc/site-scout/config.json";

/// What the binary was asked to do
enum Mode {
    Serve,
    Resolve(Coordinate),
    Search(String),
}

/// Command-line arguments
struct Args {
    /// Configuration file path
    config_path: PathBuf,
    /// Whether `-c` was given
    config_explicit: bool,
    /// Generate default configuration
    generate_config: bool,
    /// Check configuration only
    check_config: bool,
    mode: Mode,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        let mut config_explicit = false;
        let mut generate_config = false;
        let mut check_config = false;
        let mut mode = Mode::Serve;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    config_path = PathBuf::from(path);
                    config_explicit = true;
                }
                "-g" | "--generate-config" => {
                    generate_config = true;
                }
                "--check" => {
                    check_config = true;
                }
                "--resolve" => {
                    let value = args.next().context("--resolve requires LAT,LNG")?;
                    mode = Mode::Resolve(parse_coordinate(&value)?);
                }
                "--search" => {
                    let address = args.next().context("--search requires an address")?;
                    mode = Mode::Search(address);
                }
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "-v" | "--version" => {
                    println!("site-scout v{}", site_scout::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        Ok(Self {
            config_path,
            config_explicit,
            generate_config,
            check_config,
            mode,
        })
    }
}

fn parse_coordinate(value: &str) -> Result<Coordinate> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LAT,LNG, got {value:?}"))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("invalid latitude {lat:?}"))?;
    let lng: f64 = lng.trim().parse().with_context(|| format!("invalid longitude {lng:?}"))?;
    Ok(Coordinate::new(lat, lng))
}

fn print_help() {
    println!(
        r#"site-scout v{}

Site analysis service: zoning, environmental and feasibility lookups.

USAGE:
    site-scout [OPTIONS]

OPTIONS:
    -c, --config <PATH>     Configuration file path [default: {}]
    -g, --generate-config   Generate default configuration and exit
    --check                 Check configuration and exit
    --resolve <LAT,LNG>     Print the zoning resolution for a coordinate and exit
    --search <ADDRESS>      Print the site record for an address and exit
    -h, --help              Print help information
    -v, --version           Print version information

ENVIRONMENT:
    SITE_SCOUT_LOG_LEVEL             Override log level (trace, debug, info, warn, error)
    SITE_SCOUT_IPC_SOCKET            Override IPC socket path
    SITE_SCOUT_GEOCODER_PROVIDER     Geocoder provider (seeded, http)
    SITE_SCOUT_GEOCODER_ENDPOINT     Override geocoder search endpoint
    SITE_SCOUT_GEOCODER_TIMEOUT_MS   Override geocoder timeout
    SITE_SCOUT_ZONING_CATALOG        Load the zoning catalog from a JSON file

Without --resolve or --search, site-scout serves the control socket until
interrupted. If the default configuration file does not exist, built-in
defaults are used.
"#,
        site_scout::VERSION,
        DEFAULT_CONFIG_PATH
    );
}

/// Load the configuration file, or defaults when the implicit path is absent
fn load_configuration(args: &Args) -> Result<Config> {
    if args.config_explicit || args.config_path.exists() {
        return load_config_with_env(&args.config_path).with_context(|| {
            format!("Failed to load configuration from {:?}", args.config_path)
        });
    }
    let mut config = Config::default_config();
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())
        .context("Invalid environment override")?;
    Ok(config)
}

/// Initialize logging
fn init_logging(config: &Config) {
    let level = match config.log.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "hyper_util=warn", "rustls=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.log.target)
        .with_writer(std::io::stderr);

    if config.log.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse()?;

    if args.generate_config {
        site_scout::config::create_default_config(&args.config_path)?;
        println!("Generated default configuration at {:?}", args.config_path);
        return Ok(());
    }

    let config = load_configuration(&args)?;

    if args.check_config {
        let service = SiteService::from_config(&config)?;
        let catalog = service.resolver().catalog();
        println!(
            "Configuration is valid ({} regions, {} localities)",
            catalog.regions.len(),
            catalog.locality_count()
        );
        return Ok(());
    }

    init_logging(&config);

    info!("site-scout v{}", site_scout::VERSION);

    let service = Arc::new(SiteService::from_config(&config)?);

    match args.mode {
        Mode::Resolve(coord) => {
            let resolution = service.zoning(coord);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            return Ok(());
        }
        Mode::Search(address) => {
            let record = service.search_site(&SiteQuery::by_address(address)).await?;
            println!("{}", serde_json::to_string_pretty(&*record)?);
            return Ok(());
        }
        Mode::Serve => {}
    }

    if !config.ipc.enabled {
        bail!("IPC is disabled in the configuration; nothing to serve");
    }

    let ipc_handler = Arc::new(IpcHandler::new(Arc::clone(&service)));
    let ipc_server = IpcServer::new(config.ipc.clone(), ipc_handler);
    let ipc_shutdown = ipc_server.shutdown_sender();

    let mut ipc_handle = tokio::spawn(async move { ipc_server.run().await });

    info!(
        "Startup complete in {:.2}ms",
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    let server_result = tokio::select! {
        result = &mut ipc_handle => {
            info!("IPC server stopped");
            Some(result)
        }
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, initiating shutdown...");
            None
        }
        () = wait_for_sigterm() => {
            info!("Received SIGTERM, initiating shutdown...");
            None
        }
    };

    let server_result = match server_result {
        Some(result) => result,
        None => {
            let _ = ipc_shutdown.send(());
            match tokio::time::timeout(std::time::Duration::from_secs(5), ipc_handle).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("IPC server did not stop within 5s");
                    Ok(Ok(()))
                }
            }
        }
    };

    let stats = service.cache_stats();
    info!(
        "Final cache stats: {} hits, {} misses, {:.1}% hit rate",
        stats.hits,
        stats.misses,
        stats.hit_rate()
    );
    info!("Shutdown complete");

    match server_result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("IPC server error: {}", e);
            Err(e.into())
        }
        Err(e) => Err(anyhow!("IPC server task failed: {e}")),
    }
}

/// Wait for SIGTERM signal
#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
