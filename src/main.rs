use clap::Parser;
use drivesafe::config::AppConfig;
use drivesafe::core::Session;
use drivesafe::ui::ConsolePresenter;
use drivesafe_core::StateStore;
use drivesafe_types::SourceMode;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// drivesafe - Driver-assistance telemetry monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "drivesafe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read from the serial link. Optionally specify the device (e.g., -s=/dev/ttyACM0)
    #[arg(short = 's', long = "serial", value_name = "PORT", conflicts_with = "demo")]
    serial: Option<Option<String>>,

    /// Use the synthetic demo source (overrides the saved mode)
    #[arg(long = "demo")]
    demo: bool,

    /// Baud rate for the serial link
    #[arg(short = 'r', long = "baud", value_name = "RATE")]
    baud_rate: Option<u32>,

    /// List available serial ports
    #[arg(short = 'l', long = "list")]
    list_ports: bool,

    /// Save the effective settings as the default configuration
    #[arg(long = "save-config")]
    save_config: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Configuration file to load at startup
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    fn apply(&self, config: &mut AppConfig) {
        if self.demo {
            config.mode = SourceMode::Demo;
        }
        if let Some(port) = &self.serial {
            config.mode = SourceMode::Serial;
            if port.is_some() {
                config.serial.port = port.clone();
            }
        }
        if let Some(rate) = self.baud_rate {
            config.serial.baud_rate = rate;
        }
    }
}

/// List available serial ports to stdout
fn list_available_ports() {
    match drivesafe_sources::list_ports() {
        Ok(ports) if ports.is_empty() => println!("No serial ports found"),
        Ok(ports) => {
            println!("Available serial ports ({}):", ports.len());
            for port in ports {
                println!("  {}", port);
            }
        }
        Err(e) => {
            eprintln!("Error: Could not enumerate serial ports: {}", e);
            std::process::exit(1);
        }
    }
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting drivesafe v{}", env!("CARGO_PKG_VERSION"));

    if cli.list_ports {
        list_available_ports();
        return;
    }

    let mut config = AppConfig::load_or_default(cli.config_file.as_deref());
    cli.apply(&mut config);
    info!("Source mode: {:?}", config.mode);

    if cli.save_config {
        match config.save() {
            Ok(()) => info!("Saved configuration"),
            Err(e) => warn!("Failed to save configuration: {}", e),
        }
    }

    let store = Arc::new(StateStore::new());
    let source = drivesafe_sources::create_source(
        config.mode,
        &config.serial,
        &config.synthetic,
        Arc::clone(&store),
    );

    let presenter = ConsolePresenter::new(config.display.alert_rows);
    let mut session = Session::new(source);
    session
        .run(
            &presenter,
            Duration::from_millis(config.display.refresh_interval_ms),
            wait_for_ctrl_c(),
        )
        .await;

    info!("Received {} snapshots, exiting", store.update_count());
}
