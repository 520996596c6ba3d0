#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use rail_board::HuxleyClient;
use rail_board::app::{self, AppError};
use rail_board::config::BoardConfig;
use rail_board::driver::MemoryDriver;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults are used when absent
    #[arg(long, env = "RAIL_BOARD_CONFIG")]
    config: Option<PathBuf>,
    /// Station CRS code, e.g. NTN
    #[arg(long, env = "RAIL_BOARD_STATION")]
    station: Option<String>,
    #[arg(long, env = "RAIL_BOARD_API_BASE_URL")]
    api_base_url: Option<String>,
    #[arg(long, env = "RAIL_BOARD_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    /// Seconds between successful fetches
    #[arg(long, env = "RAIL_BOARD_FETCH_INTERVAL")]
    fetch_interval: Option<u64>,
    /// Number of departure rows on the panel
    #[arg(long, env = "RAIL_BOARD_ROWS")]
    rows: Option<usize>,
    /// Render into memory instead of the LED matrix
    #[arg(long)]
    headless: bool,
    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

impl Cli {
    fn board_config(&self) -> Result<BoardConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::load(path)?,
            None => BoardConfig::default(),
        };

        if let Some(station) = &self.station {
            config.station.clone_from(station);
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(token) = &self.access_token {
            config.access_token = Some(token.clone());
        }
        if let Some(interval) = self.fetch_interval {
            config.fetch_interval_secs = interval;
        }
        if let Some(rows) = self.rows {
            config.display.visible_rows = rows;
        }

        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = cli.board_config()?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("shutdown requested");
        handler_flag.store(false, Ordering::Relaxed);
    })?;

    let source = HuxleyClient::new(config.client_config())?;

    if cli.headless {
        let driver = app::run(&config, source, MemoryDriver::new(), &running, cli.frames)?;
        info!("headless run finished after {} frames", driver.frames_written());
        return Ok(());
    }

    run_on_matrix(&config, source, &running, cli.frames)
}

#[cfg(feature = "hardware")]
fn run_on_matrix(
    config: &BoardConfig,
    source: HuxleyClient,
    running: &AtomicBool,
    frames: Option<u64>,
) -> Result<(), AppError> {
    use rail_board::driver::{MatrixDriver, MatrixOptions};

    let display = &config.display;
    let driver = MatrixDriver::new(&MatrixOptions {
        width: display.width,
        height: display.height,
        brightness: display.brightness,
        hardware_mapping: display.hardware_mapping.clone(),
        gpio_slowdown: display.gpio_slowdown,
    })?;
    app::run(config, source, driver, running, frames)?;
    Ok(())
}

#[cfg(not(feature = "hardware"))]
fn run_on_matrix(
    _config: &BoardConfig,
    _source: HuxleyClient,
    _running: &AtomicBool,
    _frames: Option<u64>,
) -> Result<(), AppError> {
    Err(rail_board::driver::DriverError::Unsupported.into())
}
