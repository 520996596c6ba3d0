//! Process wiring
//!
//! The fetch worker runs on a scoped thread and publishes snapshots through an
//! [`UpdateChannel`]; the calling thread runs the frame loop and is the only
//! owner of the board state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration as StdDuration, Instant as StdInstant};

use chrono::{Local, Timelike};
use embassy_time::Instant;
use log::{info, warn};
use thiserror::Error;

use crate::config::{BoardConfig, ConfigError};
use crate::driver::DriverError;
use crate::fetcher::{DepartureSource, FetchError, FetchWorker};
use crate::frame_scheduler::{FrameScheduler, frame_duration_for};
use crate::update_processor::UpdateChannel;
use crate::{OutputDriver, Renderer};

/// Pending snapshots the render loop may fall behind by
pub const UPDATE_CHANNEL_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("failed to set up departures client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("fetch worker panicked")]
    WorkerPanicked,
}

/// Run the board until `running` is cleared or `max_frames` frames are drawn
///
/// Blocks the calling thread. Blanks the panel before returning.
pub fn run<S, O>(
    config: &BoardConfig,
    source: S,
    driver: O,
    running: &AtomicBool,
    max_frames: Option<u64>,
) -> Result<O, AppError>
where
    S: DepartureSource + Send,
    O: OutputDriver,
{
    let layout = config.layout()?;
    let palette = config.palette()?;
    let renderer = Renderer::new(layout, palette, config.station.clone());

    let channel: UpdateChannel<UPDATE_CHANNEL_SIZE> = UpdateChannel::new();
    let mut worker = FetchWorker::new(source, config.station.clone(), config.retry_policy());

    let mut scheduler = FrameScheduler::with_frame_duration(
        renderer,
        channel.receiver(),
        driver,
        frame_duration_for(config.display.frame_rate),
    )
    .with_scroll_step(config.display.scroll_step);

    info!(
        "showing departures for {} at {} FPS, refreshing every {}s",
        config.station, config.display.frame_rate, config.fetch_interval_secs
    );

    let worker_result = thread::scope(|scope| {
        let sender = channel.sender();
        let handle = scope.spawn(move || worker.run(sender, running));

        let started = StdInstant::now();
        let mut frames = 0_u64;
        while running.load(Ordering::Relaxed) {
            let now = elapsed_instant(started);
            let clock = Local::now().time().with_nanosecond(0).unwrap_or_default();
            let result = scheduler.tick(now, clock);

            frames += 1;
            if max_frames.is_some_and(|max| frames >= max) {
                info!("drew {} frames, stopping", frames);
                break;
            }

            thread::sleep(StdDuration::from_micros(result.sleep_duration.as_micros()));
        }

        running.store(false, Ordering::Relaxed);
        handle.join()
    });

    let mut driver = scheduler.into_output();
    driver.clear();

    if worker_result.is_err() {
        warn!("fetch worker terminated abnormally");
        return Err(AppError::WorkerPanicked);
    }
    Ok(driver)
}

fn elapsed_instant(started: StdInstant) -> Instant {
    let micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    Instant::from_micros(micros)
}
