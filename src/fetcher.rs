//! Departure fetching
//!
//! [`HuxleyClient`] talks to a Huxley2 instance over blocking HTTP.
//! [`FetchWorker`] polls a [`DepartureSource`] on its own thread and publishes
//! every outcome as a [`BoardUpdate`], pacing itself with a [`RetryPolicy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use isahc::config::Configurable;
use isahc::error::ErrorKind;
use isahc::{HttpClient, ReadResponseExt};
use log::{debug, info, warn};
use thiserror::Error;

use crate::departure::DepartureRecord;
use crate::huxley;
use crate::update_processor::{BoardUpdate, UpdateSender};

/// Lower bound for any delay between two requests
pub const MIN_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Granularity at which a sleeping worker notices shutdown
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Transport(#[from] isahc::Error),
    #[error("upstream answered with status {0}")]
    Status(u16),
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
    #[error("malformed departures payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(error) if matches!(error.kind(), ErrorKind::Timeout))
    }
}

/// Anything that can produce the departure list of a station
pub trait DepartureSource {
    fn fetch(&self, station: &str) -> Result<Vec<DepartureRecord>, FetchError>;
}

/// Settings for [`HuxleyClient`]
#[derive(Debug, Clone)]
pub struct HuxleyClientConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    /// Number of services to request
    pub rows: u32,
    pub timeout: Duration,
    pub destination_max_chars: usize,
}

/// Blocking Huxley2 client
pub struct HuxleyClient {
    base_url: String,
    access_token: Option<String>,
    rows: u32,
    destination_max_chars: usize,
    client: HttpClient,
}

impl HuxleyClient {
    pub fn new(config: HuxleyClientConfig) -> Result<Self, FetchError> {
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .default_header("Accept", "application/json")
            .build()?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_owned();

        Ok(Self {
            base_url,
            access_token: config.access_token.filter(|token| !token.is_empty()),
            rows: config.rows,
            destination_max_chars: config.destination_max_chars,
            client,
        })
    }

    /// `GET {base}/departures/{station}/{rows}[?accessToken=...]`
    ///
    /// The token is percent-encoded.
    pub fn departures_url(&self, station: &str) -> String {
        let mut url = format!("{}/departures/{}/{}", self.base_url, station, self.rows);
        if let Some(token) = &self.access_token {
            url.push_str("?accessToken=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }
}

impl DepartureSource for HuxleyClient {
    fn fetch(&self, station: &str) -> Result<Vec<DepartureRecord>, FetchError> {
        let mut response = self.client.get(self.departures_url(station))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let board = huxley::parse_board(body.as_bytes())?;
        debug!(
            "{} ({}) returned {} services",
            board.location_name.as_deref().unwrap_or(station),
            board.crs.as_deref().unwrap_or(station),
            board.service_count()
        );

        let records = board.into_records(self.destination_max_chars);
        for record in &records {
            debug!(
                "{} {} {} [{}]",
                record.display_time(),
                record.platform_label(),
                record.destination(),
                record.status().as_str()
            );
        }
        Ok(records)
    }
}

/// Delay schedule between fetches
///
/// Successful fetches are spaced by `interval`. Consecutive failures back off
/// exponentially from `base`, capped at `cap`. All delays are at least
/// [`MIN_RETRY_DELAY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    interval: Duration,
    base: Duration,
    cap: Duration,
    failures: u32,
}

impl RetryPolicy {
    pub fn new(interval: Duration, base: Duration, cap: Duration) -> Self {
        let base = base.max(MIN_RETRY_DELAY);
        Self {
            interval: interval.max(MIN_RETRY_DELAY),
            base,
            cap: cap.max(base),
            failures: 0,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Reset the backoff and return the regular interval
    pub fn record_success(&mut self) -> Duration {
        self.failures = 0;
        self.interval
    }

    /// Count a failure and return the delay before the next attempt
    pub fn record_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        let exponent = (self.failures - 1).min(16);
        self.base.saturating_mul(1 << exponent).min(self.cap)
    }
}

/// Polls a source and turns each attempt into a [`BoardUpdate`]
pub struct FetchWorker<S> {
    source: S,
    station: String,
    policy: RetryPolicy,
}

impl<S: DepartureSource> FetchWorker<S> {
    pub fn new(source: S, station: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            source,
            station: station.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run one fetch attempt
    ///
    /// Returns the update to publish and how long to wait before the next
    /// attempt.
    pub fn poll(&mut self, now: DateTime<Local>) -> (BoardUpdate, Duration) {
        match self.source.fetch(&self.station) {
            Ok(records) => {
                let delay = self.policy.record_success();
                info!(
                    "fetched {} departures for {}, next refresh in {}s",
                    records.len(),
                    self.station,
                    delay.as_secs()
                );
                (
                    BoardUpdate::Departures {
                        records,
                        fetched_at: now,
                    },
                    delay,
                )
            }
            Err(error) => {
                let delay = self.policy.record_failure();
                warn!(
                    "fetching departures for {} failed ({} in a row{}): {}, retrying in {}s",
                    self.station,
                    self.policy.failures(),
                    if error.is_timeout() { ", timed out" } else { "" },
                    error,
                    delay.as_secs()
                );
                (
                    BoardUpdate::FetchFailed {
                        reason: error.to_string(),
                        at: now,
                    },
                    delay,
                )
            }
        }
    }

    /// Poll until `running` is cleared, publishing every outcome
    pub fn run<const SIZE: usize>(&mut self, updates: UpdateSender<'_, SIZE>, running: &AtomicBool) {
        info!("fetch worker started for {}", self.station);
        while running.load(Ordering::Relaxed) {
            let (update, delay) = self.poll(Local::now());
            // Pending failures go first so a queued departure list survives
            if let Some(dropped) = updates.send_evicting(update, BoardUpdate::is_failure) {
                debug!(
                    "render loop lagging, dropped a pending {}",
                    if dropped.is_failure() { "failure" } else { "departure list" }
                );
            }
            sleep_while_running(delay, running);
        }
        info!("fetch worker stopped");
    }
}

fn sleep_while_running(delay: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + delay;
    while running.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(SHUTDOWN_POLL));
    }
}
