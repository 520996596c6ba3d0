//! Departure records and status derivation
//!
//! A [`DepartureRecord`] is built once from upstream data and never mutated.
//! Its [`DepartureStatus`] is a pure function of the scheduled time, the
//! estimated time and the cancellation flag.

use chrono::{NaiveTime, Timelike};

/// Placeholder shown when the scheduled time is missing or unparseable
pub const UNKNOWN_TIME: &str = "??:??";

/// Text shown in place of the time for cancelled services
pub const CANCELLED_TEXT: &str = "Cancelled";

/// Destination shown when upstream sends none
pub const UNKNOWN_DESTINATION: &str = "Unknown";

const ESTIMATE_ON_TIME: &str = "on time";
const ESTIMATE_DELAYED: &str = "delayed";
const ESTIMATE_CANCELLED: &str = "cancelled";

const TRIM_SUFFIX: &str = "...";

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Status of a departure as shown on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureStatus {
    OnTime,
    Delayed,
    Cancelled,
}

impl DepartureStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnTime => "on_time",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Estimated departure time as reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatedTime {
    /// Explicit "On time" sentinel
    OnTime,
    /// Concrete estimate
    At(NaiveTime),
    /// Running late without a concrete estimate
    Delayed,
    /// Upstream marks the estimate itself as cancelled
    Cancelled,
    /// Field absent, empty or unrecognised
    Unknown,
}

impl EstimatedTime {
    /// Parse the upstream `etd` text
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::Unknown;
        };

        if let Some(time) = parse_hhmm(raw) {
            return Self::At(time);
        }

        match raw.to_ascii_lowercase().as_str() {
            ESTIMATE_ON_TIME => Self::OnTime,
            ESTIMATE_DELAYED => Self::Delayed,
            ESTIMATE_CANCELLED => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// Parse a `HH:MM` wall clock time
pub fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Format a time as `HH:MM`
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Derive the board status of a service
///
/// Cancellation wins over any estimate. An estimate counts as late when it
/// is less than twelve hours after the scheduled time, so services running
/// past midnight are still reported as delayed.
pub fn derive_status(
    scheduled: Option<NaiveTime>,
    estimated: EstimatedTime,
    cancelled: bool,
) -> DepartureStatus {
    if cancelled {
        return DepartureStatus::Cancelled;
    }

    match estimated {
        EstimatedTime::Cancelled => DepartureStatus::Cancelled,
        EstimatedTime::Delayed => DepartureStatus::Delayed,
        EstimatedTime::OnTime | EstimatedTime::Unknown => DepartureStatus::OnTime,
        EstimatedTime::At(estimate) => match scheduled {
            Some(scheduled) if is_later(scheduled, estimate) => DepartureStatus::Delayed,
            _ => DepartureStatus::OnTime,
        },
    }
}

fn minute_of_day(time: NaiveTime) -> i32 {
    #[allow(clippy::cast_possible_wrap)]
    let minutes = (time.hour() * 60 + time.minute()) as i32;
    minutes
}

fn is_later(scheduled: NaiveTime, estimate: NaiveTime) -> bool {
    let diff = (minute_of_day(estimate) - minute_of_day(scheduled)).rem_euclid(MINUTES_PER_DAY);
    diff > 0 && diff < MINUTES_PER_DAY / 2
}

/// Trim a destination to at most `max_chars` characters
///
/// Longer names keep their head and end with `...`.
pub fn trim_destination(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }
    let keep = max_chars.saturating_sub(TRIM_SUFFIX.len());
    let mut trimmed: String = name.chars().take(keep).collect();
    trimmed.push_str(TRIM_SUFFIX);
    trimmed
}

/// A single departure shown on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRecord {
    destination: String,
    platform: Option<String>,
    scheduled: Option<NaiveTime>,
    estimated: EstimatedTime,
    status: DepartureStatus,
}

impl DepartureRecord {
    pub fn new(
        destination: impl Into<String>,
        platform: Option<String>,
        scheduled: Option<NaiveTime>,
        estimated: EstimatedTime,
        cancelled: bool,
    ) -> Self {
        Self {
            destination: destination.into(),
            platform: platform.filter(|platform| !platform.trim().is_empty()),
            scheduled,
            estimated,
            status: derive_status(scheduled, estimated, cancelled),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn scheduled(&self) -> Option<NaiveTime> {
        self.scheduled
    }

    pub fn estimated(&self) -> EstimatedTime {
        self.estimated
    }

    pub fn status(&self) -> DepartureStatus {
        self.status
    }

    /// Scheduled time as `HH:MM`, or `??:??` when unknown
    pub fn scheduled_text(&self) -> String {
        self.scheduled
            .map(format_hhmm)
            .unwrap_or_else(|| UNKNOWN_TIME.to_owned())
    }

    /// Platform label, `P?` when not yet announced
    pub fn platform_label(&self) -> String {
        format!("P{}", self.platform().unwrap_or("?"))
    }

    /// Time column text
    ///
    /// - on time: `14:05`
    /// - delayed: `14:05 -> 14:22`, or `14:05 Delayed` without an estimate
    /// - cancelled: `Cancelled`
    pub fn display_time(&self) -> String {
        let scheduled = self.scheduled_text();
        match (self.status, self.estimated) {
            (DepartureStatus::Cancelled, _) => CANCELLED_TEXT.to_owned(),
            (DepartureStatus::Delayed, EstimatedTime::At(estimate)) => {
                format!("{} -> {}", scheduled, format_hhmm(estimate))
            }
            (DepartureStatus::Delayed, _) => format!("{} Delayed", scheduled),
            (DepartureStatus::OnTime, _) => scheduled,
        }
    }
}
