//! Feed health, kept apart from the departures it describes

use chrono::{DateTime, Local};

use crate::update_processor::BoardUpdate;

/// Health of the departure feed as far as the board is concerned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing fetched yet and nothing failed yet
    #[default]
    Waiting,
    /// At least one departure list has been applied
    Live,
    /// Every attempt so far has failed
    Unreachable,
}

/// Most recent failed fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub reason: String,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedHealth {
    status: FeedStatus,
    last_failure: Option<FetchFailure>,
    failures_in_row: u32,
}

impl FeedHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    /// Last failure, kept after later successes for diagnostics
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    pub fn failures_in_row(&self) -> u32 {
        self.failures_in_row
    }

    pub fn observe(&mut self, update: &BoardUpdate) {
        match update {
            BoardUpdate::Departures { .. } => self.record_success(),
            BoardUpdate::FetchFailed { reason, at } => self.record_failure(reason.clone(), *at),
        }
    }

    pub fn record_success(&mut self) {
        self.status = FeedStatus::Live;
        self.failures_in_row = 0;
    }

    /// A failure only changes what the board shows while nothing was
    /// ever fetched
    pub fn record_failure(&mut self, reason: impl Into<String>, at: DateTime<Local>) {
        self.last_failure = Some(FetchFailure {
            reason: reason.into(),
            at,
        });
        self.failures_in_row = self.failures_in_row.saturating_add(1);
        if self.status == FeedStatus::Waiting {
            self.status = FeedStatus::Unreachable;
        }
    }
}
