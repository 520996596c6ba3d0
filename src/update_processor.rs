//! Update processing module
//!
//! Applies snapshots produced by the fetch worker to the render loop's
//! [`BoardState`].

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::board::BoardState;
use crate::channel::{Channel, Receiver, Sender};
use crate::departure::DepartureRecord;
use crate::feed::FeedHealth;

/// Message from the fetch worker to the render loop
#[derive(Debug, Clone, PartialEq)]
pub enum BoardUpdate {
    /// A complete, successfully parsed departure list
    Departures {
        records: Vec<DepartureRecord>,
        fetched_at: DateTime<Local>,
    },
    /// A fetch attempt failed; the board keeps what it has
    FetchFailed {
        reason: String,
        at: DateTime<Local>,
    },
}

impl BoardUpdate {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

/// Summary of one `process_pending` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateEffects {
    /// Departure snapshots applied
    pub refreshed: usize,
    /// Failures observed
    pub failures: usize,
}

impl UpdateEffects {
    pub const fn has_effects(&self) -> bool {
        self.refreshed > 0 || self.failures > 0
    }
}

/// Type alias for update sender
pub type UpdateSender<'a, const SIZE: usize> = Sender<'a, BoardUpdate, SIZE>;

/// Type alias for update receiver
pub type UpdateReceiver<'a, const SIZE: usize> = Receiver<'a, BoardUpdate, SIZE>;

/// Type alias for the update channel
pub type UpdateChannel<const SIZE: usize> = Channel<BoardUpdate, SIZE>;

/// Drains pending updates into the board state
pub struct UpdateProcessor<'a, const SIZE: usize> {
    updates: UpdateReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> UpdateProcessor<'a, SIZE> {
    pub const fn new(updates: UpdateReceiver<'a, SIZE>) -> Self {
        Self { updates }
    }

    /// Apply every queued update, oldest first (non-blocking)
    pub fn process_pending(&mut self, state: &mut BoardState, health: &mut FeedHealth) -> UpdateEffects {
        let mut effects = UpdateEffects::default();

        self.updates.drain(|update| {
            match &update {
                BoardUpdate::Departures {
                    records,
                    fetched_at,
                } => {
                    info!(
                        "board refreshed with {} departures fetched at {}",
                        records.len(),
                        fetched_at.format("%H:%M:%S")
                    );
                    effects.refreshed += 1;
                }
                BoardUpdate::FetchFailed { reason, at } => {
                    if let Some(fetched) = state.last_fetch() {
                        debug!(
                            "keeping departures from {} after failure at {}: {}",
                            fetched.format("%H:%M:%S"),
                            at.format("%H:%M:%S"),
                            reason
                        );
                    } else {
                        warn!("no departures yet, upstream unreachable: {}", reason);
                    }
                    effects.failures += 1;
                }
            }
            health.observe(&update);
            state.apply(update);
        });

        effects
    }
}
