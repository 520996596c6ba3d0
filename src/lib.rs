//! Live train departure board for RGB LED matrix panels.
//!
//! A fetch worker polls a Huxley2 endpoint and publishes complete departure
//! snapshots over a bounded channel. The frame loop owns the [`BoardState`],
//! applies those snapshots, and renders header, clock, and departure rows into
//! a [`FrameBuffer`] that an [`OutputDriver`] pushes to the panel.

pub mod app;
pub mod board;
pub mod canvas;
pub mod channel;
pub mod color;
pub mod config;
pub mod departure;
pub mod driver;
pub mod feed;
pub mod fetcher;
pub mod frame_scheduler;
pub mod huxley;
pub mod layout;
pub mod renderer;
pub mod update_processor;
pub mod widget;

pub use board::BoardState;
pub use feed::{FeedHealth, FeedStatus, FetchFailure};
pub use canvas::FrameBuffer;
pub use config::BoardConfig;
pub use departure::{DepartureRecord, DepartureStatus, EstimatedTime};
pub use fetcher::{DepartureSource, FetchError, FetchWorker, HuxleyClient, RetryPolicy};
pub use frame_scheduler::FrameScheduler;
pub use layout::BoardLayout;
pub use renderer::Renderer;
pub use update_processor::{
    BoardUpdate, UpdateChannel, UpdateEffects, UpdateProcessor, UpdateReceiver, UpdateSender,
};

pub use color::{Palette, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract panel driver trait
///
/// Implement this trait to support different display hardware.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Push a complete frame to the panel
    fn write(&mut self, frame: &FrameBuffer);

    /// Blank the panel
    fn clear(&mut self) {}
}
