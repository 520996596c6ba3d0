//! Frame scheduling and timing utilities.
//!
//! Provides frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use chrono::NaiveTime;
use embassy_time::{Duration, Instant};

use crate::board::BoardState;
use crate::canvas::FrameBuffer;
use crate::feed::FeedHealth;
use crate::update_processor::{UpdateEffects, UpdateProcessor, UpdateReceiver};
use crate::{OutputDriver, Renderer};

/// Default target frame rate (20 FPS), smooth enough for 1px scrolling.
pub const DEFAULT_FPS: u32 = 20;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Default horizontal scroll step in pixels per frame.
pub const DEFAULT_SCROLL_STEP: u32 = 1;

/// Frame duration for a frame rate, clamped to at least 1 FPS.
pub fn frame_duration_for(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
}

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Updates applied during this frame.
    pub updates: UpdateEffects,
}

/// Frame scheduler that owns the board state and drives one frame per tick.
///
/// Each tick:
/// 1. applies pending updates from the fetch worker
/// 2. renders the board into the frame buffer
/// 3. hands the frame to the output driver
/// 4. advances scrolling rows for the next frame
pub struct FrameScheduler<'a, O: OutputDriver, const UPDATE_CHANNEL_SIZE: usize> {
    output: O,
    renderer: Renderer,
    updates: UpdateProcessor<'a, UPDATE_CHANNEL_SIZE>,
    state: BoardState,
    health: FeedHealth,
    canvas: FrameBuffer,
    scroll_step: u32,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: OutputDriver, const UPDATE_CHANNEL_SIZE: usize> FrameScheduler<'a, O, UPDATE_CHANNEL_SIZE> {
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (20 FPS) for frame timing.
    pub fn new(renderer: Renderer, updates: UpdateReceiver<'a, UPDATE_CHANNEL_SIZE>, driver: O) -> Self {
        Self::with_frame_duration(renderer, updates, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer,
        updates: UpdateReceiver<'a, UPDATE_CHANNEL_SIZE>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        let size = renderer.layout().size();
        let state = BoardState::new(renderer.layout().visible_rows());
        Self {
            output: driver,
            renderer,
            updates: UpdateProcessor::new(updates),
            state,
            health: FeedHealth::new(),
            canvas: FrameBuffer::new(size.width, size.height),
            scroll_step: DEFAULT_SCROLL_STEP,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Set the scroll step in pixels per frame.
    #[must_use]
    pub fn with_scroll_step(mut self, step: u32) -> Self {
        self.scroll_step = step.max(1);
        self
    }

    /// Process one frame and return timing information.
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant, clock: NaiveTime) -> FrameResult {
        // Skip the backlog after a stall instead of bursting to catch up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let updates = self.updates
            .process_pending(&mut self.state, &mut self.health);

        let Ok(()) = self.renderer
            .render(&mut self.canvas, &self.state, &self.health, clock);
        self.output.write(&self.canvas);

        self.state
            .advance_scroll(self.renderer.layout(), self.scroll_step);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            updates,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn health(&self) -> &FeedHealth {
        &self.health
    }

    /// The most recently rendered frame.
    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Consume the scheduler and hand back the output driver.
    pub fn into_output(self) -> O {
        self.output
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}
