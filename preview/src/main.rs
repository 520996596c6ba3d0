//! Desktop preview for the departure board
//!
//! Renders the board in a window, one egui rect per LED. Scenario buttons push
//! canned snapshots through the same update channel the fetch worker uses.

use std::time::Instant as StdInstant;

use chrono::{Local, NaiveTime, Timelike};
use eframe::egui;
use rail_board::config::ConfigError;
use rail_board::driver::MemoryDriver;
use rail_board::{
    BoardConfig, BoardUpdate, DepartureRecord, EstimatedTime, FeedStatus, FrameScheduler,
    Instant, Renderer, UpdateChannel, UpdateSender,
};

/// Update channel size
const UPDATE_CHANNEL_SIZE: usize = 4;

/// Static update channel between the scenario buttons and the scheduler
static UPDATES: UpdateChannel<UPDATE_CHANNEL_SIZE> = UpdateChannel::new();

/// Default size of each LED in pixels
const LED_SIZE: f32 = 10.0;

/// Gap between LEDs
const LED_GAP: f32 = 1.0;

const UNLIT: egui::Color32 = egui::Color32::from_rgb(16, 16, 16);

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 520.0])
            .with_title("Rail Board Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "rail-board-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()?))),
    )
}

fn time(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn record(
    destination: &str,
    platform: Option<&str>,
    scheduled: Option<NaiveTime>,
    estimated: EstimatedTime,
    cancelled: bool,
) -> DepartureRecord {
    DepartureRecord::new(
        destination,
        platform.map(str::to_owned),
        scheduled,
        estimated,
        cancelled,
    )
}

fn sample_departures() -> Vec<DepartureRecord> {
    vec![
        record("Glasgow Central", Some("1"), time(14, 5), EstimatedTime::OnTime, false),
        record("Lanark", Some("2"), time(14, 12), EstimatedTime::OnTime, false),
        record("Dalmuir", None, time(14, 20), EstimatedTime::OnTime, false),
    ]
}

fn delayed_departures() -> Vec<DepartureRecord> {
    vec![
        record(
            "Glasgow Central via Hamilton",
            Some("1"),
            time(14, 5),
            time(14, 22).map_or(EstimatedTime::Unknown, EstimatedTime::At),
            false,
        ),
        record("Lanark", Some("2"), time(14, 12), EstimatedTime::Delayed, false),
    ]
}

fn cancelled_departures() -> Vec<DepartureRecord> {
    vec![
        record("Motherwell", Some("3"), time(14, 8), EstimatedTime::Cancelled, true),
        record("Glasgow Central", Some("1"), time(14, 35), EstimatedTime::OnTime, false),
    ]
}

struct PreviewApp {
    scheduler: FrameScheduler<'static, MemoryDriver, UPDATE_CHANNEL_SIZE>,
    updates: UpdateSender<'static, UPDATE_CHANNEL_SIZE>,
    /// Synthetic time in microseconds
    t_us: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Frame deadline in synthetic time
    next_deadline: Instant,
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Result<Self, ConfigError> {
        let config = BoardConfig::default();
        let layout = config.layout()?;
        let palette = config.palette()?;

        let scheduler = FrameScheduler::new(
            Renderer::new(layout, palette, config.station.clone()),
            UPDATES.receiver(),
            MemoryDriver::new(),
        )
        .with_scroll_step(config.display.scroll_step);

        Ok(Self {
            scheduler,
            updates: UPDATES.sender(),
            t_us: 0,
            last_frame: StdInstant::now(),
            next_deadline: Instant::from_micros(0),
            playing: true,
            time_scale: 1.0,
            led_size: LED_SIZE,
        })
    }

    fn publish(&self, records: Vec<DepartureRecord>) {
        let _ = self.updates.send(BoardUpdate::Departures {
            records,
            fetched_at: Local::now(),
        });
    }

    fn publish_failure(&self) {
        let _ = self.updates.send(BoardUpdate::FetchFailed {
            reason: "simulated outage".to_owned(),
            at: Local::now(),
        });
    }

    /// Advance synthetic time and run every frame that became due
    fn advance(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_us = (delta.as_secs_f64() * 1_000_000.0 * f64::from(self.time_scale)) as u64;
            self.t_us = self.t_us.saturating_add(delta_us);
        }

        let now = Instant::from_micros(self.t_us);
        let clock = Local::now().time().with_nanosecond(0).unwrap_or_default();
        if now >= self.next_deadline {
            self.next_deadline = self.scheduler.tick(now, clock).next_deadline;
        }
    }

    fn feed_label(&self) -> &'static str {
        match self.scheduler.health().status() {
            FeedStatus::Waiting => "waiting",
            FeedStatus::Live => "live",
            FeedStatus::Unreachable => "unreachable",
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance();
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("On time").clicked() {
                    self.publish(sample_departures());
                }
                if ui.button("Delayed").clicked() {
                    self.publish(delayed_departures());
                }
                if ui.button("Cancelled").clicked() {
                    self.publish(cancelled_departures());
                }
                if ui.button("Empty").clicked() {
                    self.publish(Vec::new());
                }
                if ui.button("Fetch failure").clicked() {
                    self.publish_failure();
                }
            });

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                if ui
                    .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                    .clicked()
                {
                    self.playing = !self.playing;
                }
                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                ui.add_space(8.0);
                ui.label("Size:");
                ui.add(egui::Slider::new(&mut self.led_size, 2.0..=16.0));
            });

            ui.add_space(4.0);

            let state = self.scheduler.state();
            let fetched = state
                .last_fetch()
                .map(|at| at.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_owned());
            ui.label(format!(
                "Feed: {}, {} departures, last fetch {}",
                self.feed_label(),
                state.departures().len(),
                fetched
            ));

            ui.add_space(12.0);

            let canvas = self.scheduler.canvas();
            let pitch = self.led_size + LED_GAP;
            #[allow(clippy::cast_precision_loss)]
            let size = egui::vec2(canvas.width() as f32 * pitch, canvas.height() as f32 * pitch);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let origin = response.rect.min;

            painter.rect_filled(response.rect, 0.0, egui::Color32::BLACK);

            let width = canvas.width() as usize;
            #[allow(clippy::cast_precision_loss)]
            for (index, pixel) in canvas.pixels().iter().enumerate() {
                let x = origin.x + (index % width) as f32 * pitch;
                let y = origin.y + (index / width) as f32 * pitch;
                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let color = if pixel.r == 0 && pixel.g == 0 && pixel.b == 0 {
                    UNLIT
                } else {
                    egui::Color32::from_rgb(pixel.r, pixel.g, pixel.b)
                };
                painter.circle_filled(rect.center(), self.led_size / 2.0, color);
            }
        });
    }
}
