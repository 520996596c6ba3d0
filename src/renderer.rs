use chrono::NaiveTime;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::board::BoardState;
use crate::feed::{FeedHealth, FeedStatus};
use crate::color::{BLACK, Palette, to_rgb888};
use crate::layout::BoardLayout;
use crate::widget::{BannerWidget, DepartureRowWidget, HeaderWidget, Widget};
use crate::widget::{API_ERROR_LINES, NO_DATA_LINES};

/// Board renderer
///
/// Stateless apart from its configuration: the same state and clock always
/// produce the same frame.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: BoardLayout,
    palette: Palette,
    station: String,
}

impl Renderer {
    pub fn new(layout: BoardLayout, palette: Palette, station: impl Into<String>) -> Self {
        Self {
            layout,
            palette,
            station: station.into(),
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Draw one complete frame
    ///
    /// Clears the target, draws the header, then either the departure rows or
    /// a banner:
    /// - never fetched successfully and the last attempt failed: API error
    /// - fetched successfully but no services: no data
    pub fn render<D>(
        &self,
        target: &mut D,
        state: &BoardState,
        health: &FeedHealth,
        clock: NaiveTime,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        target.clear(to_rgb888(BLACK))?;

        HeaderWidget {
            layout: &self.layout,
            station: &self.station,
            clock,
            station_color: self.palette.header,
            clock_color: self.palette.clock,
        }
        .draw(target)?;

        match health.status() {
            FeedStatus::Waiting => Ok(()),
            FeedStatus::Unreachable => BannerWidget {
                layout: &self.layout,
                lines: API_ERROR_LINES,
                color: self.palette.error,
            }
            .draw(target),
            FeedStatus::Live if state.departures().is_empty() => BannerWidget {
                layout: &self.layout,
                lines: NO_DATA_LINES,
                color: self.palette.notice,
            }
            .draw(target),
            FeedStatus::Live => self.render_rows(target, state),
        }
    }

    fn render_rows<D>(&self, target: &mut D, state: &BoardState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        for (index, (record, row)) in state
            .visible()
            .iter()
            .zip(self.layout.rows())
            .enumerate()
        {
            DepartureRowWidget {
                row,
                record,
                offset: state.scroll_offset(index),
                color: self.palette.status_color(record.status()),
            }
            .draw(target)?;
        }
        Ok(())
    }
}
