use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::{Widget, draw_text};
use crate::color::Rgb;
use crate::departure::DepartureRecord;
use crate::layout::{COLUMN_GAP, ROW_FONT, RowLayout, TEXT_MARGIN, text_width};

/// One departure: destination on the first line, platform and time below
///
/// The destination is shifted left by `offset` pixels and clipped to its
/// line. The time is right-aligned; the platform label is dropped when both
/// do not fit.
pub struct DepartureRowWidget<'a> {
    pub row: &'a RowLayout,
    pub record: &'a DepartureRecord,
    pub offset: u32,
    pub color: Rgb,
}

impl DepartureRowWidget<'_> {
    fn destination_origin(&self) -> Point {
        let line = self.row.destination_line;
        let offset = i32::try_from(self.offset).unwrap_or(i32::MAX);
        Point::new(line.top_left.x + TEXT_MARGIN - offset, line.top_left.y)
    }
}

impl Widget for DepartureRowWidget<'_> {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let destination_line = self.row.destination_line;
        draw_text(
            &mut target.clipped(&destination_line),
            self.record.destination(),
            self.destination_origin(),
            ROW_FONT,
            self.color,
        )?;

        let status_line = self.row.status_line;
        let mut status = target.clipped(&status_line);

        let time = self.record.display_time();
        let time_width = text_width(ROW_FONT, &time);
        let line_width = status_line.size.width;
        let time_x = i32::try_from(line_width.saturating_sub(time_width))
            .unwrap_or(0)
            .max(TEXT_MARGIN);

        let platform = self.record.platform_label();
        let platform_width = text_width(ROW_FONT, &platform);
        let margin = TEXT_MARGIN.unsigned_abs();
        if margin + platform_width + COLUMN_GAP + time_width <= line_width {
            draw_text(
                &mut status,
                &platform,
                Point::new(status_line.top_left.x + TEXT_MARGIN, status_line.top_left.y),
                ROW_FONT,
                self.color,
            )?;
        }

        draw_text(
            &mut status,
            &time,
            Point::new(status_line.top_left.x + time_x, status_line.top_left.y),
            ROW_FONT,
            self.color,
        )
    }
}
