//! Board widgets
//!
//! Each widget draws one fixed region of the board. Widgets are plain views
//! over borrowed state and never mutate it.

mod banner;
mod departure_row;
mod header;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

pub use banner::{API_ERROR_LINES, BannerWidget, NO_DATA_LINES};
pub use departure_row::DepartureRowWidget;
pub use header::HeaderWidget;

use crate::color::{Rgb, to_rgb888};

pub trait Widget {
    /// Draw the widget onto `target`
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>;
}

/// Draw `text` with its top-left corner at `origin`
pub(crate) fn draw_text<D>(
    target: &mut D,
    text: &str,
    origin: Point,
    font: &MonoFont<'_>,
    color: Rgb,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(font, to_rgb888(color));
    Text::with_baseline(text, origin, style, Baseline::Top).draw(target)?;
    Ok(())
}
