//! In-memory frame buffer
//!
//! The renderer draws into a [`FrameBuffer`] through `embedded-graphics`;
//! output drivers then copy it to the panel once per frame.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::color::{BLACK, Rgb, from_rgb888};

/// Row-major RGB frame buffer with clipping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Reset every pixel to black
    pub fn clear_black(&mut self) {
        self.pixels.fill(BLACK);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index_of(x, y).map(|index| self.pixels[index])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(index) = self.index_of(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Iterate over non-black pixels as `(x, y, color)`
    pub fn lit_pixels(&self) -> impl Iterator<Item = (i32, i32, Rgb)> + '_ {
        let width = self.size.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, color)| **color != BLACK)
            .map(move |(index, color)| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let (x, y) = ((index % width) as i32, (index / width) as i32);
                (x, y, *color)
            })
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, from_rgb888(color));
        }
        Ok(())
    }
}
