//! Board geometry
//!
//! The canvas is split into a header band tall enough for the clock font and
//! a body holding `visible_rows` equal departure rows. Each row has two text
//! lines: the destination, then platform and time.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_5X8};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;
use thiserror::Error;

/// Upper bound for `visible_rows`
pub const MAX_VISIBLE_ROWS: usize = 8;

/// Font of departure rows and banners
pub const ROW_FONT: &MonoFont<'static> = &FONT_4X6;

/// Font of the header (clock and station code)
pub const CLOCK_FONT: &MonoFont<'static> = &FONT_5X8;

/// Left padding of every text line
pub const TEXT_MARGIN: i32 = 1;

/// Minimum gap between two texts sharing a line
pub const COLUMN_GAP: u32 = 4;

/// Vertical gap between the two banner lines
const BANNER_LINE_GAP: u32 = 2;

const CLOCK_SAMPLE: &str = "00:00:00";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("canvas {width}x{height} has no drawable area")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("visible rows must be between 1 and {max}, got {rows}")]
    RowCount { rows: usize, max: usize },
    #[error("{rows} rows of {needed}px do not fit into the {available}px below the clock")]
    TooTall {
        rows: usize,
        needed: u32,
        available: u32,
    },
}

/// Pixel width of `text` rendered in a monospaced font
pub fn text_width(font: &MonoFont<'_>, text: &str) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    if chars == 0 {
        return 0;
    }
    let advance = font.character_size.width + font.character_spacing;
    chars.saturating_mul(advance) - font.character_spacing
}

/// One departure row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pub area: Rectangle,
    /// First line, holds the (possibly scrolling) destination
    pub destination_line: Rectangle,
    /// Second line, holds platform and time
    pub status_line: Rectangle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    size: Size,
    header: Rectangle,
    body: Rectangle,
    rows: Vec<RowLayout, MAX_VISIBLE_ROWS>,
}

impl BoardLayout {
    pub fn new(width: u32, height: u32, visible_rows: usize) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyCanvas { width, height });
        }
        if visible_rows == 0 || visible_rows > MAX_VISIBLE_ROWS {
            return Err(LayoutError::RowCount {
                rows: visible_rows,
                max: MAX_VISIBLE_ROWS,
            });
        }

        let header_height = CLOCK_FONT.character_size.height;
        let line_height = ROW_FONT.character_size.height;
        let needed = line_height * 2;
        let available = height.saturating_sub(header_height);

        #[allow(clippy::cast_possible_truncation)]
        let row_count = visible_rows as u32;
        let row_height = available / row_count;
        if row_height < needed {
            return Err(LayoutError::TooTall {
                rows: visible_rows,
                needed,
                available,
            });
        }

        let header = Rectangle::new(Point::zero(), Size::new(width, header_height));
        let body = Rectangle::new(
            Point::new(0, to_i32(header_height)),
            Size::new(width, available),
        );

        let padding = (row_height - needed) / 2;
        let mut rows = Vec::new();
        for index in 0..row_count {
            let top = body.top_left.y + to_i32(index * row_height);
            let first_line = top + to_i32(padding);
            let row = RowLayout {
                area: Rectangle::new(Point::new(0, top), Size::new(width, row_height)),
                destination_line: Rectangle::new(
                    Point::new(0, first_line),
                    Size::new(width, line_height),
                ),
                status_line: Rectangle::new(
                    Point::new(0, first_line + to_i32(line_height)),
                    Size::new(width, line_height),
                ),
            };
            // Cannot overflow: row_count <= MAX_VISIBLE_ROWS
            let _ = rows.push(row);
        }

        Ok(Self {
            size: Size::new(width, height),
            header,
            body,
            rows,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn header(&self) -> Rectangle {
        self.header
    }

    pub fn body(&self) -> Rectangle {
        self.body
    }

    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    pub fn visible_rows(&self) -> usize {
        self.rows.len()
    }

    /// Top-left corner of the clock, flush with the right edge
    pub fn clock_origin(&self) -> Point {
        let clock_width = text_width(CLOCK_FONT, CLOCK_SAMPLE);
        Point::new(to_i32(self.size.width.saturating_sub(clock_width)), 0)
    }

    pub fn station_origin(&self) -> Point {
        Point::new(TEXT_MARGIN, 0)
    }

    /// Width available to the station code left of the clock
    pub fn station_capacity(&self) -> u32 {
        let clock_x = u32::try_from(self.clock_origin().x - TEXT_MARGIN).unwrap_or(0);
        clock_x.saturating_sub(COLUMN_GAP)
    }

    /// Width a destination may take before it has to scroll
    pub fn destination_capacity(&self) -> u32 {
        self.size.width.saturating_sub(TEXT_MARGIN.unsigned_abs())
    }

    pub fn destination_width(&self, destination: &str) -> u32 {
        text_width(ROW_FONT, destination)
    }

    pub fn destination_overflows(&self, destination: &str) -> bool {
        self.destination_width(destination) > self.destination_capacity()
    }

    /// Origins of the two banner lines, vertically centred in the body
    pub fn banner_origins(&self) -> [Point; 2] {
        let line_height = ROW_FONT.character_size.height;
        let block = line_height * 2 + BANNER_LINE_GAP;
        let top = self.body.top_left.y + to_i32(self.body.size.height.saturating_sub(block) / 2);
        [
            Point::new(TEXT_MARGIN, top),
            Point::new(TEXT_MARGIN, top + to_i32(line_height + BANNER_LINE_GAP)),
        ]
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
