//! Board state owned by the render loop

use chrono::{DateTime, Local};

use crate::departure::DepartureRecord;
use crate::layout::{BoardLayout, MAX_VISIBLE_ROWS};
use crate::update_processor::BoardUpdate;

/// Horizontal scroll position of one visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowScroll {
    destination: String,
    offset: u32,
}

impl RowScroll {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    visible_rows: usize,
    departures: Vec<DepartureRecord>,
    scroll: heapless::Vec<RowScroll, MAX_VISIBLE_ROWS>,
    last_fetch: Option<DateTime<Local>>,
}

impl BoardState {
    pub fn new(visible_rows: usize) -> Self {
        Self {
            visible_rows: visible_rows.clamp(1, MAX_VISIBLE_ROWS),
            departures: Vec::new(),
            scroll: heapless::Vec::new(),
            last_fetch: None,
        }
    }

    pub fn departures(&self) -> &[DepartureRecord] {
        &self.departures
    }

    /// Departures that currently have a row on the board
    pub fn visible(&self) -> &[DepartureRecord] {
        let count = self.departures.len().min(self.visible_rows);
        &self.departures[..count]
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn scroll(&self) -> &[RowScroll] {
        &self.scroll
    }

    /// Scroll offset of a visible row, 0 for rows without a departure
    pub fn scroll_offset(&self, row: usize) -> u32 {
        self.scroll.get(row).map_or(0, RowScroll::offset)
    }

    pub fn last_fetch(&self) -> Option<DateTime<Local>> {
        self.last_fetch
    }

    /// Whether any fetch has succeeded, even one without services
    pub fn has_data(&self) -> bool {
        self.last_fetch.is_some()
    }

    /// Apply a worker update
    ///
    /// Failures leave the state untouched; feed health is tracked by
    /// [`FeedHealth`](crate::feed::FeedHealth).
    pub fn apply(&mut self, update: BoardUpdate) {
        match update {
            BoardUpdate::Departures {
                records,
                fetched_at,
            } => self.replace_departures(records, fetched_at),
            BoardUpdate::FetchFailed { .. } => {}
        }
    }

    /// Replace the departure list wholesale
    ///
    /// A row keeps its scroll offset only while it shows the same
    /// destination text.
    pub fn replace_departures(&mut self, records: Vec<DepartureRecord>, fetched_at: DateTime<Local>) {
        let mut scroll = heapless::Vec::new();
        for (row, record) in records.iter().take(self.visible_rows).enumerate() {
            let offset = match self.scroll.get(row) {
                Some(previous) if previous.destination == record.destination() => previous.offset,
                _ => 0,
            };
            // Cannot overflow: visible_rows <= MAX_VISIBLE_ROWS
            let _ = scroll.push(RowScroll {
                destination: record.destination().to_owned(),
                offset,
            });
        }

        self.scroll = scroll;
        self.departures = records;
        self.last_fetch = Some(fetched_at);
    }

    /// Advance every overflowing row by `step` pixels
    ///
    /// An offset wraps to 0 once the text has fully scrolled past. Rows that
    /// fit stay at 0.
    pub fn advance_scroll(&mut self, layout: &BoardLayout, step: u32) {
        for row in &mut self.scroll {
            if !layout.destination_overflows(&row.destination) {
                row.offset = 0;
                continue;
            }
            let width = layout.destination_width(&row.destination);
            row.offset = row.offset.saturating_add(step);
            if row.offset >= width {
                row.offset = 0;
            }
        }
    }
}
