//! Output drivers
//!
//! [`MemoryDriver`] keeps frames in memory for headless runs and tests.
//! `MatrixDriver` (feature `hardware`) pushes frames to an RGB matrix via
//! the `rpi-rgb-led-matrix` library.

#[cfg(feature = "hardware")]
mod matrix;
mod memory;

use thiserror::Error;

#[cfg(feature = "hardware")]
pub use matrix::{MatrixDriver, MatrixOptions};
pub use memory::MemoryDriver;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to initialise LED matrix: {0}")]
    Init(String),
    #[error("built without LED matrix support, rebuild with `--features hardware` or run with --headless")]
    Unsupported,
}
