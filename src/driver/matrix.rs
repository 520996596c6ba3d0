use log::info;
use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions, LedRuntimeOptions};

use super::DriverError;
use crate::OutputDriver;
use crate::canvas::FrameBuffer;

/// Panel wiring and tuning passed to the matrix library
#[derive(Debug, Clone)]
pub struct MatrixOptions {
    pub width: u32,
    pub height: u32,
    /// 1-100
    pub brightness: u8,
    pub hardware_mapping: String,
    pub gpio_slowdown: u32,
}

/// HUB75 panel driven through `rpi-rgb-led-matrix`
///
/// Frames are double buffered: each write fills the offscreen canvas and
/// swaps it on vsync.
pub struct MatrixDriver {
    matrix: LedMatrix,
    offscreen: Option<LedCanvas>,
}

impl MatrixDriver {
    pub fn new(options: &MatrixOptions) -> Result<Self, DriverError> {
        let mut matrix_options = LedMatrixOptions::new();
        matrix_options.set_rows(options.height);
        matrix_options.set_cols(options.width);
        matrix_options.set_chain_length(1);
        matrix_options.set_parallel(1);
        matrix_options.set_hardware_mapping(&options.hardware_mapping);
        matrix_options
            .set_brightness(options.brightness)
            .map_err(|error| DriverError::Init(error.to_string()))?;

        let mut runtime_options = LedRuntimeOptions::new();
        runtime_options.set_gpio_slowdown(options.gpio_slowdown);

        let matrix = LedMatrix::new(Some(matrix_options), Some(runtime_options))
            .map_err(|error| DriverError::Init(error.to_string()))?;
        let offscreen = matrix.offscreen_canvas();

        info!(
            "LED matrix {}x{} ready ({}, brightness {})",
            options.width, options.height, options.hardware_mapping, options.brightness
        );

        Ok(Self {
            matrix,
            offscreen: Some(offscreen),
        })
    }

    fn swap(&mut self, fill: impl FnOnce(&mut LedCanvas)) {
        let mut canvas = self
            .offscreen
            .take()
            .unwrap_or_else(|| self.matrix.offscreen_canvas());
        canvas.clear();
        fill(&mut canvas);
        self.offscreen = Some(self.matrix.swap(canvas));
    }
}

impl OutputDriver for MatrixDriver {
    fn write(&mut self, frame: &FrameBuffer) {
        self.swap(|canvas| {
            for (x, y, color) in frame.lit_pixels() {
                canvas.set(
                    x,
                    y,
                    &LedColor {
                        red: color.r,
                        green: color.g,
                        blue: color.b,
                    },
                );
            }
        });
    }

    fn clear(&mut self) {
        self.swap(|_| {});
    }
}
