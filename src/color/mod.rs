mod palette;

use embedded_graphics::pixelcolor::Rgb888;
use smart_leds::RGB8;

pub use palette::Palette;

pub type Rgb = RGB8;

pub const BLACK: Rgb = rgb_from_u32(0x00_00_00);

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Parse `#RRGGBB` or `RRGGBB`
pub fn parse_hex(raw: &str) -> Option<Rgb> {
    let digits = raw.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb_from_u32)
}

pub fn to_rgb888(color: Rgb) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

pub fn from_rgb888(color: Rgb888) -> Rgb {
    use embedded_graphics::pixelcolor::RgbColor;

    Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}
