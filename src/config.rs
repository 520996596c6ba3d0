//! Board configuration
//!
//! Loaded from an optional TOML file; every key has a default so an empty
//! file (or no file) yields a working board for Newton (Lanark).
//!
//! ```toml
//! station = "NTN"
//! fetch_interval_secs = 60
//!
//! [display]
//! visible_rows = 2
//!
//! [palette]
//! delayed = "#FFA500"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use serde::Deserialize;
use thiserror::Error;

use crate::color::{Palette, parse_hex};
use crate::fetcher::{HuxleyClientConfig, MIN_RETRY_DELAY, RetryPolicy};
use crate::layout::{BoardLayout, LayoutError, MAX_VISIBLE_ROWS};

pub const DEFAULT_STATION: &str = "NTN";
pub const DEFAULT_API_BASE_URL: &str = "https://huxley2.azurewebsites.net";

const MAX_FRAME_RATE: u32 = 120;
const MIN_DESTINATION_CHARS: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("invalid color `{key}` = {value:?}, expected #RRGGBB")]
    InvalidColor { key: &'static str, value: String },
    #[error("invalid display geometry: {0}")]
    Layout(#[from] LayoutError),
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// CRS code of the station
    pub station: String,
    pub api_base_url: String,
    pub access_token: Option<String>,
    /// Services requested per fetch
    pub fetch_rows: u32,
    pub fetch_interval_secs: u64,
    pub http_timeout_secs: u64,
    pub retry_base_secs: u64,
    pub retry_cap_secs: u64,
    pub display: DisplayConfig,
    pub palette: PaletteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub visible_rows: usize,
    pub frame_rate: u32,
    /// Pixels per frame
    pub scroll_step: u32,
    pub destination_max_chars: usize,
    /// Hardware only, 1-100
    pub brightness: u8,
    /// Hardware only
    pub hardware_mapping: String,
    /// Hardware only
    pub gpio_slowdown: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub on_time: String,
    pub delayed: String,
    pub cancelled: String,
    pub clock: String,
    pub header: String,
    pub error: String,
    pub notice: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            station: DEFAULT_STATION.to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            access_token: None,
            fetch_rows: 10,
            fetch_interval_secs: 60,
            http_timeout_secs: 5,
            retry_base_secs: 5,
            retry_cap_secs: 120,
            display: DisplayConfig::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            visible_rows: 2,
            frame_rate: 20,
            scroll_step: 1,
            destination_max_chars: 32,
            brightness: 60,
            hardware_mapping: "adafruit-hat".to_owned(),
            gpio_slowdown: 4,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            on_time: "#00FF00".to_owned(),
            delayed: "#FFA500".to_owned(),
            cancelled: "#FF0000".to_owned(),
            clock: "#FFFFFF".to_owned(),
            header: "#FFA500".to_owned(),
            error: "#FF0000".to_owned(),
            notice: "#FFA500".to_owned(),
        }
    }
}

impl BoardConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Uppercase the station code and strip trailing slashes from the URL
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.station = self.station.trim().to_ascii_uppercase();
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_owned();
        self.access_token = self
            .access_token
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.station.is_empty() || !self.station.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("station", format!("{:?} is not a station code", self.station)));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(invalid("api_base_url", "must start with http:// or https://"));
        }
        if self.fetch_rows == 0 {
            return Err(invalid("fetch_rows", "must be at least 1"));
        }
        if self.fetch_interval_secs < MIN_RETRY_DELAY.as_secs() {
            return Err(invalid(
                "fetch_interval_secs",
                format!("must be at least {}", MIN_RETRY_DELAY.as_secs()),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(invalid("http_timeout_secs", "must be at least 1"));
        }
        if self.retry_cap_secs < self.retry_base_secs {
            return Err(invalid("retry_cap_secs", "must not be below retry_base_secs"));
        }

        let display = &self.display;
        if display.visible_rows == 0 || display.visible_rows > MAX_VISIBLE_ROWS {
            return Err(invalid(
                "display.visible_rows",
                format!("must be between 1 and {}", MAX_VISIBLE_ROWS),
            ));
        }
        if display.frame_rate == 0 || display.frame_rate > MAX_FRAME_RATE {
            return Err(invalid(
                "display.frame_rate",
                format!("must be between 1 and {}", MAX_FRAME_RATE),
            ));
        }
        if display.scroll_step == 0 {
            return Err(invalid("display.scroll_step", "must be at least 1"));
        }
        if display.destination_max_chars < MIN_DESTINATION_CHARS {
            return Err(invalid(
                "display.destination_max_chars",
                format!("must be at least {}", MIN_DESTINATION_CHARS),
            ));
        }
        if display.brightness == 0 || display.brightness > 100 {
            return Err(invalid("display.brightness", "must be between 1 and 100"));
        }

        self.layout()?;
        self.palette()?;
        Ok(())
    }

    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        Ok(BoardLayout::new(
            self.display.width,
            self.display.height,
            self.display.visible_rows,
        )?)
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let colors = &self.palette;
        let parse = |key: &'static str, value: &str| {
            parse_hex(value).ok_or_else(|| ConfigError::InvalidColor {
                key,
                value: value.to_owned(),
            })
        };

        Ok(Palette {
            on_time: parse("palette.on_time", &colors.on_time)?,
            delayed: parse("palette.delayed", &colors.delayed)?,
            cancelled: parse("palette.cancelled", &colors.cancelled)?,
            clock: parse("palette.clock", &colors.clock)?,
            header: parse("palette.header", &colors.header)?,
            error: parse("palette.error", &colors.error)?,
            notice: parse("palette.notice", &colors.notice)?,
        })
    }

    pub fn client_config(&self) -> HuxleyClientConfig {
        HuxleyClientConfig {
            base_url: self.api_base_url.clone(),
            access_token: self.access_token.clone(),
            rows: self.fetch_rows,
            timeout: StdDuration::from_secs(self.http_timeout_secs),
            destination_max_chars: self.display.destination_max_chars,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            StdDuration::from_secs(self.fetch_interval_secs),
            StdDuration::from_secs(self.retry_base_secs),
            StdDuration::from_secs(self.retry_cap_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.display.width, 64);
        assert_eq!(config.display.visible_rows, 2);
    }

    #[test]
    fn test_partial_file_overrides_keys() {
        let config = BoardConfig::from_toml_str(
            r#"
            station = "gla"
            api_base_url = "https://huxley.example.org/"
            fetch_interval_secs = 30

            [display]
            visible_rows = 1
            scroll_step = 2

            [palette]
            delayed = "FFFF00"
            "#,
        )
        .unwrap();

        assert_eq!(config.station, "GLA");
        assert_eq!(config.api_base_url, "https://huxley.example.org");
        assert_eq!(config.fetch_interval_secs, 30);
        assert_eq!(config.display.visible_rows, 1);
        assert_eq!(config.display.scroll_step, 2);
        assert_eq!(config.display.height, 32);
        assert_eq!(config.palette().unwrap().delayed.g, 0xFF);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = BoardConfig::from_toml_str("stations = \"NTN\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_fetch_interval_below_minimum_is_rejected() {
        let result = BoardConfig::from_toml_str("fetch_interval_secs = 1");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "fetch_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = BoardConfig::from_toml_str("[palette]\non_time = \"green\"");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidColor {
                key: "palette.on_time",
                ..
            })
        ));
    }

    #[test]
    fn test_rows_that_do_not_fit_are_rejected() {
        let result = BoardConfig::from_toml_str("[display]\nvisible_rows = 3");
        assert!(matches!(result, Err(ConfigError::Layout(LayoutError::TooTall { .. }))));
    }

    #[test]
    fn test_blank_access_token_is_dropped() {
        let config = BoardConfig::from_toml_str("access_token = \"  \"").unwrap();
        assert_eq!(config.access_token, None);
    }
}
