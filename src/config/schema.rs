//! Configuration schema definitions
//!
//! All configuration structures for the statusline, loaded from TOML config
//! files layered over built-in defaults.

use serde::{Deserialize, Serialize};

use crate::provider::DEFAULT_ENDPOINT;
use crate::segments::Side;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Segment preset string (e.g., "ULW")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Theme name (classic, powerline)
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Debug mode
    #[serde(default)]
    pub debug: bool,

    /// Terminal capabilities override
    #[serde(default)]
    pub terminal: TerminalConfig,

    /// Style configuration
    #[serde(default)]
    pub style: StyleConfig,

    /// Segment configurations
    #[serde(default)]
    pub segments: SegmentsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: Some("ULW".to_string()),
            theme: default_theme(),
            debug: false,
            terminal: TerminalConfig::default(),
            style: StyleConfig::default(),
            segments: SegmentsConfig::default(),
        }
    }
}

impl Config {
    /// Fill fields a partial config file left unset with the per-segment
    /// defaults (side and icon glyphs differ between segments, so the shared
    /// serde defaults cannot express them).
    pub fn normalize(&mut self) {
        self.segments
            .uptime
            .base
            .fill_unset(&UptimeSegmentConfig::default().base);
        self.segments
            .load
            .base
            .fill_unset(&LoadSegmentConfig::default().base);
        self.segments
            .weather
            .base
            .fill_unset(&WeatherSegmentConfig::default().base);
    }
}

/// Terminal capabilities configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TerminalConfig {
    /// Force enable Nerd Font icons
    #[serde(default)]
    pub force_nerd_font: bool,

    /// Force enable Emoji icons
    #[serde(default)]
    pub force_emoji: bool,

    /// Force enable text-only mode
    #[serde(default)]
    pub force_text: bool,
}

/// Style configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    /// Segment separator
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Enable colors
    #[serde(default = "default_auto")]
    pub enable_colors: AutoDetect,

    /// Enable emoji
    #[serde(default = "default_auto")]
    pub enable_emoji: AutoDetect,

    /// Enable Nerd Font icons
    #[serde(default = "default_auto")]
    pub enable_nerd_font: AutoDetect,

    /// Separator color
    #[serde(default = "default_white")]
    pub separator_color: String,

    /// Space before separator
    #[serde(default = "default_space")]
    pub separator_before: String,

    /// Space after separator
    #[serde(default = "default_space")]
    pub separator_after: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            enable_colors: default_auto(),
            enable_emoji: default_auto(),
            enable_nerd_font: default_auto(),
            separator_color: default_white(),
            separator_before: default_space(),
            separator_after: default_space(),
        }
    }
}

/// Auto-detection option
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AutoDetect {
    Bool(bool),
    #[serde(rename = "auto")]
    Auto(String),
}

impl Default for AutoDetect {
    fn default() -> Self {
        Self::Auto("auto".to_string())
    }
}

impl AutoDetect {
    #[must_use]
    pub const fn is_enabled(&self, detected: bool) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Auto(_) => detected,
        }
    }
}

/// All segment configurations
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SegmentsConfig {
    /// Segment display order (e.g., `["uptime", "load", "weather"]`)
    #[serde(default)]
    pub order: Vec<String>,

    #[serde(default)]
    pub uptime: UptimeSegmentConfig,

    #[serde(default)]
    pub load: LoadSegmentConfig,

    #[serde(default)]
    pub weather: WeatherSegmentConfig,
}

/// Base segment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaseSegmentConfig {
    /// Whether to enable this segment
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Statusline side the segment renders on; unset falls back to the
    /// segment's built-in side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,

    /// Icon color
    #[serde(default = "default_white")]
    pub icon_color: String,

    /// Text color
    #[serde(default = "default_white")]
    pub text_color: String,

    /// Emoji icon
    #[serde(default)]
    pub emoji_icon: String,

    /// Nerd Font icon
    #[serde(default)]
    pub nerd_icon: String,

    /// Text icon
    #[serde(default)]
    pub text_icon: String,
}

impl BaseSegmentConfig {
    /// Resolved side, defaulting when the config file left it unset.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side.unwrap_or_default()
    }

    fn fill_unset(&mut self, fallback: &Self) {
        if self.side.is_none() {
            self.side = fallback.side;
        }
        if self.emoji_icon.is_empty() {
            self.emoji_icon.clone_from(&fallback.emoji_icon);
        }
        if self.nerd_icon.is_empty() {
            self.nerd_icon.clone_from(&fallback.nerd_icon);
        }
        if self.text_icon.is_empty() {
            self.text_icon.clone_from(&fallback.text_icon);
        }
    }
}

/// Uptime segment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UptimeSegmentConfig {
    #[serde(flatten)]
    pub base: BaseSegmentConfig,

    /// Text shown when the uptime source is unreadable
    #[serde(default = "default_uptime_placeholder")]
    pub placeholder: String,
}

impl Default for UptimeSegmentConfig {
    fn default() -> Self {
        Self {
            base: BaseSegmentConfig {
                enabled: true,
                side: Some(Side::Left),
                icon_color: "cyan".to_string(),
                text_color: "white".to_string(),
                emoji_icon: "\u{23f1}".to_string(),
                nerd_icon: "\u{f017}".to_string(),
                text_icon: "\u{21d1}".to_string(),
            },
            placeholder: default_uptime_placeholder(),
        }
    }
}

/// Load segment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadSegmentConfig {
    #[serde(flatten)]
    pub base: BaseSegmentConfig,

    /// Normalized-load thresholds for the gradient tags
    #[serde(default)]
    pub thresholds: LoadThresholdsConfig,

    /// Gradient colors per threshold band
    #[serde(default)]
    pub colors: LoadColorConfig,
}

impl Default for LoadSegmentConfig {
    fn default() -> Self {
        Self {
            base: BaseSegmentConfig {
                enabled: true,
                side: Some(Side::Right),
                icon_color: "cyan".to_string(),
                text_color: "white".to_string(),
                emoji_icon: "\u{1f4ca}".to_string(),
                nerd_icon: "\u{f0e4}".to_string(),
                text_icon: "[L]".to_string(),
            },
            thresholds: LoadThresholdsConfig::default(),
            colors: LoadColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadThresholdsConfig {
    /// Five-minute average per CPU at or above which load counts as bad
    #[serde(default = "default_load_bad_threshold")]
    pub bad: f64,

    /// Five-minute average per CPU at or above which load counts as ugly
    #[serde(default = "default_load_ugly_threshold")]
    pub ugly: f64,
}

impl Default for LoadThresholdsConfig {
    fn default() -> Self {
        Self {
            bad: default_load_bad_threshold(),
            ugly: default_load_ugly_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadColorConfig {
    #[serde(default = "default_good_color")]
    pub good: String,
    #[serde(default = "default_bad_color")]
    pub bad: String,
    #[serde(default = "default_ugly_color")]
    pub ugly: String,
}

impl Default for LoadColorConfig {
    fn default() -> Self {
        Self {
            good: default_good_color(),
            bad: default_bad_color(),
            ugly: default_ugly_color(),
        }
    }
}

/// Weather segment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherSegmentConfig {
    #[serde(flatten)]
    pub base: BaseSegmentConfig,

    /// Location query sent to the provider (city, ZIP, "lat,lon")
    #[serde(default = "default_weather_location")]
    pub location: String,

    /// Temperature units ("f" or "c")
    #[serde(default = "default_weather_units")]
    pub units: String,

    /// Current-conditions endpoint
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,

    /// Provider API key; falls back to the `WEATHER_API_KEY` env var
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_ms: u64,

    /// Show a placeholder instead of hiding the segment when data is
    /// unavailable
    #[serde(default)]
    pub show_placeholder: bool,
}

impl Default for WeatherSegmentConfig {
    fn default() -> Self {
        Self {
            base: BaseSegmentConfig {
                enabled: true,
                side: Some(Side::Right),
                icon_color: "yellow".to_string(),
                text_color: "white".to_string(),
                emoji_icon: "\u{1f321}".to_string(),
                nerd_icon: "\u{e30d}".to_string(),
                text_icon: "[W]".to_string(),
            },
            location: default_weather_location(),
            units: default_weather_units(),
            endpoint: default_weather_endpoint(),
            api_key: None,
            timeout_ms: default_weather_timeout(),
            show_placeholder: false,
        }
    }
}

// Default value functions
fn default_theme() -> String {
    "classic".to_string()
}

const fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    "|".to_string()
}

fn default_auto() -> AutoDetect {
    AutoDetect::Auto("auto".to_string())
}

fn default_white() -> String {
    "white".to_string()
}

fn default_space() -> String {
    " ".to_string()
}

fn default_uptime_placeholder() -> String {
    "???".to_string()
}

const fn default_load_bad_threshold() -> f64 {
    1.0
}

const fn default_load_ugly_threshold() -> f64 {
    2.0
}

fn default_good_color() -> String {
    "green".to_string()
}

fn default_bad_color() -> String {
    "yellow".to_string()
}

fn default_ugly_color() -> String {
    "red".to_string()
}

fn default_weather_location() -> String {
    "21122".to_string()
}

fn default_weather_units() -> String {
    "f".to_string()
}

fn default_weather_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_weather_timeout() -> u64 {
    1_500
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let rendered = toml_edit::ser::to_string_pretty(&config).expect("serializes");
        let parsed: Config = toml_edit::de::from_str(&rendered).expect("parses back");

        assert_eq!(parsed.theme, "classic");
        assert_eq!(parsed.preset.as_deref(), Some("ULW"));
        assert_eq!(parsed.segments.uptime.base.side(), Side::Left);
        assert_eq!(parsed.segments.weather.base.side(), Side::Right);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml_edit::de::from_str(
            r#"
            theme = "powerline"

            [segments.weather]
            location = "Oslo"
            units = "c"
            "#,
        )
        .expect("parses");

        assert_eq!(parsed.theme, "powerline");
        assert_eq!(parsed.segments.weather.location, "Oslo");
        assert_eq!(parsed.segments.weather.units, "c");
        // Untouched sections keep their defaults.
        assert!(parsed.segments.load.base.enabled);
        assert_eq!(parsed.segments.load.thresholds.bad, 1.0);
        assert_eq!(parsed.style.separator, "|");
    }

    #[test]
    fn normalize_restores_segment_specific_defaults() {
        let mut parsed: Config = toml_edit::de::from_str(
            r#"
            [segments.uptime]
            enabled = true
            "#,
        )
        .expect("parses");
        parsed.normalize();

        // A partial table must not lose the segment's own side and glyphs.
        assert_eq!(parsed.segments.uptime.base.side(), Side::Left);
        assert_eq!(parsed.segments.uptime.base.text_icon, "\u{21d1}");
        assert_eq!(parsed.segments.load.base.side(), Side::Right);
    }

    #[test]
    fn auto_detect_deserializes_bool_and_auto() {
        let parsed: Config = toml_edit::de::from_str(
            r#"
            [style]
            enable_colors = false
            enable_emoji = "auto"
            "#,
        )
        .expect("parses");

        assert!(!parsed.style.enable_colors.is_enabled(true));
        assert!(parsed.style.enable_emoji.is_enabled(true));
        assert!(!parsed.style.enable_emoji.is_enabled(false));
    }

    #[test]
    fn side_override_deserializes_lowercase() {
        let mut parsed: Config = toml_edit::de::from_str(
            r#"
            [segments.load]
            side = "left"
            "#,
        )
        .expect("parses");
        parsed.normalize();

        assert_eq!(parsed.segments.load.base.side(), Side::Left);
    }
}
