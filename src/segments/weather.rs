//! Weather segment implementation
//!
//! Fetches current conditions, classifies the free-text condition into a
//! glyph and renders `{icon} {temp}°`. Provider failures keep the statusline
//! alive: the segment hides itself (or shows a placeholder) and notes the
//! error on stderr.

use std::env;
use std::time::Duration;

use async_trait::async_trait;

use super::base::{Segment, SegmentFactory, SegmentOutput, RenderContext};
use crate::config::{BaseSegmentConfig, Config, WeatherSegmentConfig};
use crate::provider::{Observation, Units, WeatherClient};
use crate::utils::condition::{classify, format_observation};

/// Env var consulted when the config carries no API key.
const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Weather segment
pub struct WeatherSegment {
    config: WeatherSegmentConfig,
}

impl WeatherSegment {
    #[must_use]
    pub const fn new(config: WeatherSegmentConfig) -> Self {
        Self { config }
    }

    /// Build the provider client, or None when no API key is configured.
    fn client(&self) -> Option<WeatherClient> {
        let api_key = non_blank(self.config.api_key.as_deref())
            .or_else(|| non_blank(env::var(API_KEY_ENV).ok().as_deref()))?;

        Some(WeatherClient::new(
            self.config.endpoint.clone(),
            api_key,
            self.config.location.clone(),
            Units::from_name(&self.config.units),
            Duration::from_millis(self.config.timeout_ms),
        ))
    }

    /// Compose the output for a fetched observation.
    fn compose(&self, ctx: &RenderContext, observation: &Observation) -> SegmentOutput {
        let condition = classify(&observation.condition_text, ctx.local_hour);
        let icon = condition.glyph(ctx.icon_style());

        SegmentOutput::new(format_observation(icon, observation.temperature))
            .with_icon_color(&self.config.base.icon_color)
            .with_text_color(&self.config.base.text_color)
            .with_highlight("weather")
    }

    /// Output when no observation could be produced.
    fn unavailable(&self, ctx: &RenderContext) -> SegmentOutput {
        if !self.config.show_placeholder {
            return SegmentOutput::hidden();
        }

        SegmentOutput::new("\u{2026}°")
            .with_icon(self.select_icon(ctx).unwrap_or_default())
            .with_icon_color(&self.config.base.icon_color)
            .with_text_color(&self.config.base.text_color)
            .with_highlight("weather")
    }
}

#[async_trait]
impl Segment for WeatherSegment {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn is_enabled(&self, _ctx: &RenderContext) -> bool {
        self.config.base.enabled
    }

    async fn render(&self, ctx: &RenderContext) -> SegmentOutput {
        if !self.is_enabled(ctx) {
            return SegmentOutput::hidden();
        }

        let Some(client) = self.client() else {
            eprintln!(
                "[statusline] weather: no API key configured (set segments.weather.api_key or {API_KEY_ENV})"
            );
            return self.unavailable(ctx);
        };

        // ureq is blocking; keep it off the async worker.
        match tokio::task::spawn_blocking(move || client.fetch_current()).await {
            Ok(Ok(observation)) => self.compose(ctx, &observation),
            Ok(Err(err)) => {
                eprintln!("[statusline] weather: {err}");
                self.unavailable(ctx)
            }
            Err(err) => {
                eprintln!("[statusline] weather: fetch task failed: {err}");
                self.unavailable(ctx)
            }
        }
    }

    fn base_config(&self, _ctx: &RenderContext) -> Option<&BaseSegmentConfig> {
        Some(&self.config.base)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Factory for creating Weather segments
pub struct WeatherSegmentFactory;

impl SegmentFactory for WeatherSegmentFactory {
    fn create(&self, config: &Config) -> Box<dyn Segment> {
        Box::new(WeatherSegment::new(config.segments.weather.clone()))
    }

    fn name(&self) -> &'static str {
        "weather"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::segments::TerminalCapabilities;

    fn build_weather_config(
        configure: impl FnOnce(&mut WeatherSegmentConfig),
    ) -> WeatherSegmentConfig {
        let mut config = WeatherSegmentConfig::default();
        configure(&mut config);
        config
    }

    fn text_context(local_hour: u32) -> RenderContext {
        RenderContext {
            config: Arc::new(Config::default()),
            terminal: TerminalCapabilities {
                supports_emoji: false,
                ..Default::default()
            },
            local_hour,
        }
    }

    fn observation(text: &str, temperature: f64) -> Observation {
        Observation {
            condition_text: text.to_string(),
            temperature,
        }
    }

    #[test]
    fn composes_icon_and_temperature() {
        let segment = WeatherSegment::new(WeatherSegmentConfig::default());
        let output = segment.compose(&text_context(12), &observation("rain", 72.0));

        assert!(output.visible);
        assert_eq!(output.text, "\u{2614} 72°");
        assert_eq!(output.highlight, vec!["weather"]);
    }

    #[test]
    fn night_hours_render_the_moon() {
        let segment = WeatherSegment::new(WeatherSegmentConfig::default());
        let output = segment.compose(&text_context(23), &observation("Clear", 41.0));

        assert_eq!(output.text, "\u{263e} 41°");
    }

    #[test]
    fn daytime_clear_renders_the_day_glyph() {
        let segment = WeatherSegment::new(WeatherSegmentConfig::default());
        let output = segment.compose(&text_context(12), &observation("clear", 41.0));

        assert_eq!(output.text, "\u{3007} 41°");
    }

    #[test]
    fn emoji_style_swaps_the_glyph_set() {
        let segment = WeatherSegment::new(WeatherSegmentConfig::default());
        let ctx = RenderContext {
            config: Arc::new(Config::default()),
            terminal: TerminalCapabilities::default(),
            local_hour: 12,
        };

        let output = segment.compose(&ctx, &observation("snow", -3.5));
        assert_eq!(output.text, "\u{2744}\u{fe0f} -3.5°");
    }

    #[tokio::test]
    async fn disabled_segment_is_hidden() {
        let config = build_weather_config(|config| config.base.enabled = false);

        let segment = WeatherSegment::new(config);
        let output = segment.render(&text_context(12)).await;

        assert!(!output.visible);
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn missing_api_key_hides_segment() {
        let original = env::var_os(API_KEY_ENV);
        env::remove_var(API_KEY_ENV);

        let segment = WeatherSegment::new(WeatherSegmentConfig::default());
        let output = segment.render(&text_context(12)).await;
        assert!(!output.visible);

        if let Some(val) = original {
            env::set_var(API_KEY_ENV, val);
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn missing_api_key_with_placeholder_shows_marker() {
        let original = env::var_os(API_KEY_ENV);
        env::remove_var(API_KEY_ENV);

        let config = build_weather_config(|config| config.show_placeholder = true);
        let segment = WeatherSegment::new(config);
        let output = segment.render(&text_context(12)).await;

        assert!(output.visible);
        assert_eq!(output.text, "\u{2026}°");
        assert_eq!(output.icon.as_deref(), Some("[W]"));

        if let Some(val) = original {
            env::set_var(API_KEY_ENV, val);
        }
    }

    #[test]
    #[serial_test::serial]
    fn blank_api_key_is_treated_as_missing() {
        let original = env::var_os(API_KEY_ENV);
        env::remove_var(API_KEY_ENV);

        let config = build_weather_config(|config| config.api_key = Some("   ".to_string()));
        let segment = WeatherSegment::new(config);
        assert!(segment.client().is_none());

        env::set_var(API_KEY_ENV, "k-test");
        assert!(segment.client().is_some());

        match original {
            Some(val) => env::set_var(API_KEY_ENV, val),
            None => env::remove_var(API_KEY_ENV),
        }
    }
}
