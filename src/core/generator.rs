//! Core statusline generator
//!
//! The main orchestrator that coordinates segments, themes, and terminal
//! rendering for one side of the statusline.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Timelike};

use crate::config::Config;
use crate::segments::{
    LoadSegmentFactory, RenderContext, SegmentFactory, SegmentOutput, Side,
    TerminalCapabilities, UptimeSegmentFactory, WeatherSegmentFactory,
};
use crate::terminal::detector::TerminalDetector;
use crate::themes::{create_theme_renderer, resolve_highlight, ThemeRenderer};

/// Generator options
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Override preset configuration
    pub preset: Option<String>,
}

impl GeneratorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preset(mut self, preset: String) -> Self {
        self.preset = Some(preset);
        self
    }
}

/// Core statusline generator
///
/// Integrates all segments to generate one rendered statusline side
pub struct StatuslineGenerator {
    config: Arc<Config>,
    segment_registry: HashMap<String, Box<dyn SegmentFactory>>,
    terminal_detector: TerminalDetector,
    theme_renderer: Box<dyn ThemeRenderer>,
}

impl StatuslineGenerator {
    /// Create a new generator with the given configuration and options
    #[must_use]
    pub fn new(config: Config, options: GeneratorOptions) -> Self {
        let theme_renderer = create_theme_renderer(&config.theme);

        let mut generator = Self {
            config: Arc::new(config),
            segment_registry: HashMap::new(),
            terminal_detector: TerminalDetector::new(),
            theme_renderer,
        };

        generator.apply_config_preset();
        if let Some(preset) = options.preset {
            generator.apply_preset(&preset);
        }

        generator.initialize_segments();

        generator
    }

    /// Register all segment factories
    fn initialize_segments(&mut self) {
        self.segment_registry
            .insert("uptime".to_string(), Box::new(UptimeSegmentFactory));
        self.segment_registry
            .insert("load".to_string(), Box::new(LoadSegmentFactory));
        self.segment_registry
            .insert("weather".to_string(), Box::new(WeatherSegmentFactory));
    }

    /// Apply a preset configuration
    fn apply_preset(&mut self, preset: &str) {
        let order = Self::parse_preset(preset);
        if let Some(config) = Arc::get_mut(&mut self.config) {
            config.segments.order = order;
        }
    }

    /// Apply preset defined in configuration if present
    fn apply_config_preset(&mut self) {
        if self.config.segments.order.is_empty() {
            if let Some(preset) = self.config.preset.clone() {
                self.apply_preset(&preset);
            }
        }
    }

    /// Parse preset string into segment order (e.g., "ULW")
    fn parse_preset(preset: &str) -> Vec<String> {
        let mut seen = HashSet::new();

        preset
            .chars()
            .filter_map(|c| match c.to_ascii_uppercase() {
                'U' => Some("uptime"),
                'L' => Some("load"),
                'W' => Some("weather"),
                _ => None,
            })
            .filter(|name| seen.insert(*name))
            .map(std::string::ToString::to_string)
            .collect()
    }

    /// Generate one side of the statusline
    ///
    /// # Errors
    ///
    /// Returns an error if the theme renderer fails to format the line.
    pub async fn generate(&self, side: Side) -> Result<String> {
        let capabilities = self.detect_terminal_capabilities();

        let context = RenderContext {
            config: self.config.clone(),
            terminal: capabilities,
            local_hour: Local::now().hour(),
        };

        let segment_results = self.render_segments(&context, side).await;

        let colors = self.extract_highlight_colors(&segment_results);
        self.theme_renderer
            .render(&segment_results, &colors, &context)
    }

    /// Resolve one theme color per rendered segment: the first highlight tag
    /// known to the gradient palette wins, then the segment's own icon color.
    fn extract_highlight_colors(&self, segments: &[SegmentOutput]) -> Vec<String> {
        segments
            .iter()
            .map(|segment| {
                resolve_highlight(&segment.highlight).map_or_else(
                    || {
                        segment
                            .segment_name
                            .as_deref()
                            .map_or_else(|| "blue".to_string(), |name| self.segment_config_color(name))
                    },
                    std::string::ToString::to_string,
                )
            })
            .collect()
    }

    fn segment_config_color(&self, name: &str) -> String {
        match name {
            "uptime" => self.config.segments.uptime.base.icon_color.clone(),
            "load" => self.config.segments.load.base.icon_color.clone(),
            "weather" => self.config.segments.weather.base.icon_color.clone(),
            other => {
                eprintln!(
                    "[statusline] unknown segment '{other}' when resolving theme colors, fallback to blue"
                );
                "blue".to_string()
            }
        }
    }

    /// Detect terminal capabilities
    fn detect_terminal_capabilities(&self) -> TerminalCapabilities {
        let caps = self.terminal_detector.detect(
            &self.config.style.enable_colors,
            &self.config.style.enable_emoji,
            &self.config.style.enable_nerd_font,
            self.config.terminal.force_nerd_font,
            self.config.terminal.force_emoji,
            self.config.terminal.force_text,
        );

        if self.config.debug {
            eprintln!("[debug] terminal capability detection:");
            eprintln!("  - color_support: {:?}", caps.color_support);
            eprintln!("  - supports_emoji: {}", caps.supports_emoji);
            eprintln!("  - supports_nerd_font: {}", caps.supports_nerd_font);
            eprintln!("  - TERM: {:?}", std::env::var("TERM"));
        }

        caps
    }

    /// Render all enabled segments for the requested side, in order
    async fn render_segments(&self, context: &RenderContext, side: Side) -> Vec<SegmentOutput> {
        let default_order = vec![
            "uptime".to_string(),
            "load".to_string(),
            "weather".to_string(),
        ];

        let segment_order = if self.config.segments.order.is_empty() {
            default_order
        } else {
            self.config.segments.order.clone()
        };

        let mut results = Vec::new();
        let mut seen = HashSet::new();
        for segment_name in &segment_order {
            if !seen.insert(segment_name.clone()) {
                continue;
            }

            let Some(factory) = self.segment_registry.get(segment_name.as_str()) else {
                eprintln!("[statusline] unknown segment '{segment_name}' in order, skipping");
                continue;
            };

            let segment = factory.create(&self.config);
            if segment.side(context) != side || !segment.is_enabled(context) {
                continue;
            }

            let mut output = segment.render(context).await;
            if !output.visible {
                continue;
            }

            output.set_segment_name(segment_name.clone());
            results.push(output);
        }

        results
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::AutoDetect;

    fn offline_config() -> Config {
        let mut config = Config::default();
        // Keep the network out of generator tests.
        config.segments.weather.base.enabled = false;
        config.style.enable_colors = AutoDetect::Bool(false);
        config.style.enable_emoji = AutoDetect::Bool(false);
        config.style.enable_nerd_font = AutoDetect::Bool(false);
        config
    }

    #[test]
    fn preset_letters_map_to_segments() {
        let order = StatuslineGenerator::parse_preset("ULW");
        assert_eq!(order, vec!["uptime", "load", "weather"]);

        let order = StatuslineGenerator::parse_preset("WLU");
        assert_eq!(order, vec!["weather", "load", "uptime"]);

        // Lowercase, duplicates and unknown letters
        let order = StatuslineGenerator::parse_preset("ul-uW");
        assert_eq!(order, vec!["uptime", "load", "weather"]);
    }

    #[test]
    fn preset_option_overrides_config_order() {
        let mut config = offline_config();
        config.segments.order = vec!["load".to_string()];

        let generator = StatuslineGenerator::new(
            config,
            GeneratorOptions::new().with_preset("U".to_string()),
        );
        assert_eq!(generator.config().segments.order, vec!["uptime"]);
    }

    #[test]
    fn config_preset_fills_empty_order() {
        let mut config = offline_config();
        config.preset = Some("LU".to_string());
        config.segments.order.clear();

        let generator = StatuslineGenerator::new(config, GeneratorOptions::default());
        assert_eq!(generator.config().segments.order, vec!["load", "uptime"]);
    }

    #[test]
    fn highlight_colors_prefer_palette_over_config() {
        let generator = StatuslineGenerator::new(offline_config(), GeneratorOptions::default());

        let mut tagged = SegmentOutput::new("0.4").with_highlight("system_load_ugly");
        tagged.set_segment_name("load");
        let mut untagged = SegmentOutput::new("x").with_highlight("no_such_tag");
        untagged.set_segment_name("load");

        let colors = generator.extract_highlight_colors(&[tagged, untagged]);
        assert_eq!(colors, vec!["red", "cyan"]);
    }

    #[tokio::test]
    async fn generates_left_side_without_network() {
        let generator = StatuslineGenerator::new(offline_config(), GeneratorOptions::default());

        // Uptime is the only left-side segment and always renders (placeholder
        // when /proc is unavailable).
        let line = generator.generate(Side::Left).await.unwrap();
        assert!(line.contains("\u{21d1}"));
    }

    #[tokio::test]
    async fn right_side_skips_left_segments() {
        let mut config = offline_config();
        config.segments.load.base.enabled = false;

        let generator = StatuslineGenerator::new(config, GeneratorOptions::default());
        let line = generator.generate(Side::Right).await.unwrap();
        assert!(!line.contains("\u{21d1}"));
    }
}
