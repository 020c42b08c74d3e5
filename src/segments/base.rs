//! Base segment trait and common structures
//!
//! This module defines the core Segment trait that all statusline segments
//! must implement, along with the structures shared between segments, the
//! generator and the theme renderers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BaseSegmentConfig, Config};
use crate::utils::condition::IconStyle;

/// Terminal color support level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// No color support
    None,
    /// Basic ANSI 16 colors
    Basic16,
    /// Extended 256 colors
    Extended256,
    /// True color (24-bit RGB)
    #[default]
    TrueColor,
}

impl ColorSupport {
    /// Check if any color is supported
    #[must_use]
    pub fn has_colors(&self) -> bool {
        !matches!(self, ColorSupport::None)
    }

    /// Check if true color (24-bit) is supported
    #[must_use]
    pub fn has_true_color(&self) -> bool {
        matches!(self, ColorSupport::TrueColor)
    }

    /// Check if at least 256 colors are supported
    #[must_use]
    pub fn has_256_colors(&self) -> bool {
        matches!(self, ColorSupport::Extended256 | ColorSupport::TrueColor)
    }
}

/// Terminal capabilities for rendering decisions
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    /// Terminal color support level
    pub color_support: ColorSupport,
    /// Whether terminal supports emoji
    pub supports_emoji: bool,
    /// Whether terminal supports Nerd Font icons
    pub supports_nerd_font: bool,
}

impl TerminalCapabilities {
    /// Check if terminal supports colors
    #[must_use]
    pub fn supports_colors(&self) -> bool {
        self.color_support.has_colors()
    }
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::TrueColor,
            supports_emoji: true,
            supports_nerd_font: false,
        }
    }
}

/// Statusline side a segment is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(format!(r#"unknown side "{other}" (expected left or right)"#)),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context provided to segments for rendering
#[derive(Clone)]
pub struct RenderContext {
    /// Configuration
    pub config: Arc<Config>,
    /// Terminal capabilities
    pub terminal: TerminalCapabilities,
    /// Local wall-clock hour (0-23), injected by the generator so the night
    /// override stays testable
    pub local_hour: u32,
}

impl RenderContext {
    /// Icon flavor to render with, honoring force flags before detection.
    #[must_use]
    pub fn icon_style(&self) -> IconStyle {
        if self.config.terminal.force_text {
            return IconStyle::Text;
        }
        if self.config.terminal.force_nerd_font {
            return IconStyle::Nerd;
        }
        if self.config.terminal.force_emoji {
            return IconStyle::Emoji;
        }

        let style = &self.config.style;
        if self.terminal.supports_nerd_font && style.enable_nerd_font.is_enabled(true) {
            IconStyle::Nerd
        } else if self.terminal.supports_emoji && style.enable_emoji.is_enabled(true) {
            IconStyle::Emoji
        } else {
            IconStyle::Text
        }
    }
}

/// Output from a segment
#[derive(Debug, Clone)]
pub struct SegmentOutput {
    /// The rendered contents
    pub text: String,
    /// Icon to use (already selected for the terminal's capabilities)
    pub icon: Option<String>,
    /// Color for the icon
    pub icon_color: Option<String>,
    /// Color for the text
    pub text_color: Option<String>,
    /// Ordered highlight/gradient tags resolved by the theme
    pub highlight: Vec<String>,
    /// The logical segment identifier (uptime/load/weather)
    pub segment_name: Option<String>,
    /// Whether to show this segment (empty/disabled segments return hidden)
    pub visible: bool,
}

impl SegmentOutput {
    /// Create a new visible segment output
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            icon_color: None,
            text_color: None,
            highlight: Vec::new(),
            segment_name: None,
            visible: true,
        }
    }

    /// Create an invisible/hidden segment output
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            text: String::new(),
            icon: None,
            icon_color: None,
            text_color: None,
            highlight: Vec::new(),
            segment_name: None,
            visible: false,
        }
    }

    /// Set the icon for this output
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the icon color
    #[must_use]
    pub fn with_icon_color(mut self, color: impl Into<String>) -> Self {
        self.icon_color = Some(color.into());
        self
    }

    /// Set the text color
    #[must_use]
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Append a highlight tag; tags are kept in append order
    #[must_use]
    pub fn with_highlight(mut self, tag: impl Into<String>) -> Self {
        self.highlight.push(tag.into());
        self
    }

    /// Mutably set the segment name
    pub fn set_segment_name(&mut self, name: impl Into<String>) {
        self.segment_name = Some(name.into());
    }
}

/// Trait that all statusline segments must implement
#[async_trait]
pub trait Segment: Send + Sync {
    /// Get the segment's name
    fn name(&self) -> &str;

    /// Check if this segment is enabled
    fn is_enabled(&self, ctx: &RenderContext) -> bool;

    /// Render the segment
    async fn render(&self, ctx: &RenderContext) -> SegmentOutput;

    /// Get the base configuration for this segment
    fn base_config(&self, ctx: &RenderContext) -> Option<&BaseSegmentConfig>;

    /// Which statusline side this segment renders on
    fn side(&self, ctx: &RenderContext) -> Side {
        self.base_config(ctx)
            .map_or_else(Side::default, BaseSegmentConfig::side)
    }

    /// Select the appropriate icon based on terminal capabilities
    fn select_icon(&self, ctx: &RenderContext) -> Option<String> {
        let config = self.base_config(ctx)?;
        let icon = match ctx.icon_style() {
            IconStyle::Nerd => &config.nerd_icon,
            IconStyle::Emoji => &config.emoji_icon,
            IconStyle::Text => &config.text_icon,
        };
        Some(icon.clone())
    }
}

/// Factory trait for creating segment instances
pub trait SegmentFactory: Send + Sync {
    /// Create a new instance of the segment
    fn create(&self, config: &Config) -> Box<dyn Segment>;

    /// Get the name of the segment this factory creates
    fn name(&self) -> &str;
}
