//! Classic theme renderer
//!
//! Simple theme with plain separators and per-part foreground colors.

use anyhow::Result;

use super::{colorize_segment, ThemeRenderer};
use crate::segments::{RenderContext, SegmentOutput};

/// Classic theme renderer
pub struct ClassicThemeRenderer;

impl ClassicThemeRenderer {
    /// Create a new classic theme renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Separator with configured padding and color applied.
    fn separator(context: &RenderContext, supports_colors: bool) -> String {
        let style = &context.config.style;
        let core = if style.separator.is_empty() {
            "|"
        } else {
            style.separator.as_str()
        };
        let raw = format!(
            "{}{}{}",
            style.separator_before, core, style.separator_after
        );

        colorize_segment(&raw, Some(style.separator_color.as_str()), supports_colors)
    }

    /// Icon and text of one segment, individually colored.
    pub(crate) fn compose_part(
        segment: &SegmentOutput,
        supports_colors: bool,
    ) -> Option<String> {
        let mut part = String::new();

        if let Some(ref icon) = segment.icon {
            if !icon.is_empty() {
                part.push_str(&colorize_segment(
                    icon,
                    segment.icon_color.as_deref(),
                    supports_colors,
                ));
                if !segment.text.is_empty() {
                    part.push(' ');
                }
            }
        }

        part.push_str(&colorize_segment(
            &segment.text,
            segment.text_color.as_deref(),
            supports_colors,
        ));

        if part.is_empty() {
            None
        } else {
            Some(part)
        }
    }
}

impl ThemeRenderer for ClassicThemeRenderer {
    fn render(
        &self,
        segments: &[SegmentOutput],
        _colors: &[String],
        context: &RenderContext,
    ) -> Result<String> {
        let supports_colors = context.terminal.supports_colors()
            && context
                .config
                .style
                .enable_colors
                .is_enabled(context.terminal.supports_colors());

        let parts: Vec<String> = segments
            .iter()
            .filter(|segment| segment.visible)
            .filter_map(|segment| Self::compose_part(segment, supports_colors))
            .collect();

        Ok(parts.join(&Self::separator(context, supports_colors)))
    }

    fn name(&self) -> &'static str {
        "classic"
    }
}

impl Default for ClassicThemeRenderer {
    fn default() -> Self {
        Self::new()
    }
}
