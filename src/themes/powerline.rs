//! Powerline theme renderer
//!
//! Renders segments as background-colored blocks chained with Nerd Font
//! separators. Falls back to the classic layout when colors or a Nerd Font
//! are unavailable.

use anyhow::Result;

use super::{ansi_bg, ansi_fg, ClassicThemeRenderer, ThemeRenderer, ANSI_RESET};
use crate::segments::{ColorSupport, RenderContext, SegmentOutput};

/// Powerline theme renderer
pub struct PowerlineThemeRenderer;

impl PowerlineThemeRenderer {
    const SEPARATOR: char = '\u{e0b0}';
    const START: char = '\u{e0d7}';

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn compose_content(segment: &SegmentOutput) -> String {
        let mut content = String::new();
        if let Some(ref icon) = segment.icon {
            if !icon.is_empty() {
                content.push_str(icon);
                if !segment.text.is_empty() {
                    content.push(' ');
                }
            }
        }
        content.push_str(&segment.text);
        content
    }

    fn render_block(
        content: &str,
        bg_color: &str,
        next_bg: Option<&str>,
        support: ColorSupport,
    ) -> String {
        let mut block = String::new();

        if let Some(bg) = ansi_bg(bg_color, support) {
            block.push_str(&bg);
        }
        if let Some(fg) = ansi_fg("white", support) {
            block.push_str(&fg);
        }

        block.push(' ');
        block.push_str(content);
        block.push(' ');
        block.push_str(ANSI_RESET);

        // The separator takes the finished block's color as foreground and
        // the next block's color as background.
        if let Some(next) = next_bg {
            if let Some(bg) = ansi_bg(next, support) {
                block.push_str(&bg);
            }
        }
        if let Some(fg) = ansi_fg(bg_color, support) {
            block.push_str(&fg);
        }
        block.push(Self::SEPARATOR);
        block.push_str(ANSI_RESET);

        block
    }
}

impl ThemeRenderer for PowerlineThemeRenderer {
    fn render(
        &self,
        segments: &[SegmentOutput],
        colors: &[String],
        context: &RenderContext,
    ) -> Result<String> {
        let visible: Vec<&SegmentOutput> =
            segments.iter().filter(|segment| segment.visible).collect();
        if visible.is_empty() {
            return Ok(String::new());
        }

        let supports_colors = context.terminal.supports_colors()
            && context
                .config
                .style
                .enable_colors
                .is_enabled(context.terminal.supports_colors());
        let use_nerd_font =
            context.terminal.supports_nerd_font || context.config.terminal.force_nerd_font;

        if !supports_colors || !use_nerd_font {
            return ClassicThemeRenderer::new().render(segments, colors, context);
        }

        let support = context.terminal.color_support;
        let block_colors: Vec<&str> = visible
            .iter()
            .enumerate()
            .map(|(idx, _)| colors.get(idx).map_or("blue", String::as_str))
            .collect();

        let mut rendered = String::new();

        if let Some(first_color) = block_colors.first() {
            if let Some(fg) = ansi_fg(first_color, support) {
                rendered.push_str(&fg);
            }
            rendered.push(Self::START);
            rendered.push_str(ANSI_RESET);
        }

        for (idx, segment) in visible.iter().enumerate() {
            let next_bg = block_colors.get(idx + 1).copied();
            rendered.push_str(&Self::render_block(
                &Self::compose_content(segment),
                block_colors[idx],
                next_bg,
                support,
            ));
        }

        Ok(rendered)
    }

    fn name(&self) -> &'static str {
        "powerline"
    }
}

impl Default for PowerlineThemeRenderer {
    fn default() -> Self {
        Self::new()
    }
}
