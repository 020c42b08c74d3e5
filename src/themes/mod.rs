//! Theme rendering system
//!
//! Provides the visual themes for the statusline and resolves segment
//! highlight tags to palette colors.

use anyhow::Result;
use crossterm::style::{Color, Stylize};

use crate::segments::{ColorSupport, RenderContext, SegmentOutput};

pub mod classic;
pub mod powerline;

pub use classic::ClassicThemeRenderer;
pub use powerline::PowerlineThemeRenderer;

/// Colors the bundled themes assign to the highlight tags segments emit.
/// The first tag of an output with a palette entry wins.
pub const GRADIENT_PALETTE: &[(&str, &str)] = &[
    ("system_load_good", "green"),
    ("system_load_bad", "yellow"),
    ("system_load_ugly", "red"),
    ("system_load", "white"),
    ("uptime", "cyan"),
    ("weather", "blue"),
];

/// Resolve an ordered highlight tag sequence against the gradient palette.
#[must_use]
pub fn resolve_highlight(tags: &[String]) -> Option<&'static str> {
    tags.iter().find_map(|tag| {
        GRADIENT_PALETTE
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, color)| *color)
    })
}

pub(crate) const ANSI_RESET: &str = "\x1b[0m";

/// Apply ANSI colors to a piece of output if supported
pub(crate) fn colorize_segment(
    segment: &str,
    color_name: Option<&str>,
    supports_colors: bool,
) -> String {
    if !supports_colors {
        return segment.to_string();
    }

    color_name.and_then(parse_color).map_or_else(
        || segment.to_string(),
        |color| segment.with(color).to_string(),
    )
}

/// Foreground ANSI escape sequence for the given color support level
pub(crate) fn ansi_fg(color: &str, color_support: ColorSupport) -> Option<String> {
    let rgb = resolve_color(color)?;
    Some(format_color(rgb, color_support, ColorLayer::Foreground))
}

/// Background ANSI escape sequence for the given color support level
pub(crate) fn ansi_bg(color: &str, color_support: ColorSupport) -> Option<String> {
    let rgb = resolve_color(color)?;
    Some(format_color(rgb, color_support, ColorLayer::Background))
}

#[derive(Clone, Copy)]
enum ColorLayer {
    Foreground,
    Background,
}

fn format_color(rgb: (u8, u8, u8), color_support: ColorSupport, layer: ColorLayer) -> String {
    let (r, g, b) = rgb;
    match color_support {
        ColorSupport::None => String::new(),
        ColorSupport::Basic16 => {
            let code = rgb_to_ansi16(r, g, b);
            let code = match layer {
                ColorLayer::Foreground => code,
                ColorLayer::Background => code + 10,
            };
            format!("\x1b[{code}m")
        }
        ColorSupport::Extended256 => {
            let code = rgb_to_ansi256(r, g, b);
            match layer {
                ColorLayer::Foreground => format!("\x1b[38;5;{code}m"),
                ColorLayer::Background => format!("\x1b[48;5;{code}m"),
            }
        }
        ColorSupport::TrueColor => match layer {
            ColorLayer::Foreground => format!("\x1b[38;2;{r};{g};{b}m"),
            ColorLayer::Background => format!("\x1b[48;2;{r};{g};{b}m"),
        },
    }
}

/// Nearest entry in the 256-color cube (or grayscale ramp).
fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        // Grayscale ramp: 232-255 (24 shades)
        return 232 + (u16::from(r - 8) * 24 / 248) as u8;
    }

    let to_cube = |v: u8| -> u8 {
        match v {
            0..=47 => 0,
            48..=114 => 1,
            _ => ((u16::from(v) - 35) / 40).min(5) as u8,
        }
    };

    16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b)
}

/// Nearest of the 16 basic ANSI colors, by squared RGB distance.
fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    const BASIC: &[(u8, (u8, u8, u8))] = &[
        (30, (0, 0, 0)),
        (31, (205, 49, 49)),
        (32, (13, 188, 121)),
        (33, (229, 229, 16)),
        (34, (36, 114, 200)),
        (35, (188, 63, 188)),
        (36, (17, 168, 205)),
        (37, (229, 229, 229)),
        (90, (102, 102, 102)),
        (91, (241, 76, 76)),
        (92, (35, 209, 139)),
        (93, (245, 245, 67)),
        (94, (59, 142, 234)),
        (95, (214, 112, 214)),
        (96, (41, 184, 219)),
        (97, (255, 255, 255)),
    ];

    let distance = |(cr, cg, cb): (u8, u8, u8)| -> u32 {
        let dr = i32::from(cr) - i32::from(r);
        let dg = i32::from(cg) - i32::from(g);
        let db = i32::from(cb) - i32::from(b);
        (dr * dr + dg * dg + db * db) as u32
    };

    BASIC
        .iter()
        .min_by_key(|(_, rgb)| distance(*rgb))
        .map_or(37, |(code, _)| *code)
}

/// Resolve a color name or hex string to RGB (Nord-flavored palette).
fn resolve_color(name: &str) -> Option<(u8, u8, u8)> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty()
        || normalized == "transparent"
        || normalized == "default"
        || normalized == "bg_default"
    {
        return None;
    }

    let hex = normalized.strip_prefix('#').unwrap_or(&normalized);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some((r, g, b));
    }

    let rgb = match normalized.as_str() {
        "black" => (46, 52, 64),
        "gray" | "grey" => (120, 128, 146),
        "white" => (236, 239, 244),
        "red" => (191, 97, 106),
        "green" => (163, 190, 140),
        "yellow" => (235, 203, 139),
        "blue" => (129, 161, 193),
        "magenta" | "purple" => (180, 142, 173),
        "cyan" => (136, 192, 208),
        "orange" => (208, 135, 112),
        "bright_black" => (76, 86, 106),
        "bright_red" => (203, 119, 127),
        "bright_green" => (180, 202, 161),
        "bright_yellow" => (237, 209, 153),
        "bright_blue" => (152, 178, 204),
        "bright_magenta" | "bright_purple" => (195, 165, 189),
        "bright_cyan" => (157, 203, 216),
        "bright_white" => (255, 255, 255),
        _ => return None,
    };

    Some(rgb)
}

fn parse_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" | "orange" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" | "purple" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" | "bright_white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Grey),
        "bright_black" => Some(Color::DarkGrey),
        "bright_red" => Some(Color::DarkRed),
        "bright_green" => Some(Color::DarkGreen),
        "bright_yellow" => Some(Color::DarkYellow),
        "bright_blue" => Some(Color::DarkBlue),
        "bright_magenta" | "bright_purple" => Some(Color::DarkMagenta),
        "bright_cyan" => Some(Color::DarkCyan),
        _ => None,
    }
}

/// Theme type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Classic,
    Powerline,
}

impl Theme {
    /// Parse theme from string, returning `Classic` if input is unknown.
    #[must_use]
    pub fn from_name(value: &str) -> Self {
        value.parse().unwrap_or(Self::Classic)
    }
}

impl std::str::FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "powerline" => Ok(Self::Powerline),
            "classic" | "" => Ok(Self::Classic),
            _ => Err(()),
        }
    }
}

/// Theme renderer trait
pub trait ThemeRenderer: Send + Sync {
    /// Render segment outputs with the theme
    ///
    /// # Errors
    ///
    /// Returns an error when the renderer fails to format the statusline.
    fn render(
        &self,
        segments: &[SegmentOutput],
        colors: &[String],
        context: &RenderContext,
    ) -> Result<String>;

    /// Get theme name
    fn name(&self) -> &str;
}

/// Create a theme renderer based on the theme name
#[must_use]
pub fn create_theme_renderer(theme: &str) -> Box<dyn ThemeRenderer> {
    match Theme::from_name(theme) {
        Theme::Classic => Box::new(ClassicThemeRenderer::new()),
        Theme::Powerline => Box::new(PowerlineThemeRenderer::new()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn highlight_resolution_prefers_earlier_tags() {
        let tags = vec!["system_load_bad".to_string(), "system_load".to_string()];
        assert_eq!(resolve_highlight(&tags), Some("yellow"));

        let tags = vec!["no_such_tag".to_string(), "system_load".to_string()];
        assert_eq!(resolve_highlight(&tags), Some("white"));

        let tags = vec!["no_such_tag".to_string()];
        assert_eq!(resolve_highlight(&tags), None);
    }

    #[test]
    fn named_and_hex_colors_resolve() {
        assert_eq!(resolve_color("green"), Some((163, 190, 140)));
        assert_eq!(resolve_color("#ff8000"), Some((255, 128, 0)));
        assert_eq!(resolve_color("A0B0C0"), Some((160, 176, 192)));
        assert_eq!(resolve_color("transparent"), None);
        assert_eq!(resolve_color("no-such-color"), None);
    }

    #[test]
    fn escape_sequences_degrade_with_support() {
        assert_eq!(
            ansi_fg("#102030", ColorSupport::TrueColor).unwrap(),
            "\x1b[38;2;16;32;48m"
        );
        assert_eq!(ansi_fg("#102030", ColorSupport::None).unwrap(), "");
        assert!(ansi_fg("#102030", ColorSupport::Extended256)
            .unwrap()
            .starts_with("\x1b[38;5;"));
        assert!(ansi_bg("#102030", ColorSupport::Extended256)
            .unwrap()
            .starts_with("\x1b[48;5;"));
        assert!(ansi_fg("not-a-color", ColorSupport::TrueColor).is_none());
    }

    #[test]
    fn grayscale_and_cube_quantization() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
        // Mid gray lands on the ramp.
        let gray = rgb_to_ansi256(128, 128, 128);
        assert!((232..=255).contains(&gray));
        // Pure red lands in the cube.
        let red = rgb_to_ansi256(255, 0, 0);
        assert!((16..=231).contains(&red));
    }

    #[test]
    fn basic16_picks_nearest_color() {
        assert_eq!(rgb_to_ansi16(0, 0, 0), 30);
        assert_eq!(rgb_to_ansi16(255, 255, 255), 97);
        assert_eq!(rgb_to_ansi16(205, 49, 49), 31);
    }

    #[test]
    fn unknown_theme_falls_back_to_classic() {
        assert_eq!(Theme::from_name("powerline"), Theme::Powerline);
        assert_eq!(Theme::from_name("classic"), Theme::Classic);
        assert_eq!(Theme::from_name("capsule"), Theme::Classic);
        assert!("capsule".parse::<Theme>().is_err());
    }

    #[test]
    fn colorize_passes_through_without_support() {
        assert_eq!(colorize_segment("text", Some("red"), false), "text");
        assert_eq!(colorize_segment("text", None, true), "text");
        assert_ne!(colorize_segment("text", Some("red"), true), "text");
    }
}
