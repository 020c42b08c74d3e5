//! Terminal capability detection
//!
//! Detects color, emoji and Nerd Font support from the environment. The
//! statusline usually runs inside tmux, which hides the outer terminal, so
//! detection leans on the variables tmux preserves and stays conservative
//! otherwise.

use std::env;

use crate::config::AutoDetect;
use crate::segments::{ColorSupport, TerminalCapabilities};

/// Terminal detector for capability detection
pub struct TerminalDetector;

impl TerminalDetector {
    /// Create a new terminal detector
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Detect terminal capabilities
    #[must_use]
    pub fn detect(
        &self,
        enable_colors: &AutoDetect,
        enable_emoji: &AutoDetect,
        enable_nerd_font: &AutoDetect,
        force_nerd_font: bool,
        force_emoji: bool,
        force_text: bool,
    ) -> TerminalCapabilities {
        if force_text {
            return TerminalCapabilities {
                color_support: ColorSupport::None,
                supports_emoji: false,
                supports_nerd_font: false,
            };
        }

        let color_support = if force_nerd_font || force_emoji {
            // Forcing a glyph set implies a capable terminal
            ColorSupport::TrueColor
        } else {
            match enable_colors {
                AutoDetect::Bool(false) => ColorSupport::None,
                AutoDetect::Bool(true) => ColorSupport::TrueColor,
                AutoDetect::Auto(_) => Self::detect_color_level(),
            }
        };

        let supports_emoji = if force_emoji {
            true
        } else if force_nerd_font {
            false
        } else {
            match enable_emoji {
                AutoDetect::Bool(value) => *value,
                AutoDetect::Auto(_) => Self::utf8_locale(),
            }
        };

        let supports_nerd_font = if force_nerd_font {
            true
        } else {
            match enable_nerd_font {
                AutoDetect::Bool(value) => *value,
                AutoDetect::Auto(_) => Self::nerd_font_hinted(),
            }
        };

        TerminalCapabilities {
            color_support,
            supports_emoji,
            supports_nerd_font,
        }
    }

    /// Color support level from the environment.
    fn detect_color_level() -> ColorSupport {
        // https://no-color.org/
        if env::var_os("NO_COLOR").is_some() {
            return ColorSupport::None;
        }

        if let Ok(colorterm) = env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return ColorSupport::TrueColor;
            }
        }

        let term = env::var("TERM").unwrap_or_default();

        // Inside tmux the outer terminal is unknown; 256 colors is the level
        // tmux guarantees for *-256color TERMs.
        if env::var_os("TMUX").is_some() || term.starts_with("tmux") {
            return if term.contains("256color") {
                ColorSupport::Extended256
            } else {
                ColorSupport::Basic16
            };
        }

        if let Ok(term_program) = env::var("TERM_PROGRAM") {
            match term_program.as_str() {
                "iTerm.app" | "WezTerm" | "Hyper" | "vscode" => return ColorSupport::TrueColor,
                "Apple_Terminal" => return ColorSupport::Extended256,
                _ => {}
            }
        }

        if ["kitty", "alacritty", "wezterm", "foot"]
            .iter()
            .any(|name| term.contains(name))
        {
            return ColorSupport::TrueColor;
        }

        if term.contains("256color") {
            return ColorSupport::Extended256;
        }

        if term.contains("color")
            || ["xterm", "screen", "rxvt", "linux"]
                .iter()
                .any(|name| term.starts_with(name))
        {
            return ColorSupport::Basic16;
        }

        ColorSupport::Basic16
    }

    /// Emoji needs a UTF-8 locale; anything else garbles the line.
    fn utf8_locale() -> bool {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .is_some_and(|value| {
                let upper = value.to_uppercase();
                upper.contains("UTF-8") || upper.contains("UTF8")
            })
    }

    /// Nerd Font presence cannot be probed; rely on explicit hints and
    /// terminals that bundle one.
    fn nerd_font_hinted() -> bool {
        if env::var_os("NERD_FONT").is_some() || env::var_os("NERD_FONTS").is_some() {
            return true;
        }

        if let Ok(term_program) = env::var("TERM_PROGRAM") {
            if matches!(term_program.as_str(), "iTerm.app" | "WezTerm") {
                return true;
            }
        }

        let term = env::var("TERM").unwrap_or_default();
        term.contains("kitty") || term.contains("wezterm")
    }
}

impl Default for TerminalDetector {
    fn default() -> Self {
        Self::new()
    }
}
