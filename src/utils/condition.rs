//! Weather condition classification
//!
//! Maps the free-text condition string reported by the weather provider to a
//! display glyph. Classification is a fixed phrase table scanned in priority
//! order, with a night override that swaps clear skies for the moon.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Icon flavor the terminal can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconStyle {
    /// Emoji glyphs.
    Emoji,
    /// Nerd Font weather glyphs.
    Nerd,
    /// Plain Unicode symbols.
    #[default]
    Text,
}

/// Weather condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    Windy,
    Rain,
    Cloudy,
    Snow,
    Storm,
    Haze,
    Sunny,
    /// Clear or sunny skies during night hours.
    NightClear,
}

/// Category phrase lists, scanned in declaration order. A phrase must appear
/// in exactly one category; `PHRASE_INDEX` keeps the first occurrence.
const CONDITION_TABLE: &[(Condition, &[&str])] = &[
    (Condition::Clear, &["clear", "fair", "cold"]),
    (Condition::Windy, &["windy", "fair/windy"]),
    (
        Condition::Rain,
        &[
            "rain",
            "mixed rain and snow",
            "mixed rain and sleet",
            "freezing drizzle",
            "drizzle",
            "freezing rain",
            "showers",
            "mixed rain and hail",
            "scattered showers",
            "isolated thundershowers",
            "thundershowers",
            "light rain with thunder",
            "light rain",
        ],
    ),
    (
        Condition::Cloudy,
        &["cloudy", "mostly cloudy", "partly cloudy", "partly cloudy/windy"],
    ),
    (
        Condition::Snow,
        &[
            "snow",
            "mixed snow and sleet",
            "snow flurries",
            "light snow showers",
            "blowing snow",
            "sleet",
            "hail",
            "heavy snow",
            "snow showers",
            "scattered snow showers",
            "light snow",
        ],
    ),
    (
        Condition::Storm,
        &[
            "tornado",
            "tropical storm",
            "hurricane",
            "severe thunderstorms",
            "thunderstorms",
            "isolated thunderstorms",
            "scattered thunderstorms",
        ],
    ),
    (
        Condition::Haze,
        &["dust", "foggy", "fog", "haze", "smoky", "blustery", "mist"],
    ),
    (Condition::Sunny, &["sunny", "hot"]),
];

lazy_static! {
    static ref PHRASE_INDEX: HashMap<&'static str, Condition> = {
        let mut index = HashMap::new();
        for (condition, phrases) in CONDITION_TABLE {
            for phrase in *phrases {
                index.entry(*phrase).or_insert(*condition);
            }
        }
        index
    };
}

/// Local hours strictly after this count as night.
const NIGHT_START_AFTER: u32 = 22;
/// Local hours strictly below this count as night.
const NIGHT_END_BEFORE: u32 = 5;

/// Whether the local hour falls in the night window (23:00 through 04:59).
#[must_use]
pub const fn is_night(local_hour: u32) -> bool {
    local_hour > NIGHT_START_AFTER || local_hour < NIGHT_END_BEFORE
}

/// Classify a free-text condition for the given local hour.
///
/// Matching is case-insensitive. At night, clear or sunny skies become
/// [`Condition::NightClear`]. Unknown text falls back to the clear-sky glyph.
#[must_use]
pub fn classify(condition_text: &str, local_hour: u32) -> Condition {
    let text = condition_text.trim().to_lowercase();

    match PHRASE_INDEX.get(text.as_str()).copied() {
        Some(condition)
            if is_night(local_hour)
                && matches!(condition, Condition::Clear | Condition::Sunny) =>
        {
            Condition::NightClear
        }
        Some(condition) => condition,
        None => Condition::Clear,
    }
}

impl Condition {
    /// Display glyph for the requested icon style.
    #[must_use]
    pub const fn glyph(self, style: IconStyle) -> &'static str {
        match style {
            IconStyle::Text => match self {
                Self::Clear => "\u{3007}",
                Self::Windy => "\u{2691}",
                Self::Rain => "\u{2614}",
                Self::Cloudy => "\u{2601}",
                Self::Snow => "\u{2745}",
                Self::Storm => "\u{2608}",
                Self::Haze => "\u{3030}",
                Self::Sunny => "\u{263c}",
                Self::NightClear => "\u{263e}",
            },
            IconStyle::Emoji => match self {
                Self::Clear => "\u{1f324}",
                Self::Windy => "\u{1f4a8}",
                Self::Rain => "\u{1f327}",
                Self::Cloudy => "\u{2601}\u{fe0f}",
                Self::Snow => "\u{2744}\u{fe0f}",
                Self::Storm => "\u{26c8}",
                Self::Haze => "\u{1f32b}",
                Self::Sunny => "\u{2600}\u{fe0f}",
                Self::NightClear => "\u{1f319}",
            },
            IconStyle::Nerd => match self {
                Self::Clear => "\u{e30d}",
                Self::Windy => "\u{e34b}",
                Self::Rain => "\u{e318}",
                Self::Cloudy => "\u{e312}",
                Self::Snow => "\u{e31a}",
                Self::Storm => "\u{e31d}",
                Self::Haze => "\u{e313}",
                Self::Sunny => "\u{e305}",
                Self::NightClear => "\u{e32b}",
            },
        }
    }
}

/// Compose the rendered observation, e.g. `☔ 72°`.
#[must_use]
pub fn format_observation(icon: &str, temperature: f64) -> String {
    format!("{icon} {temperature}°")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    const NOON: u32 = 12;

    #[test]
    fn every_phrase_maps_to_its_own_category() {
        for (condition, phrases) in CONDITION_TABLE {
            for phrase in *phrases {
                assert_eq!(
                    classify(phrase, NOON),
                    *condition,
                    "phrase {phrase:?} classified outside its category"
                );
            }
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("Partly Cloudy", NOON), Condition::Cloudy);
        assert_eq!(classify("SEVERE THUNDERSTORMS", NOON), Condition::Storm);
        assert_eq!(classify("  Light Rain  ", NOON), Condition::Rain);
    }

    #[test]
    fn unknown_text_falls_back_to_clear_glyph() {
        let condition = classify("volcanic ash", NOON);
        assert_eq!(condition, Condition::Clear);
        assert_eq!(condition.glyph(IconStyle::Text), "\u{3007}");
    }

    #[test]
    fn unknown_text_never_becomes_night() {
        assert_eq!(classify("volcanic ash", 23), Condition::Clear);
        assert_eq!(classify("volcanic ash", 2), Condition::Clear);
    }

    #[test]
    fn night_override_applies_to_clear_and_sunny_phrases() {
        for phrase in ["clear", "fair", "cold", "sunny", "hot"] {
            for hour in [23, 0, 4] {
                assert_eq!(
                    classify(phrase, hour),
                    Condition::NightClear,
                    "phrase {phrase:?} at hour {hour} should render the moon"
                );
            }
        }
    }

    #[test]
    fn night_override_ignores_other_categories() {
        assert_eq!(classify("rain", 23), Condition::Rain);
        assert_eq!(classify("snow", 0), Condition::Snow);
        assert_eq!(classify("fog", 3), Condition::Haze);
    }

    #[test]
    fn rain_at_noon_stays_rain() {
        let condition = classify("rain", NOON);
        assert_eq!(condition, Condition::Rain);
        assert_eq!(condition.glyph(IconStyle::Text), "\u{2614}");
    }

    #[test]
    fn night_window_boundaries() {
        // 22:xx is still evening, 05:xx is already morning.
        assert_eq!(classify("clear", 22), Condition::Clear);
        assert_eq!(classify("clear", 5), Condition::Clear);
        assert_eq!(classify("clear", 23), Condition::NightClear);
        assert_eq!(classify("clear", 4), Condition::NightClear);
    }

    #[test]
    fn phrases_are_unique_across_categories() {
        let mut seen = HashSet::new();
        for (_, phrases) in CONDITION_TABLE {
            for phrase in *phrases {
                assert!(seen.insert(*phrase), "phrase {phrase:?} listed twice");
            }
        }
    }

    #[test]
    fn observation_round_trip() {
        assert_eq!(format_observation("X", 72.0), "X 72°");
        assert_eq!(format_observation("\u{2614}", 54.5), "\u{2614} 54.5°");
    }

    #[test]
    fn glyphs_are_distinct_within_each_style() {
        for style in [IconStyle::Text, IconStyle::Emoji, IconStyle::Nerd] {
            let mut seen = HashSet::new();
            for (condition, _) in CONDITION_TABLE {
                assert!(
                    seen.insert(condition.glyph(style)),
                    "duplicate glyph in {style:?} set"
                );
            }
            assert!(seen.insert(Condition::NightClear.glyph(style)));
        }
    }

    proptest! {
        #[test]
        fn night_hours_always_moon_clear_skies(hour in prop_oneof![Just(23u32), 0u32..5]) {
            for phrase in ["clear", "fair", "cold", "sunny", "hot"] {
                prop_assert_eq!(classify(phrase, hour), Condition::NightClear);
            }
        }

        #[test]
        fn arbitrary_text_classifies_without_panicking(
            text in "[a-z /]{0,32}",
            hour in 0u32..24,
        ) {
            let condition = classify(&text, hour);
            if is_night(hour) {
                // Only the clear/sunny phrase lists may produce the moon.
                if condition == Condition::NightClear {
                    let lowered = text.trim().to_lowercase();
                    prop_assert!(
                        ["clear", "fair", "cold", "sunny", "hot"]
                            .contains(&lowered.as_str())
                    );
                }
            } else {
                prop_assert_ne!(condition, Condition::NightClear);
            }
        }
    }
}
