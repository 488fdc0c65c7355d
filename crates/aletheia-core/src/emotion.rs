// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The eight-emotion vocabulary and its static presentation table.
//!
//! Every label that crosses a trust boundary (completion responses, user
//! input, stored rows) is funnelled through [`Emotion::normalize`], so the
//! rest of the system never sees a value outside the enum.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Intensity used when a completion response omits one.
pub const DEFAULT_INTENSITY: f64 = 0.5;

/// A recognised emotion label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Angry,
    Calm,
    Stressed,
    Confused,
    Excited,
}

/// Presentation metadata attached to an emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionProfile {
    pub emoji: &'static str,
    pub color: &'static str,
    pub gradient: &'static str,
    pub quote: &'static str,
    pub song: &'static str,
}

impl Emotion {
    /// All labels, in table order.
    pub const ALL: [Emotion; 8] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Calm,
        Emotion::Stressed,
        Emotion::Confused,
        Emotion::Excited,
    ];

    /// The label assigned whenever input is missing or unrecognised.
    pub const FALLBACK: Emotion = Emotion::Calm;

    /// Parses a free-form label, trimming and ignoring case.
    ///
    /// Returns `None` for anything outside the vocabulary.
    pub fn parse(label: &str) -> Option<Emotion> {
        label.trim().parse().ok()
    }

    /// Like [`Emotion::parse`] but resolves unknown labels to [`Emotion::FALLBACK`].
    pub fn normalize(label: Option<&str>) -> Emotion {
        label.and_then(Emotion::parse).unwrap_or(Emotion::FALLBACK)
    }

    /// Lowercase label as stored and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Static presentation metadata for this emotion.
    pub fn profile(&self) -> &'static EmotionProfile {
        match self {
            Emotion::Happy => &HAPPY,
            Emotion::Sad => &SAD,
            Emotion::Anxious => &ANXIOUS,
            Emotion::Angry => &ANGRY,
            Emotion::Calm => &CALM,
            Emotion::Stressed => &STRESSED,
            Emotion::Confused => &CONFUSED,
            Emotion::Excited => &EXCITED,
        }
    }

    /// The fixed guided suggestion for this emotion.
    pub fn suggestion(&self) -> String {
        let phrase = match self {
            Emotion::Anxious => "breathe deeply and ground yourself",
            Emotion::Sad => "acknowledge your feelings and be gentle with yourself",
            Emotion::Angry => "step back and find healthy outlets for your emotions",
            Emotion::Stressed => "pause and prioritize self-care",
            Emotion::Confused => "write down your thoughts to gain clarity",
            Emotion::Excited => "channel this energy into something meaningful",
            Emotion::Happy => "savor this moment and share your joy",
            Emotion::Calm => "reflect on your inner peace",
        };
        format!("Take a moment to {phrase}.")
    }
}

/// Looks up presentation metadata for a raw label, falling back to `calm`.
pub fn lookup(label: &str) -> &'static EmotionProfile {
    Emotion::normalize(Some(label)).profile()
}

/// Clamps an intensity into `[0, 1]`, mapping a missing or non-finite value
/// to [`DEFAULT_INTENSITY`].
pub fn clamp_intensity(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => DEFAULT_INTENSITY,
    }
}

static HAPPY: EmotionProfile = EmotionProfile {
    emoji: "😊",
    color: "#FFD700",
    gradient: "from-yellow-400 to-orange-400",
    quote: "Happiness is not something ready made. It comes from your own actions.",
    song: "Happy - Pharrell Williams",
};

static SAD: EmotionProfile = EmotionProfile {
    emoji: "😢",
    color: "#4A90E2",
    gradient: "from-blue-400 to-blue-600",
    quote: "Tears are words that need to be written.",
    song: "Someone Like You - Adele",
};

static ANXIOUS: EmotionProfile = EmotionProfile {
    emoji: "😰",
    color: "#FF6B6B",
    gradient: "from-red-400 to-orange-500",
    quote: "You are braver than you believe, stronger than you seem.",
    song: "Breathe Me - Sia",
};

static ANGRY: EmotionProfile = EmotionProfile {
    emoji: "😠",
    color: "#E74C3C",
    gradient: "from-red-500 to-red-700",
    quote: "Holding onto anger is like drinking poison and expecting the other person to die.",
    song: "Let It Go - James Bay",
};

static CALM: EmotionProfile = EmotionProfile {
    emoji: "😌",
    color: "#95E1D3",
    gradient: "from-teal-300 to-cyan-400",
    quote: "Peace comes from within. Do not seek it without.",
    song: "Weightless - Marconi Union",
};

static STRESSED: EmotionProfile = EmotionProfile {
    emoji: "😖",
    color: "#9B59B6",
    gradient: "from-purple-500 to-pink-500",
    quote: "It's not the load that breaks you down, it's the way you carry it.",
    song: "Calm Down - Rema",
};

static CONFUSED: EmotionProfile = EmotionProfile {
    emoji: "😕",
    color: "#95A5A6",
    gradient: "from-gray-400 to-gray-600",
    quote: "Confusion is a word we have invented for an order which is not understood.",
    song: "The Sound of Silence - Simon & Garfunkel",
};

static EXCITED: EmotionProfile = EmotionProfile {
    emoji: "🤩",
    color: "#F39C12",
    gradient: "from-orange-400 to-pink-500",
    quote: "Energy and persistence conquer all things.",
    song: "Can't Stop the Feeling - Justin Timberlake",
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(Emotion::parse("  HaPpY "), Some(Emotion::Happy));
        assert_eq!(Emotion::parse("stressed"), Some(Emotion::Stressed));
        assert_eq!(Emotion::parse("furious"), None);
    }

    #[test]
    fn normalize_falls_back_to_calm() {
        assert_eq!(Emotion::normalize(Some("furious")), Emotion::Calm);
        assert_eq!(Emotion::normalize(None), Emotion::Calm);
        assert_eq!(Emotion::normalize(Some("Anxious")), Emotion::Anxious);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Emotion::Excited.to_string(), "excited");
        assert_eq!(Emotion::Confused.as_str(), "confused");
    }

    #[test]
    fn lookup_unknown_label_uses_calm_profile() {
        assert_eq!(lookup("nope"), Emotion::Calm.profile());
        assert_eq!(lookup(" SAD ").song, "Someone Like You - Adele");
    }

    #[test]
    fn happy_suggestion_matches_template() {
        assert_eq!(
            Emotion::Happy.suggestion(),
            "Take a moment to savor this moment and share your joy."
        );
        assert_eq!(
            Emotion::Calm.suggestion(),
            "Take a moment to reflect on your inner peace."
        );
    }

    #[test]
    fn every_emotion_has_a_distinct_suggestion() {
        let mut seen = std::collections::HashSet::new();
        for emotion in Emotion::ALL {
            assert!(seen.insert(emotion.suggestion()), "{emotion} repeats");
        }
    }

    #[test]
    fn clamp_intensity_edges() {
        assert_eq!(clamp_intensity(Some(1.7)), 1.0);
        assert_eq!(clamp_intensity(Some(-0.2)), 0.0);
        assert_eq!(clamp_intensity(None), 0.5);
        assert_eq!(clamp_intensity(Some(f64::NAN)), 0.5);
        assert_eq!(clamp_intensity(Some(0.8)), 0.8);
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Emotion::Angry).unwrap();
        assert_eq!(json, "\"angry\"");
        let parsed: Emotion = serde_json::from_str("\"calm\"").unwrap();
        assert_eq!(parsed, Emotion::Calm);
    }

    proptest! {
        #[test]
        fn normalize_always_yields_a_known_label(label in ".*") {
            let emotion = Emotion::normalize(Some(&label));
            prop_assert!(Emotion::ALL.contains(&emotion));
        }

        #[test]
        fn clamped_intensity_stays_in_unit_range(raw in proptest::num::f64::ANY) {
            let v = clamp_intensity(Some(raw));
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
