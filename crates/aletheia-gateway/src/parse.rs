// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning free-form completion text into validated values.
//!
//! Nothing here trusts the model: labels are normalized against the emotion
//! vocabulary, numbers are clamped, and anything that is not a JSON object
//! is a [`AletheiaError::MalformedResponse`].

use aletheia_core::AletheiaError;
use aletheia_core::Emotion;
use aletheia_core::emotion::clamp_intensity;
use aletheia_core::types::EmotionAnalysis;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_SUMMARY: &str = "Your emotional state has been analyzed.";

/// Removes Markdown code fences (```json or bare ```) around a payload.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The slice from the first `{` to the last `}`, if there is one.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    emotion: Option<Value>,
    #[serde(default)]
    intensity: Option<Value>,
    #[serde(default)]
    summary: Option<Value>,
}

/// Accepts numbers and numeric strings; anything else counts as missing.
fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: Option<&Value>) -> Option<&str> {
    value?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Parses an analysis reply and enriches it from the static emotion table.
pub fn parse_analysis(raw: &str) -> Result<EmotionAnalysis, AletheiaError> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| AletheiaError::malformed(format!("response was not JSON: {e}")))?;
    if !value.is_object() {
        return Err(AletheiaError::malformed("response was not a JSON object"));
    }
    let parsed: RawAnalysis = serde_json::from_value(value)
        .map_err(|e| AletheiaError::malformed(format!("unexpected response shape: {e}")))?;

    let emotion = Emotion::normalize(as_text(parsed.emotion.as_ref()));
    let profile = emotion.profile();
    Ok(EmotionAnalysis {
        emotion,
        intensity: clamp_intensity(as_number(parsed.intensity.as_ref())),
        summary: as_text(parsed.summary.as_ref())
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string(),
        emoji: profile.emoji.to_string(),
        quote: profile.quote.to_string(),
        song: profile.song.to_string(),
        color: profile.color.to_string(),
        suggestion: emotion.suggestion(),
    })
}

/// The structured recap the model returns for a conversation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationDigest {
    pub dominant_emotion: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub worries: Vec<String>,
    #[serde(default)]
    pub reflective_suggestions: String,
    #[serde(default)]
    pub positive_reinforcement: String,
    #[serde(default)]
    pub recommended_next_steps: Vec<String>,
}

/// Parses a summary reply; surrounding prose is ignored.
pub fn parse_digest(raw: &str) -> Result<ConversationDigest, AletheiaError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| AletheiaError::malformed("summary reply contained no JSON object"))?;
    let digest: ConversationDigest = serde_json::from_str(json)
        .map_err(|e| AletheiaError::malformed(format!("summary reply was not usable: {e}")))?;
    if digest.dominant_emotion.trim().is_empty() {
        return Err(AletheiaError::malformed("summary reply had no dominant emotion"));
    }
    Ok(digest)
}

/// Splits a meditation script into narration segments on blank lines.
pub fn split_segments(script: &str) -> Vec<String> {
    script
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-empty trimmed reply text, or a malformed-response error.
pub fn require_text(raw: &str, what: &str) -> Result<String, AletheiaError> {
    let text = raw.trim();
    if text.is_empty() {
        Err(AletheiaError::malformed(format!("{what} reply was empty")))
    } else {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unknown_emotion_falls_back_and_keeps_intensity() {
        let a = parse_analysis(r#"{"emotion":"furious","intensity":0.9}"#).unwrap();
        assert_eq!(a.emotion, Emotion::Calm);
        assert_eq!(a.intensity, 0.9);
        assert_eq!(a.summary, DEFAULT_SUMMARY);
        assert_eq!(a.suggestion, "Take a moment to reflect on your inner peace.");
    }

    #[test]
    fn intensity_is_clamped_or_defaulted() {
        let high = parse_analysis(r#"{"emotion":"sad","intensity":1.7}"#).unwrap();
        assert_eq!(high.intensity, 1.0);
        let low = parse_analysis(r#"{"emotion":"sad","intensity":-0.2}"#).unwrap();
        assert_eq!(low.intensity, 0.0);
        let missing = parse_analysis(r#"{"emotion":"sad"}"#).unwrap();
        assert_eq!(missing.intensity, 0.5);
        let text = parse_analysis(r#"{"emotion":"sad","intensity":"0.3"}"#).unwrap();
        assert_eq!(text.intensity, 0.3);
    }

    #[test]
    fn fenced_and_bare_json_parse_identically() {
        let bare = r#"{"emotion":"Happy","intensity":0.8,"summary":"Joyful."}"#;
        let fenced = format!("```json\n{bare}\n```");
        let plain_fence = format!("```\n{bare}\n```");
        let a = parse_analysis(bare).unwrap();
        assert_eq!(parse_analysis(&fenced).unwrap(), a);
        assert_eq!(parse_analysis(&plain_fence).unwrap(), a);
        assert_eq!(a.emotion, Emotion::Happy);
        assert_eq!(a.emoji, "😊");
        assert_eq!(a.song, "Happy - Pharrell Williams");
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_analysis("I think you feel happy").unwrap_err();
        assert!(matches!(err, AletheiaError::MalformedResponse { .. }));
        let err = parse_analysis("[1, 2]").unwrap_err();
        assert!(matches!(err, AletheiaError::MalformedResponse { .. }));
    }

    #[test]
    fn digest_is_extracted_from_surrounding_prose() {
        let raw = r#"Here you go:
{"dominant_emotion":"anxiety","key_topics":["work"],"worries":["deadline"],
 "reflective_suggestions":"Rest.","positive_reinforcement":"Well done.",
 "recommended_next_steps":["walk"]}
Hope this helps!"#;
        let digest = parse_digest(raw).unwrap();
        assert_eq!(digest.dominant_emotion, "anxiety");
        assert_eq!(digest.key_topics, vec!["work"]);
        assert_eq!(digest.recommended_next_steps, vec!["walk"]);
    }

    #[test]
    fn digest_without_object_is_malformed() {
        assert!(parse_digest("no json here").is_err());
        assert!(parse_digest(r#"{"key_topics":[]}"#).is_err());
    }

    #[test]
    fn segments_split_on_blank_lines() {
        let script = "Welcome.\n\nBreathe in.\nHold.\n\n\n\n  \n\nRelax.\n";
        assert_eq!(
            split_segments(script),
            vec!["Welcome.", "Breathe in.\nHold.", "Relax."]
        );
        assert!(split_segments("  \n\n ").is_empty());
    }

    proptest! {
        #[test]
        fn any_label_and_number_normalize(label in "[a-zA-Z]{0,12}", intensity in -10.0f64..10.0) {
            let raw = serde_json::json!({"emotion": label, "intensity": intensity}).to_string();
            let a = parse_analysis(&raw).unwrap();
            prop_assert!(Emotion::ALL.contains(&a.emotion));
            prop_assert!((0.0..=1.0).contains(&a.intensity));
        }
    }
}
