//! Confidence model
//!
//! Confidence reflects how the intent was chosen, not the raw rule score:
//! overrides and rule matches share one base, the fallback path another.
//! Adjustments are additive and the result is clamped to `[0, 1]`.

use crate::config::ConfidenceConfig;
use crate::rules::intents;
use crate::types::MatchSource;

/// Request-level signals that move confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceSignals {
    /// Length of the extracted input in characters.
    pub input_chars: usize,
    pub has_image: bool,
    pub has_audio: bool,
}

pub fn compute_confidence(
    intent: &str,
    source: MatchSource,
    signals: ConfidenceSignals,
    config: &ConfidenceConfig,
) -> f64 {
    let mut confidence = match source {
        MatchSource::Override | MatchSource::Rule => config.matched_base,
        MatchSource::Fallback => config.fallback_base,
    };

    if signals.input_chars > config.long_input_chars {
        confidence += config.long_input_bonus;
    }
    if intent == intents::MATERIAL_ADAPTATION && signals.has_image {
        confidence += config.image_bonus;
    }
    if intent == intents::ASSESSMENT && signals.has_audio {
        confidence += config.audio_bonus;
    }

    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(input_chars: usize, has_image: bool, has_audio: bool) -> ConfidenceSignals {
        ConfidenceSignals {
            input_chars,
            has_image,
            has_audio,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bases() {
        let config = ConfidenceConfig::default();
        assert!(approx(compute_confidence("visual_aid", MatchSource::Rule, signals(10, false, false), &config), 0.8));
        assert!(approx(compute_confidence("assessment", MatchSource::Override, signals(10, false, false), &config), 0.8));
        assert!(approx(
            compute_confidence("question_answering", MatchSource::Fallback, signals(10, false, false), &config),
            0.3
        ));
    }

    #[test]
    fn test_length_bonus_is_strict() {
        let config = ConfidenceConfig::default();
        assert!(approx(compute_confidence("visual_aid", MatchSource::Rule, signals(50, false, false), &config), 0.8));
        assert!(approx(compute_confidence("visual_aid", MatchSource::Rule, signals(51, false, false), &config), 0.9));
    }

    #[test]
    fn test_media_bonus_needs_matching_intent() {
        let config = ConfidenceConfig::default();
        assert!(approx(
            compute_confidence("material_adaptation", MatchSource::Rule, signals(10, true, false), &config),
            0.95
        ));
        assert!(approx(compute_confidence("assessment", MatchSource::Rule, signals(10, true, false), &config), 0.8));
        assert!(approx(compute_confidence("assessment", MatchSource::Rule, signals(10, false, true), &config), 0.95));
        assert!(approx(
            compute_confidence("material_adaptation", MatchSource::Rule, signals(10, false, true), &config),
            0.8
        ));
    }

    #[test]
    fn test_clamped_to_unit_interval() {
        let config = ConfidenceConfig::default();
        assert_eq!(compute_confidence("assessment", MatchSource::Rule, signals(500, true, true), &config), 1.0);

        let generous = ConfidenceConfig {
            matched_base: 1.0,
            long_input_bonus: 3.0,
            ..ConfidenceConfig::default()
        };
        for intent in ["assessment", "material_adaptation", "visual_aid"] {
            for source in [MatchSource::Rule, MatchSource::Override, MatchSource::Fallback] {
                for (chars, image, audio) in [(0, false, false), (100, true, true), (51, true, false)] {
                    let value = compute_confidence(intent, source, signals(chars, image, audio), &generous);
                    assert!((0.0..=1.0).contains(&value));
                }
            }
        }
    }
}
