//! Router configuration
//!
//! Every field has a default, and [`RouterConfig::default`] reproduces the
//! built-in routing behaviour. A TOML file only needs the values it
//! changes:
//!
//! ```toml
//! [scoring]
//! min_score = 0.75
//!
//! [confidence]
//! long_input_chars = 80
//! ```
//!
//! A `[[rules]]` array replaces the canonical rule table entirely; its
//! order becomes the registration order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::{self, intents, pipelines, IntentRule};

fn default_pattern_weight() -> f64 {
    2.0
}

fn default_keyword_weight() -> f64 {
    1.5
}

fn default_min_score() -> f64 {
    0.5
}

fn default_matched_base() -> f64 {
    0.8
}

fn default_fallback_base() -> f64 {
    0.3
}

fn default_long_input_chars() -> usize {
    50
}

fn default_long_input_bonus() -> f64 {
    0.1
}

fn default_media_bonus() -> f64 {
    0.15
}

fn default_fallback_intent() -> String {
    intents::QUESTION_ANSWERING.to_string()
}

fn default_fallback_pipeline() -> String {
    pipelines::KNOWLEDGE_EXPLAINER.to_string()
}

/// Top-level router configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Replacement rule table. `None` keeps the canonical table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<IntentRule>>,
}

/// Weights of the two scoring terms and the acceptance floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Added once when any pattern of a rule matches.
    #[serde(default = "default_pattern_weight")]
    pub pattern_weight: f64,
    /// Multiplier applied to the keyword coverage fraction.
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    /// Winning scores below this fall back to the default intent.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pattern_weight: default_pattern_weight(),
            keyword_weight: default_keyword_weight(),
            min_score: default_min_score(),
        }
    }
}

/// Base confidences and additive adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    #[serde(default = "default_matched_base")]
    pub matched_base: f64,
    #[serde(default = "default_fallback_base")]
    pub fallback_base: f64,
    /// Inputs strictly longer than this many characters get the bonus.
    #[serde(default = "default_long_input_chars")]
    pub long_input_chars: usize,
    #[serde(default = "default_long_input_bonus")]
    pub long_input_bonus: f64,
    /// Material adaptation with an image or file attached.
    #[serde(default = "default_media_bonus")]
    pub image_bonus: f64,
    /// Assessment with audio attached.
    #[serde(default = "default_media_bonus")]
    pub audio_bonus: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            matched_base: default_matched_base(),
            fallback_base: default_fallback_base(),
            long_input_chars: default_long_input_chars(),
            long_input_bonus: default_long_input_bonus(),
            image_bonus: default_media_bonus(),
            audio_bonus: default_media_bonus(),
        }
    }
}

/// Where low-scoring requests go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fallback_intent")]
    pub intent: String,
    #[serde(default = "default_fallback_pipeline")]
    pub pipeline: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            intent: default_fallback_intent(),
            pipeline: default_fallback_pipeline(),
        }
    }
}

impl RouterConfig {
    /// The configured rule table, or the canonical one.
    pub fn rule_specs(&self) -> Vec<IntentRule> {
        self.rules.clone().unwrap_or_else(rules::canonical_rules)
    }
}

/// Check semantic constraints, collecting every violation.
pub fn validate(config: &RouterConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = [
        ("scoring.pattern_weight", config.scoring.pattern_weight),
        ("scoring.keyword_weight", config.scoring.keyword_weight),
        ("scoring.min_score", config.scoring.min_score),
        ("confidence.long_input_bonus", config.confidence.long_input_bonus),
        ("confidence.image_bonus", config.confidence.image_bonus),
        ("confidence.audio_bonus", config.confidence.audio_bonus),
    ];
    for (field, value) in weights {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{field} must be a non-negative number, got {value}"));
        }
    }

    let bases = [
        ("confidence.matched_base", config.confidence.matched_base),
        ("confidence.fallback_base", config.confidence.fallback_base),
    ];
    for (field, value) in bases {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!("{field} must be within [0, 1], got {value}"));
        }
    }

    if config.fallback.intent.trim().is_empty() {
        errors.push("fallback.intent must not be empty".to_string());
    }
    if config.fallback.pipeline.trim().is_empty() {
        errors.push("fallback.pipeline must not be empty".to_string());
    }

    if let Some(rules) = &config.rules {
        if let Err(rule_errors) = rules::validate_rules(rules) {
            errors.extend(rule_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Load a [`RouterConfig`] from a TOML file.
pub fn load_from_file(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.display().to_string(),
        source: e,
    })?;

    load_from_str(&content, &path.display().to_string())
}

/// Load a [`RouterConfig`] from a TOML string. `source_name` appears in errors.
pub fn load_from_str(content: &str, source_name: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        file: source_name.to_string(),
        source: e,
    })?;

    validate(&config).map_err(|errors| ConfigError::Validation(errors.join("\n")))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_is_default() {
        let config = load_from_str("", "inline").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.scoring.pattern_weight, 2.0);
        assert_eq!(config.confidence.long_input_chars, 50);
        assert_eq!(config.fallback.pipeline, "KnowledgeExplainer");
        assert_eq!(config.rule_specs().len(), 6);
    }

    #[test]
    fn test_partial_override() {
        let config = load_from_str("[scoring]\nmin_score = 1.0\n", "inline").unwrap();
        assert_eq!(config.scoring.min_score, 1.0);
        assert_eq!(config.scoring.keyword_weight, 1.5);
    }

    #[test]
    fn test_rules_override() {
        let toml = r#"
[[rules]]
intent_name = "greeting"
patterns = ["^(hi|hello)"]
keywords = ["hello"]
target_pipeline = "Greeter"

[[rules]]
intent_name = "farewell"
keywords = ["bye"]
target_pipeline = "Greeter"
"#;
        let config = load_from_str(toml, "inline").unwrap();
        let specs = config.rule_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].intent_name, "farewell");
        assert!(specs[1].patterns.is_empty());
    }

    #[test]
    fn test_invalid_values_collected() {
        let toml = "[scoring]\npattern_weight = -1.0\n[confidence]\nmatched_base = 1.5\n";
        match load_from_str(toml, "inline") {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains("scoring.pattern_weight"));
                assert!(msg.contains("confidence.matched_base"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = load_from_str("[scoring", "router.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("router.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("test: create tempdir");
        let path = dir.path().join("router.toml");
        let mut file = std::fs::File::create(&path).expect("test: create file");
        writeln!(file, "[fallback]\nintent = \"visual_aid\"\npipeline = \"VisualAid\"").expect("test: write");

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.fallback.intent, "visual_aid");
    }

    #[test]
    fn test_missing_file() {
        let err = load_from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
