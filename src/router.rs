//! Request router
//!
//! Turns a [`RouteRequest`] into a [`RoutingDecision`]: extracts the input
//! text, classifies it, scores confidence, detects the script and attaches
//! processing hints. The router owns only its immutable rule table and
//! configuration, so one instance can serve any number of threads.

use serde_json::Value;
use tracing::{debug, info};

use crate::confidence::{compute_confidence, ConfidenceSignals};
use crate::config::{self, RouterConfig};
use crate::error::{ConfigError, RouteError};
use crate::hints::processing_hints;
use crate::language::detect_language;
use crate::matcher;
use crate::request::RouteRequest;
use crate::rules::RuleSet;
use crate::types::{Capabilities, Classification, InputAnalysis, MatchSource, RoutingData, RoutingDecision};

/// Rule-based intent router.
#[derive(Debug, Clone)]
pub struct Router {
    rules: RuleSet,
    config: RouterConfig,
}

impl Router {
    /// Router with the canonical rule table and default settings.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::canonical(),
            config: RouterConfig::default(),
        }
    }

    /// Validate `config` and compile its rule table.
    pub fn from_config(config: RouterConfig) -> Result<Self, ConfigError> {
        config::validate(&config).map_err(|errors| ConfigError::Validation(errors.join("\n")))?;
        let rules = RuleSet::compile(&config.rule_specs())?;
        Ok(Self { rules, config })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Classify raw text, ignoring any request context.
    pub fn classify(&self, input: &str) -> Classification {
        self.classify_with(input, None)
    }

    /// Classify raw text, honouring a known explicit intent.
    pub fn classify_with(&self, input: &str, explicit_type: Option<&str>) -> Classification {
        matcher::classify(
            input,
            explicit_type,
            &self.rules,
            &self.config.scoring,
            &self.config.fallback,
        )
    }

    /// Route a request.
    ///
    /// Fails with [`RouteError::InputMissing`] when no candidate text field
    /// holds a non-empty string.
    pub fn route(&self, request: &RouteRequest) -> Result<RoutingDecision, RouteError> {
        let input_text = request.extract_input_text();
        if input_text.is_empty() {
            return Err(RouteError::InputMissing);
        }

        let original_request = request.to_json()?;
        let classification = self.classify_with(&input_text, request.kind.as_deref());
        match classification.source {
            MatchSource::Override => {
                debug!(intent = %classification.intent_name, "Using explicit request type");
            }
            MatchSource::Fallback => {
                debug!(
                    best_score = classification.score,
                    fallback = %classification.intent_name,
                    "No intent scored above the floor, using fallback"
                );
            }
            MatchSource::Rule => {}
        }

        let input_length = input_text.chars().count();
        let signals = ConfidenceSignals {
            input_chars: input_length,
            has_image: request.has_image(),
            has_audio: request.has_audio(),
        };
        let confidence = compute_confidence(
            &classification.intent_name,
            classification.source,
            signals,
            &self.config.confidence,
        );
        let language = detect_language(&input_text);

        info!(
            input_length,
            detected_intent = %classification.intent_name,
            target_agent = %classification.target_pipeline,
            confidence,
            "Intent detected and routing determined"
        );

        Ok(RoutingDecision {
            routing_data: RoutingData {
                original_request,
                detected_language: language,
                processing_hints: processing_hints(&classification.intent_name),
            },
            input_analysis: InputAnalysis {
                input_length,
                language,
                contains_image: signals.has_image,
                contains_audio: signals.has_audio,
            },
            detected_intent: classification.intent_name,
            target_agent: classification.target_pipeline,
            confidence,
        })
    }

    /// Route a request given as arbitrary JSON.
    pub fn route_json(&self, request: &Value) -> Result<RoutingDecision, RouteError> {
        self.route(&RouteRequest::from_json(request)?)
    }

    /// Describe what this router does and which intents it knows.
    pub fn capabilities(&self) -> Capabilities {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Capabilities {
            name: "Orchestrator".to_string(),
            description: "Intent detection and request routing agent".to_string(),
            supported_operations: strings(&[
                "intent_detection",
                "request_routing",
                "language_detection",
                "confidence_scoring",
            ]),
            supported_intents: self.rules.intent_names(),
            input_types: strings(&["text", "multimodal"]),
            output_types: strings(&["routing_info"]),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::language::Script;
    use crate::rules::IntentRule;
    use serde_json::json;

    #[test]
    fn test_story_scenario() {
        let router = Router::new();
        let text = "Can you create a story about farming for grade 3?";
        let decision = router.route(&RouteRequest::text(text)).unwrap();

        assert_eq!(decision.detected_intent, "content_generation");
        assert_eq!(decision.target_agent, "ContentGenerator");
        // Under 51 characters: no length bonus
        assert!((decision.confidence - 0.8).abs() < 1e-9);
        assert_eq!(decision.input_analysis.input_length, 49);
        assert_eq!(decision.routing_data.detected_language, Script::English);
    }

    #[test]
    fn test_long_input_bonus() {
        let router = Router::new();
        let decision = router
            .route(&RouteRequest::text("Can you please create a story about farming for my grade 3 class?"))
            .unwrap();
        assert_eq!(decision.detected_intent, "content_generation");
        assert!((decision.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_devanagari_scenario() {
        let decision = Router::new().route(&RouteRequest::text("आज हम क्या पढ़ेंगे?")).unwrap();
        assert_eq!(decision.routing_data.detected_language, Script::Hindi);
        assert_eq!(decision.input_analysis.language, Script::Hindi);
        // No rule matches Devanagari text
        assert_eq!(decision.detected_intent, "question_answering");
        assert!((decision.confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_rejected() {
        let router = Router::new();
        assert_eq!(router.route(&RouteRequest::text("")), Err(RouteError::InputMissing));
        assert_eq!(router.route(&RouteRequest::text("   ")), Err(RouteError::InputMissing));
        assert_eq!(router.route_json(&json!({"image": "x"})), Err(RouteError::InputMissing));
    }

    #[test]
    fn test_worksheet_with_image_scenario() {
        let decision = Router::new()
            .route_json(&json!({"text": "worksheet for grade 2", "image": "page.jpg"}))
            .unwrap();
        assert_eq!(decision.detected_intent, "material_adaptation");
        assert_eq!(decision.target_agent, "MaterialAdapter");
        assert!((decision.confidence - 0.95).abs() < 1e-9);
        assert!(decision.input_analysis.contains_image);
        assert_eq!(decision.routing_data.processing_hints.requires_image_processing, Some(true));
    }

    #[test]
    fn test_explicit_type_short_circuits() {
        let decision = Router::new()
            .route(&RouteRequest::text("Can you create a story about farming?").with_kind("assessment"))
            .unwrap();
        assert_eq!(decision.detected_intent, "assessment");
        assert_eq!(decision.target_agent, "Assessment");
        assert!((decision.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_assessment_with_audio_capped() {
        let request = RouteRequest::text("Please check my student reading fluency and pronunciation today")
            .with_audio(json!("clip.wav"));
        let decision = Router::new().route(&request).unwrap();
        assert_eq!(decision.detected_intent, "assessment");
        assert_eq!(decision.confidence, 1.0);
        assert!(decision.input_analysis.contains_audio);
    }

    #[test]
    fn test_nested_data_and_echo() {
        let original = json!({
            "data": {"query": "draw a diagram of the heart"},
            "topic": "biology",
            "user_id": "u-1"
        });
        let decision = Router::new().route_json(&original).unwrap();
        assert_eq!(decision.detected_intent, "visual_aid");
        assert_eq!(decision.routing_data.original_request, original);
    }

    #[test]
    fn test_echo_includes_malformed_fields() {
        let original = json!({"text": 42, "query": "what is rain?", "data": "oops", "type": 7});
        let decision = Router::new().route_json(&original).unwrap();
        assert_eq!(decision.detected_intent, "question_answering");
        assert_eq!(decision.routing_data.original_request, original);
    }

    #[test]
    fn test_output_shape() {
        let decision = Router::new().route(&RouteRequest::text("weekly plan for my class")).unwrap();
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["detected_intent"], "lesson_planning");
        assert_eq!(value["target_agent"], "LessonPlanner");
        assert_eq!(value["routing_data"]["detected_language"], "en");
        assert_eq!(value["routing_data"]["processing_hints"]["output_format"], "weekly_schedule");
        assert_eq!(value["input_analysis"]["contains_image"], false);
        assert_eq!(value["input_analysis"]["input_length"], 24);
    }

    #[test]
    fn test_configured_router() {
        let config = RouterConfig {
            scoring: ScoringConfig {
                min_score: 3.0,
                ..ScoringConfig::default()
            },
            ..RouterConfig::default()
        };
        let router = Router::from_config(config).unwrap();
        let decision = router.route(&RouteRequest::text("please sketch a tree")).unwrap();
        assert_eq!(decision.detected_intent, "question_answering");
        assert!((decision.confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_custom_rules() {
        let config = RouterConfig {
            rules: Some(vec![IntentRule::new("greeting", &["^(hi|hello)\\b"], &[], "Greeter")]),
            ..RouterConfig::default()
        };
        let router = Router::from_config(config).unwrap();
        let decision = router.route(&RouteRequest::text("Hello there")).unwrap();
        assert_eq!(decision.detected_intent, "greeting");
        assert_eq!(decision.target_agent, "Greeter");
        assert_eq!(router.capabilities().supported_intents, vec!["greeting"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RouterConfig {
            rules: Some(vec![IntentRule::new("bad", &["[z-a]"], &[], "X")]),
            ..RouterConfig::default()
        };
        assert!(matches!(Router::from_config(config), Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_capabilities() {
        let caps = Router::new().capabilities();
        assert_eq!(caps.name, "Orchestrator");
        assert_eq!(caps.supported_intents.len(), 6);
        assert_eq!(caps.supported_intents[0], "content_generation");
        assert!(caps.supported_operations.contains(&"language_detection".to_string()));
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();

        let router = std::sync::Arc::new(Router::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let router = router.clone();
                std::thread::spawn(move || router.classify("what is a noun?").intent_name)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "question_answering");
        }
    }
}
