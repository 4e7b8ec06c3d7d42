//! Core data types for routing results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hints::ProcessingHints;
use crate::language::Script;

/// How an intent was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Caller supplied a known intent name in `type`.
    Override,
    /// A rule scored at or above the floor.
    Rule,
    /// Nothing scored high enough; the default intent was used.
    Fallback,
}

/// Score of a single rule against an input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent_name: String,
    pub pattern_score: f64,
    pub keyword_score: f64,
    pub matched_pattern: Option<String>,
    pub matched_keywords: Vec<String>,
}

impl IntentScore {
    pub fn total(&self) -> f64 {
        self.pattern_score + self.keyword_score
    }
}

/// Outcome of intent classification, before confidence and hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent_name: String,
    pub target_pipeline: String,
    pub source: MatchSource,
    /// Winning raw score; zero for overrides and the empty-table fallback.
    pub score: f64,
    /// Per-rule breakdown in registration order. Empty for overrides.
    pub scores: Vec<IntentScore>,
}

/// Final routing decision for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub detected_intent: String,
    pub target_agent: String,
    pub confidence: f64,
    pub routing_data: RoutingData,
    pub input_analysis: InputAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingData {
    pub original_request: Value,
    pub detected_language: Script,
    pub processing_hints: ProcessingHints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAnalysis {
    /// Length of the extracted text in characters.
    pub input_length: usize,
    pub language: Script,
    pub contains_image: bool,
    pub contains_audio: bool,
}

/// Self-description returned by [`crate::router::Router::capabilities`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    pub description: String,
    pub supported_operations: Vec<String>,
    pub supported_intents: Vec<String>,
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
}
