//! Processing hints keyed by intent
//!
//! Static configuration that lets callers size UI and latency
//! expectations before a pipeline runs.

use serde::{Deserialize, Serialize};

use crate::rules::intents;

/// Every intent runs at normal priority; no other level is ever assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Text,
    TextAndImage,
    ImageDescription,
    StructuredFeedback,
    StructuredPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyClass {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingHints {
    pub priority: Priority,
    pub expected_output_type: OutputType,
    pub processing_time_estimate: LatencyClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_image_processing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_audio_processing: Option<bool>,
}

impl Default for ProcessingHints {
    fn default() -> Self {
        Self {
            priority: Priority::Normal,
            expected_output_type: OutputType::Text,
            processing_time_estimate: LatencyClass::Fast,
            content_type: None,
            output_format: None,
            requires_image_processing: None,
            requires_audio_processing: None,
        }
    }
}

/// Hints for `intent`. Unknown intents, including the default
/// question-answering intent, get the base record.
pub fn processing_hints(intent: &str) -> ProcessingHints {
    let base = ProcessingHints::default();
    match intent {
        intents::CONTENT_GENERATION => ProcessingHints {
            processing_time_estimate: LatencyClass::Medium,
            content_type: Some("educational".to_string()),
            ..base
        },
        intents::MATERIAL_ADAPTATION => ProcessingHints {
            expected_output_type: OutputType::TextAndImage,
            processing_time_estimate: LatencyClass::Slow,
            requires_image_processing: Some(true),
            ..base
        },
        intents::VISUAL_AID => ProcessingHints {
            expected_output_type: OutputType::ImageDescription,
            processing_time_estimate: LatencyClass::Medium,
            output_format: Some("diagram_instructions".to_string()),
            ..base
        },
        intents::ASSESSMENT => ProcessingHints {
            expected_output_type: OutputType::StructuredFeedback,
            processing_time_estimate: LatencyClass::Slow,
            requires_audio_processing: Some(true),
            ..base
        },
        intents::LESSON_PLANNING => ProcessingHints {
            expected_output_type: OutputType::StructuredPlan,
            processing_time_estimate: LatencyClass::Medium,
            output_format: Some("weekly_schedule".to_string()),
            ..base
        },
        _ => base,
    }
}
