//! Pipeline dispatch
//!
//! Generation pipelines sit behind the [`Pipeline`] trait. The registry is
//! built once at startup and handed to whoever dispatches decisions; there
//! is no global instance. Dispatch never surfaces a pipeline failure: an
//! error or empty output is replaced by the pipeline's deterministic
//! fallback, so every routed request yields non-empty content.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{DispatchError, PipelineError};
use crate::request::RouteRequest;
use crate::rules::pipelines;
use crate::types::RoutingDecision;

/// Inputs handed to a generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub language: String,
    pub grade_level: Option<String>,
    /// Remaining caller-supplied fields.
    pub params: Map<String, Value>,
}

impl GenerationRequest {
    /// Build from a routed request. Explicit `topic` and `language` fields
    /// win over the extracted text and the detected script.
    pub fn from_route(request: &RouteRequest, decision: &RoutingDecision) -> Self {
        let topic = request
            .extra_str("topic")
            .map(str::to_string)
            .unwrap_or_else(|| request.extract_input_text());
        let language = request
            .extra_str("language")
            .map(str::to_string)
            .unwrap_or_else(|| decision.routing_data.detected_language.code().to_string());
        let grade_level = request.extra_str("grade_level").map(str::to_string);

        let mut params = request.extra.clone();
        for key in ["topic", "language", "grade_level"] {
            params.remove(key);
        }

        Self {
            topic,
            language,
            grade_level,
            params,
        }
    }
}

/// A generation pipeline, usually wrapping a generative-AI call.
pub trait Pipeline: Send + Sync {
    /// Identifier matched against [`RoutingDecision::target_agent`].
    fn name(&self) -> &str;

    fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError>;

    /// Deterministic content used when `generate` fails.
    fn fallback(&self, request: &GenerationRequest) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub agent: String,
    pub operation: String,
    /// Seconds with millisecond precision, e.g. `"0.004s"`.
    pub processing_time: String,
    /// Unix seconds.
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub content: String,
    pub used_fallback: bool,
    pub metadata: ResponseMetadata,
}

/// Pipelines keyed by name.
#[derive(Clone, Default)]
pub struct PipelineRegistry {
    pipelines: AHashMap<String, Arc<dyn Pipeline>>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`OfflinePipeline`] per canonical target.
    pub fn offline() -> Self {
        let mut registry = Self::new();
        for name in [
            pipelines::CONTENT_GENERATOR,
            pipelines::KNOWLEDGE_EXPLAINER,
            pipelines::MATERIAL_ADAPTER,
            pipelines::VISUAL_AID,
            pipelines::ASSESSMENT,
            pipelines::LESSON_PLANNER,
        ] {
            registry.register(Arc::new(OfflinePipeline::new(name)));
        }
        registry
    }

    /// Register `pipeline`, returning any pipeline it replaces.
    pub fn register(&mut self, pipeline: Arc<dyn Pipeline>) -> Option<Arc<dyn Pipeline>> {
        self.pipelines.insert(pipeline.name().to_string(), pipeline)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Pipeline>> {
        self.pipelines.get(name)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Run the pipeline named by `decision.target_agent`.
    pub fn dispatch(
        &self,
        decision: &RoutingDecision,
        request: &RouteRequest,
    ) -> Result<PipelineResponse, DispatchError> {
        let pipeline = self
            .get(&decision.target_agent)
            .ok_or_else(|| DispatchError::UnknownPipeline(decision.target_agent.clone()))?;
        let generation = GenerationRequest::from_route(request, decision);

        let start = Instant::now();
        let outcome = pipeline.generate(&generation).and_then(|content| {
            if content.trim().is_empty() {
                Err(PipelineError::EmptyOutput(pipeline.name().to_string()))
            } else {
                Ok(content)
            }
        });

        let (content, used_fallback) = match outcome {
            Ok(content) => (content, false),
            Err(error) => {
                let mut content = pipeline.fallback(&generation);
                if content.trim().is_empty() {
                    content = format!("{} content for {}", pipeline.name(), generation.topic);
                }
                warn!(
                    agent = pipeline.name(),
                    operation = %decision.detected_intent,
                    error = %error,
                    "Pipeline failed, using fallback content"
                );
                (content, true)
            }
        };
        let elapsed = start.elapsed();

        info!(
            agent = pipeline.name(),
            operation = %decision.detected_intent,
            duration_ms = elapsed.as_millis() as u64,
            success = !used_fallback,
            output_size = content.len(),
            "Pipeline operation completed"
        );

        Ok(PipelineResponse {
            content,
            used_fallback,
            metadata: ResponseMetadata {
                agent: pipeline.name().to_string(),
                operation: decision.detected_intent.clone(),
                processing_time: format!("{:.3}s", elapsed.as_secs_f64()),
                timestamp: unix_now(),
            },
        })
    }
}

impl std::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PipelineRegistry").field("pipelines", &names).finish()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Pipeline with no generative backend: always serves its template.
#[derive(Debug, Clone)]
pub struct OfflinePipeline {
    name: String,
}

impl OfflinePipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Pipeline for OfflinePipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, _request: &GenerationRequest) -> Result<String, PipelineError> {
        Err(PipelineError::Unavailable(self.name.clone()))
    }

    fn fallback(&self, request: &GenerationRequest) -> String {
        let grade = request.grade_level.as_deref().unwrap_or("any");
        format!(
            "[{}] {} (language: {}, grade: {})",
            self.name, request.topic, request.language, grade
        )
    }
}
