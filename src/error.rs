//! Error types for routing, configuration and pipeline dispatch

use thiserror::Error;

/// Reasons the router refuses to produce a decision.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No candidate text field held a non-empty string.
    #[error("no input text found in request data")]
    InputMissing,

    /// A JSON request was not an object at the top level.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Errors raised while loading or validating a [`crate::config::RouterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("Parse error in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    /// One or more semantic validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A rule pattern is not a valid regular expression.
    #[error("Invalid pattern {pattern:?} in rule '{intent}': {source}")]
    InvalidPattern {
        intent: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure reported by a generation pipeline.
///
/// Never escapes [`crate::pipeline::PipelineRegistry::dispatch`]: the
/// pipeline's deterministic fallback is substituted instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The backing generative service could not be reached.
    #[error("pipeline '{0}' is unavailable")]
    Unavailable(String),

    /// The backing service answered with no content.
    #[error("pipeline '{0}' produced no content")]
    EmptyOutput(String),

    /// Any other failure.
    #[error("pipeline failed: {0}")]
    Failed(String),
}

/// Errors raised while dispatching a decision to a pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No handler is registered under the decision's target pipeline.
    #[error("no pipeline registered for target '{0}'")]
    UnknownPipeline(String),
}
