//! Router core - rule-based intent routing for classroom assistant requests
//!
//! This crate classifies free-text (and multimodal) teacher requests into
//! an intent, picks the pipeline that serves it, scores confidence and
//! detects the input script. Generation pipelines are external; the
//! [`pipeline`] module only defines the seam and a dispatcher.

pub mod config;
pub mod confidence;
pub mod error;
pub mod hints;
pub mod language;
pub mod matcher;
pub mod pipeline;
pub mod request;
pub mod router;
pub mod rules;
pub mod types;

pub use config::RouterConfig;
pub use error::*;
pub use language::{detect_language, Script};
pub use pipeline::{GenerationRequest, OfflinePipeline, Pipeline, PipelineRegistry, PipelineResponse};
pub use request::RouteRequest;
pub use router::Router;
pub use types::*;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `LOG_FORMAT=json` selects JSON output, anything else pretty output.
/// The filter comes from `RUST_LOG`. Fails if a subscriber is already set.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init(),
    }
}

// Python bindings
#[cfg(feature = "python")]
pub mod py;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn router_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyRouter>()?;
    m.add_function(wrap_pyfunction!(py_detect_language, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_second_call_returns_err() {
        // The first call may fail if another test already installed a subscriber
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
