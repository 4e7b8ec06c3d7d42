//! Python bindings for the router using PyO3

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::{self, RouterConfig};
use crate::language::detect_language;
use crate::router::Router;

/// Detect the script family of `text` (Python function)
#[pyfunction]
pub fn py_detect_language(text: &str) -> &'static str {
    detect_language(text).code()
}

/// Python wrapper for the router
#[pyclass(name = "Router")]
pub struct PyRouter {
    router: Router,
}

#[pymethods]
impl PyRouter {
    /// Build a router, optionally from TOML configuration text.
    #[new]
    #[pyo3(signature = (config_toml=None))]
    fn new(config_toml: Option<&str>) -> PyResult<Self> {
        let config = match config_toml {
            Some(toml) => config::load_from_str(toml, "<python>")
                .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?,
            None => RouterConfig::default(),
        };
        let router = Router::from_config(config).map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        Ok(Self { router })
    }

    /// Route a JSON-encoded request, returning the decision as JSON
    fn route(&self, request_json: &str) -> PyResult<String> {
        let request: serde_json::Value = serde_json::from_str(request_json)
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("Invalid request JSON: {}", e)))?;
        let decision = self
            .router
            .route_json(&request)
            .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))?;
        serde_json::to_string(&decision)
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("Failed to serialize decision: {}", e)))
    }

    /// Classify raw text
    #[pyo3(signature = (input, explicit_type=None))]
    fn classify<'py>(&self, input: &str, explicit_type: Option<&str>, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let result = self.router.classify_with(input, explicit_type);
        let dict = PyDict::new_bound(py);
        dict.set_item("intent_name", &result.intent_name)?;
        dict.set_item("target_pipeline", &result.target_pipeline)?;
        dict.set_item("score", result.score)?;

        let scores = PyDict::new_bound(py);
        for score in &result.scores {
            scores.set_item(&score.intent_name, score.total())?;
        }
        dict.set_item("scores", scores)?;

        let source = serde_json::to_value(result.source)
            .map_err(|e| PyErr::new::<PyValueError, _>(format!("Failed to serialize source: {}", e)))?;
        dict.set_item("source", source.as_str().unwrap_or_default())?;
        Ok(dict)
    }

    /// Registered intent names, in registration order
    fn intents(&self) -> Vec<String> {
        self.router.rules().intent_names()
    }
}
