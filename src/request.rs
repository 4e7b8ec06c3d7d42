//! Router input record and free-text extraction
//!
//! Requests arrive as loosely-shaped JSON objects. Field types are
//! tolerated rather than enforced: a text field holding a number or a
//! `data` entry that is not an object is treated as absent, so extraction
//! never fails on malformed input.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::RouteError;

/// Candidate text fields, probed in this order.
pub const TEXT_FIELDS: [&str; 6] = ["text", "input", "query", "prompt", "message", "content"];

/// An incoming routing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Explicit intent override.
    #[serde(rename = "type", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Nested sub-record probed after the top level.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data: Option<RequestData>,
    /// Presence-only media signals. A `null` value still counts as present.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub file: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub audio: Option<Value>,
    /// Everything else the caller sent (topic, language, grade_level, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The object this request was parsed from, echoed verbatim.
    #[serde(skip)]
    raw: Option<Value>,
}

/// The nested `data` sub-record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteRequest {
    /// Request carrying only a `text` field.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the explicit intent override.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self.raw = None;
        self
    }

    pub fn with_image(mut self, image: Value) -> Self {
        self.image = Some(image);
        self.raw = None;
        self
    }

    pub fn with_file(mut self, file: Value) -> Self {
        self.file = Some(file);
        self.raw = None;
        self
    }

    pub fn with_audio(mut self, audio: Value) -> Self {
        self.audio = Some(audio);
        self.raw = None;
        self
    }

    /// Parse a request from an arbitrary JSON value.
    ///
    /// Only a non-object top level is rejected; everything inside an
    /// object is accepted.
    pub fn from_json(value: &Value) -> Result<Self, RouteError> {
        if !value.is_object() {
            return Err(RouteError::MalformedRequest(format!(
                "expected a JSON object, got {}",
                json_kind(value)
            )));
        }
        let mut request: Self =
            serde_json::from_value(value.clone()).map_err(|e| RouteError::MalformedRequest(e.to_string()))?;
        request.raw = Some(value.clone());
        Ok(request)
    }

    /// Echo of the request as JSON.
    ///
    /// A request parsed with [`RouteRequest::from_json`] echoes its source
    /// object unchanged, including fields the typed view discarded. The
    /// `with_*` builders drop that source; direct field edits do not, so
    /// prefer the builders after parsing.
    pub fn to_json(&self) -> Result<Value, RouteError> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_value(self).map_err(|e| RouteError::MalformedRequest(e.to_string())),
        }
    }

    /// First non-empty candidate text, top level first, then `data`.
    ///
    /// Returns an empty string when nothing usable is present.
    pub fn extract_input_text(&self) -> String {
        let top = [
            &self.text,
            &self.input,
            &self.query,
            &self.prompt,
            &self.message,
            &self.content,
        ];
        if let Some(found) = first_non_empty(top) {
            return found.to_string();
        }
        self.data
            .as_ref()
            .and_then(RequestData::first_non_empty)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// True when an `image` or `file` payload is attached.
    pub fn has_image(&self) -> bool {
        self.image.is_some() || self.file.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// A string-valued entry from the unrecognised fields.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

impl RequestData {
    fn first_non_empty(&self) -> Option<&str> {
        first_non_empty([
            &self.text,
            &self.input,
            &self.query,
            &self.prompt,
            &self.message,
            &self.content,
        ])
    }
}

fn first_non_empty<'a>(candidates: [&'a Option<String>; 6]) -> Option<&'a str> {
    candidates
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keep the field only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Any value, `null` included, marks the field as present.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
