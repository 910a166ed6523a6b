//! Normalized response shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque reference to a rendered graph. In the browser this is an object URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What `/solve` returns on success. Every field is optional; absent ones just drop their
/// section when rendered. Numbers and booleans are kept as their text, and any other
/// non-string value is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveResult {
    #[serde(deserialize_with = "lenient_text")]
    pub simplified_equation: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub latex_solution: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub derivative: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub domain: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub range: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub max: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub min: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub factored: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub expanded: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub equation: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub raw_solution: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub parsed_solution: Option<String>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeContent {
    Error { error: String },
    Image { image: ImageRef },
    Result(SolveResult),
}

impl EnvelopeContent {
    pub fn error(message: impl Into<String>) -> Self {
        EnvelopeContent::Error {
            error: message.into(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            EnvelopeContent::Error { error } => Some(error),
            _ => None,
        }
    }
}

/// One submission's outcome, whatever the backend sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub is_graph: bool,
    /// HTTP status, or 0 when no response arrived.
    pub status: u16,
    pub ok: bool,
    pub content: EnvelopeContent,
}

impl ResponseEnvelope {
    pub fn network_failure(is_graph: bool, message: impl Into<String>) -> Self {
        Self {
            is_graph,
            status: 0,
            ok: false,
            content: EnvelopeContent::error(message),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.ok || self.content.error_message().is_some()
    }
}
