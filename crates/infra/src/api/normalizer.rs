//! Response normalization
//!
//! Turns a raw status/content-type/body triple into an [`ApiResult`]. Pure:
//! no I/O and no logging, so every branch is unit-testable.
//!
//! Rules:
//! - 204 is a success with no data, whatever the body says.
//! - Any other 2xx is a success carrying the parsed JSON (`null` when the
//!   body is empty or not JSON).
//! - Everything else is a failure with a non-null problem: parsed from the
//!   body for problem documents, synthesized otherwise.

use authbridge_domain::constants::HTTP_ERROR_TITLE;
use authbridge_domain::{ApiResult, ProblemDetails};
use serde_json::Value;

use super::media;

/// Outcome of parsing a response body as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// Empty or whitespace-only body.
    Empty,
    Json(Value),
    /// Body present but not valid JSON; the text is kept for diagnostics.
    Unparseable(String),
}

impl ParsedBody {
    /// Classify a response body. Never fails; invalid JSON is kept as text.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }

        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Unparseable(text.to_string()),
        }
    }

    /// The parsed document, if the body was JSON.
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty | Self::Unparseable(_) => None,
        }
    }

    /// The parsed value, `Value::Null` when there is none.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Empty | Self::Unparseable(_) => Value::Null,
        }
    }

    /// Raw body for diagnostics: the JSON value, or the text as a JSON string.
    pub fn raw(&self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(value.clone()),
            Self::Unparseable(text) => Some(Value::String(text.clone())),
        }
    }
}

/// Classify a response into success or failure.
pub fn normalize(status: u16, content_type: &str, body: &str) -> ApiResult<Value> {
    if status == 204 {
        return ApiResult::success(status, Value::Null);
    }

    let parsed = ParsedBody::parse(body);

    if (200..300).contains(&status) {
        let raw = parsed.as_json().cloned();
        return ApiResult::success(status, parsed.into_json()).with_raw(raw);
    }

    let problem = media::is_problem(content_type)
        .then(|| parse_problem(status, &parsed))
        .flatten()
        .unwrap_or_else(|| synthesize_problem(status, &parsed));

    ApiResult::failure(Some(status), problem).with_raw(parsed.raw())
}

/// Read a problem document from the body.
///
/// Returns `None` if the body is not a JSON object that fits the problem
/// shape. A missing title or status is filled in from the response.
pub fn parse_problem(status: u16, parsed: &ParsedBody) -> Option<ProblemDetails> {
    let value = parsed.as_json().filter(|v| v.is_object())?;
    let mut problem: ProblemDetails = serde_json::from_value(value.clone()).ok()?;

    if problem.title.is_empty() {
        problem.title = HTTP_ERROR_TITLE.to_string();
    }
    problem.status.get_or_insert(status);

    Some(problem)
}

fn synthesize_problem(status: u16, parsed: &ParsedBody) -> ProblemDetails {
    ProblemDetails::new(HTTP_ERROR_TITLE).with_status(status).with_detail(error_detail(status, parsed))
}

fn error_detail(status: u16, parsed: &ParsedBody) -> String {
    match parsed {
        ParsedBody::Empty => format!("HTTP {status}"),
        ParsedBody::Unparseable(text) => text.clone(),
        ParsedBody::Json(value) => describe_json_error(value),
    }
}

// Framework error bodies: `{"detail": "..."}`, validation lists
// `{"detail": [{"msg": ...}, ...]}` and `{"message": "..."}`. Anything else is
// stringified.
fn describe_json_error(value: &Value) -> String {
    match value.get("detail") {
        Some(Value::String(detail)) => return detail.clone(),
        Some(Value::Array(items)) if !items.is_empty() => {
            return items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .map_or_else(|| item.to_string(), str::to_string)
                })
                .collect::<Vec<_>>()
                .join("; ");
        }
        _ => {}
    }

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
