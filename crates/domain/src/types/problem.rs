//! RFC 7807 problem documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized error description.
///
/// Every failed request carries one of these, whatever went wrong: the
/// server sent a problem document, the server sent something else with an
/// error status, or no response arrived at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Extension members not covered by the fields above.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ProblemDetails {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = Some(problem_type.into());
        self
    }

    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Most specific human-readable text: the detail when present, the title
    /// otherwise.
    pub fn message(&self) -> &str {
        self.detail.as_deref().filter(|d| !d.is_empty()).unwrap_or(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_backend_problem_document() {
        let problem: ProblemDetails = serde_json::from_value(json!({
            "type": "about:blank",
            "title": "HTTP Error",
            "status": 401,
            "detail": "Invalid token",
            "instance": null,
            "trace_id": "abc"
        }))
        .unwrap();

        assert_eq!(problem.title, "HTTP Error");
        assert_eq!(problem.status, Some(401));
        assert_eq!(problem.detail.as_deref(), Some("Invalid token"));
        assert_eq!(problem.problem_type.as_deref(), Some("about:blank"));
        assert_eq!(problem.instance, None);
        assert_eq!(problem.extensions.get("trace_id"), Some(&json!("abc")));
    }

    #[test]
    fn serializes_type_member_and_skips_absent_fields() {
        let problem = ProblemDetails::new("Unauthorized").with_status(401).with_type("about:blank");
        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value, json!({"title": "Unauthorized", "status": 401, "type": "about:blank"}));
    }

    #[test]
    fn message_prefers_detail() {
        let problem = ProblemDetails::new("HTTP Error");
        assert_eq!(problem.message(), "HTTP Error");
        assert_eq!(problem.clone().with_detail("").message(), "HTTP Error");
        assert_eq!(problem.with_detail("user not found").message(), "user not found");
    }
}
