//! Content-type classification

use authbridge_domain::constants::{JSONAPI_MEDIA_TYPE, PROBLEM_MEDIA_TYPE};

/// `true` when the content type denotes a JSON:API document.
pub fn is_jsonapi(content_type: &str) -> bool {
    has_media_type(content_type, JSONAPI_MEDIA_TYPE)
}

/// `true` when the content type denotes an RFC 7807 problem document.
pub fn is_problem(content_type: &str) -> bool {
    has_media_type(content_type, PROBLEM_MEDIA_TYPE)
}

// Parameters (`; charset=utf-8`) and letter case are ignored.
fn has_media_type(content_type: &str, expected: &str) -> bool {
    content_type
        .split(',')
        .filter_map(|part| part.split(';').next())
        .any(|essence| essence.trim().eq_ignore_ascii_case(expected))
}
