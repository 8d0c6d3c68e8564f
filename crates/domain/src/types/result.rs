//! Unified request result
//!
//! Every request ends in exactly one of two shapes: a success holding the
//! caller-facing data, or a failure holding a problem document. The enum makes
//! the "exactly one of data/problem" invariant structural.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use super::problem::ProblemDetails;
use crate::constants::{DEFAULT_FAILURE_MESSAGE, INVALID_BODY_TITLE, NETWORK_ERROR_TITLE};

/// Outcome of a single logical request (including any refresh-and-retry).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    /// The server answered with a 2xx status.
    Success {
        status: u16,
        /// Caller-facing payload. `Value::Null` (or `()`) when the response
        /// had no usable body.
        data: T,
        /// Body as received, before envelope unwrapping.
        raw: Option<Value>,
    },
    /// Transport failure, non-2xx status, or an unrecoverable 401.
    Failure {
        /// `None` when no response reached the client.
        status: Option<u16>,
        problem: ProblemDetails,
        raw: Option<Value>,
    },
}

/// Legacy `{status, message}` error shape used by simple callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatError {
    pub status: Option<u16>,
    pub message: String,
}

/// Error value produced from a [`ApiResult::Failure`] so callers can use `?`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .problem.message())]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub problem: ProblemDetails,
}

impl<T> ApiResult<T> {
    pub const fn success(status: u16, data: T) -> Self {
        Self::Success { status, data, raw: None }
    }

    pub const fn failure(status: Option<u16>, problem: ProblemDetails) -> Self {
        Self::Failure { status, problem, raw: None }
    }

    /// Failure for a request that never produced a response.
    pub fn network_failure(detail: impl Into<String>) -> Self {
        Self::failure(None, ProblemDetails::new(NETWORK_ERROR_TITLE).with_detail(detail))
    }

    #[must_use]
    pub fn with_raw(self, raw: Option<Value>) -> Self {
        match self {
            Self::Success { status, data, .. } => Self::Success { status, data, raw },
            Self::Failure { status, problem, .. } => Self::Failure { status, problem, raw },
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// HTTP status, `None` only for transport failures.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub const fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { problem, .. } => Some(problem),
        }
    }

    pub const fn raw(&self) -> Option<&Value> {
        match self {
            Self::Success { raw, .. } | Self::Failure { raw, .. } => raw.as_ref(),
        }
    }

    /// Transform the success payload, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { status, data, raw } => ApiResult::Success { status, data: f(data), raw },
            Self::Failure { status, problem, raw } => ApiResult::Failure { status, problem, raw },
        }
    }

    /// # Errors
    /// Returns [`ApiFailure`] for the failure variant.
    pub fn into_result(self) -> Result<T, ApiFailure> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { status, problem, .. } => Err(ApiFailure { status, problem }),
        }
    }

    /// `{status, message}` view of a failure; `None` on success.
    pub fn compat_error(&self) -> Option<CompatError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { status, problem, .. } => {
                let message = problem
                    .detail
                    .as_deref()
                    .or(Some(problem.title.as_str()).filter(|t| !t.is_empty()))
                    .unwrap_or(DEFAULT_FAILURE_MESSAGE)
                    .to_string();
                Some(CompatError { status: *status, message })
            }
        }
    }
}

impl ApiResult<Value> {
    /// Deserialize the success payload into the caller's type.
    ///
    /// A payload that does not fit `T` turns into a failure carrying the
    /// original status, so the status-based success invariant is only
    /// weakened in the direction of reporting less.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            Self::Success { status, data, raw } => match serde_json::from_value::<T>(data) {
                Ok(data) => ApiResult::Success { status, data, raw },
                Err(err) => ApiResult::Failure {
                    status: Some(status),
                    problem: ProblemDetails::new(INVALID_BODY_TITLE)
                        .with_status(status)
                        .with_detail(err.to_string()),
                    raw,
                },
            },
            Self::Failure { status, problem, raw } => ApiResult::Failure { status, problem, raw },
        }
    }
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { status, data, raw } => {
                let mut state = serializer.serialize_struct("ApiResult", 4)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("status", status)?;
                state.serialize_field("data", data)?;
                if let Some(raw) = raw {
                    state.serialize_field("raw", raw)?;
                }
                state.end()
            }
            Self::Failure { status, problem, raw } => {
                let mut state = serializer.serialize_struct("ApiResult", 4)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("status", status)?;
                state.serialize_field("problem", problem)?;
                if let Some(raw) = raw {
                    state.serialize_field("raw", raw)?;
                }
                state.end()
            }
        }
    }
}
