//! Uniform `{ok, message, data}` envelope for handler results.

use serde::Serialize;

use crate::domain::document::{ErrorKind, WorkflowError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse<T> {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> HandlerResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(err: &WorkflowError) -> Self {
        Self {
            ok: false,
            message: err.to_string(),
            error: Some(err.kind()),
            data: None,
        }
    }

    /// Converts a handler result; `message` is used on success.
    pub fn from_result(result: Result<T, WorkflowError>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::success(message, data),
            Err(err) => Self::failure(&err),
        }
    }
}
