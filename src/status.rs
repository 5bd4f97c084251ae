use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const AUTHZ_ERROR: &str = "Authorization failed";

/// Translates a blocked request into what the enclosing transport sends back.
pub trait StatusPolicy: Send + Sync {
    fn reject(&self, err: &Error) -> Rejection;
}

/// Outward failure response, serialized as `{"code": 403, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: u16,
    pub message: String,
}

impl Rejection {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            code: status.as_u16(),
            message,
        }
    }
}

/// Status used for access denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeniedStatus {
    /// 403 with the denial message.
    #[serde(rename = "forbidden")]
    Forbidden,
    /// 404 without details, so callers cannot probe which resources exist.
    #[serde(rename = "not_found")]
    NotFound,
}

#[derive(Debug, Clone)]
pub struct DefaultStatusPolicy {
    denied: DeniedStatus,
}

impl DefaultStatusPolicy {
    pub fn new(denied: DeniedStatus) -> Self {
        Self { denied }
    }
}

impl StatusPolicy for DefaultStatusPolicy {
    fn reject(&self, err: &Error) -> Rejection {
        match err {
            Error::MalformedPath { .. } => {
                Rejection::new(StatusCode::BAD_REQUEST, format!("Bad request: {err}"))
            }
            Error::UnsupportedMethod { .. } => Rejection::new(
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method not allowed: {err}"),
            ),
            Error::AccessDenied(denied) => match self.denied {
                DeniedStatus::Forbidden => {
                    Rejection::new(StatusCode::FORBIDDEN, format!("Unauthorized: {denied}"))
                }
                DeniedStatus::NotFound => {
                    Rejection::new(StatusCode::NOT_FOUND, "Resource not found".to_string())
                }
            },
            Error::Oracle(e) => {
                Rejection::new(StatusCode::BAD_GATEWAY, format!("{AUTHZ_ERROR}: {e:#}"))
            }
            Error::Forward(e) => {
                Rejection::new(StatusCode::BAD_GATEWAY, format!("Server error: {e}"))
            }
        }
    }
}
