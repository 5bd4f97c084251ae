mod gate;

pub mod config;
pub mod review;

pub use gate::Gate;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::resource::ResourceDescriptor;
use crate::verb::Verb;

/// The authorization oracle: answers whether an identity may perform a verb on a resource.
///
/// Implementers are shared by every in-flight request, so they must be thread-safe and must
/// not serialize callers behind each other. An `Err` means the oracle could not answer; it
/// is never a denial.
#[async_trait]
pub trait AccessReviewer: Send + Sync {
    async fn check_access(&self, query: &AuthorizationQuery) -> Result<bool>;
}

/// A single access question put to the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationQuery {
    /// The impersonated user the request is performed for
    pub identity: String,
    pub verb: Verb,
    pub resource: ResourceDescriptor,
}

/// The oracle's answer for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Rendering of the resource used in denial messages, see [`ResourceDescriptor::label`]
    pub resource_label: String,
}

impl Decision {
    pub fn new(allowed: bool, query: &AuthorizationQuery) -> Self {
        Self {
            allowed,
            resource_label: query.resource.label(),
        }
    }
}

/// The oracle explicitly refused the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("user '{identity}' is not allowed to '{verb}' {resource_label} in namespace '{namespace}'")]
pub struct AccessDenied {
    pub identity: String,
    pub verb: Verb,
    pub resource_label: String,
    pub namespace: String,
}
