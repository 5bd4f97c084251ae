use std::sync::Arc;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::resource::ResourceDescriptor;
use crate::verb::Verb;

use super::{AccessDenied, AccessReviewer, AuthorizationQuery, Decision};

/// Turns a request's identity, resource and verb into an allow or a deny.
///
/// Every call performs exactly one review against the oracle; there is no caching, no
/// retry and no local fallback. Only an explicit "allowed" answer lets the request through.
#[derive(Clone)]
pub struct Gate {
    reviewer: Arc<dyn AccessReviewer>,
}

impl Gate {
    pub fn new(reviewer: Arc<dyn AccessReviewer>) -> Self {
        Self { reviewer }
    }

    /// Puts the query to the oracle. Oracle failures are returned as [`Error::Oracle`]
    /// unchanged.
    pub async fn decide(&self, query: &AuthorizationQuery) -> Result<Decision> {
        let allowed = self
            .reviewer
            .check_access(query)
            .await
            .map_err(Error::Oracle)?;
        Ok(Decision::new(allowed, query))
    }

    /// Checks whether `identity` may perform `verb` on `resource`, failing with
    /// [`Error::AccessDenied`] when the oracle refuses.
    pub async fn authorize(
        &self,
        identity: &str,
        resource: ResourceDescriptor,
        verb: Verb,
    ) -> Result<()> {
        let query = AuthorizationQuery {
            identity: identity.to_string(),
            verb,
            resource,
        };

        let decision = self.decide(&query).await?;
        if decision.allowed {
            debug!(
                "Allow user '{}' to '{}' {}",
                query.identity, query.verb, decision.resource_label
            );
            return Ok(());
        }

        let denied = AccessDenied {
            identity: query.identity,
            verb: query.verb,
            resource_label: decision.resource_label,
            namespace: query.resource.namespace,
        };
        info!("Access denied: {denied}");
        Err(Error::AccessDenied(denied))
    }
}
