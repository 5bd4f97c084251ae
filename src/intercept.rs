use std::sync::Arc;

use log::debug;

use crate::authz::{AccessReviewer, Gate};
use crate::error::Result;
use crate::resource::ResourceDescriptor;
use crate::verb::Verb;

/// Decides whether a request may be forwarded on behalf of the impersonated user.
///
/// The interceptor holds no per-request state, one instance serves any number of
/// concurrent requests.
#[derive(Clone)]
pub struct Interceptor {
    username: String,
    gate: Gate,
}

impl Interceptor {
    pub fn new(username: impl Into<String>, reviewer: Arc<dyn AccessReviewer>) -> Self {
        Self {
            username: username.into(),
            gate: Gate::new(reviewer),
        }
    }

    /// Checks a request given its method and target (`path[?query]`). `Ok(())` means the
    /// request may be forwarded unchanged; any error means it must not be forwarded.
    pub async fn intercept(&self, method: &str, target: &str) -> Result<()> {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        debug!(
            "Intercept {} {} (query: {:?}) as '{}'",
            method, path, query, self.username
        );

        let resource = ResourceDescriptor::parse(path)?;
        let verb = Verb::from_method(method, target)?;

        self.gate.authorize(&self.username, resource, verb).await
    }
}
