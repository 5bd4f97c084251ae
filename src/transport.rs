use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::error::{Error, Result};
use crate::intercept::Interceptor;

/// Sends an already authorized request to the API server.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, req: Request) -> reqwest::Result<Response>;
}

/// Forwards requests through a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestForwarder {
    client: reqwest::Client,
}

impl ReqwestForwarder {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Forwarder for ReqwestForwarder {
    async fn forward(&self, req: Request) -> reqwest::Result<Response> {
        self.client.execute(req).await
    }
}

/// Runs every request through an [`Interceptor`] before handing it to the wrapped
/// forwarder. Requests are either forwarded unchanged or not at all.
pub struct ImpersonateTransport<F> {
    forwarder: F,
    interceptor: Interceptor,
}

impl<F: Forwarder> ImpersonateTransport<F> {
    pub fn new(forwarder: F, interceptor: Interceptor) -> Self {
        Self {
            forwarder,
            interceptor,
        }
    }

    pub async fn execute(&self, req: Request) -> Result<Response> {
        let url = req.url();
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.interceptor
            .intercept(req.method().as_str(), &target)
            .await?;

        self.forwarder.forward(req).await.map_err(Error::Forward)
    }
}
