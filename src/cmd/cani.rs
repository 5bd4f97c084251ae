use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use log::debug;

use kubegate::authz::review::SubjectAccessReviewer;
use kubegate::{DefaultStatusPolicy, Interceptor, StatusPolicy};

use super::{display_json, ConfigArgs, RunCommand};

/// Check whether a user may send a request to the API server. Prints `yes` when allowed,
/// otherwise prints the rejection and exits with failure.
#[derive(Args)]
pub struct CaniArgs {
    /// Request path, optionally with a query string.
    pub path: String,

    /// The impersonated user to check for.
    #[arg(short, long)]
    pub user: String,

    /// HTTP method of the request.
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for CaniArgs {
    async fn run(&self) -> Result<()> {
        let cfg = self.config.load()?;
        debug!("Review requests with API server {}", cfg.reviewer.server);

        let reviewer = Arc::new(SubjectAccessReviewer::new(&cfg.reviewer)?);
        let interceptor = Interceptor::new(self.user.clone(), reviewer);
        let policy = DefaultStatusPolicy::new(cfg.gate.denied_status);

        match interceptor.intercept(&self.method, &self.path).await {
            Ok(()) => {
                println!("yes");
                Ok(())
            }
            Err(err) => {
                display_json(policy.reject(&err))?;
                Err(err.into())
            }
        }
    }
}
