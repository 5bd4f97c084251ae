use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use serde::Serialize;

use kubegate::{ResourceDescriptor, Verb};

use super::{display_json, RunCommand};

/// Print the resource and verb a request would be checked against, without asking the
/// API server.
#[derive(Args)]
pub struct ParseArgs {
    /// Request path, for example `/apis/apps/v1/namespaces/default/deployments/nginx`.
    pub path: String,

    /// HTTP method of the request.
    #[arg(short, long, default_value = "GET")]
    pub method: String,
}

#[derive(Serialize)]
struct ParsedRequest {
    verb: Verb,
    resource: ResourceDescriptor,
    label: String,
}

#[async_trait]
impl RunCommand for ParseArgs {
    async fn run(&self) -> Result<()> {
        let path = match self.path.split_once('?') {
            Some((path, _)) => path,
            None => self.path.as_str(),
        };
        let resource = ResourceDescriptor::parse(path)?;
        let verb = Verb::from_method(&self.method, &self.path)?;

        display_json(ParsedRequest {
            verb,
            label: resource.label(),
            resource,
        })
    }
}
