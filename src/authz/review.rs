use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::config::ReviewerConfig;
use super::{AccessReviewer, AuthorizationQuery};

/// Asks a Kubernetes API server whether the impersonated user may perform the request, by
/// creating a `SubjectAccessReview`.
pub struct SubjectAccessReviewer {
    url: String,
    client: reqwest::Client,
    token: Option<String>,
    groups: Vec<String>,
}

impl SubjectAccessReviewer {
    pub const REVIEW_PATH: &'static str = "/apis/authorization.k8s.io/v1/subjectaccessreviews";

    /// Builds a reviewer from a completed config.
    pub fn new(cfg: &ReviewerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout_duration())
            .danger_accept_invalid_certs(cfg.insecure)
            .build()
            .context("build reviewer client")?;

        let token = if cfg.token.is_empty() {
            None
        } else {
            Some(cfg.token.clone())
        };

        Ok(Self {
            url: format!("{}{}", cfg.server, Self::REVIEW_PATH),
            client,
            token,
            groups: cfg.groups.clone(),
        })
    }
}

#[async_trait]
impl AccessReviewer for SubjectAccessReviewer {
    async fn check_access(&self, query: &AuthorizationQuery) -> Result<bool> {
        let res = &query.resource;
        debug!(
            "SubjectAccessReview - {}: namespace={:?}, verb={}, group={:?}, version={:?}, resource={:?}, name={:?}, subresource={:?}",
            query.identity,
            res.namespace,
            query.verb,
            res.group,
            res.version,
            res.resource_type,
            res.resource_name,
            res.subresource,
        );

        let review = SubjectAccessReview::new(query, &self.groups);
        let mut req = self.client.post(&self.url).json(&review);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.context("send subject access review")?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            bail!(
                "subject access review failed with status {status}: {}",
                message.trim()
            );
        }

        let review: ReviewResponse = resp
            .json()
            .await
            .context("decode subject access review response")?;
        let status = review.status.unwrap_or_default();
        if !status.evaluation_error.is_empty() {
            warn!(
                "SubjectAccessReview evaluation error for '{}': {}",
                query.identity, status.evaluation_error
            );
        }
        if !status.allowed && !status.reason.is_empty() {
            debug!(
                "SubjectAccessReview denied '{}': {}",
                query.identity, status.reason
            );
        }

        Ok(status.allowed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubjectAccessReview<'a> {
    api_version: &'static str,
    kind: &'static str,
    spec: ReviewSpec<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewSpec<'a> {
    user: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    groups: &'a [String],
    resource_attributes: ResourceAttributes<'a>,
}

#[derive(Debug, Serialize)]
struct ResourceAttributes<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    namespace: &'a str,
    verb: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    group: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    version: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    resource: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    subresource: &'a str,
}

impl<'a> SubjectAccessReview<'a> {
    fn new(query: &'a AuthorizationQuery, groups: &'a [String]) -> Self {
        let res = &query.resource;
        Self {
            api_version: "authorization.k8s.io/v1",
            kind: "SubjectAccessReview",
            spec: ReviewSpec {
                user: &query.identity,
                groups,
                resource_attributes: ResourceAttributes {
                    namespace: &res.namespace,
                    verb: query.verb.as_str(),
                    group: &res.group,
                    version: &res.version,
                    resource: &res.resource_type,
                    name: &res.resource_name,
                    subresource: &res.subresource,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewResponse {
    status: Option<ReviewStatus>,
}

/// A missing `allowed` field means not allowed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStatus {
    #[serde(default)]
    allowed: bool,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    evaluation_error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::resource::ResourceDescriptor;
    use crate::verb::Verb;

    use super::*;

    #[test]
    fn test_review_body() {
        let query = AuthorizationQuery {
            identity: "alice".to_string(),
            verb: Verb::Delete,
            resource: ResourceDescriptor::parse(
                "/apis/apps/v1/namespaces/ns1/deployments/dep1/status",
            )
            .unwrap(),
        };
        let groups = vec!["system:authenticated".to_string()];
        let body = serde_json::to_value(SubjectAccessReview::new(&query, &groups)).unwrap();
        assert_eq!(
            body,
            json!({
                "apiVersion": "authorization.k8s.io/v1",
                "kind": "SubjectAccessReview",
                "spec": {
                    "user": "alice",
                    "groups": ["system:authenticated"],
                    "resourceAttributes": {
                        "namespace": "ns1",
                        "verb": "delete",
                        "group": "apps",
                        "version": "v1",
                        "resource": "deployments",
                        "name": "dep1",
                        "subresource": "status",
                    },
                },
            })
        );
    }

    #[test]
    fn test_review_body_omits_empty() {
        let query = AuthorizationQuery {
            identity: "bob".to_string(),
            verb: Verb::Get,
            resource: ResourceDescriptor::parse("/api/v1/nodes").unwrap(),
        };
        let body = serde_json::to_value(SubjectAccessReview::new(&query, &[])).unwrap();
        assert_eq!(
            body["spec"],
            json!({
                "user": "bob",
                "resourceAttributes": {
                    "verb": "get",
                    "version": "v1",
                    "resource": "nodes",
                },
            })
        );
    }

    #[test]
    fn test_review_response() {
        let resp: ReviewResponse =
            serde_json::from_str(r#"{"kind":"SubjectAccessReview","status":{"allowed":true}}"#)
                .unwrap();
        assert!(resp.status.unwrap().allowed);

        let resp: ReviewResponse = serde_json::from_str(
            r#"{"status":{"allowed":false,"reason":"no RBAC policy matched"}}"#,
        )
        .unwrap();
        let status = resp.status.unwrap();
        assert!(!status.allowed);
        assert_eq!(status.reason, "no RBAC policy matched");

        // Deny when the server says nothing.
        let resp: ReviewResponse = serde_json::from_str(r#"{"status":{}}"#).unwrap();
        assert!(!resp.status.unwrap().allowed);
        let resp: ReviewResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!resp.status.unwrap_or_default().allowed);
    }
}
