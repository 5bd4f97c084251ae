use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The resource a Kubernetes API request targets, as named by its URL path.
///
/// `version` and `resource_type` are always set for a parsed path; every other field is
/// empty when the path does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub namespace: String,
    pub group: String,
    pub version: String,
    pub resource_type: String,
    pub resource_name: String,
    pub subresource: String,
}

impl ResourceDescriptor {
    /// Parses a request path of one of the two API forms:
    ///
    /// ```text
    /// /api/<version>[/namespaces/<namespace>]/<type>[/<name>][/<subresource>]
    /// /apis/<group>/<version>[/namespaces/<namespace>]/<type>[/<name>][/<subresource>]
    /// ```
    ///
    /// Each segment is percent-decoded after splitting, so the descriptor names the same
    /// resource the API server acts on. Any other shape, including empty segments,
    /// trailing slashes and segments that do not decode to UTF-8, is a
    /// [`Error::MalformedPath`].
    pub fn parse(path: &str) -> Result<Self> {
        let malformed = || Error::malformed_path(path);

        let raw: Vec<&str> = match path.strip_prefix('/') {
            Some(rest) => rest.split('/').collect(),
            None => return Err(malformed()),
        };
        if raw.iter().any(|s| s.is_empty()) {
            return Err(malformed());
        }
        let decoded = raw
            .iter()
            .map(|s| percent_decode_str(s).decode_utf8())
            .collect::<Result<Vec<Cow<str>>, _>>()
            .map_err(|_| malformed())?;
        let segments: Vec<&str> = decoded.iter().map(|s| s.as_ref()).collect();

        let mut desc = Self::default();

        let rest = match segments.as_slice() {
            ["api", version, rest @ ..] => {
                desc.version = version.to_string();
                rest
            }
            ["apis", group, version, rest @ ..] => {
                desc.group = group.to_string();
                desc.version = version.to_string();
                rest
            }
            _ => return Err(malformed()),
        };

        // "namespaces/<ns>" only scopes the request when a resource type follows it,
        // otherwise it names the cluster-scoped namespace object itself.
        let rest = match rest {
            ["namespaces", namespace, rest @ ..] if !rest.is_empty() => {
                desc.namespace = namespace.to_string();
                rest
            }
            _ => rest,
        };

        match rest {
            [resource_type] => {
                desc.resource_type = resource_type.to_string();
            }
            [resource_type, name] => {
                desc.resource_type = resource_type.to_string();
                desc.resource_name = name.to_string();
            }
            [resource_type, name, subresource] => {
                desc.resource_type = resource_type.to_string();
                desc.resource_name = name.to_string();
                desc.subresource = subresource.to_string();
            }
            _ => return Err(malformed()),
        }

        Ok(desc)
    }

    /// Human-friendly rendering of the resource for denial messages, for example
    /// `apps/v1/deployments/dep1/status`. Empty parts are skipped. The namespace is not
    /// part of the label.
    pub fn label(&self) -> String {
        [
            &self.group,
            &self.version,
            &self.resource_type,
            &self.resource_name,
            &self.subresource,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/")
    }
}
