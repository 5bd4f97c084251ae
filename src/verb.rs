use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The Kubernetes authorization verb of a request.
///
/// NOTE: Collection requests are not told apart from single-object requests, so a GET on a
/// collection is checked as `get` rather than `list` (or `watch` with `watch=1`), and a
/// DELETE on a collection as `delete` rather than `deletecollection`. Authorization for those
/// requests is therefore checked against the singular verb. See
/// <https://kubernetes.io/docs/reference/access-authn-authz/authorization/#determine-the-request-verb>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Create,
    Update,
    Patch,
    Delete,
}

impl Verb {
    /// Maps an HTTP method to its verb. `target` is the full request target and is only
    /// used to report an unsupported method.
    pub fn from_method(method: &str, target: &str) -> Result<Self> {
        match method {
            "" | "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Create),
            "PUT" => Ok(Verb::Update),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(Error::UnsupportedMethod {
                method: method.to_string(),
                target: target.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_method() {
        let cases = [
            ("", Verb::Get),
            ("GET", Verb::Get),
            ("POST", Verb::Create),
            ("PUT", Verb::Update),
            ("PATCH", Verb::Patch),
            ("DELETE", Verb::Delete),
        ];
        for (method, expect) in cases {
            let verb = Verb::from_method(method, "/api/v1/pods").unwrap();
            assert_eq!(verb, expect, "method {method:?}");
            assert_eq!(
                Verb::from_method(method, "/api/v1/pods").unwrap(),
                verb,
                "mapping should be stable"
            );
        }
    }

    #[test]
    fn test_from_method_unsupported() {
        for method in ["HEAD", "OPTIONS", "CONNECT", "TRACE", "get", "delete", "LIST"] {
            let target = "/api/v1/namespaces/ns1/pods?watch=1";
            match Verb::from_method(method, target) {
                Err(Error::UnsupportedMethod { method: m, target: t }) => {
                    assert_eq!(m, method);
                    assert_eq!(t, target);
                }
                other => panic!("method {method:?} should be unsupported, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_collection_verbs_are_singular() {
        // Collection GET and DELETE keep their singular verbs.
        assert_eq!(
            Verb::from_method("GET", "/api/v1/namespaces/ns1/pods").unwrap(),
            Verb::Get
        );
        assert_eq!(
            Verb::from_method("GET", "/api/v1/namespaces/ns1/pods?watch=1").unwrap(),
            Verb::Get
        );
        assert_eq!(
            Verb::from_method("DELETE", "/api/v1/namespaces/ns1/pods").unwrap(),
            Verb::Delete
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Verb::Get.to_string(), "get");
        assert_eq!(Verb::Create.to_string(), "create");
        assert_eq!(Verb::Update.to_string(), "update");
        assert_eq!(Verb::Patch.to_string(), "patch");
        assert_eq!(Verb::Delete.to_string(), "delete");
        assert_eq!(serde_json::to_string(&Verb::Patch).unwrap(), r#""patch""#);
    }
}
