//! Authorization gate for requests to a Kubernetes-style API server.
//!
//! Each request is checked on behalf of an impersonated user before it is forwarded: the
//! URL path is parsed into a [`ResourceDescriptor`], the HTTP method is mapped to a
//! [`Verb`], and a remote [`AccessReviewer`] (normally a Kubernetes `SubjectAccessReview`)
//! decides. Anything other than an explicit allow blocks the request.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kubegate::authz::config::ReviewerConfig;
//! use kubegate::authz::review::SubjectAccessReviewer;
//! use kubegate::config::CommonConfig;
//! use kubegate::Interceptor;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut cfg = <ReviewerConfig as CommonConfig>::default();
//! cfg.complete(std::path::Path::new("."))?;
//!
//! let reviewer = Arc::new(SubjectAccessReviewer::new(&cfg)?);
//! let interceptor = Interceptor::new("alice", reviewer);
//! interceptor
//!     .intercept("DELETE", "/apis/apps/v1/namespaces/ns1/deployments/dep1")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod authz;
pub mod config;
pub mod error;
pub mod intercept;
pub mod logs;
pub mod resource;
pub mod status;
pub mod transport;
pub mod verb;

pub use authz::{AccessDenied, AccessReviewer, AuthorizationQuery, Decision, Gate};
pub use error::{Error, Result};
pub use intercept::Interceptor;
pub use resource::ResourceDescriptor;
pub use status::{DefaultStatusPolicy, DeniedStatus, Rejection, StatusPolicy};
pub use transport::{Forwarder, ImpersonateTransport, ReqwestForwarder};
pub use verb::Verb;
