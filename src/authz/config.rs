use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig};

/// Connection settings for the API server that answers SubjectAccessReviews.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReviewerConfig {
    /// Base URL of the API server, scheme must be http or https.
    #[serde(default = "ReviewerConfig::default_server")]
    pub server: String,

    /// Bearer token used for reviews, environment variables are expanded. Empty means
    /// no token, unless `token_file` is set.
    #[serde(default = "ReviewerConfig::default_token")]
    pub token: String,

    /// File to read the bearer token from, relative to the config file's directory.
    /// Cannot be combined with `token`.
    #[serde(default = "ReviewerConfig::default_token_file")]
    pub token_file: String,

    /// Skip TLS certificate verification.
    #[serde(default = "ReviewerConfig::default_insecure")]
    pub insecure: bool,

    /// Timeout for a single review, for example "10s" or "1m 30s".
    #[serde(default = "ReviewerConfig::default_timeout")]
    pub timeout: String,

    /// Groups sent with every review, along with the impersonated user.
    #[serde(default = "ReviewerConfig::default_groups")]
    pub groups: Vec<String>,

    #[serde(skip, default = "ReviewerConfig::default_timeout_duration")]
    timeout_duration: Duration,
}

impl CommonConfig for ReviewerConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            token: Self::default_token(),
            token_file: Self::default_token_file(),
            insecure: Self::default_insecure(),
            timeout: Self::default_timeout(),
            groups: Self::default_groups(),
            timeout_duration: Self::default_timeout_duration(),
        }
    }

    fn complete(&mut self, base_dir: &Path) -> Result<()> {
        let server = self.server.trim_end_matches('/');
        let parsed = match Url::parse(server) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{}'", self.server),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => bail!("invalid server url scheme, expect 'http' or 'https', not '{scheme}'"),
        }
        if parsed.path() != "/" {
            bail!(
                "invalid server url, path should be '/', not '{}'",
                parsed.path()
            );
        }
        self.server = server.to_string();

        if !self.token.is_empty() && !self.token_file.is_empty() {
            bail!("token and token_file cannot be set at the same time");
        }
        self.token = expandenv("token", &self.token)?;
        if !self.token_file.is_empty() {
            let path = base_dir.join(expandenv("token_file", &self.token_file)?);
            let token = fs::read_to_string(&path)
                .with_context(|| format!("read token file '{}'", path.display()))?;
            self.token = token.trim().to_string();
            if self.token.is_empty() {
                bail!("token file '{}' is empty", path.display());
            }
        }

        let timeout = humantime::parse_duration(&self.timeout)
            .with_context(|| format!("parse timeout '{}'", self.timeout))?;
        if timeout < Self::MIN_TIMEOUT || timeout > Self::MAX_TIMEOUT {
            bail!(
                "timeout must be in the range [{}, {}]",
                humantime::format_duration(Self::MIN_TIMEOUT),
                humantime::format_duration(Self::MAX_TIMEOUT)
            );
        }
        self.timeout_duration = timeout;

        Ok(())
    }
}

impl ReviewerConfig {
    const MIN_TIMEOUT: Duration = Duration::from_secs(1);
    const MAX_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Review timeout. Until [`CommonConfig::complete`] parses `timeout`, this is the
    /// default of 10s.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }

    fn default_timeout_duration() -> Duration {
        Self::DEFAULT_TIMEOUT
    }

    pub fn default_server() -> String {
        String::from("https://127.0.0.1:6443")
    }

    pub fn default_token() -> String {
        String::new()
    }

    pub fn default_token_file() -> String {
        String::new()
    }

    pub fn default_insecure() -> bool {
        false
    }

    pub fn default_timeout() -> String {
        humantime::format_duration(Self::DEFAULT_TIMEOUT).to_string()
    }

    pub fn default_groups() -> Vec<String> {
        vec![]
    }
}
