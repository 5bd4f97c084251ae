use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::authz::config::ReviewerConfig;
use crate::status::DeniedStatus;

/// Config sections share this shape: defaults for a missing file, then `complete` to
/// validate and normalize whatever was loaded.
pub trait CommonConfig {
    fn default() -> Self;

    /// `base_dir` is the directory of the config file, relative paths are resolved
    /// against it.
    fn complete(&mut self, base_dir: &Path) -> Result<()>;
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "ReviewerConfig::default")]
    pub reviewer: ReviewerConfig,

    #[serde(default = "GateConfig::default")]
    pub gate: GateConfig,

    #[serde(default = "LogsConfig::default")]
    pub logs: LogsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GateConfig {
    /// How an access denial is reported back to the client, `forbidden` or `not_found`.
    #[serde(default = "GateConfig::default_denied_status")]
    pub denied_status: DeniedStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogsConfig {
    /// One of `error`, `warn`, `info`, `debug`.
    #[serde(default = "LogsConfig::default_level")]
    pub level: String,
}

impl Config {
    pub const ENV_PATH: &'static str = "KUBEGATE_CONFIG";
    pub const DEFAULT_PATH: &'static str = "kubegate.toml";

    /// Loads the config from `path`, falling back to `$KUBEGATE_CONFIG` and then
    /// `kubegate.toml` in the working directory. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match env::var_os(Self::ENV_PATH) {
                Some(path) => PathBuf::from(path),
                None => PathBuf::from(Self::DEFAULT_PATH),
            },
        };

        let mut cfg: Config = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config file '{}' toml", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Config file '{}' not found, using defaults",
                    path.display()
                );
                <Self as CommonConfig>::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config file '{}'", path.display()))
            }
        };

        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        cfg.complete(&base_dir).context("validate config")?;
        Ok(cfg)
    }
}

impl CommonConfig for Config {
    fn default() -> Self {
        Self {
            reviewer: ReviewerConfig::default(),
            gate: GateConfig::default(),
            logs: LogsConfig::default(),
        }
    }

    fn complete(&mut self, base_dir: &Path) -> Result<()> {
        self.reviewer
            .complete(base_dir)
            .context("validate reviewer config")?;
        self.gate.complete(base_dir).context("validate gate config")?;
        self.logs.complete(base_dir).context("validate logs config")?;
        Ok(())
    }
}

impl CommonConfig for GateConfig {
    fn default() -> Self {
        Self {
            denied_status: Self::default_denied_status(),
        }
    }

    fn complete(&mut self, _base_dir: &Path) -> Result<()> {
        Ok(())
    }
}

impl GateConfig {
    pub fn default_denied_status() -> DeniedStatus {
        DeniedStatus::Forbidden
    }
}

impl CommonConfig for LogsConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }

    fn complete(&mut self, _base_dir: &Path) -> Result<()> {
        if !Self::LEVELS.contains(&self.level.as_str()) {
            bail!(
                "unknown log level '{}', expect one of {:?}",
                self.level,
                Self::LEVELS
            );
        }
        Ok(())
    }
}

impl LogsConfig {
    const LEVELS: [&'static str; 4] = ["error", "warn", "info", "debug"];

    pub fn default_level() -> String {
        String::from("info")
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}
