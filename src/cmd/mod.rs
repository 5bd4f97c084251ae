mod cani;
mod parse;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use kubegate::config::{Config, LogsConfig};
use kubegate::logs;

/// Check Kubernetes API requests on behalf of an impersonated user.
#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Parse(parse::ParseArgs),
    Cani(cani::CaniArgs),
}

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

impl App {
    pub async fn run(&self) -> Result<()> {
        match &self.commands {
            Commands::Parse(args) => args.run().await,
            Commands::Cani(args) => args.run().await,
        }
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file, defaults to `$KUBEGATE_CONFIG` or `kubegate.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the log level in the config file.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ConfigArgs {
    /// Installs the logger, then loads the config. Messages from loading are logged at
    /// the `--log-level` or default level, afterwards the config's level applies unless
    /// `--log-level` overrides it.
    pub fn load(&self) -> Result<Config> {
        let level = match &self.log_level {
            Some(level) => level.clone(),
            None => LogsConfig::default_level(),
        };
        logs::init(&level)?;

        let mut cfg = Config::load(self.config.as_deref())?;
        match &self.log_level {
            Some(level) => cfg.logs.level = level.clone(),
            None => logs::set_level(&cfg.logs.level)?,
        }
        Ok(cfg)
    }
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}
