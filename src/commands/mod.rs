pub mod check;
pub mod run;
pub mod schema;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::{Config, Overrides, find_config};

/// Where the config comes from, plus flags that override it.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Config file (TOML or JSON); defaults to ./javlabot.toml, then the user config dir
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// The IRC server to which to connect
    #[arg(long)]
    pub host: Option<String>,
    /// The port on which to connect
    #[arg(long)]
    pub port: Option<u16>,
    /// The channel(s) to join, comma separated
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,
    /// The username that the bot will use
    #[arg(long)]
    pub username: Option<String>,
    /// The WHOIS name for the bot
    #[arg(long)]
    pub realname: Option<String>,
    /// After how many posts to insult
    #[arg(long)]
    pub critical_mass: Option<i64>,
    /// Words that set the bot off
    #[arg(long, num_args = 1..)]
    pub triggers: Option<Vec<String>>,
    /// The word to swear with
    #[arg(long)]
    pub response: Option<String>,
}

impl ConfigArgs {
    /// Load the config file (if any), apply overrides, and validate.
    pub fn resolve(&self) -> anyhow::Result<Config> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let cwd = std::env::current_dir().context("could not determine current directory")?;
                find_config(&cwd)
            }
        };

        let config = match &path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Config::load(path)?
            }
            None => Config::default(),
        };

        let config = config.with_overrides(self.overrides());
        config.validate()?;
        Ok(config)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            channels: self.channels.clone(),
            username: self.username.clone(),
            realname: self.realname.clone(),
            critical_mass: self.critical_mass,
            triggers: self.triggers.clone(),
            response: self.response.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        std::fs::write(&path, "host = \"irc.example.net\"\ncritical_mass = 7\n").unwrap();

        let args = ConfigArgs {
            config: Some(path),
            critical_mass: Some(3),
            ..ConfigArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.host, "irc.example.net");
        assert_eq!(config.critical_mass, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/javlabot.toml")),
            ..ConfigArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn invalid_override_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        std::fs::write(&path, "").unwrap();
        let args = ConfigArgs {
            config: Some(path),
            critical_mass: Some(-5),
            ..ConfigArgs::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::ExitError>(),
            Some(crate::error::ExitError::Config(_))
        ));
    }
}
