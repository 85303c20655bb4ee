use clap::Args;
use serde::Serialize;

use super::ConfigArgs;
use crate::config::Config;
use crate::normalize::normalize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// The effective settings, as the bot will see them.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub addr: String,
    pub channels: Vec<String>,
    pub username: String,
    pub realname: String,
    pub critical_mass: i64,
    pub response: String,
    /// Trigger words after normalization
    pub triggers: Vec<String>,
    /// Names the bot answers to after normalization
    pub names: Vec<String>,
}

impl CheckReport {
    pub fn from_config(config: &Config) -> Self {
        let mut triggers: Vec<String> = config.triggers.iter().map(|t| normalize(t)).collect();
        triggers.sort_unstable();
        triggers.dedup();

        let matcher = config.trigger_matcher();
        let names = matcher
            .identity()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            addr: config.addr(),
            channels: config.channels.clone(),
            username: config.username.clone(),
            realname: config.realname.clone(),
            critical_mass: config.critical_mass,
            response: config.response.clone(),
            triggers,
            names,
        }
    }

    fn render_text(&self) -> String {
        format!(
            "server:        {}\n\
             channels:      {}\n\
             username:      {}\n\
             realname:      {}\n\
             critical mass: {}\n\
             response:      {}\n\
             triggers:      {}\n\
             names:         {}\n",
            self.addr,
            self.channels.join(", "),
            self.username,
            self.realname,
            self.critical_mass,
            self.response,
            self.triggers.join(", "),
            self.names.join(", "),
        )
    }
}

impl CheckArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        let config = self.config.resolve()?;
        let report = CheckReport::from_config(&config);

        match self.format {
            OutputFormat::Text => print!("{}", report.render_text()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}
