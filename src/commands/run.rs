use clap::Args;
use tracing::{info, warn};

use super::ConfigArgs;
use crate::connection::{Bot, Outbox, TcpConnector};
use crate::protocol::Command;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl RunArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        let config = self.config.resolve()?;
        info!(
            server = %config.addr(),
            channels = %config.channels.join(","),
            critical_mass = config.critical_mass,
            "starting"
        );

        let mut bot = Bot::new(&config, TcpConnector::new(config.addr()));
        register_quit_handler(bot.outbox(), bot.dispatcher().quit_command())?;
        bot.run()
    }
}

/// Say goodbye on SIGINT/SIGTERM, then exit cleanly.
fn register_quit_handler(outbox: Outbox, quit: Command) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        info!("received interrupt signal, quitting");
        if let Err(e) = outbox.send(&quit) {
            warn!("could not send QUIT: {e}");
        }
        std::process::exit(0);
    })?;
    Ok(())
}
