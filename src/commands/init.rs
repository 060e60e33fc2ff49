use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the configuration file instead of editing it
    #[arg(short, long)]
    delete: bool,
}

/// Runs the setup wizard, seeded with the current file, or removes the file.
pub fn cmd(args: InitArgs) -> Result<()> {
    let path = Config::path()?;
    let shown = path.display().to_string();

    if args.delete {
        if Config::delete()? {
            msg_success!(Message::ConfigDeleted(shown));
        } else {
            msg_info!(Message::ConfigMissing(shown));
        }
        return Ok(());
    }

    Config::init()?.save_to(&path)?;
    msg_success!(Message::ConfigSaved(shown));
    Ok(())
}
