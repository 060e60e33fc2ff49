use super::Context;
use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::msg_info;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Run the reminder worker in this terminal instead of in the background
    #[arg(short, long)]
    foreground: bool,

    /// Stop the background worker
    #[arg(short, long, conflicts_with = "foreground")]
    stop: bool,
}

pub async fn cmd(args: WatchArgs, ctx: &Context) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }

    if args.foreground {
        msg_info!(Message::WatcherStartingForeground);
        return daemon::run_with_signal_handling(&ctx.db_path, &ctx.config).await;
    }

    daemon::spawn(&ctx.db_path)
}
