use super::Context;
use crate::libs::mailer::MailTransport;
use crate::libs::reminder::{DispatchSettings, Dispatcher, SweepReport};
use crate::libs::view::View;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RemindArgs {
    #[command(subcommand)]
    command: RemindCommand,
}

#[derive(Debug, Subcommand)]
enum RemindCommand {
    /// Run one sweep now, for every user or for a single task
    Run {
        #[arg(short, long)]
        task: Option<i64>,
    },
}

pub async fn cmd(args: RemindArgs, ctx: &Context) -> Result<()> {
    match args.command {
        RemindCommand::Run { task } => {
            let mailer = ctx.mailer()?;
            let report = run(ctx, &mailer, task).await?;
            if !report.outcomes.is_empty() {
                View::sweep(&report);
            }
            report.log();
            Ok(())
        }
    }
}

/// One sweep at the context's current time.
pub async fn run<M: MailTransport>(ctx: &Context, mailer: &M, task_id: Option<i64>) -> Result<SweepReport> {
    let dispatcher = Dispatcher::new(ctx.tasks()?, mailer, DispatchSettings::from(&ctx.reminder()));
    let report = match task_id {
        Some(id) => dispatcher.run_single(id, ctx.now()).await,
        None => dispatcher.run_batch(ctx.now()).await,
    };
    Ok(report)
}
