use super::Context;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Register a task owner
    Add {
        username: String,
        email: String,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List users
    List,
    /// Delete a user with all their tasks and categories
    Delete {
        username: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: UserArgs, ctx: &Context) -> Result<()> {
    let mut users = ctx.users()?;

    match args.command {
        UserCommand::Add { username, email, name } => {
            let user = users.create(&username, &email, name.as_deref(), ctx.now())?;
            msg_success!(Message::UserCreated(user.username));
        }
        UserCommand::List => {
            let all = users.list()?;
            if all.is_empty() {
                msg_info!(Message::UsersNotFound);
                return Ok(());
            }
            msg_print!(Message::UsersHeader, true);
            View::users(&all);
        }
        UserCommand::Delete { username, yes } => {
            if !yes {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteUser(username.clone()).to_string())
                    .default(false)
                    .interact()?;
                if !confirmed {
                    return Ok(());
                }
            }
            users.delete(&username)?;
            msg_success!(Message::UserDeleted(username));
        }
    }

    Ok(())
}
