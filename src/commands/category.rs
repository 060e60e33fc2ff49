use super::Context;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Create a category
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename a category or change its description
    Edit {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Delete a category; its tasks are kept without a category
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
    /// List categories
    List,
}

pub fn cmd(args: CategoryArgs, ctx: &Context) -> Result<()> {
    let user = ctx.current_user()?;
    let mut categories = ctx.categories()?;

    match args.command {
        CategoryCommand::Add { name, description } => {
            let category = categories.create(user.id, &name, description.as_deref(), ctx.now())?;
            msg_success!(Message::CategoryCreated(category.id));
        }
        CategoryCommand::Edit {
            id,
            name,
            description,
            clear_description,
        } => {
            let description = if clear_description {
                Some(None)
            } else {
                description.as_deref().map(Some)
            };
            if name.is_none() && description.is_none() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }
            let category = categories.update(user.id, id, name.as_deref(), description)?;
            msg_success!(Message::CategoryUpdated(category.id));
        }
        CategoryCommand::Delete { id, yes } => {
            let Some(category) = categories.get(user.id, id)? else {
                msg_bail_anyhow!(Message::CategoryNotFound(id));
            };
            if !yes {
                let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteCategory(category.name).to_string())
                    .default(false)
                    .interact()?;
                if !confirmed {
                    return Ok(());
                }
            }
            categories.delete(user.id, id)?;
            msg_success!(Message::CategoryDeleted(id));
        }
        CategoryCommand::List => {
            let all = categories.list(user.id)?;
            if all.is_empty() {
                msg_info!(Message::CategoriesNotFound);
                return Ok(());
            }
            msg_print!(Message::CategoriesHeader(user.username), true);
            View::categories(&all);
        }
    }

    Ok(())
}
