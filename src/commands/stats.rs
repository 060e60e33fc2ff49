use super::Context;
use crate::libs::messages::Message;
use crate::libs::stats::Dashboard;
use crate::libs::task::TaskQuery;
use crate::libs::view::View;
use crate::msg_print;
use anyhow::Result;

pub fn cmd(ctx: &Context) -> Result<()> {
    let dashboard = collect(ctx)?;
    let username = ctx.current_user()?.username;

    msg_print!(Message::StatsHeader(username), true);
    View::dashboard(&dashboard);

    if !dashboard.top_categories.is_empty() {
        msg_print!(Message::StatsCategoriesHeader, true);
        View::top_categories(&dashboard.top_categories);
    }
    if !dashboard.recent.is_empty() {
        msg_print!(Message::StatsRecentHeader, true);
        View::tasks(&dashboard.recent);
    }

    Ok(())
}

pub fn collect(ctx: &Context) -> Result<Dashboard> {
    let user = ctx.current_user()?;
    let tasks = ctx.tasks()?.list(user.id, &TaskQuery::default())?;
    let categories = ctx.categories()?.list(user.id)?;
    Ok(Dashboard::from_parts(&tasks, &categories, ctx.now()))
}
