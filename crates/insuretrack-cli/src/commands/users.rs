//! `insuretrack users`

use clap::{Args, Subcommand};
use insuretrack_core::model::Role;
use insuretrack_engine::commands::accounts::{list_users, resolve_actor, toggle_user};
use insuretrack_store::repo::UserFilter;

use super::{CliResult, Context};

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List accounts, newest first
    List {
        /// Match username, email or full name
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        role: Option<Role>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long = "as", default_value = "admin")]
        actor: String,
    },
    /// Activate or deactivate an account
    Toggle {
        user_id: i64,

        #[arg(long = "as", default_value = "admin")]
        actor: String,
    },
}

pub fn execute(args: UsersArgs, ctx: &mut Context) -> CliResult {
    match args.command {
        UsersCommand::List {
            search,
            role,
            page,
            actor,
        } => {
            let actor = resolve_actor(&actor, &ctx.conn)?;
            let filter = UserFilter { search, role };
            let result = list_users(&actor, &filter, page, &ctx.conn, &ctx.services)?;
            for user in &result.items {
                println!(
                    "#{:<4} {:<20} {:<30} {:<6} {}",
                    user.id,
                    user.username,
                    user.email,
                    user.role,
                    if user.is_active { "active" } else { "inactive" }
                );
            }
            println!(
                "Page {} of {} ({} users)",
                result.page,
                result.total_pages().max(1),
                result.total
            );
        }
        UsersCommand::Toggle { user_id, actor } => {
            let actor = resolve_actor(&actor, &ctx.conn)?;
            let user = toggle_user(&actor, user_id, &mut ctx.conn, &ctx.services)?;
            let state = if user.is_active { "activated" } else { "deactivated" };
            println!("User {} {}", user.username, state);
        }
    }
    Ok(())
}
