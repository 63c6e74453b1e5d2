//! `insuretrack dashboard`

use clap::Args;
use insuretrack_core::model::{Claim, Policy};
use insuretrack_engine::commands::accounts::resolve_actor;
use insuretrack_engine::commands::dashboard::{dashboard, Dashboard};

use super::{CliResult, Context};

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Whose dashboard to show
    #[arg(long)]
    pub user: String,
}

pub fn execute(args: DashboardArgs, ctx: &mut Context) -> CliResult {
    let actor = resolve_actor(&args.user, &ctx.conn)?;

    match dashboard(&actor, &mut ctx.conn, &ctx.services)? {
        Dashboard::User(view) => {
            println!("Dashboard for {} (user)", actor.username);
            println!(
                "Policies: {} total, {} active, {} expiring soon",
                view.stats.total_policies, view.stats.active_policies, view.stats.expiring_policies
            );
            println!("Claims: {}", view.stats.total_claims);
            print_policies(&view.policies);
            print_claims(&view.recent_claims);
            if !view.notifications.is_empty() {
                println!("Unread notifications:");
                for n in &view.notifications {
                    println!("  [{}] {}: {}", n.notification_type, n.title, n.message);
                }
            }
        }
        Dashboard::Agent(view) => {
            println!("Dashboard for {} (agent)", actor.username);
            println!(
                "Policies: {} total, {} active",
                view.stats.total_policies, view.stats.active_policies
            );
            println!(
                "Claims: {} total, {} pending",
                view.stats.total_claims, view.stats.pending_claims
            );
            print_policies(&view.policies);
            print_claims(&view.recent_claims);
        }
        Dashboard::Admin(view) => {
            println!("Dashboard for {} (admin)", actor.username);
            println!(
                "Users: {}  Policies: {}  Claims: {} ({} pending)",
                view.stats.total_users,
                view.stats.total_policies,
                view.stats.total_claims,
                view.stats.pending_claims
            );
            if !view.recent_users.is_empty() {
                println!("Recent users:");
                for user in &view.recent_users {
                    println!("  #{} {} ({})", user.id, user.username, user.role);
                }
            }
            print_policies(&view.recent_policies);
            print_claims(&view.recent_claims);
        }
    }
    Ok(())
}

fn print_policies(policies: &[Policy]) {
    if policies.is_empty() {
        return;
    }
    println!("Policies:");
    for p in policies {
        println!(
            "  {} {} {} expires {} [{}]",
            p.policy_number, p.policy_type, p.provider_name, p.expiry_date, p.status
        );
    }
}

fn print_claims(claims: &[Claim]) {
    if claims.is_empty() {
        return;
    }
    println!("Recent claims:");
    for c in claims {
        println!("  {} {:.2} [{}]", c.claim_number, c.claim_amount, c.status);
    }
}
