//! Role dashboards
//!
//! Opening any dashboard first generates the day's expiry reminders.

use std::time::Instant;

use chrono::NaiveDate;
use insuretrack_core::model::{Claim, ClaimStatus, Notification, Policy, PolicyStatus, Role, User};
use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_store::errors::Result;
use insuretrack_store::repo::{ClaimRepo, NotificationRepo, PolicyRepo, UserRepo};
use rusqlite::Connection;

use super::context::{elapsed_ms, now, Services};
use super::notifications::generate_expiry_notifications;

const USER_RECENT_CLAIMS: u32 = 5;
const USER_UNREAD_NOTIFICATIONS: u32 = 5;
const AGENT_RECENT_CLAIMS: u32 = 10;
const ADMIN_RECENT_ITEMS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub total_policies: u64,
    pub active_policies: u64,
    /// Active policies expiring within the window, lapsed ones included
    pub expiring_policies: u64,
    pub total_claims: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDashboard {
    pub stats: UserStats,
    pub policies: Vec<Policy>,
    pub recent_claims: Vec<Claim>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgentStats {
    pub total_policies: u64,
    pub active_policies: u64,
    pub total_claims: u64,
    pub pending_claims: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentDashboard {
    pub stats: AgentStats,
    pub policies: Vec<Policy>,
    pub recent_claims: Vec<Claim>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_policies: u64,
    pub total_claims: u64,
    pub pending_claims: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub stats: PlatformStats,
    pub recent_users: Vec<User>,
    pub recent_policies: Vec<Policy>,
    pub recent_claims: Vec<Claim>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    User(UserDashboard),
    Agent(AgentDashboard),
    Admin(AdminDashboard),
}

/// The dashboard for the actor's role, as of the current UTC date
///
/// # Errors
/// Persistence errors.
pub fn dashboard(actor: &Actor, conn: &mut Connection, services: &Services) -> Result<Dashboard> {
    dashboard_on(actor, now().date(), conn, services)
}

/// The dashboard for the actor's role, as of `today`
///
/// # Errors
/// Persistence errors.
pub fn dashboard_on(
    actor: &Actor,
    today: NaiveDate,
    conn: &mut Connection,
    services: &Services,
) -> Result<Dashboard> {
    log_op_start!(
        "dashboard",
        actor_id = actor.user_id,
        actor_role = actor.role.as_str()
    );
    let start = Instant::now();

    let dashboard = dashboard_impl(actor, today, conn, services).map_err(|e| {
        log_op_error!("dashboard", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("dashboard", duration_ms = elapsed_ms(start));
    Ok(dashboard)
}

fn dashboard_impl(
    actor: &Actor,
    today: NaiveDate,
    conn: &mut Connection,
    services: &Services,
) -> Result<Dashboard> {
    generate_expiry_notifications(today, conn)?;

    match actor.role {
        Role::User => user_dashboard(actor, today, conn).map(Dashboard::User),
        Role::Agent => {
            services.authorize(actor, &Action::ViewAgentDashboard)?;
            agent_dashboard(conn).map(Dashboard::Agent)
        }
        Role::Admin => {
            services.authorize(actor, &Action::ViewPlatformStats)?;
            admin_dashboard(conn).map(Dashboard::Admin)
        }
    }
}

fn user_dashboard(actor: &Actor, today: NaiveDate, conn: &Connection) -> Result<UserDashboard> {
    let policies = PolicyRepo::for_owner(conn, Some(actor.user_id))?;
    let active = || policies.iter().filter(|p| p.status == PolicyStatus::Active);

    let stats = UserStats {
        total_policies: policies.len() as u64,
        active_policies: active().count() as u64,
        expiring_policies: active().filter(|p| p.is_expiring_soon(today)).count() as u64,
        total_claims: ClaimRepo::count(conn, Some(actor.user_id), None)?,
    };

    Ok(UserDashboard {
        stats,
        recent_claims: ClaimRepo::recent(conn, Some(actor.user_id), USER_RECENT_CLAIMS)?,
        notifications: NotificationRepo::unread_for_user(
            conn,
            actor.user_id,
            USER_UNREAD_NOTIFICATIONS,
        )?,
        policies,
    })
}

fn agent_dashboard(conn: &Connection) -> Result<AgentDashboard> {
    let stats = AgentStats {
        total_policies: PolicyRepo::count(conn, None, None)?,
        active_policies: PolicyRepo::count(conn, None, Some(PolicyStatus::Active))?,
        total_claims: ClaimRepo::count(conn, None, None)?,
        pending_claims: ClaimRepo::count(conn, None, Some(ClaimStatus::Pending))?,
    };

    Ok(AgentDashboard {
        stats,
        policies: PolicyRepo::for_owner(conn, None)?,
        recent_claims: ClaimRepo::recent(conn, None, AGENT_RECENT_CLAIMS)?,
    })
}

fn admin_dashboard(conn: &Connection) -> Result<AdminDashboard> {
    let stats = PlatformStats {
        total_users: UserRepo::count(conn)?,
        total_policies: PolicyRepo::count(conn, None, None)?,
        total_claims: ClaimRepo::count(conn, None, None)?,
        pending_claims: ClaimRepo::count(conn, None, Some(ClaimStatus::Pending))?,
    };

    Ok(AdminDashboard {
        stats,
        recent_users: UserRepo::recent(conn, ADMIN_RECENT_ITEMS)?,
        recent_policies: PolicyRepo::recent(conn, ADMIN_RECENT_ITEMS)?,
        recent_claims: ClaimRepo::recent(conn, None, ADMIN_RECENT_ITEMS)?,
    })
}
