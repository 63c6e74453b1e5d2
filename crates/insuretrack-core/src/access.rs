//! Role-based access rules
//!
//! The store never filters by role. Every engine command builds an
//! [`Action`] and asks an [`AccessPolicy`] before it touches a record, and
//! list commands narrow their queries with [`Scope`].
//!
//! | role  | policies                    | claims                         | admin functions |
//! |-------|-----------------------------|--------------------------------|-----------------|
//! | user  | own only                    | own only                       | no              |
//! | agent | view all, mutate own        | view all, update any status    | no              |
//! | admin | everything                  | everything                     | yes             |

use crate::errors::{ExError, TrackerError};
use crate::model::{Claim, Notification, Policy, Role, User};

/// The authenticated user a command runs for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Which rows of the policy and claim tables this actor may list
    pub fn scope(&self) -> Scope {
        match self.role {
            Role::User => Scope::Owner(self.user_id),
            Role::Agent | Role::Admin => Scope::All,
        }
    }
}

/// Row filter applied to list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Owner(i64),
}

impl Scope {
    pub fn owner(&self) -> Option<i64> {
        match self {
            Scope::All => None,
            Scope::Owner(id) => Some(*id),
        }
    }
}

/// Something an actor wants to do
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    ViewPolicy(&'a Policy),
    CreatePolicy,
    EditPolicy(&'a Policy),
    DeletePolicy(&'a Policy),
    ViewClaim(&'a Claim),
    SubmitClaim(&'a Policy),
    UpdateClaimStatus(&'a Claim),
    ReadNotification(&'a Notification),
    ViewAgentDashboard,
    ManageUsers,
    ToggleUser { target_user_id: i64 },
    ManageBackups,
    ViewPlatformStats,
}

impl Action<'_> {
    /// Stable operation name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::ViewPolicy(_) => "view_policy",
            Action::CreatePolicy => "create_policy",
            Action::EditPolicy(_) => "edit_policy",
            Action::DeletePolicy(_) => "delete_policy",
            Action::ViewClaim(_) => "view_claim",
            Action::SubmitClaim(_) => "submit_claim",
            Action::UpdateClaimStatus(_) => "update_claim_status",
            Action::ReadNotification(_) => "read_notification",
            Action::ViewAgentDashboard => "view_agent_dashboard",
            Action::ManageUsers => "manage_users",
            Action::ToggleUser { .. } => "toggle_user",
            Action::ManageBackups => "manage_backups",
            Action::ViewPlatformStats => "view_platform_stats",
        }
    }
}

/// Decides whether an actor may perform an action
pub trait AccessPolicy: Send + Sync {
    /// # Errors
    ///
    /// Returns `ExErrorKind::Forbidden` when the action is not allowed.
    fn check(&self, actor: &Actor, action: &Action<'_>) -> std::result::Result<(), ExError>;

    fn permits(&self, actor: &Actor, action: &Action<'_>) -> bool {
        self.check(actor, action).is_ok()
    }
}

/// The role matrix described in the module docs
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAccessPolicy;

impl RoleAccessPolicy {
    fn decide(actor: &Actor, action: &Action<'_>) -> Result<(), &'static str> {
        let admin = actor.role == Role::Admin;
        let agent = actor.role == Role::Agent;

        match action {
            Action::ViewPolicy(policy) => {
                allow_if(admin || agent || actor.owns(policy.user_id), "not your policy")
            }
            Action::CreatePolicy => Ok(()),
            Action::EditPolicy(policy) | Action::DeletePolicy(policy) => {
                allow_if(admin || actor.owns(policy.user_id), "not your policy")
            }
            Action::ViewClaim(claim) => {
                allow_if(admin || agent || actor.owns(claim.user_id), "not your claim")
            }
            // Claims are always filed by the policy owner so that a claim's
            // user and its policy's user agree.
            Action::SubmitClaim(policy) => {
                allow_if(actor.owns(policy.user_id), "claims must be filed by the policy owner")
            }
            Action::UpdateClaimStatus(_) => {
                allow_if(admin || agent, "only agents and admins review claims")
            }
            Action::ReadNotification(notification) => {
                allow_if(actor.owns(notification.user_id), "not your notification")
            }
            Action::ViewAgentDashboard => allow_if(agent, "agents only"),
            Action::ToggleUser { target_user_id } => {
                allow_if(admin, "admin only")?;
                allow_if(!actor.owns(*target_user_id), "cannot deactivate your own account")
            }
            Action::ManageUsers | Action::ManageBackups | Action::ViewPlatformStats => {
                allow_if(admin, "admin only")
            }
        }
    }
}

fn allow_if(condition: bool, reason: &'static str) -> Result<(), &'static str> {
    if condition {
        Ok(())
    } else {
        Err(reason)
    }
}

impl AccessPolicy for RoleAccessPolicy {
    fn check(&self, actor: &Actor, action: &Action<'_>) -> std::result::Result<(), ExError> {
        Self::decide(actor, action).map_err(|reason| {
            let err = match action {
                Action::ToggleUser { target_user_id } if actor.owns(*target_user_id) => {
                    TrackerError::CannotDeactivateSelf {
                        user_id: actor.user_id,
                    }
                }
                _ => TrackerError::AccessDenied {
                    action: action.name().to_string(),
                    reason: reason.to_string(),
                },
            };
            tracing::debug!(
                actor_id = actor.user_id,
                actor_role = %actor.role,
                action = action.name(),
                reason,
                "Access denied"
            );
            ExError::from(err)
        })
    }
}
