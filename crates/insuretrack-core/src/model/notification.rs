use chrono::NaiveDateTime;

use super::claim::{Claim, ClaimStatus};
use super::policy::Policy;
use super::text_enum;

text_enum! {
    NotificationType, "notification_type" {
        Expiry => "expiry",
        Claim => "claim",
        System => "system",
    }
}

/// A message addressed to one user
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: Option<NaiveDateTime>,
    pub user_id: i64,
}

/// A notification about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
}

/// Expiry reminder text. Reminder deduplication matches on this exact
/// string, so changing the wording re-notifies every expiring policy once.
pub fn expiry_message(policy: &Policy) -> String {
    format!(
        "Policy {} expires on {}.",
        policy.policy_number,
        policy.expiry_date.format("%Y-%m-%d")
    )
}

impl NewNotification {
    pub fn claim_submitted(claim: &Claim) -> Self {
        Self {
            user_id: claim.user_id,
            title: "New Claim Submitted".to_string(),
            message: format!(
                "Claim {} has been submitted for review.",
                claim.claim_number
            ),
            notification_type: NotificationType::Claim,
        }
    }

    pub fn claim_status_changed(claim: &Claim, status: ClaimStatus) -> Self {
        Self {
            user_id: claim.user_id,
            title: "Claim Status Updated".to_string(),
            message: format!("Claim {} status changed to {}.", claim.claim_number, status),
            notification_type: NotificationType::Claim,
        }
    }

    pub fn policy_expiring(policy: &Policy) -> Self {
        Self {
            user_id: policy.user_id,
            title: "Policy Expiring Soon".to_string(),
            message: expiry_message(policy),
            notification_type: NotificationType::Expiry,
        }
    }
}
