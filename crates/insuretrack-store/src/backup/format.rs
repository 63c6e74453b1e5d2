//! Snapshot document schema, version 1
//!
//! Field names and order follow the file layout; dates are ISO-8601
//! strings, timestamps ISO-8601 without offset, money plain floats, foreign
//! keys raw integer ids.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use insuretrack_core::errors::ExError;
use insuretrack_core::model::{
    Claim, ClaimStatus, Notification, NotificationType, Policy, PolicyStatus, PolicyType, Role,
    User,
};
use insuretrack_core_types::Sensitive;
use serde::{Deserialize, Serialize};

use crate::errors::invalid_snapshot;

/// Newest document version this build reads and the one it writes
pub const FORMAT_VERSION: u32 = 1;

/// `timestamp` field and history file stamp
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

fn unversioned() -> u32 {
    1
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    /// Absent in files written before versioning, which are version 1
    #[serde(default = "unversioned")]
    pub format_version: u32,
    pub timestamp: String,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub policies: Vec<PolicyRecord>,
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: Sensitive<String>,
    pub full_name: String,
    pub role: Role,
    pub created_at: Option<NaiveDateTime>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: i64,
    pub policy_number: String,
    pub policy_type: PolicyType,
    pub provider_name: String,
    pub provider_contact: Option<String>,
    pub premium_amount: f64,
    pub coverage_amount: f64,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: PolicyStatus,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: i64,
    pub claim_number: String,
    pub claim_amount: f64,
    pub incident_date: NaiveDate,
    pub claim_date: Option<NaiveDate>,
    pub status: ClaimStatus,
    pub description: String,
    /// JSON-encoded list of stored filenames, kept verbatim
    pub documents: Option<String>,
    pub remarks: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub user_id: i64,
    pub policy_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Option<NaiveDateTime>,
    pub user_id: i64,
}

/// Rows per entity in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EntityCounts {
    pub users: usize,
    pub policies: usize,
    pub claims: usize,
    pub notifications: usize,
}

impl BackupDocument {
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            users: self.users.len(),
            policies: self.policies.len(),
            claims: self.claims.len(),
            notifications: self.notifications.len(),
        }
    }

    /// Check that the document can be loaded into an empty database as is
    ///
    /// Rejects a version newer than [`FORMAT_VERSION`], repeated ids or
    /// unique keys, references to users or policies the document does not
    /// contain, and claims whose user differs from their policy's owner.
    ///
    /// # Errors
    /// `ExErrorKind::InvalidSnapshot` naming the offending collection.
    pub fn validate(&self) -> std::result::Result<(), ExError> {
        if self.format_version == 0 || self.format_version > FORMAT_VERSION {
            return Err(invalid_snapshot(
                "format_version",
                format!(
                    "unsupported format version {} (supported: 1..={})",
                    self.format_version, FORMAT_VERSION
                ),
            ));
        }

        let mut user_ids = HashSet::new();
        let mut usernames = HashSet::new();
        let mut emails = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) {
                return Err(duplicate("users", "id", user.id));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(duplicate("users", "username", &user.username));
            }
            if !emails.insert(user.email.as_str()) {
                return Err(duplicate("users", "email", &user.email));
            }
        }

        let mut policy_owner = HashMap::new();
        let mut policy_numbers = HashSet::new();
        for policy in &self.policies {
            if policy_owner.insert(policy.id, policy.user_id).is_some() {
                return Err(duplicate("policies", "id", policy.id));
            }
            if !policy_numbers.insert(policy.policy_number.as_str()) {
                return Err(duplicate("policies", "policy_number", &policy.policy_number));
            }
            if !user_ids.contains(&policy.user_id) {
                return Err(dangling("policies", "policy", policy.id, "user", policy.user_id));
            }
        }

        let mut claim_ids = HashSet::new();
        let mut claim_numbers = HashSet::new();
        for claim in &self.claims {
            if !claim_ids.insert(claim.id) {
                return Err(duplicate("claims", "id", claim.id));
            }
            if !claim_numbers.insert(claim.claim_number.as_str()) {
                return Err(duplicate("claims", "claim_number", &claim.claim_number));
            }
            if !user_ids.contains(&claim.user_id) {
                return Err(dangling("claims", "claim", claim.id, "user", claim.user_id));
            }
            let Some(&owner) = policy_owner.get(&claim.policy_id) else {
                return Err(dangling("claims", "claim", claim.id, "policy", claim.policy_id));
            };
            if owner != claim.user_id {
                return Err(invalid_snapshot(
                    "claims",
                    format!(
                        "claim {} belongs to user {} but its policy {} belongs to user {}",
                        claim.id, claim.user_id, claim.policy_id, owner
                    ),
                ));
            }
        }

        let mut notification_ids = HashSet::new();
        for notification in &self.notifications {
            if !notification_ids.insert(notification.id) {
                return Err(duplicate("notifications", "id", notification.id));
            }
            if !user_ids.contains(&notification.user_id) {
                return Err(dangling(
                    "notifications",
                    "notification",
                    notification.id,
                    "user",
                    notification.user_id,
                ));
            }
        }

        Ok(())
    }
}

fn duplicate(collection: &str, key: &str, value: impl std::fmt::Display) -> ExError {
    invalid_snapshot(
        collection,
        format!("duplicate {} {} in {}", key, value, collection),
    )
}

fn dangling(collection: &str, entity: &str, id: i64, target: &str, target_id: i64) -> ExError {
    invalid_snapshot(
        collection,
        format!("{} {} references missing {} {}", entity, id, target, target_id),
    )
}

impl From<User> for UserRecord {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            password_hash: u.password_hash,
            full_name: u.full_name,
            role: u.role,
            created_at: u.created_at,
            is_active: u.is_active,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password_hash: r.password_hash,
            full_name: r.full_name,
            role: r.role,
            created_at: r.created_at,
            is_active: r.is_active,
        }
    }
}

impl From<Policy> for PolicyRecord {
    fn from(p: Policy) -> Self {
        Self {
            id: p.id,
            policy_number: p.policy_number,
            policy_type: p.policy_type,
            provider_name: p.provider_name,
            provider_contact: p.provider_contact,
            premium_amount: p.premium_amount,
            coverage_amount: p.coverage_amount,
            issue_date: p.issue_date,
            expiry_date: p.expiry_date,
            status: p.status,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
            user_id: p.user_id,
        }
    }
}

impl From<PolicyRecord> for Policy {
    fn from(r: PolicyRecord) -> Self {
        Self {
            id: r.id,
            policy_number: r.policy_number,
            policy_type: r.policy_type,
            provider_name: r.provider_name,
            provider_contact: r.provider_contact,
            premium_amount: r.premium_amount,
            coverage_amount: r.coverage_amount,
            issue_date: r.issue_date,
            expiry_date: r.expiry_date,
            status: r.status,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
            user_id: r.user_id,
        }
    }
}

impl From<Claim> for ClaimRecord {
    fn from(c: Claim) -> Self {
        Self {
            id: c.id,
            claim_number: c.claim_number,
            claim_amount: c.claim_amount,
            incident_date: c.incident_date,
            claim_date: c.claim_date,
            status: c.status,
            description: c.description,
            documents: c.documents,
            remarks: c.remarks,
            created_at: c.created_at,
            updated_at: c.updated_at,
            user_id: c.user_id,
            policy_id: c.policy_id,
        }
    }
}

impl From<ClaimRecord> for Claim {
    fn from(r: ClaimRecord) -> Self {
        Self {
            id: r.id,
            claim_number: r.claim_number,
            claim_amount: r.claim_amount,
            incident_date: r.incident_date,
            claim_date: r.claim_date,
            status: r.status,
            description: r.description,
            documents: r.documents,
            remarks: r.remarks,
            created_at: r.created_at,
            updated_at: r.updated_at,
            user_id: r.user_id,
            policy_id: r.policy_id,
        }
    }
}

impl From<Notification> for NotificationRecord {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            is_read: n.is_read,
            created_at: n.created_at,
            user_id: n.user_id,
        }
    }
}

impl From<NotificationRecord> for Notification {
    fn from(r: NotificationRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            message: r.message,
            notification_type: r.notification_type,
            is_read: r.is_read,
            created_at: r.created_at,
            user_id: r.user_id,
        }
    }
}
