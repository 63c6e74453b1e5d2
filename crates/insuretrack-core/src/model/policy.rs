use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::text_enum;

/// Number of days ahead of today that counts as "expiring soon"
pub const EXPIRY_WINDOW_DAYS: u64 = 30;

text_enum! {
    PolicyType, "policy_type" {
        Health => "health",
        Vehicle => "vehicle",
        Life => "life",
        Home => "home",
    }
}

text_enum! {
    PolicyStatus, "policy_status" {
        Active => "active",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

impl PolicyType {
    /// Human label used in listings ("Vehicle Insurance")
    pub fn label(&self) -> &'static str {
        match self {
            PolicyType::Health => "Health Insurance",
            PolicyType::Vehicle => "Vehicle Insurance",
            PolicyType::Life => "Life Insurance",
            PolicyType::Home => "Home Insurance",
        }
    }
}

/// An insurance contract owned by one user
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
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

impl Policy {
    /// Last day (inclusive) of the expiry window that starts at `today`
    pub fn expiry_horizon(today: NaiveDate) -> NaiveDate {
        today + Days::new(EXPIRY_WINDOW_DAYS)
    }

    /// Derived, never persisted: the policy expires on or before
    /// `today + 30 days`. Already-lapsed policies also count.
    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        self.expiry_date <= Self::expiry_horizon(today)
    }

    /// Policies that get an expiry reminder: still active, not yet lapsed,
    /// and inside the window.
    pub fn needs_expiry_reminder(&self, today: NaiveDate) -> bool {
        self.status == PolicyStatus::Active
            && self.expiry_date > today
            && self.is_expiring_soon(today)
    }
}

/// Fields a user supplies when adding or editing a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInput {
    pub policy_number: String,
    pub policy_type: PolicyType,
    pub provider_name: String,
    pub provider_contact: Option<String>,
    pub premium_amount: f64,
    pub coverage_amount: f64,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy_expiring(expiry_date: NaiveDate) -> Policy {
        Policy {
            id: 10,
            policy_number: "POL-10001".to_string(),
            policy_type: PolicyType::Home,
            provider_name: "Acme Mutual".to_string(),
            provider_contact: None,
            premium_amount: 120.0,
            coverage_amount: 50_000.0,
            issue_date: date(2024, 1, 1),
            expiry_date,
            status: PolicyStatus::Active,
            description: None,
            created_at: None,
            updated_at: None,
            user_id: 1,
        }
    }

    #[test]
    fn test_expiry_window_boundary() {
        let today = date(2025, 3, 1);
        let on_boundary = policy_expiring(today + Days::new(30));
        let past_boundary = policy_expiring(today + Days::new(31));

        assert!(on_boundary.is_expiring_soon(today));
        assert!(!past_boundary.is_expiring_soon(today));
    }

    #[test]
    fn test_lapsed_policy_is_expiring_but_needs_no_reminder() {
        let today = date(2025, 3, 1);
        let lapsed = policy_expiring(date(2025, 2, 1));
        assert!(lapsed.is_expiring_soon(today));
        assert!(!lapsed.needs_expiry_reminder(today));

        let due_today = policy_expiring(today);
        assert!(!due_today.needs_expiry_reminder(today));
    }

    #[test]
    fn test_cancelled_policy_needs_no_reminder() {
        let today = date(2025, 3, 1);
        let mut policy = policy_expiring(today + Days::new(5));
        assert!(policy.needs_expiry_reminder(today));
        policy.status = PolicyStatus::Cancelled;
        assert!(!policy.needs_expiry_reminder(today));
    }

    #[test]
    fn test_policy_type_serde_is_lowercase() {
        let json = serde_json::to_string(&PolicyType::Vehicle).unwrap();
        assert_eq!(json, "\"vehicle\"");
        assert_eq!(PolicyType::Vehicle.label(), "Vehicle Insurance");
    }
}
