#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use insuretrack_core::logging_facility::Profile;
use insuretrack_core::model::{ClaimInput, NewUser, PolicyInput, PolicyType, Role};
use insuretrack_core::{Actor, AppConfig};
use insuretrack_core_types::Sensitive;
use insuretrack_engine::Services;
use insuretrack_store::db;
use insuretrack_store::repo::UserRepo;
use rusqlite::Connection;
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub conn: Connection,
    pub services: Services,
}

/// In-memory database, scratch backup and upload directories, no automatic
/// backups
pub fn fixture() -> Fixture {
    build(false)
}

pub fn fixture_with_auto_backup() -> Fixture {
    build(true)
}

fn build(backup_on_write: bool) -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        database_path: dir.path().join("tracker.db"),
        backup_dir: dir.path().join("backups"),
        upload_dir: dir.path().join("uploads"),
        max_upload_bytes: 64 * 1024,
        backup_on_write,
        log_profile: Profile::Test,
    };
    Fixture {
        conn: db::open_in_memory().unwrap(),
        services: Services::new(config),
        dir,
    }
}

/// Insert an account directly; skips password hashing
pub fn account(conn: &Connection, username: &str, role: Role) -> Actor {
    let user = UserRepo::insert(
        conn,
        &NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: Sensitive::new(format!("not-a-real-hash-{}", username)),
            full_name: format!("{} Example", username),
            role,
        },
        Utc::now().naive_utc(),
    )
    .unwrap();
    Actor::from_user(&user)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today() + Days::new(days)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn policy_input(number: &str, expiry_date: NaiveDate) -> PolicyInput {
    PolicyInput {
        policy_number: number.to_string(),
        policy_type: PolicyType::Home,
        provider_name: "Harbour Insurance".to_string(),
        provider_contact: None,
        premium_amount: 310.0,
        coverage_amount: 180_000.0,
        issue_date: date(2024, 1, 1),
        expiry_date,
        description: None,
    }
}

pub fn claim_input(number: &str, policy_id: i64) -> ClaimInput {
    ClaimInput {
        claim_number: number.to_string(),
        policy_id,
        claim_amount: 2_400.0,
        incident_date: date(2025, 1, 15),
        description: "Burst pipe flooded the kitchen".to_string(),
    }
}
