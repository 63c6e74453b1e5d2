#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use insuretrack_core::model::{
    Claim, ClaimInput, NewNotification, NewUser, Notification, NotificationType, Policy,
    PolicyInput, PolicyType, Role, User,
};
use insuretrack_core_types::Sensitive;
use insuretrack_store::db;
use insuretrack_store::repo::{ClaimRepo, NotificationRepo, PolicyRepo, UserRepo};
use rusqlite::Connection;

pub fn conn() -> Connection {
    db::open_in_memory().expect("in-memory database")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

pub fn add_user(conn: &Connection, username: &str, role: Role) -> User {
    let new_user = NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: Sensitive::new(format!("hash-of-{}", username)),
        full_name: format!("{} Example", username),
        role,
    };
    UserRepo::insert(conn, &new_user, at(2025, 1, 1, 9, 0, 0)).unwrap()
}

pub fn policy_input(number: &str, expiry_date: NaiveDate) -> PolicyInput {
    PolicyInput {
        policy_number: number.to_string(),
        policy_type: PolicyType::Vehicle,
        provider_name: "Acme Mutual".to_string(),
        provider_contact: Some("+44 20 7946 0000".to_string()),
        premium_amount: 420.5,
        coverage_amount: 25_000.0,
        issue_date: date(2024, 1, 1),
        expiry_date,
        description: Some("Comprehensive cover".to_string()),
    }
}

pub fn add_policy(conn: &Connection, user_id: i64, number: &str) -> Policy {
    PolicyRepo::insert(
        conn,
        user_id,
        &policy_input(number, date(2026, 1, 1)),
        at(2025, 1, 2, 10, 0, 0),
    )
    .unwrap()
}

pub fn add_claim(conn: &Connection, user_id: i64, policy_id: i64, number: &str) -> Claim {
    let input = ClaimInput {
        claim_number: number.to_string(),
        policy_id,
        claim_amount: 1_250.75,
        incident_date: date(2025, 2, 1),
        description: "Rear-ended at a junction".to_string(),
    };
    ClaimRepo::insert(
        conn,
        user_id,
        &input,
        Some(r#"["20250203_101500_photo.jpg"]"#.to_string()),
        date(2025, 2, 3),
        at(2025, 2, 3, 10, 15, 0),
    )
    .unwrap()
}

pub fn add_notification(conn: &Connection, user_id: i64, message: &str) -> Notification {
    NotificationRepo::insert(
        conn,
        &NewNotification {
            user_id,
            title: "Heads up".to_string(),
            message: message.to_string(),
            notification_type: NotificationType::System,
        },
        at(2025, 2, 4, 8, 0, 0),
    )
    .unwrap()
}

pub fn table_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
