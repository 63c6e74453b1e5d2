mod common;

use std::fs;

use common::*;
use insuretrack_core::errors::ExErrorKind;
use insuretrack_core::model::{NotificationType, PolicyStatus, Role};
use insuretrack_engine::commands::accounts::resolve_actor;
use insuretrack_engine::commands::backup::restore_backup;
use insuretrack_engine::commands::notifications::{
    generate_expiry_notifications, mark_notification_read, unread_notifications,
};
use insuretrack_engine::commands::policies::add_policy;
use insuretrack_store::repo::{NotificationRepo, PolicyRepo};

#[test]
fn test_generation_is_idempotent() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    add_policy(&dana, &policy_input("POL-40001", days_from_today(5)), &mut f.conn, &f.services).unwrap();
    add_policy(&dana, &policy_input("POL-40002", days_from_today(20)), &mut f.conn, &f.services).unwrap();

    assert_eq!(generate_expiry_notifications(today(), &mut f.conn).unwrap(), 2);
    assert_eq!(generate_expiry_notifications(today(), &mut f.conn).unwrap(), 0);

    let reminders: Vec<_> = NotificationRepo::for_user(&f.conn, dana.user_id)
        .unwrap()
        .into_iter()
        .filter(|n| n.notification_type == NotificationType::Expiry)
        .collect();
    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].title, "Policy Expiring Soon");
    assert_eq!(
        reminders[0].message,
        format!("Policy POL-40001 expires on {}.", days_from_today(5).format("%Y-%m-%d"))
    );
}

#[test]
fn test_window_is_after_today_through_thirty_days() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let today = date(2025, 3, 1);
    for (number, expiry) in [
        ("POL-40000", today),
        ("POL-40001", date(2025, 3, 2)),
        ("POL-40030", date(2025, 3, 31)),
        ("POL-40031", date(2025, 4, 1)),
    ] {
        add_policy(&dana, &policy_input(number, expiry), &mut f.conn, &f.services).unwrap();
    }

    assert_eq!(generate_expiry_notifications(today, &mut f.conn).unwrap(), 2);

    let messages: Vec<_> = NotificationRepo::for_user(&f.conn, dana.user_id)
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Policy POL-40001 expires on 2025-03-02.".to_string(),
            "Policy POL-40030 expires on 2025-03-31.".to_string(),
        ]
    );
}

#[test]
fn test_inactive_policies_are_not_reminded() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let policy = add_policy(&dana, &policy_input("POL-40001", days_from_today(3)), &mut f.conn, &f.services)
        .unwrap();
    f.conn
        .execute(
            "UPDATE policies SET status = ?1 WHERE id = ?2",
            rusqlite::params![PolicyStatus::Cancelled.as_str(), policy.id],
        )
        .unwrap();

    assert_eq!(generate_expiry_notifications(today(), &mut f.conn).unwrap(), 0);
}

#[test]
fn test_reminded_policies_match_the_policy_reminder_rule() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let today = date(2025, 3, 1);
    for (number, expiry) in [
        ("POL-LAPSED", date(2025, 2, 1)),
        ("POL-TODAY", today),
        ("POL-WEEK", date(2025, 3, 8)),
        ("POL-EDGE", date(2025, 3, 31)),
        ("POL-LATER", date(2025, 6, 1)),
        ("POL-VOID", date(2025, 3, 10)),
    ] {
        add_policy(&dana, &policy_input(number, expiry), &mut f.conn, &f.services).unwrap();
    }
    f.conn
        .execute(
            "UPDATE policies SET status = ?1 WHERE policy_number = 'POL-VOID'",
            rusqlite::params![PolicyStatus::Expired.as_str()],
        )
        .unwrap();

    generate_expiry_notifications(today, &mut f.conn).unwrap();

    let expected: Vec<String> = PolicyRepo::all(&f.conn)
        .unwrap()
        .iter()
        .filter(|p| p.needs_expiry_reminder(today))
        .map(|p| format!("Policy {} expires on {}.", p.policy_number, p.expiry_date))
        .collect();
    let reminded: Vec<String> = NotificationRepo::for_user(&f.conn, dana.user_id)
        .unwrap()
        .into_iter()
        .filter(|n| n.notification_type == NotificationType::Expiry)
        .map(|n| n.message)
        .collect();

    assert_eq!(expected.len(), 2);
    assert_eq!(reminded.len(), expected.len());
    for message in &expected {
        assert!(reminded.contains(message), "missing reminder: {}", message);
    }
}

#[test]
fn test_new_expiry_date_gets_a_new_reminder() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let policy = add_policy(&dana, &policy_input("POL-40001", days_from_today(3)), &mut f.conn, &f.services)
        .unwrap();
    generate_expiry_notifications(today(), &mut f.conn).unwrap();

    f.conn
        .execute(
            "UPDATE policies SET expiry_date = ?1 WHERE id = ?2",
            rusqlite::params![days_from_today(9), policy.id],
        )
        .unwrap();

    assert_eq!(generate_expiry_notifications(today(), &mut f.conn).unwrap(), 1);
}

#[test]
fn test_restored_policy_expiring_in_ten_days_yields_one_reminder() {
    let mut f = fixture();
    let admin = account(&f.conn, "root", Role::Admin);
    let snapshot = f.dir.path().join("scenario.json");
    fs::write(
        &snapshot,
        format!(
            r#"{{
              "format_version": 1,
              "timestamp": "20250101_000000",
              "users": [{{
                "id": 1, "username": "alice", "email": "alice@example.com",
                "password_hash": "h", "full_name": "Alice Example", "role": "user",
                "created_at": null, "is_active": true
              }}],
              "policies": [{{
                "id": 10, "policy_number": "POL-00010", "policy_type": "health",
                "provider_name": "Acme", "provider_contact": null,
                "premium_amount": 99.99, "coverage_amount": 10000.0,
                "issue_date": "2024-01-01", "expiry_date": "{}",
                "status": "active", "description": null,
                "created_at": null, "updated_at": null, "user_id": 1
              }}],
              "claims": [],
              "notifications": []
            }}"#,
            days_from_today(10).format("%Y-%m-%d")
        ),
    )
    .unwrap();

    restore_backup(&admin, Some(&snapshot), &mut f.conn, &f.services).unwrap();

    let alice = resolve_actor("alice", &f.conn).unwrap();
    assert_eq!(alice.user_id, 1);
    assert_eq!(PolicyRepo::for_owner(&f.conn, Some(1)).unwrap().len(), 1);

    assert_eq!(generate_expiry_notifications(today(), &mut f.conn).unwrap(), 1);
    let notices = NotificationRepo::for_user(&f.conn, 1).unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notification_type, NotificationType::Expiry);
}

#[test]
fn test_mark_read_by_owner_only() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let admin = account(&f.conn, "root", Role::Admin);
    add_policy(&dana, &policy_input("POL-40001", days_from_today(5)), &mut f.conn, &f.services).unwrap();
    generate_expiry_notifications(today(), &mut f.conn).unwrap();

    let unread = unread_notifications(&dana, 10, &f.conn).unwrap();
    assert_eq!(unread.len(), 1);
    let id = unread[0].id;

    let err = mark_notification_read(&admin, id, &f.conn, &f.services).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Forbidden);

    let read = mark_notification_read(&dana, id, &f.conn, &f.services).unwrap();
    assert!(read.is_read);
    assert!(unread_notifications(&dana, 10, &f.conn).unwrap().is_empty());

    let err = mark_notification_read(&dana, 999, &f.conn, &f.services).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
