mod common;

use common::*;
use insuretrack_core::logging_facility::{init_test_capture, CapturedEvent, TestCapture};
use insuretrack_core::model::{ClaimStatus, ClaimUpdate, Role};
use insuretrack_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ACTOR_ID, FIELD_ACTOR_ROLE,
    FIELD_BACKUP_FILE, FIELD_BACKUP_TIMESTAMP, FIELD_CLAIM_ID, FIELD_COMPONENT,
    FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_EVENT, FIELD_NOTIFICATION_ID,
    FIELD_OP, FIELD_POLICY_ID, FIELD_USER_ID,
};
use insuretrack_engine::commands::accounts::toggle_user;
use insuretrack_engine::commands::backup::{create_backup, list_backups, restore_backup};
use insuretrack_engine::commands::claims::{submit_claim, update_claim_status};
use insuretrack_engine::commands::dashboard::dashboard;
use insuretrack_engine::commands::notifications::{mark_notification_read, unread_notifications};
use insuretrack_engine::commands::policies::{add_policy, view_policy};

/// The first captured event of `op` with the given event name whose `field`
/// equals `value`
fn find_event(
    capture: &TestCapture,
    op: &str,
    event: &str,
    field: &str,
    value: &str,
) -> CapturedEvent {
    capture
        .events_for_op(op)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(event) && e.field(field) == Some(value))
        .unwrap_or_else(|| panic!("no {} {} event with {}={}", op, event, field, value))
}

#[test]
fn test_successful_command_logs_start_and_end() {
    let capture = init_test_capture();
    let f = fixture();
    let admin = account(&f.conn, "root", Role::Admin);

    list_backups(&admin, &f.services).unwrap();

    capture.assert_event_exists("list_backups", EVENT_START);
    capture.assert_event_exists("list_backups", EVENT_END);
    let end = capture
        .events_for_op("list_backups")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert!(end.field(FIELD_DURATION_MS).is_some());
}

#[test]
fn test_failed_command_logs_error_code() {
    let capture = init_test_capture();
    let f = fixture();
    let dana = account(&f.conn, "dana", Role::User);

    view_policy(&dana, 4242, &f.conn, &f.services).unwrap_err();

    let errors: Vec<_> = capture
        .events_for_op("view_policy")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert!(errors
        .iter()
        .any(|e| e.field(FIELD_ERR_CODE) == Some("ERR_NOT_FOUND")));
    assert!(errors.iter().all(|e| e.field(FIELD_ERR_KIND).is_some()));
    assert_eq!(errors[0].level, tracing::Level::ERROR);
}

#[test]
fn test_commands_log_entity_fields_under_schema_names() {
    let capture = init_test_capture();
    let mut f = fixture();
    let admin = account(&f.conn, "schema_admin", Role::Admin);
    let owner = account(&f.conn, "schema_owner", Role::User);
    let agent = account(&f.conn, "schema_agent", Role::Agent);

    let policy = add_policy(
        &owner,
        &policy_input("POL-LOG-001", days_from_today(200)),
        &mut f.conn,
        &f.services,
    )
    .unwrap();
    let claim = submit_claim(
        &owner,
        &claim_input("CLM-LOG-001", policy.id),
        &[],
        &mut f.conn,
        &f.services,
    )
    .unwrap();
    update_claim_status(
        &agent,
        claim.id,
        &ClaimUpdate {
            status: ClaimStatus::Approved,
            remarks: None,
        },
        &mut f.conn,
        &f.services,
    )
    .unwrap();
    let notification = unread_notifications(&owner, 1, &f.conn).unwrap().remove(0);
    mark_notification_read(&owner, notification.id, &f.conn, &f.services).unwrap();
    toggle_user(&admin, agent.user_id, &mut f.conn, &f.services).unwrap();
    dashboard(&owner, &mut f.conn, &f.services).unwrap();
    let backup = create_backup(&admin, &mut f.conn, &f.services).unwrap();
    let restored = restore_backup(&admin, None, &mut f.conn, &f.services).unwrap();

    let owner_id = owner.user_id.to_string();
    let admin_id = admin.user_id.to_string();

    let start = find_event(&capture, "submit_claim", EVENT_START, FIELD_ACTOR_ID, &owner_id);
    assert_eq!(start.field(FIELD_POLICY_ID), Some(policy.id.to_string().as_str()));
    assert_eq!(start.field(FIELD_OP), Some("submit_claim"));
    assert_eq!(start.field(FIELD_EVENT), Some(EVENT_START));
    assert!(start.field(FIELD_COMPONENT).is_some());

    find_event(
        &capture,
        "update_claim_status",
        EVENT_START,
        FIELD_CLAIM_ID,
        &claim.id.to_string(),
    );
    find_event(
        &capture,
        "mark_notification_read",
        EVENT_START,
        FIELD_NOTIFICATION_ID,
        &notification.id.to_string(),
    );
    find_event(
        &capture,
        "toggle_user",
        EVENT_START,
        FIELD_USER_ID,
        &agent.user_id.to_string(),
    );
    let dash = find_event(&capture, "dashboard", EVENT_START, FIELD_ACTOR_ID, &owner_id);
    assert_eq!(dash.field(FIELD_ACTOR_ROLE), Some("user"));

    let backup_path = backup.path.display().to_string();
    find_event(&capture, "backup_data", EVENT_END, FIELD_BACKUP_FILE, &backup_path);
    let restore_end = find_event(
        &capture,
        "restore_data",
        EVENT_END,
        FIELD_BACKUP_TIMESTAMP,
        &restored.timestamp,
    );
    assert!(restore_end.field(FIELD_BACKUP_FILE).is_some());
    find_event(&capture, "restore_data", EVENT_START, FIELD_ACTOR_ID, &admin_id);
}
