//! Derived notifications
//!
//! Claim notifications are written by the claim commands. Expiry reminders
//! are generated here whenever a dashboard is opened; they are deduplicated
//! on (user, type, message), so the reminder text from
//! [`insuretrack_core::model::notification::expiry_message`] is also the
//! dedup key.

use std::time::Instant;

use chrono::NaiveDate;
use insuretrack_core::errors::TrackerError;
use insuretrack_core::model::{NewNotification, Notification};
use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_store::errors::{from_rusqlite, Result};
use insuretrack_store::repo::{NotificationRepo, PolicyRepo};
use rusqlite::{Connection, TransactionBehavior};

use super::context::{elapsed_ms, now, Services};

/// Remind owners of active policies expiring after `today` and within the
/// expiry window. Returns how many reminders were created; running it again
/// on the same day creates none.
///
/// # Errors
/// Persistence errors; nothing is written on failure.
pub fn generate_expiry_notifications(today: NaiveDate, conn: &mut Connection) -> Result<usize> {
    log_op_start!("generate_expiry_notifications", today = %today);
    let start = Instant::now();

    let created = generate_impl(today, conn).map_err(|e| {
        log_op_error!(
            "generate_expiry_notifications",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        e
    })?;

    log_op_end!(
        "generate_expiry_notifications",
        duration_ms = elapsed_ms(start),
        created = created
    );
    Ok(created)
}

fn generate_impl(today: NaiveDate, conn: &mut Connection) -> Result<usize> {
    let now = now();
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    let due = PolicyRepo::all(&tx)?
        .into_iter()
        .filter(|policy| policy.needs_expiry_reminder(today));

    let mut created = 0;
    for policy in due {
        let reminder = NewNotification::policy_expiring(&policy);
        if NotificationRepo::exists(
            &tx,
            reminder.user_id,
            reminder.notification_type,
            &reminder.message,
        )? {
            continue;
        }
        NotificationRepo::insert(&tx, &reminder, now)?;
        created += 1;
    }

    tx.commit().map_err(from_rusqlite)?;
    Ok(created)
}

/// Mark one of the actor's notifications as read
///
/// # Errors
/// `NotFound` for an unknown id, `Forbidden` for someone else's notification.
pub fn mark_notification_read(
    actor: &Actor,
    notification_id: i64,
    conn: &Connection,
    services: &Services,
) -> Result<Notification> {
    log_op_start!(
        "mark_notification_read",
        actor_id = actor.user_id,
        notification_id = notification_id
    );
    let start = Instant::now();

    let notification = mark_read_impl(actor, notification_id, conn, services).map_err(|e| {
        log_op_error!("mark_notification_read", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("mark_notification_read", duration_ms = elapsed_ms(start));
    Ok(notification)
}

fn mark_read_impl(
    actor: &Actor,
    notification_id: i64,
    conn: &Connection,
    services: &Services,
) -> Result<Notification> {
    let mut notification = NotificationRepo::get(conn, notification_id)?
        .ok_or(TrackerError::NotificationNotFound { notification_id })?;
    services.authorize(actor, &Action::ReadNotification(&notification))?;

    if !notification.is_read {
        NotificationRepo::mark_read(conn, notification.id)?;
        notification.is_read = true;
    }
    Ok(notification)
}

/// The actor's unread notifications, newest first
///
/// # Errors
/// Persistence errors only.
pub fn unread_notifications(actor: &Actor, limit: u32, conn: &Connection) -> Result<Vec<Notification>> {
    NotificationRepo::unread_for_user(conn, actor.user_id, limit)
}
