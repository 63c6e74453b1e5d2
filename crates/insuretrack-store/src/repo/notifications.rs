use chrono::NaiveDateTime;
use insuretrack_core::model::{NewNotification, Notification, NotificationType};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{exists, query_all, text_enum};
use crate::errors::{from_rusqlite, Result};

const NOTIFICATION_COLUMNS: &str =
    "id, title, message, notification_type, is_read, created_at, user_id";

pub struct NotificationRepo;

fn notification_from_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        notification_type: text_enum(row, 3)?,
        is_read: row.get(4)?,
        created_at: row.get(5)?,
        user_id: row.get(6)?,
    })
}

impl NotificationRepo {
    /// # Errors
    /// `ConstraintViolation` if the user does not exist.
    pub fn insert(
        conn: &Connection,
        notification: &NewNotification,
        now: NaiveDateTime,
    ) -> Result<Notification> {
        conn.execute(
            "INSERT INTO notifications (title, message, notification_type, is_read, created_at, user_id)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![
                notification.title,
                notification.message,
                notification.notification_type.as_str(),
                now,
                notification.user_id,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(Notification {
            id: conn.last_insert_rowid(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            notification_type: notification.notification_type,
            is_read: false,
            created_at: Some(now),
            user_id: notification.user_id,
        })
    }

    /// Insert a notification keeping its id
    ///
    /// # Errors
    /// `ConstraintViolation` on a duplicate id or a missing user.
    pub fn insert_with_id(conn: &Connection, notification: &Notification) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO notifications ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                NOTIFICATION_COLUMNS
            ),
            params![
                notification.id,
                notification.title,
                notification.message,
                notification.notification_type.as_str(),
                notification.is_read,
                notification.created_at,
                notification.user_id,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    /// Persistence errors only; a missing row is `Ok(None)`.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Notification>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM notifications WHERE id = ?1",
                NOTIFICATION_COLUMNS
            ),
            [id],
            notification_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Whether this exact notification was already sent to the user
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn exists(
        conn: &Connection,
        user_id: i64,
        notification_type: NotificationType,
        message: &str,
    ) -> Result<bool> {
        exists(
            conn,
            "SELECT 1 FROM notifications
             WHERE user_id = ?1 AND notification_type = ?2 AND message = ?3",
            params![user_id, notification_type.as_str(), message],
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn mark_read(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("UPDATE notifications SET is_read = 1 WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Unread notifications of one user, newest first
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn unread_for_user(
        conn: &Connection,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<Notification>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM notifications WHERE user_id = ?1 AND is_read = 0
                 ORDER BY created_at DESC, id DESC LIMIT ?2",
                NOTIFICATION_COLUMNS
            ),
            params![user_id, limit],
            notification_from_row,
        )
    }

    /// All notifications of one user, by id
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn for_user(conn: &Connection, user_id: i64) -> Result<Vec<Notification>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM notifications WHERE user_id = ?1 ORDER BY id",
                NOTIFICATION_COLUMNS
            ),
            [user_id],
            notification_from_row,
        )
    }

    /// Every notification, by id
    ///
    /// # Errors
    /// Persistence errors, or a row holding an unknown type.
    pub fn all(conn: &Connection) -> Result<Vec<Notification>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM notifications ORDER BY id",
                NOTIFICATION_COLUMNS
            ),
            [],
            notification_from_row,
        )
    }
}
