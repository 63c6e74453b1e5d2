use chrono::NaiveDateTime;
use insuretrack_core::model::{NewUser, Role, User};
use insuretrack_core_types::Sensitive;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{count, exists, fetch_page, query_all, text_enum, Page, WhereClause};
use crate::errors::{from_rusqlite, Result};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, full_name, role, created_at, is_active";

/// Admin user-list filters
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring of username, email or full name
    pub search: Option<String>,
    pub role: Option<Role>,
}

pub struct UserRepo;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: Sensitive::new(row.get(3)?),
        full_name: row.get(4)?,
        role: text_enum(row, 5)?,
        created_at: row.get(6)?,
        is_active: row.get(7)?,
    })
}

impl UserRepo {
    /// # Errors
    /// `ConstraintViolation` if the username or email is taken.
    pub fn insert(conn: &Connection, user: &NewUser, created_at: NaiveDateTime) -> Result<User> {
        conn.execute(
            "INSERT INTO users (username, email, password_hash, full_name, role, created_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
            params![
                user.username,
                user.email,
                user.password_hash.expose(),
                user.full_name,
                user.role.as_str(),
                created_at,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            created_at: Some(created_at),
            is_active: true,
        })
    }

    /// Insert a user keeping its id
    ///
    /// # Errors
    /// `ConstraintViolation` on a duplicate id, username or email.
    pub fn insert_with_id(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            &format!("INSERT INTO users ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)", USER_COLUMNS),
            params![
                user.id,
                user.username,
                user.email,
                user.password_hash.expose(),
                user.full_name,
                user.role.as_str(),
                user.created_at,
                user.is_active,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    /// Persistence errors only; a missing row is `Ok(None)`.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            [id],
            user_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// # Errors
    /// Persistence errors only.
    pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
        conn.query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
            [username],
            user_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// # Errors
    /// Persistence errors only.
    pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
        exists(conn, "SELECT 1 FROM users WHERE username = ?1", [username])
    }

    /// # Errors
    /// Persistence errors only.
    pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
        exists(conn, "SELECT 1 FROM users WHERE email = ?1", [email])
    }

    /// # Errors
    /// Persistence errors only.
    pub fn admin_exists(conn: &Connection) -> Result<bool> {
        exists(conn, "SELECT 1 FROM users WHERE role = 'admin'", [])
    }

    /// Every user, by id
    ///
    /// # Errors
    /// Persistence errors, or a row holding an unknown role.
    pub fn all(conn: &Connection) -> Result<Vec<User>> {
        query_all(
            conn,
            &format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS),
            [],
            user_from_row,
        )
    }

    /// Newest accounts first
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn list(conn: &Connection, filter: &UserFilter, page: u32) -> Result<Page<User>> {
        let mut clause = WhereClause::default();
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            clause.push_search(&["username", "email", "full_name"], search);
        }
        if let Some(role) = filter.role {
            clause.push("role = ?", [Value::Text(role.as_str().to_string())]);
        }
        fetch_page(
            conn,
            "users",
            USER_COLUMNS,
            &clause,
            "created_at DESC, id DESC",
            page,
            user_from_row,
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<User>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM users ORDER BY created_at DESC, id DESC LIMIT ?1",
                USER_COLUMNS
            ),
            [limit],
            user_from_row,
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn set_active(conn: &Connection, id: i64, is_active: bool) -> Result<()> {
        conn.execute(
            "UPDATE users SET is_active = ?1 WHERE id = ?2",
            params![is_active, id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    /// Persistence errors only.
    pub fn count(conn: &Connection) -> Result<u64> {
        count(conn, "SELECT COUNT(*) FROM users", [])
    }

    /// Delete a user and everything hanging off it, children first:
    /// notifications, claims (its own and any against its policies),
    /// policies, then the user. Returns whether the user existed.
    ///
    /// # Errors
    /// Persistence errors; nothing is deleted on failure.
    pub fn delete_cascade(conn: &mut Connection, id: i64) -> Result<bool> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        tx.execute("DELETE FROM notifications WHERE user_id = ?1", [id])
            .map_err(from_rusqlite)?;
        tx.execute(
            "DELETE FROM claims
             WHERE user_id = ?1 OR policy_id IN (SELECT id FROM policies WHERE user_id = ?1)",
            [id],
        )
        .map_err(from_rusqlite)?;
        tx.execute("DELETE FROM policies WHERE user_id = ?1", [id])
            .map_err(from_rusqlite)?;
        let removed = tx
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;

        tx.commit().map_err(from_rusqlite)?;
        tracing::debug!(user_id = id, removed, "Deleted user with dependents");
        Ok(removed > 0)
    }
}
