use chrono::NaiveDateTime;
use insuretrack_core::model::{Policy, PolicyInput, PolicyStatus, PolicyType};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{count, exists, fetch_page, query_all, text_enum, Page, WhereClause};
use crate::errors::{from_rusqlite, Result};

const POLICY_COLUMNS: &str = "id, policy_number, policy_type, provider_name, provider_contact, \
     premium_amount, coverage_amount, issue_date, expiry_date, status, description, \
     created_at, updated_at, user_id";

/// Policy-list filters
#[derive(Debug, Clone, Default)]
pub struct PolicyFilter {
    /// Restrict to one owner's policies
    pub owner: Option<i64>,
    /// Substring of policy number or provider name
    pub search: Option<String>,
    pub policy_type: Option<PolicyType>,
    pub status: Option<PolicyStatus>,
}

pub struct PolicyRepo;

fn policy_from_row(row: &Row<'_>) -> rusqlite::Result<Policy> {
    Ok(Policy {
        id: row.get(0)?,
        policy_number: row.get(1)?,
        policy_type: text_enum(row, 2)?,
        provider_name: row.get(3)?,
        provider_contact: row.get(4)?,
        premium_amount: row.get(5)?,
        coverage_amount: row.get(6)?,
        issue_date: row.get(7)?,
        expiry_date: row.get(8)?,
        status: text_enum(row, 9)?,
        description: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
        user_id: row.get(13)?,
    })
}

impl PolicyRepo {
    /// New policies start active
    ///
    /// # Errors
    /// `ConstraintViolation` for a taken policy number or unknown owner.
    pub fn insert(
        conn: &Connection,
        user_id: i64,
        input: &PolicyInput,
        now: NaiveDateTime,
    ) -> Result<Policy> {
        conn.execute(
            "INSERT INTO policies (policy_number, policy_type, provider_name, provider_contact,
                premium_amount, coverage_amount, issue_date, expiry_date, status, description,
                created_at, updated_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11, ?12)",
            params![
                input.policy_number,
                input.policy_type.as_str(),
                input.provider_name,
                input.provider_contact,
                input.premium_amount,
                input.coverage_amount,
                input.issue_date,
                input.expiry_date,
                PolicyStatus::Active.as_str(),
                input.description,
                now,
                user_id,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(Policy {
            id: conn.last_insert_rowid(),
            policy_number: input.policy_number.clone(),
            policy_type: input.policy_type,
            provider_name: input.provider_name.clone(),
            provider_contact: input.provider_contact.clone(),
            premium_amount: input.premium_amount,
            coverage_amount: input.coverage_amount,
            issue_date: input.issue_date,
            expiry_date: input.expiry_date,
            status: PolicyStatus::Active,
            description: input.description.clone(),
            created_at: Some(now),
            updated_at: Some(now),
            user_id,
        })
    }

    /// Insert a policy keeping its id
    ///
    /// # Errors
    /// `ConstraintViolation` on a duplicate id or number, or a missing owner.
    pub fn insert_with_id(conn: &Connection, policy: &Policy) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO policies ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                POLICY_COLUMNS
            ),
            params![
                policy.id,
                policy.policy_number,
                policy.policy_type.as_str(),
                policy.provider_name,
                policy.provider_contact,
                policy.premium_amount,
                policy.coverage_amount,
                policy.issue_date,
                policy.expiry_date,
                policy.status.as_str(),
                policy.description,
                policy.created_at,
                policy.updated_at,
                policy.user_id,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    /// Persistence errors only; a missing row is `Ok(None)`.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Policy>> {
        conn.query_row(
            &format!("SELECT {} FROM policies WHERE id = ?1", POLICY_COLUMNS),
            [id],
            policy_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Whether another policy already uses `policy_number`
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn number_exists(
        conn: &Connection,
        policy_number: &str,
        excluding: Option<i64>,
    ) -> Result<bool> {
        exists(
            conn,
            "SELECT 1 FROM policies WHERE policy_number = ?1 AND (?2 IS NULL OR id != ?2)",
            params![policy_number, excluding],
        )
    }

    /// Replace the editable fields; status and owner are untouched
    ///
    /// # Errors
    /// `ConstraintViolation` for a taken policy number.
    pub fn update(
        conn: &Connection,
        id: i64,
        input: &PolicyInput,
        now: NaiveDateTime,
    ) -> Result<()> {
        conn.execute(
            "UPDATE policies SET policy_number = ?1, policy_type = ?2, provider_name = ?3,
                provider_contact = ?4, premium_amount = ?5, coverage_amount = ?6,
                issue_date = ?7, expiry_date = ?8, description = ?9, updated_at = ?10
             WHERE id = ?11",
            params![
                input.policy_number,
                input.policy_type.as_str(),
                input.provider_name,
                input.provider_contact,
                input.premium_amount,
                input.coverage_amount,
                input.issue_date,
                input.expiry_date,
                input.description,
                now,
                id,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Delete a policy's claims, then the policy. Returns whether it existed.
    ///
    /// # Errors
    /// Persistence errors; nothing is deleted on failure.
    pub fn delete_cascade(conn: &mut Connection, id: i64) -> Result<bool> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        let claims = tx
            .execute("DELETE FROM claims WHERE policy_id = ?1", [id])
            .map_err(from_rusqlite)?;
        let removed = tx
            .execute("DELETE FROM policies WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(policy_id = id, claims, "Deleted policy with claims");
        Ok(removed > 0)
    }

    /// Every policy, by id
    ///
    /// # Errors
    /// Persistence errors, or a row holding an unknown enum value.
    pub fn all(conn: &Connection) -> Result<Vec<Policy>> {
        query_all(
            conn,
            &format!("SELECT {} FROM policies ORDER BY id", POLICY_COLUMNS),
            [],
            policy_from_row,
        )
    }

    /// Newest first
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn list(conn: &Connection, filter: &PolicyFilter, page: u32) -> Result<Page<Policy>> {
        let mut clause = WhereClause::default();
        if let Some(owner) = filter.owner {
            clause.push("user_id = ?", [Value::Integer(owner)]);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            clause.push_search(&["policy_number", "provider_name"], search);
        }
        if let Some(policy_type) = filter.policy_type {
            clause.push(
                "policy_type = ?",
                [Value::Text(policy_type.as_str().to_string())],
            );
        }
        if let Some(status) = filter.status {
            clause.push("status = ?", [Value::Text(status.as_str().to_string())]);
        }
        fetch_page(
            conn,
            "policies",
            POLICY_COLUMNS,
            &clause,
            "created_at DESC, id DESC",
            page,
            policy_from_row,
        )
    }

    /// All policies of one owner, or of everyone when `owner` is `None`
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn for_owner(conn: &Connection, owner: Option<i64>) -> Result<Vec<Policy>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM policies WHERE ?1 IS NULL OR user_id = ?1 ORDER BY id",
                POLICY_COLUMNS
            ),
            [owner],
            policy_from_row,
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn recent(conn: &Connection, limit: u32) -> Result<Vec<Policy>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM policies ORDER BY created_at DESC, id DESC LIMIT ?1",
                POLICY_COLUMNS
            ),
            [limit],
            policy_from_row,
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn count(
        conn: &Connection,
        owner: Option<i64>,
        status: Option<PolicyStatus>,
    ) -> Result<u64> {
        count(
            conn,
            "SELECT COUNT(*) FROM policies
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)",
            params![owner, status.map(|s| s.as_str())],
        )
    }
}
