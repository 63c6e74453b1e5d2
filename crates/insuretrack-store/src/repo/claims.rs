use chrono::{NaiveDate, NaiveDateTime};
use insuretrack_core::model::{Claim, ClaimInput, ClaimStatus};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{count, exists, fetch_page, query_all, text_enum, Page, WhereClause};
use crate::errors::{from_rusqlite, Result};

const CLAIM_COLUMNS: &str = "id, claim_number, claim_amount, incident_date, claim_date, status, \
     description, documents, remarks, created_at, updated_at, user_id, policy_id";

/// Claim-list filters
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub owner: Option<i64>,
    /// Substring of claim number or description
    pub search: Option<String>,
    pub status: Option<ClaimStatus>,
}

pub struct ClaimRepo;

fn claim_from_row(row: &Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: row.get(0)?,
        claim_number: row.get(1)?,
        claim_amount: row.get(2)?,
        incident_date: row.get(3)?,
        claim_date: row.get(4)?,
        status: text_enum(row, 5)?,
        description: row.get(6)?,
        documents: row.get(7)?,
        remarks: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        user_id: row.get(11)?,
        policy_id: row.get(12)?,
    })
}

impl ClaimRepo {
    /// New claims start pending
    ///
    /// # Errors
    /// `ConstraintViolation` for a taken claim number or missing user/policy.
    pub fn insert(
        conn: &Connection,
        user_id: i64,
        input: &ClaimInput,
        documents: Option<String>,
        claim_date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Claim> {
        conn.execute(
            "INSERT INTO claims (claim_number, claim_amount, incident_date, claim_date, status,
                description, documents, remarks, created_at, updated_at, user_id, policy_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?8, ?9, ?10)",
            params![
                input.claim_number,
                input.claim_amount,
                input.incident_date,
                claim_date,
                ClaimStatus::Pending.as_str(),
                input.description,
                documents,
                now,
                user_id,
                input.policy_id,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(Claim {
            id: conn.last_insert_rowid(),
            claim_number: input.claim_number.clone(),
            claim_amount: input.claim_amount,
            incident_date: input.incident_date,
            claim_date: Some(claim_date),
            status: ClaimStatus::Pending,
            description: input.description.clone(),
            documents,
            remarks: None,
            created_at: Some(now),
            updated_at: Some(now),
            user_id,
            policy_id: input.policy_id,
        })
    }

    /// Insert a claim keeping its id
    ///
    /// # Errors
    /// `ConstraintViolation` on a duplicate id or number, or a missing parent.
    pub fn insert_with_id(conn: &Connection, claim: &Claim) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO claims ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                CLAIM_COLUMNS
            ),
            params![
                claim.id,
                claim.claim_number,
                claim.claim_amount,
                claim.incident_date,
                claim.claim_date,
                claim.status.as_str(),
                claim.description,
                claim.documents,
                claim.remarks,
                claim.created_at,
                claim.updated_at,
                claim.user_id,
                claim.policy_id,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// # Errors
    /// Persistence errors only; a missing row is `Ok(None)`.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Claim>> {
        conn.query_row(
            &format!("SELECT {} FROM claims WHERE id = ?1", CLAIM_COLUMNS),
            [id],
            claim_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// # Errors
    /// Persistence errors only.
    pub fn number_exists(conn: &Connection, claim_number: &str) -> Result<bool> {
        exists(
            conn,
            "SELECT 1 FROM claims WHERE claim_number = ?1",
            [claim_number],
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn update_status(
        conn: &Connection,
        id: i64,
        status: ClaimStatus,
        remarks: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<()> {
        conn.execute(
            "UPDATE claims SET status = ?1, remarks = ?2, updated_at = ?3 WHERE id = ?4",
            params![status.as_str(), remarks, now, id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Every claim, by id
    ///
    /// # Errors
    /// Persistence errors, or a row holding an unknown status.
    pub fn all(conn: &Connection) -> Result<Vec<Claim>> {
        query_all(
            conn,
            &format!("SELECT {} FROM claims ORDER BY id", CLAIM_COLUMNS),
            [],
            claim_from_row,
        )
    }

    /// Newest first
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn list(conn: &Connection, filter: &ClaimFilter, page: u32) -> Result<Page<Claim>> {
        let mut clause = WhereClause::default();
        if let Some(owner) = filter.owner {
            clause.push("user_id = ?", [Value::Integer(owner)]);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            clause.push_search(&["claim_number", "description"], search);
        }
        if let Some(status) = filter.status {
            clause.push("status = ?", [Value::Text(status.as_str().to_string())]);
        }
        fetch_page(
            conn,
            "claims",
            CLAIM_COLUMNS,
            &clause,
            "created_at DESC, id DESC",
            page,
            claim_from_row,
        )
    }

    /// Claims against one policy, newest first
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn for_policy(conn: &Connection, policy_id: i64) -> Result<Vec<Claim>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM claims WHERE policy_id = ?1 ORDER BY created_at DESC, id DESC",
                CLAIM_COLUMNS
            ),
            [policy_id],
            claim_from_row,
        )
    }

    /// Most recent claims of one owner, or of everyone
    ///
    /// # Errors
    /// Persistence errors only.
    pub fn recent(conn: &Connection, owner: Option<i64>, limit: u32) -> Result<Vec<Claim>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM claims WHERE ?1 IS NULL OR user_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2",
                CLAIM_COLUMNS
            ),
            params![owner, limit],
            claim_from_row,
        )
    }

    /// # Errors
    /// Persistence errors only.
    pub fn count(
        conn: &Connection,
        owner: Option<i64>,
        status: Option<ClaimStatus>,
    ) -> Result<u64> {
        count(
            conn,
            "SELECT COUNT(*) FROM claims
             WHERE (?1 IS NULL OR user_id = ?1) AND (?2 IS NULL OR status = ?2)",
            params![owner, status.map(|s| s.as_str())],
        )
    }
}
