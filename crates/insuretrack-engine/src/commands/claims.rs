//! Claim commands: listing, viewing, submission with documents, and review

use std::path::PathBuf;
use std::time::Instant;

use insuretrack_core::errors::{ExError, ExErrorKind, TrackerError};
use insuretrack_core::model::{Claim, ClaimInput, ClaimUpdate, NewNotification, PolicyStatus};
use insuretrack_core::rules::{validate_claim_input, validate_claim_update};
use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_store::errors::{from_rusqlite, Result};
use insuretrack_store::repo::{ClaimFilter, ClaimRepo, NotificationRepo, Page};
use rusqlite::Connection;

use super::context::{elapsed_ms, now, Services};
use super::policies::load_policy;

/// A file attached to a claim submission
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A claim with its decoded document list
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDetail {
    pub claim: Claim,
    pub documents: Vec<String>,
}

/// Paginated claim listing, newest first, narrowed to the actor's scope
///
/// # Errors
/// Persistence errors only.
pub fn list_claims(
    actor: &Actor,
    filter: &ClaimFilter,
    page: u32,
    conn: &Connection,
) -> Result<Page<Claim>> {
    log_op_start!("list_claims", actor_id = actor.user_id, page = page);
    let start = Instant::now();

    let scoped = ClaimFilter {
        owner: actor.scope().owner().or(filter.owner),
        ..filter.clone()
    };
    let result = ClaimRepo::list(conn, &scoped, page).map_err(|e| {
        log_op_error!("list_claims", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("list_claims", duration_ms = elapsed_ms(start), total = result.total);
    Ok(result)
}

/// # Errors
/// `NotFound` for an unknown id, `Forbidden` if the actor may not see it.
pub fn view_claim(
    actor: &Actor,
    claim_id: i64,
    conn: &Connection,
    services: &Services,
) -> Result<ClaimDetail> {
    log_op_start!("view_claim", actor_id = actor.user_id, claim_id = claim_id);
    let start = Instant::now();

    let detail = load_claim(conn, claim_id)
        .and_then(|claim| {
            services.authorize(actor, &Action::ViewClaim(&claim))?;
            let documents = claim.document_list();
            Ok(ClaimDetail { claim, documents })
        })
        .map_err(|e| {
            log_op_error!("view_claim", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!("view_claim", duration_ms = elapsed_ms(start));
    Ok(detail)
}

/// File a pending claim against one of the actor's active policies
///
/// Uploads with an empty filename are skipped. The claim and its
/// "New Claim Submitted" notification are written in one transaction.
///
/// # Errors
/// - `InvalidInput` for a bad field, an inactive policy or a rejected upload
/// - `NotFound` for an unknown policy
/// - `Forbidden` when the actor does not own the policy
/// - `AlreadyExists` for a taken claim number
pub fn submit_claim(
    actor: &Actor,
    input: &ClaimInput,
    uploads: &[Upload],
    conn: &mut Connection,
    services: &Services,
) -> Result<Claim> {
    log_op_start!(
        "submit_claim",
        actor_id = actor.user_id,
        policy_id = input.policy_id,
        uploads = uploads.len()
    );
    let start = Instant::now();

    let claim = submit_claim_impl(actor, input, uploads, conn, services).map_err(|e| {
        log_op_error!("submit_claim", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("submit_claim", duration_ms = elapsed_ms(start), claim_id = claim.id);
    Ok(claim)
}

fn submit_claim_impl(
    actor: &Actor,
    input: &ClaimInput,
    uploads: &[Upload],
    conn: &mut Connection,
    services: &Services,
) -> Result<Claim> {
    let now = now();
    let today = now.date();

    validate_claim_input(input, today)?;

    let policy = load_policy(conn, input.policy_id)?;
    services.authorize(actor, &Action::SubmitClaim(&policy))?;
    if policy.user_id != actor.user_id {
        return Err(TrackerError::ClaimPolicyOwnerMismatch {
            policy_id: policy.id,
            user_id: actor.user_id,
        }
        .into());
    }
    if policy.status != PolicyStatus::Active {
        return Err(TrackerError::PolicyNotActive {
            policy_id: policy.id,
        }
        .into());
    }
    if ClaimRepo::number_exists(conn, &input.claim_number)? {
        return Err(TrackerError::DuplicateClaimNumber {
            claim_number: input.claim_number.clone(),
        }
        .into());
    }

    let mut stored = Vec::new();
    for upload in uploads.iter().filter(|u| !u.filename.is_empty()) {
        stored.push(services.documents.save(&upload.filename, &upload.bytes, now)?);
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let claim = ClaimRepo::insert(
        &tx,
        actor.user_id,
        input,
        Claim::encode_documents(&stored),
        today,
        now,
    )?;
    NotificationRepo::insert(&tx, &NewNotification::claim_submitted(&claim), now)?;
    tx.commit().map_err(from_rusqlite)?;

    services.backup_after_write("submit_claim", conn);
    Ok(claim)
}

/// Set a claim's status and remarks
///
/// The owner is notified only when the status actually changes. Empty
/// remarks clear the field.
///
/// # Errors
/// `NotFound`, `Forbidden` for plain users, `InvalidInput` for blank remarks.
pub fn update_claim_status(
    actor: &Actor,
    claim_id: i64,
    update: &ClaimUpdate,
    conn: &mut Connection,
    services: &Services,
) -> Result<Claim> {
    log_op_start!(
        "update_claim_status",
        actor_id = actor.user_id,
        claim_id = claim_id,
        status = update.status.as_str()
    );
    let start = Instant::now();

    let claim = update_claim_status_impl(actor, claim_id, update, conn, services).map_err(|e| {
        log_op_error!("update_claim_status", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("update_claim_status", duration_ms = elapsed_ms(start));
    Ok(claim)
}

fn update_claim_status_impl(
    actor: &Actor,
    claim_id: i64,
    update: &ClaimUpdate,
    conn: &mut Connection,
    services: &Services,
) -> Result<Claim> {
    let existing = load_claim(conn, claim_id)?;
    services.authorize(actor, &Action::UpdateClaimStatus(&existing))?;
    validate_claim_update(update)?;

    let now = now();
    let remarks = update.remarks.as_deref().filter(|r| !r.is_empty());

    let tx = conn.transaction().map_err(from_rusqlite)?;
    ClaimRepo::update_status(&tx, existing.id, update.status, remarks, now)?;
    if existing.status != update.status {
        NotificationRepo::insert(
            &tx,
            &NewNotification::claim_status_changed(&existing, update.status),
            now,
        )?;
    }
    tx.commit().map_err(from_rusqlite)?;

    let updated = load_claim(conn, existing.id)?;
    services.backup_after_write("update_claim_status", conn);
    Ok(updated)
}

/// Path of a document attached to a claim the actor may view
///
/// # Errors
/// `NotFound` when the claim does not list the file or the file is gone,
/// `Forbidden` when the actor may not view the claim.
pub fn document_path(
    actor: &Actor,
    claim_id: i64,
    filename: &str,
    conn: &Connection,
    services: &Services,
) -> Result<PathBuf> {
    let claim = load_claim(conn, claim_id)?;
    services.authorize(actor, &Action::ViewClaim(&claim))?;

    if !claim.document_list().iter().any(|name| name == filename) {
        return Err(ExError::new(ExErrorKind::NotFound)
            .with_op("document_path")
            .with_entity_id(filename)
            .with_message(format!(
                "claim {} has no document '{}'",
                claim.claim_number, filename
            )));
    }
    services.documents.path_for(filename)
}

fn load_claim(conn: &Connection, claim_id: i64) -> Result<Claim> {
    ClaimRepo::get(conn, claim_id)?.ok_or_else(|| TrackerError::ClaimNotFound { claim_id }.into())
}
