//! Policy commands

use std::time::Instant;

use insuretrack_core::errors::TrackerError;
use insuretrack_core::model::{Claim, Policy, PolicyInput};
use insuretrack_core::rules::validate_policy_input;
use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_store::errors::Result;
use insuretrack_store::repo::{ClaimRepo, Page, PolicyFilter, PolicyRepo};
use rusqlite::Connection;

use super::context::{elapsed_ms, now, Services};

/// A policy with the claims filed against it, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDetail {
    pub policy: Policy,
    pub claims: Vec<Claim>,
}

/// Paginated policy listing, newest first, narrowed to the actor's scope
///
/// # Errors
/// Persistence errors only.
pub fn list_policies(
    actor: &Actor,
    filter: &PolicyFilter,
    page: u32,
    conn: &Connection,
) -> Result<Page<Policy>> {
    log_op_start!("list_policies", actor_id = actor.user_id, page = page);
    let start = Instant::now();

    let scoped = PolicyFilter {
        owner: actor.scope().owner().or(filter.owner),
        ..filter.clone()
    };
    let result = PolicyRepo::list(conn, &scoped, page).map_err(|e| {
        log_op_error!("list_policies", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("list_policies", duration_ms = elapsed_ms(start), total = result.total);
    Ok(result)
}

/// # Errors
/// `NotFound` for an unknown id, `Forbidden` if the actor may not see it.
pub fn view_policy(
    actor: &Actor,
    policy_id: i64,
    conn: &Connection,
    services: &Services,
) -> Result<PolicyDetail> {
    log_op_start!("view_policy", actor_id = actor.user_id, policy_id = policy_id);
    let start = Instant::now();

    let detail = view_policy_impl(actor, policy_id, conn, services).map_err(|e| {
        log_op_error!("view_policy", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "view_policy",
        duration_ms = elapsed_ms(start),
        claims = detail.claims.len()
    );
    Ok(detail)
}

fn view_policy_impl(
    actor: &Actor,
    policy_id: i64,
    conn: &Connection,
    services: &Services,
) -> Result<PolicyDetail> {
    let policy = load_policy(conn, policy_id)?;
    services.authorize(actor, &Action::ViewPolicy(&policy))?;
    let claims = ClaimRepo::for_policy(conn, policy.id)?;
    Ok(PolicyDetail { policy, claims })
}

/// Add an active policy owned by the actor
///
/// # Errors
/// `InvalidInput` for a bad field, `AlreadyExists` for a taken number.
pub fn add_policy(
    actor: &Actor,
    input: &PolicyInput,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    log_op_start!(
        "add_policy",
        actor_id = actor.user_id,
        policy_number = input.policy_number.as_str()
    );
    let start = Instant::now();

    let policy = add_policy_impl(actor, input, conn, services).map_err(|e| {
        log_op_error!("add_policy", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("add_policy", duration_ms = elapsed_ms(start), policy_id = policy.id);
    Ok(policy)
}

fn add_policy_impl(
    actor: &Actor,
    input: &PolicyInput,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    services.authorize(actor, &Action::CreatePolicy)?;
    validate_policy_input(input)?;
    ensure_number_free(conn, &input.policy_number, None)?;

    let policy = PolicyRepo::insert(conn, actor.user_id, input, now())?;

    services.backup_after_write("add_policy", conn);
    Ok(policy)
}

/// Replace a policy's editable fields; status and owner stay as they are
///
/// # Errors
/// `NotFound`, `Forbidden`, `InvalidInput`, or `AlreadyExists` when the new
/// number belongs to another policy.
pub fn edit_policy(
    actor: &Actor,
    policy_id: i64,
    input: &PolicyInput,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    log_op_start!("edit_policy", actor_id = actor.user_id, policy_id = policy_id);
    let start = Instant::now();

    let policy = edit_policy_impl(actor, policy_id, input, conn, services).map_err(|e| {
        log_op_error!("edit_policy", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("edit_policy", duration_ms = elapsed_ms(start));
    Ok(policy)
}

fn edit_policy_impl(
    actor: &Actor,
    policy_id: i64,
    input: &PolicyInput,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    let existing = load_policy(conn, policy_id)?;
    services.authorize(actor, &Action::EditPolicy(&existing))?;
    validate_policy_input(input)?;
    ensure_number_free(conn, &input.policy_number, Some(existing.id))?;

    PolicyRepo::update(conn, existing.id, input, now())?;
    let updated = load_policy(conn, existing.id)?;

    services.backup_after_write("edit_policy", conn);
    Ok(updated)
}

/// Delete a policy together with its claims; returns what was deleted
///
/// # Errors
/// `NotFound` for an unknown id, `Forbidden` if the actor may not delete it.
pub fn delete_policy(
    actor: &Actor,
    policy_id: i64,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    log_op_start!("delete_policy", actor_id = actor.user_id, policy_id = policy_id);
    let start = Instant::now();

    let policy = delete_policy_impl(actor, policy_id, conn, services).map_err(|e| {
        log_op_error!("delete_policy", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("delete_policy", duration_ms = elapsed_ms(start));
    Ok(policy)
}

fn delete_policy_impl(
    actor: &Actor,
    policy_id: i64,
    conn: &mut Connection,
    services: &Services,
) -> Result<Policy> {
    let policy = load_policy(conn, policy_id)?;
    services.authorize(actor, &Action::DeletePolicy(&policy))?;

    PolicyRepo::delete_cascade(conn, policy.id)?;

    services.backup_after_write("delete_policy", conn);
    Ok(policy)
}

pub(crate) fn load_policy(conn: &Connection, policy_id: i64) -> Result<Policy> {
    PolicyRepo::get(conn, policy_id)?.ok_or_else(|| TrackerError::PolicyNotFound { policy_id }.into())
}

fn ensure_number_free(conn: &Connection, policy_number: &str, excluding: Option<i64>) -> Result<()> {
    if PolicyRepo::number_exists(conn, policy_number, excluding)? {
        return Err(TrackerError::DuplicatePolicyNumber {
            policy_number: policy_number.to_string(),
        }
        .into());
    }
    Ok(())
}
