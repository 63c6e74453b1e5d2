use chrono::NaiveDate;

use crate::errors::{Result, TrackerError};
use crate::model::{ClaimInput, ClaimUpdate, PolicyInput, Registration};

const MIN_PASSWORD_LEN: usize = 6;
const MIN_CLAIM_DESCRIPTION_LEN: usize = 10;

/// Validate a sign-up form
///
/// Uniqueness of username and email needs the store and is checked by the
/// engine; everything else is checked here.
///
/// # Errors
/// `TrackerError::InvalidField` naming the first offending field.
pub fn validate_registration(form: &Registration) -> Result<()> {
    check_len("username", &form.username, 4, 20)?;
    check_email(&form.email)?;
    check_len("full_name", &form.full_name, 2, 100)?;
    validate_password(form.password.expose())?;
    if form.password.expose() != form.password_confirm.expose() {
        return Err(TrackerError::invalid_field(
            "password_confirm",
            "passwords must match",
        ));
    }
    if !form.role.is_self_registrable() {
        return Err(TrackerError::invalid_field(
            "role",
            format!("cannot register as {}", form.role),
        ));
    }
    Ok(())
}

/// # Errors
/// `TrackerError::InvalidField` when the password is too short.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TrackerError::invalid_field(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Validate policy fields for both add and edit
///
/// # Errors
/// `TrackerError::InvalidField` naming the first offending field.
pub fn validate_policy_input(input: &PolicyInput) -> Result<()> {
    check_len("policy_number", &input.policy_number, 5, 50)?;
    check_len("provider_name", &input.provider_name, 2, 100)?;
    if let Some(contact) = &input.provider_contact {
        check_len("provider_contact", contact, 0, 100)?;
    }
    check_amount("premium_amount", input.premium_amount)?;
    check_amount("coverage_amount", input.coverage_amount)?;
    if input.expiry_date <= input.issue_date {
        return Err(TrackerError::invalid_field(
            "expiry_date",
            "expiry date must be after issue date",
        ));
    }
    Ok(())
}

/// Validate a claim submission against the submission date
///
/// # Errors
/// `TrackerError::InvalidField` naming the first offending field.
pub fn validate_claim_input(input: &ClaimInput, today: NaiveDate) -> Result<()> {
    check_len("claim_number", &input.claim_number, 5, 50)?;
    check_amount("claim_amount", input.claim_amount)?;
    if input.incident_date > today {
        return Err(TrackerError::invalid_field(
            "incident_date",
            "incident date cannot be in the future",
        ));
    }
    if input.description.trim().chars().count() < MIN_CLAIM_DESCRIPTION_LEN {
        return Err(TrackerError::invalid_field(
            "description",
            format!("must be at least {} characters", MIN_CLAIM_DESCRIPTION_LEN),
        ));
    }
    Ok(())
}

/// # Errors
/// `TrackerError::InvalidField` when remarks are whitespace only.
pub fn validate_claim_update(update: &ClaimUpdate) -> Result<()> {
    if let Some(remarks) = &update.remarks {
        if !remarks.is_empty() && remarks.trim().is_empty() {
            return Err(TrackerError::invalid_field("remarks", "must not be blank"));
        }
    }
    Ok(())
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(TrackerError::invalid_field(
            field,
            format!("must be between {} and {} characters", min, max),
        ));
    }
    Ok(())
}

fn check_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(TrackerError::invalid_field(
            field,
            "must be a non-negative number",
        ));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    let invalid = || TrackerError::invalid_field("email", "invalid email address");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if !well_formed {
        return Err(invalid());
    }
    Ok(())
}
