//! Account commands: registration, sign-in, the default admin, and admin
//! user management

use std::time::Instant;

use insuretrack_core::crypto::{hash_password, verify_password};
use insuretrack_core::errors::{ExError, ExErrorKind, TrackerError};
use insuretrack_core::model::{NewUser, Registration, Role, User};
use insuretrack_core::rules::validate_registration;
use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_core_types::Sensitive;
use insuretrack_store::errors::Result;
use insuretrack_store::repo::{Page, UserFilter, UserRepo};
use rusqlite::Connection;

use super::context::{elapsed_ms, now, Services};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_EMAIL: &str = "admin@insurance.com";
const DEFAULT_ADMIN_FULL_NAME: &str = "System Administrator";

/// Create a user or agent account
///
/// # Errors
/// - `InvalidInput` naming the first invalid field (admin role included)
/// - `AlreadyExists` for a taken username or email
pub fn register(form: &Registration, conn: &mut Connection, services: &Services) -> Result<User> {
    log_op_start!("register", username = form.username.as_str());
    let start = Instant::now();

    let user = register_impl(form, conn, services).map_err(|e| {
        log_op_error!("register", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("register", duration_ms = elapsed_ms(start), user_id = user.id);
    Ok(user)
}

fn register_impl(form: &Registration, conn: &mut Connection, services: &Services) -> Result<User> {
    validate_registration(form)?;

    if UserRepo::username_exists(conn, &form.username)? {
        return Err(TrackerError::DuplicateUsername {
            username: form.username.clone(),
        }
        .into());
    }
    if UserRepo::email_exists(conn, &form.email)? {
        return Err(TrackerError::DuplicateEmail {
            email: form.email.clone(),
        }
        .into());
    }

    let new_user = NewUser {
        username: form.username.clone(),
        email: form.email.clone(),
        password_hash: hash_password(&form.password)?,
        full_name: form.full_name.clone(),
        role: form.role,
    };
    let user = UserRepo::insert(conn, &new_user, now())?;

    services.backup_after_write("register", conn);
    Ok(user)
}

/// Check credentials and return the account
///
/// # Errors
/// `Unauthorised` for an unknown user, a wrong password, or a deactivated
/// account.
pub fn authenticate(username: &str, password: &Sensitive<String>, conn: &Connection) -> Result<User> {
    log_op_start!("authenticate", username = username);
    let start = Instant::now();

    let user = authenticate_impl(username, password, conn).map_err(|e| {
        log_op_error!("authenticate", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("authenticate", duration_ms = elapsed_ms(start), user_id = user.id);
    Ok(user)
}

fn authenticate_impl(username: &str, password: &Sensitive<String>, conn: &Connection) -> Result<User> {
    let user = UserRepo::find_by_username(conn, username)?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or(TrackerError::InvalidCredentials)?;

    if !user.is_active {
        return Err(TrackerError::AccountInactive {
            username: user.username,
        }
        .into());
    }
    Ok(user)
}

/// Look up the active account a command should run as
///
/// # Errors
/// `NotFound` for an unknown username, `Unauthorised` for a deactivated one.
pub fn resolve_actor(username: &str, conn: &Connection) -> Result<Actor> {
    let user = UserRepo::find_by_username(conn, username)?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("resolve_actor")
            .with_entity_id(username)
            .with_message(format!("User not found: {}", username))
    })?;

    if !user.is_active {
        return Err(TrackerError::AccountInactive {
            username: user.username,
        }
        .into());
    }
    Ok(Actor::from_user(&user))
}

/// Create `admin` / `admin123` unless some admin account already exists.
/// Returns the new account, or `None` when nothing was created.
///
/// # Errors
/// Persistence errors, or `ConstraintViolation` if a non-admin already holds
/// the `admin` username.
pub fn ensure_default_admin(conn: &mut Connection) -> Result<Option<User>> {
    log_op_start!("ensure_default_admin");
    let start = Instant::now();

    let created = ensure_default_admin_impl(conn).map_err(|e| {
        log_op_error!("ensure_default_admin", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "ensure_default_admin",
        duration_ms = elapsed_ms(start),
        created = created.is_some()
    );
    Ok(created)
}

fn ensure_default_admin_impl(conn: &mut Connection) -> Result<Option<User>> {
    if UserRepo::admin_exists(conn)? {
        return Ok(None);
    }

    let admin = NewUser {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password_hash: hash_password(&Sensitive::new(DEFAULT_ADMIN_PASSWORD.to_string()))?,
        full_name: DEFAULT_ADMIN_FULL_NAME.to_string(),
        role: Role::Admin,
    };
    let user = UserRepo::insert(conn, &admin, now())?;
    tracing::info!(username = DEFAULT_ADMIN_USERNAME, "Default admin user created");
    Ok(Some(user))
}

/// Admin listing of accounts, newest first
///
/// # Errors
/// `Forbidden` for non-admins.
pub fn list_users(
    actor: &Actor,
    filter: &UserFilter,
    page: u32,
    conn: &Connection,
    services: &Services,
) -> Result<Page<User>> {
    log_op_start!("list_users", actor_id = actor.user_id, page = page);
    let start = Instant::now();

    let result = services
        .authorize(actor, &Action::ManageUsers)
        .and_then(|()| UserRepo::list(conn, filter, page))
        .map_err(|e| {
            log_op_error!("list_users", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!("list_users", duration_ms = elapsed_ms(start), total = result.total);
    Ok(result)
}

/// Flip an account between active and deactivated
///
/// # Errors
/// - `Forbidden` for non-admins and for an admin targeting themselves
/// - `NotFound` for an unknown user id
pub fn toggle_user(
    actor: &Actor,
    user_id: i64,
    conn: &mut Connection,
    services: &Services,
) -> Result<User> {
    log_op_start!("toggle_user", actor_id = actor.user_id, user_id = user_id);
    let start = Instant::now();

    let user = toggle_user_impl(actor, user_id, conn, services).map_err(|e| {
        log_op_error!("toggle_user", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "toggle_user",
        duration_ms = elapsed_ms(start),
        is_active = user.is_active
    );
    Ok(user)
}

fn toggle_user_impl(
    actor: &Actor,
    user_id: i64,
    conn: &mut Connection,
    services: &Services,
) -> Result<User> {
    services.authorize(
        actor,
        &Action::ToggleUser {
            target_user_id: user_id,
        },
    )?;

    let mut user = load_user(conn, user_id)?;
    user.is_active = !user.is_active;
    UserRepo::set_active(conn, user.id, user.is_active)?;

    services.backup_after_write("toggle_user", conn);
    Ok(user)
}

fn load_user(conn: &Connection, user_id: i64) -> Result<User> {
    UserRepo::get(conn, user_id)?.ok_or_else(|| TrackerError::UserNotFound { user_id }.into())
}
