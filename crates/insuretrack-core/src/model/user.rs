use chrono::NaiveDateTime;
use insuretrack_core_types::Sensitive;

use super::text_enum;

text_enum! {
    /// Account role; decides which records a user may see and change
    Role, "role" {
        Admin => "admin",
        User => "user",
        Agent => "agent",
    }
}

impl Role {
    /// Roles a visitor may pick when registering. Admin accounts are only
    /// created by the bootstrap step.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, Role::User | Role::Agent)
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: Sensitive<String>,
    pub full_name: String,
    pub role: Role,
    pub created_at: Option<NaiveDateTime>,
    pub is_active: bool,
}

/// Registration input, already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Sensitive<String>,
    pub full_name: String,
    pub role: Role,
}

/// Sign-up form as entered; the password is still plain text
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: Sensitive<String>,
    pub password_confirm: Sensitive<String>,
    pub role: Role,
}
