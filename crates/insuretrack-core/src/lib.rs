//! InsureTrack core
//!
//! Domain records for users, policies, claims and notifications, the
//! validation rules they must satisfy, role-based access decisions, and the
//! shared error, configuration and logging facilities used by every other
//! crate in the workspace. Nothing here touches the database.

pub mod access;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

pub use access::{AccessPolicy, Action, Actor, RoleAccessPolicy, Scope};
pub use config::AppConfig;
pub use errors::{ExError, ExErrorKind, Result, TrackerError};
pub use model::{
    Claim, ClaimInput, ClaimStatus, ClaimUpdate, NewNotification, NewUser, Notification,
    NotificationType, Policy, PolicyInput, PolicyStatus, PolicyType, Registration, Role, User,
};
