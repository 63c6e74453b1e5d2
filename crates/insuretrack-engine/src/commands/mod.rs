//! Command orchestration layer
//!
//! ## Logging ownership
//!
//! Commands own lifecycle logging: `log_op_start!` at entry, `log_op_end!` on
//! success, `log_op_error!` on failure. Store and core only emit
//! `tracing::debug!` for internal detail.

pub mod accounts;
pub mod backup;
pub mod claims;
pub mod context;
pub mod dashboard;
pub mod notifications;
pub mod policies;

pub use context::Services;
