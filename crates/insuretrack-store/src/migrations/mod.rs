//! Schema migrations
//!
//! Each embedded migration runs once inside its own transaction and is
//! recorded in `schema_version` with a SHA-256 of its SQL. Re-running is a
//! no-op; an applied migration whose SQL has since changed is refused.

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
