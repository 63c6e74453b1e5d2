//! InsureTrack engine
//!
//! Role-checked commands over the store. Each command receives the acting
//! user and a [`commands::Services`] bundle, asks the access policy before it
//! reads a single record or writes anything, and logs its own start and end.

pub mod commands;

pub use commands::Services;
