//! Shared primitives for the InsureTrack crates
//!
//! - **Correlation**: `RequestId`, `TraceId`, `RequestContext` for tying log
//!   lines of one command together
//! - **Sensitive data**: `Sensitive<T>` keeps passwords and hashes out of logs
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use sensitive::Sensitive;
