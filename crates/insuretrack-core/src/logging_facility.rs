//! Structured logging for the tracker
//!
//! - one initialization point, `init(profile)`
//! - operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   that every engine command wraps itself in
//! - `command_span`, which tags everything one invocation logs with its
//!   correlation ids
//! - an in-memory capture layer so tests can assert on emitted events
//!
//! ```rust
//! use insuretrack_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod span;
pub mod test_capture;

pub use init::{init, Profile};
pub use span::command_span;
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
