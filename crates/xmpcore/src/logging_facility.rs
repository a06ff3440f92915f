//! Structured logging facility for xmpcore
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Logging is separate from the diagnostic text channel used by the tree and
//! namespace dumps, which always write through a caller-supplied closure.
//!
//! # Usage
//!
//! ```rust
//! use xmpcore::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
