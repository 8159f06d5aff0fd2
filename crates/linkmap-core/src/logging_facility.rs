//! `tracing` setup and operation logging for the linkmap crates
//!
//! Binaries call `init` with a `Profile` before doing any work. Library code
//! only emits events: the `log_op_*` macros around engine operations, plain
//! `tracing` calls with the shared field constants everywhere else. Tests
//! record events with `init_test_capture` instead of calling `init`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
