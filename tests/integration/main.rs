//! Host-side integration tests.
//!
//! Run on x86_64 with mock adapters; no hardware involved.

mod control_loop_tests;
mod mock_hw;
