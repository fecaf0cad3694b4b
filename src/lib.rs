// Library target exists for the criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the parts of the
// module tree they need (`mathdr::stats::*`, `mathdr::store::*`, ...). The
// TUI layer (app, event, ui) is only compiled into the binary.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod config;
pub mod engine;
pub mod session;
pub mod stats;
pub mod store;
