//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs.

mod enrich;

pub use enrich::run_enrich;
