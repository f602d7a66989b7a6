//! Test Suite
//!
//! Organized by layer:
//! - `common`: shared fixtures (databases, engines, notification capture)
//! - `database`: SQLite store coverage
//! - `unit`: engine, metadata, stats, and command dispatch tests
//! - `integration`: end-to-end flows, including mock HTTP servers
//! - `property`: proptest invariant checks
//! - `mocks`: mockall-backed store mock

pub mod common;
pub mod integration;
pub mod mocks;
