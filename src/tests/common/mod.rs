//! Common Test Utilities
//!
//! Shared fixtures used across test modules: database construction,
//! engine assembly, and notification capture.


pub use fixtures::*;
