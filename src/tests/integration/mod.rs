//! Integration Tests
//!
//! End-to-end flows over real SQLite databases, plus wiremock-backed
//! coverage of the Discord and Gemini HTTP clients.

pub mod progression_integration;
