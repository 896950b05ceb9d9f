//! Test utilities shared across the tmbridge workspace
//!
//! This crate provides common testing infrastructure including:
//! - A wiremock-backed Jira stand-in usable from blocking code ([`MockJira`])
//! - Temporary connection profile files ([`ProfileFileGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod mock;
pub mod profile;

// Re-export commonly used items
pub use mock::MockJira;
pub use profile::ProfileFileGuard;
