//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **identity**: GoTrue-compatible identity provider over reqwest
//! - **ai**: remote AI endpoints over reqwest
//! - **file_session_cache**: on-disk session cache for the terminal client
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod ai;
pub mod file_session_cache;
pub mod identity;
pub mod persistence;
