//! # Scribe Infrastructure
//!
//! Concrete implementations of the store ports defined in `scribe-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//!
//! The in-memory store is always available; it backs the server when no
//! database is configured and serves as the test fake for the core.

pub mod database;

pub use database::{DatabaseConfig, InMemoryStore};

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryStore, PostgresPostStore, PostgresTagStore, connect};
