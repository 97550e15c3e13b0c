//! # Scribe Core
//!
//! The domain layer of the Scribe content backend.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod derive;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod ports;
pub mod project;
pub mod service;
pub mod validate;

pub use error::DomainError;
