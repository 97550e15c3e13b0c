//! # Scribe Shared
//!
//! Wire types shared between the HTTP surface and the core.
//! In a full-stack Rust setup, this crate is compiled for both server and WASM.

pub mod dto;
pub mod field;
pub mod response;

pub use field::Field;
pub use response::{Data, ErrorBody, ListResponse, Message, Pagination};
