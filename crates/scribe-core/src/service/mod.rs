//! Lifecycle services orchestrating validation, derivation, and the store.

mod categories;
mod posts;
mod tags;

pub use categories::CategoryService;
pub use posts::PostService;
pub use tags::TagService;
