// Public fallible APIs in this crate share one concrete error contract (`FuzzError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod acl;
pub mod engine;
pub mod error;
pub mod identity;
pub mod index;
pub mod models;
pub mod pages;

pub use acl::{AccessLevel, Acl};
pub use engine::FuzzyEngine;
pub use error::{FuzzError, Result};
pub use identity::{AccessPolicy, Identity, IdentityProvider};
pub use index::IndexCache;
pub use models::{CacheMeta, PageRecord, SearchHit};
pub use pages::PageStore;
