//! Read-side core of a job-application tracker: filter compilation, faceting
//! and statistics over an abstract application store.
//!
//! The pipeline per request: [`filtering::normalize`] turns raw query pairs
//! into a typed [`filtering::FilterSpec`], [`filtering::compile`] lowers it
//! to an immutable predicate tree, and a [`store::ApplicationStore`]
//! interprets that tree. [`store::MemoryStore`] evaluates it in process;
//! [`store::condition`] lowers it to Sea-ORM conditions for SQL backends.

pub mod errors;
pub mod facets;
pub mod filtering;
pub mod models;
pub mod routes;
pub mod stats;
pub mod store;

pub use errors::{ApiError, StoreError, ValidationError};
pub use routes::{AppState, CurrentUser, router};
pub use store::{ApplicationStore, memory::MemoryStore};
