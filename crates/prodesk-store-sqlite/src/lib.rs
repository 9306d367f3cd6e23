//! SQLite backend for the Prodesk site.
//!
//! Holds the `applicants` and `contacts` tables plus a blob table standing in
//! for object storage, so the site can run without the hosted service. Wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SqliteStore, StoredBlob};
