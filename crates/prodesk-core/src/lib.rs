//! Core types, the store abstraction and both site workflows.
//!
//! No HTTP or database dependencies live here. The
//! Submission Flow ([`submission`]) and the Review Flow ([`review`]) are
//! written against [`store::Backend`]; the concrete backends and the delivery
//! surfaces (web site, terminal dashboard) live in other crates.

pub mod display;
pub mod error;
pub mod record;
pub mod review;
pub mod store;
pub mod submission;
pub mod validate;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
