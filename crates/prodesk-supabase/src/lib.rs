//! Hosted backend for Prodesk: a Supabase project's REST (PostgREST) and
//! Storage APIs behind the [`prodesk_core::store::Backend`] trait.

mod client;

pub mod error;

pub use client::{SupabaseConfig, SupabaseStore};
pub use error::{Error, Result};
