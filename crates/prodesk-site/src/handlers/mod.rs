pub mod admin;
pub mod api;
pub mod careers;
pub mod files;
