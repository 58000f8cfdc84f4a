//! Wardgate - runtime core for the hospital admin dashboard
//!
//! A deduplicating TTL request cache, a permission resolver with a legacy
//! menu fallback, and the menu tree builder used for navigation.

pub mod access;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod menu;
pub mod output;
pub mod session;

pub use access::{Action, PermissionResolver};
pub use cache::{CachePolicy, RequestCache};
pub use error::{ApiError, Error, Result};
pub use menu::{MenuItem, build_tree};
