//! # Stash Service
//!
//! The cache-aside controller for user records, plus the cache backends
//! it talks to.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::{CachedUserService, CachedUserServiceParameters};
pub use user_service::*;
