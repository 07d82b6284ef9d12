//! # Stash Core
//!
//! Core types, traits, and error definitions for the Stash user service.
//! Every other crate in the workspace builds on these abstractions.

pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod user;
pub mod validation;

pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use user::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
