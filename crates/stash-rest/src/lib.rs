//! # Stash REST
//!
//! HTTP surface of the Stash user service: the `/users` resource plus
//! health and OpenAPI endpoints.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
