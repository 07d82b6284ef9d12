//! # Stash Server Library
//!
//! Dependency injection wiring, logging setup and the application
//! lifecycle of the Stash user service.

pub mod app;
pub mod di;
pub mod startup;
