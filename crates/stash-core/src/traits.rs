//! Core traits shared across layers.

use crate::StashResult;
use async_trait::async_trait;
use shaku::Interface;

/// A backend whose reachability can be probed.
///
/// Implemented by the database pool and the cache backend so readiness
/// checks don't need to know about either concrete client.
#[async_trait]
pub trait HealthIndicator: Interface + Send + Sync {
    /// Short name used in readiness reports.
    fn name(&self) -> &'static str;

    /// Whether a failure of this backend makes the service unready.
    fn is_critical(&self) -> bool;

    /// Performs a round trip to the backend.
    async fn check(&self) -> StashResult<()>;
}
