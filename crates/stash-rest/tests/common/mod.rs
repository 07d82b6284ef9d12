//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use stash_config::{CacheConfig, RedisConfig, ServerConfig};
use stash_core::{HealthIndicator, StashError, StashResult, User, UserId};
use stash_repository::{InMemoryUserRepository, UserRepository};
use stash_rest::{build_router, AppState};
use stash_service::{CacheInterface, CachedUserService, InMemoryCacheService, RedisCacheService};
use std::sync::Arc;
use tower::ServiceExt;

/// Builds a router over the given backends.
pub fn router_with(
    repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheInterface>,
    policy: CacheConfig,
    health_indicators: Vec<Arc<dyn HealthIndicator>>,
) -> Router {
    let service = CachedUserService::new(repository, cache, policy);
    let state = AppState::new(Arc::new(service), health_indicators);
    build_router(state, &ServerConfig::default())
}

/// Router over an empty in-memory store and cache.
pub fn app() -> Router {
    router_with(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryCacheService::new()),
        CacheConfig::default(),
        Vec::new(),
    )
}

/// A Redis cache pointed at a port nothing listens on.
pub fn unreachable_redis() -> RedisCacheService {
    let config = RedisConfig {
        url: "redis://127.0.0.1:1".to_string(),
        pool_size: 1,
        enabled: true,
        timeout_secs: 1,
    };
    RedisCacheService::new(RedisCacheService::create_pool(&config).unwrap())
}

/// Sends a request and returns the status and the JSON body (`Null` when empty).
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}

/// Record store whose every operation fails.
pub struct UnavailableStore;

#[async_trait]
impl UserRepository for UnavailableStore {
    async fn insert(&self, _name: &str, _email: &str) -> StashResult<User> {
        Err(StashError::store("connection refused"))
    }

    async fn select_all(&self) -> StashResult<Vec<User>> {
        Err(StashError::store("connection refused"))
    }

    async fn select_by_id(&self, _id: UserId) -> StashResult<Option<User>> {
        Err(StashError::store("connection refused"))
    }

    async fn update(&self, _id: UserId, _name: &str, _email: &str) -> StashResult<u64> {
        Err(StashError::store("connection refused"))
    }

    async fn delete(&self, _id: UserId) -> StashResult<u64> {
        Err(StashError::store("connection refused"))
    }
}

/// Health indicator with a fixed outcome.
pub struct StaticIndicator {
    pub name: &'static str,
    pub critical: bool,
    pub healthy: bool,
}

#[async_trait]
impl HealthIndicator for StaticIndicator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_critical(&self) -> bool {
        self.critical
    }

    async fn check(&self) -> StashResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(StashError::internal(format!("{} unreachable", self.name)))
        }
    }
}
