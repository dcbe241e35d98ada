//! Redis client used for request rate limiting.
//!
//! Counters live in Redis so that every server instance shares one window
//! per client. Nothing about users or sessions is cached.

use redis::{aio::ConnectionManager, Client, Pipeline, RedisError};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis connected");

        Ok(Self { connection })
    }

    /// Round-trip check for the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    /// Count one request against a fixed window.
    ///
    /// Returns the request count within the current window and whether it is
    /// still within `max_requests`.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count,): (i64,) = window_pipeline(&key, window_seconds)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

/// Open the window (key with TTL) if absent, then count the hit.
///
/// Both commands run in one MULTI/EXEC, so a counter never exists without
/// its expiry.
fn window_pipeline(key: &str, window_seconds: u64) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("EX")
        .arg(window_seconds)
        .arg("NX")
        .ignore()
        .cmd("INCR")
        .arg(key);
    pipe
}

fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Redis error: {}", e))
}
