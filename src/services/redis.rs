//! Redis-backed OTP store

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use super::otp::OtpStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisOtpStore {
    client: Client,
}

impl RedisOtpStore {
    /// Open a client and check the server answers PING
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let store = Self { client };
        let mut conn = store.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(store)
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store OTP in Redis: {}", e)))
    }

    async fn take_if_matches(&self, key: &str, value: &str) -> AppResult<bool> {
        let mut conn = self.connection().await?;

        let stored: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get OTP from Redis: {}", e)))?;

        match stored {
            Some(stored) if stored == value => {
                let _: () = conn
                    .del(key)
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to delete OTP from Redis: {}", e)))?;
                Ok(true)
            }
            // Wrong code, or not found / expired
            _ => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to check OTP in Redis: {}", e)))
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete OTP from Redis: {}", e)))
    }
}
