//! One-time codes for e-mail verification
//!
//! Codes live in an [`OtpStore`] owned by [`super::Services`]; the store is
//! created at start-up and dropped at shutdown. Only a SHA-256 digest of each
//! code is stored.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{
    config::OtpConfig,
    error::{AppError, AppResult},
};

/// Key/value storage with per-key expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Remove and return true if `key` holds `value`; false when absent,
    /// expired or different (the stored value is kept in that case)
    async fn take_if_matches(&self, key: &str, value: &str) -> AppResult<bool>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-process store, for single-instance deployments and tests
#[derive(Default)]
pub struct MemoryOtpStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::Internal("OTP store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, (_, expires)| *expires > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn take_if_matches(&self, key: &str, value: &str) -> AppResult<bool> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        // Some(matched) when the entry must go: expired, or consumed
        let evict = match entries.get(key) {
            Some((_, expires)) if *expires <= now => Some(false),
            Some((stored, _)) if stored == value => Some(true),
            _ => None,
        };
        match evict {
            Some(matched) => {
                entries.remove(key);
                Ok(matched)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .is_some_and(|(_, expires)| *expires > Instant::now()))
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Issues and checks e-mail verification codes
#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    ttl: Duration,
}

impl OtpService {
    pub fn new(store: Arc<dyn OtpStore>, config: &OtpConfig) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(config.ttl_seconds),
        }
    }

    pub fn ttl_minutes(&self) -> u64 {
        self.ttl.as_secs().div_ceil(60)
    }

    fn key(email: &str) -> String {
        format!("otp:verify:{}", email.trim().to_lowercase())
    }

    fn digest(code: &str) -> String {
        hex::encode(Sha256::digest(code.trim().as_bytes()))
    }

    /// Random 6-digit code, zero padded
    pub fn generate_code() -> String {
        format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
    }

    /// Create a fresh code for `email`, replacing any pending one
    pub async fn issue(&self, email: &str) -> AppResult<String> {
        let code = Self::generate_code();
        self.store
            .put(&Self::key(email), &Self::digest(&code), self.ttl)
            .await?;
        tracing::debug!("Issued verification code for {}", email);
        Ok(code)
    }

    /// Check and consume the code for `email`
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<bool> {
        self.store
            .take_if_matches(&Self::key(email), &Self::digest(code))
            .await
    }

    pub async fn has_pending(&self, email: &str) -> AppResult<bool> {
        self.store.exists(&Self::key(email)).await
    }

    pub async fn revoke(&self, email: &str) -> AppResult<()> {
        self.store.remove(&Self::key(email)).await
    }
}
