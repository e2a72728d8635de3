use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::rngs::OsRng;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::PasswordHashConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("invalid password hash parameters")]
    InvalidParams,

    #[error("password hashing failed")]
    HashFailed,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Sensitive string that never shows up in `Debug` or `Display` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl<'de> serde::Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

/// One-way password hashing. Implementations must be cheap to share across tasks.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &SecretString) -> Result<String, HashError>;

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, HashError>;
}

/// Argon2id hasher with configurable cost.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::from_config(&PasswordHashConfig::default())
    }
}

impl Argon2Hasher {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    pub fn from_config(config: &PasswordHashConfig) -> Self {
        Self::new(config.memory_kib, config.iterations, config.parallelism)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &SecretString) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| HashError::InvalidParams)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| HashError::HashFailed)
    }

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|_| HashError::MalformedHash)?;

        // Verification uses params from the hash, not from config
        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }
}

/// Run `hash` on the blocking pool; argon2 is too slow for an async worker.
pub async fn hash_blocking(
    hasher: &Arc<dyn PasswordHasher>,
    password: &SecretString,
) -> Result<String, HashError> {
    let hasher = Arc::clone(hasher);
    let password = password.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|_| HashError::HashFailed)?
}

pub async fn verify_blocking(
    hasher: &Arc<dyn PasswordHasher>,
    password: &SecretString,
    hash: &str,
) -> Result<bool, HashError> {
    let hasher = Arc::clone(hasher);
    let password = password.clone();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|_| HashError::HashFailed)?
}

/// Random alphanumeric string, used for ephemeral development secrets.
pub fn random_secret(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}
