use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::auth::password::SecretString;

/// Errors that stop the process before it starts serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub password_hash: PasswordHashConfig,
    pub admin: AdminBootstrapConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: SecretString,
    pub jwt_expiry_hours: u64,
    pub allow_registration: bool,
    /// Refuses account deletion (admin and self-service) with 403.
    pub demo: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Declarative admin identity reconciled at startup.
///
/// Fields are opaque strings; only emptiness is checked by the reconciler.
#[derive(Debug, Clone, Default)]
pub struct AdminBootstrapConfig {
    pub enabled: bool,
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl AdminBootstrapConfig {
    pub const ENABLE_VAR: &'static str = "ADMIN_CREATE";
    pub const NAME_VAR: &'static str = "ADMIN_NAME";
    pub const EMAIL_VAR: &'static str = "ADMIN_EMAIL";
    pub const PASSWORD_VAR: &'static str = "ADMIN_PASSWORD";

    /// Reads the `ADMIN_*` variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            enabled: lookup(Self::ENABLE_VAR)
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            name: lookup(Self::NAME_VAR).unwrap_or_default(),
            email: lookup(Self::EMAIL_VAR).unwrap_or_default(),
            password: SecretString::new(lookup(Self::PASSWORD_VAR).unwrap_or_default()),
        }
    }

    /// Names of the env vars whose values are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(Self::NAME_VAR);
        }
        if self.email.trim().is_empty() {
            missing.push(Self::EMAIL_VAR);
        }
        if self.password.expose_secret().is_empty() {
            missing.push(Self::PASSWORD_VAR);
        }
        missing
    }
}

/// Accepted token lifetimes: one hour up to a year.
pub const JWT_EXPIRY_HOURS: std::ops::RangeInclusive<u64> = 1..=8760;

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Only a case-insensitive "true" enables a flag.
fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        config.with_overrides(lookup)?.validated()
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Applies overrides from `lookup`. A present but unparseable value is an
    /// error, never a silent fallback to the profile default.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT").or_else(|| lookup("INVENTORY_API_PORT"));
        if let Some(port) = port {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port,
            })?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
                self.database.backend = StoreBackend::Postgres;
            }
        }
        if let Some(v) = lookup("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "STORE_BACKEND",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            self.database.max_connections = v;
        }
        if let Some(v) = parse_var(&lookup, "DATABASE_CONNECTION_TIMEOUT")? {
            self.database.connection_timeout = v;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = SecretString::new(v);
            }
        }
        if let Some(hours) = parse_var::<u64>(&lookup, "SECURITY_JWT_EXPIRY_HOURS")? {
            if !JWT_EXPIRY_HOURS.contains(&hours) {
                return Err(ConfigError::Invalid {
                    name: "SECURITY_JWT_EXPIRY_HOURS",
                    value: hours.to_string(),
                });
            }
            self.security.jwt_expiry_hours = hours;
        }
        if let Some(v) = parse_var(&lookup, "SECURITY_ALLOW_REGISTRATION")? {
            self.security.allow_registration = v;
        }
        if let Some(v) = parse_var(&lookup, "DEMO_MODE")? {
            self.security.demo = v;
        }

        // Password hash overrides
        if let Some(v) = parse_var(&lookup, "PASSWORD_HASH_MEMORY_KIB")? {
            self.password_hash.memory_kib = v;
        }
        if let Some(v) = parse_var(&lookup, "PASSWORD_HASH_ITERATIONS")? {
            self.password_hash.iterations = v;
        }
        if let Some(v) = parse_var(&lookup, "PASSWORD_HASH_PARALLELISM")? {
            self.password_hash.parallelism = v;
        }

        self.admin = AdminBootstrapConfig::from_lookup(lookup);

        Ok(self)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        if self.security.jwt_secret.expose_secret().is_empty() {
            if !self.is_development() {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
            // Tokens do not survive a restart in development.
            tracing::warn!("JWT_SECRET not set, using an ephemeral secret (development only)");
            self.security.jwt_secret = SecretString::new(crate::auth::password::random_secret(48));
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: SecretString::default(),
                jwt_expiry_hours: 24 * 7, // 1 week
                allow_registration: true,
                demo: false,
            },
            password_hash: PasswordHashConfig::default(),
            admin: AdminBootstrapConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: SecretString::default(),
                jwt_expiry_hours: 24,
                allow_registration: true,
                demo: false,
            },
            password_hash: PasswordHashConfig::default(),
            admin: AdminBootstrapConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: SecretString::default(),
                jwt_expiry_hours: 4,
                allow_registration: false,
                demo: false,
            },
            password_hash: PasswordHashConfig {
                memory_kib: 65536, // 64 MiB
                iterations: 3,
                parallelism: 4,
            },
            admin: AdminBootstrapConfig::default(),
        }
    }
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // argon2 default
            iterations: 2,
            parallelism: 1,
        }
    }
}
