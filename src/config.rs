use std::time::Duration;

use anyhow::ensure;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Built-in defaults; every other source overrides these.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub postgres: PostgresConfig,
    pub kafka: KafkaConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let builder = Self::defaults()
            .add_source(
                File::with_name(&format!("config/{env}"))
                    .required(false)
                    .format(FileFormat::Toml),
            )
            .add_source(Environment::with_prefix("APP").separator("__"));

        Self::build(builder)
    }

    /// Defaults overlaid with an inline TOML document. Used by tests and tooling
    /// that must not depend on the process environment.
    pub fn from_toml(overrides: &str) -> anyhow::Result<Self> {
        Self::build(Self::defaults().add_source(File::from_str(overrides, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.postgres.table.is_empty()
                && self
                    .postgres
                    .table
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "postgres.table must be a non-empty identifier of [A-Za-z0-9_], got `{}`",
            self.postgres.table
        );
        ensure!(!self.kafka.brokers.trim().is_empty(), "kafka.brokers is required");
        ensure!(!self.kafka.topic.trim().is_empty(), "kafka.topic is required");
        ensure!(
            !self.auth.subject_header.trim().is_empty(),
            "auth.subject_header is required"
        );
        ensure!(
            self.server.max_body_bytes > 0,
            "server.max_body_bytes must be greater than zero"
        );
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the subject already verified by the upstream gateway.
    pub subject_header: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub uri: String,
    #[serde(default = "PostgresConfig::default_pool_size")]
    pub max_connections: u32,
    #[serde(default = "PostgresConfig::default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
    pub table: String,
}

impl PostgresConfig {
    fn default_pool_size() -> u32 {
        10
    }

    fn default_acquire_timeout_ms() -> u64 {
        3000
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    #[serde(default = "KafkaConfig::default_message_timeout_ms")]
    pub message_timeout_ms: u64,
}

impl KafkaConfig {
    fn default_message_timeout_ms() -> u64 {
        5000
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}
