//! Provider configuration type definitions.

use serde::{Deserialize, Serialize};

/// Compatibility level at which SQL Server gains the native `vector` type.
pub const VECTOR_COMPATIBILITY_LEVEL: u16 = 170;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Target engine flavour (default: sql_server).
    #[serde(default)]
    pub engine: EngineType,

    /// Database compatibility level (default: 160, SQL Server 2022).
    #[serde(default = "default_compatibility_level")]
    pub compatibility_level: u16,

    /// Transient error handling settings consumed by the execution strategy.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            engine: EngineType::default(),
            compatibility_level: default_compatibility_level(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Whether the `vector` store type is available on this engine.
    pub fn supports_vector(&self) -> bool {
        self.engine == EngineType::AzureSql
            || self.compatibility_level >= VECTOR_COMPATIBILITY_LEVEL
    }
}

/// SQL Server engine flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    /// On-premises SQL Server.
    #[default]
    SqlServer,
    /// Azure SQL Database / Managed Instance.
    AzureSql,
    /// Azure Synapse Analytics (dedicated pools).
    AzureSynapse,
}

impl std::fmt::Display for EngineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineType::SqlServer => write!(f, "sql_server"),
            EngineType::AzureSql => write!(f, "azure_sql"),
            EngineType::AzureSynapse => write!(f, "azure_synapse"),
        }
    }
}

/// Settings handed to the connection-layer retry collaborator.
///
/// This crate only classifies errors; the delay and count values are carried
/// here so a single YAML file configures the whole provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Extra provider error numbers to treat as transient.
    #[serde(default)]
    pub additional_error_numbers: Vec<i32>,

    /// Maximum retry attempts (default: 6).
    #[serde(default = "default_max_retry_count")]
    pub max_retry_count: u32,

    /// Upper bound on the delay between attempts in seconds (default: 30).
    #[serde(default = "default_max_retry_delay_secs")]
    pub max_retry_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            additional_error_numbers: Vec::new(),
            max_retry_count: default_max_retry_count(),
            max_retry_delay_secs: default_max_retry_delay_secs(),
        }
    }
}

fn default_compatibility_level() -> u16 {
    160
}

fn default_max_retry_count() -> u32 {
    6
}

fn default_max_retry_delay_secs() -> u64 {
    30
}
