//! Database configuration via `stacks.toml`
//!
//! On first open, a default `stacks.toml` is created in the data directory.
//! To change settings, edit the file and restart.

use super::transactions::RetryConfig;
use serde::{Deserialize, Serialize};
use stacks_core::{StacksError, StacksResult};
use stacks_durability::wal::DurabilityMode;
use std::path::{Component, Path};

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "stacks.toml";

/// Database configuration loaded from `stacks.toml`.
///
/// # Example
///
/// ```toml
/// durability = "standard"
/// audit_dir = "audit"
///
/// [retry]
/// max_retries = 64
/// base_delay_ms = 1
/// max_delay_ms = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StacksConfig {
    /// Durability mode: `"standard"` or `"always"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Directory of the audit CSV files, relative to the data directory.
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,
    /// Conflict retry policy for ledger operations.
    #[serde(default = "RetryConfig::high_contention")]
    pub retry: RetryConfig,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

fn default_audit_dir() -> String {
    "audit".to_string()
}

impl Default for StacksConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
            audit_dir: default_audit_dir(),
            retry: RetryConfig::high_contention(),
        }
    }
}

impl StacksConfig {
    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> StacksResult<DurabilityMode> {
        match self.durability.as_str() {
            "standard" => Ok(DurabilityMode::default()),
            "always" => Ok(DurabilityMode::Always),
            other => Err(StacksError::invalid_input(format!(
                "Invalid durability mode '{}' in stacks.toml. Expected \"standard\" or \"always\".",
                other
            ))),
        }
    }

    /// Check every field, not just the ones parsed lazily.
    pub fn validate(&self) -> StacksResult<()> {
        self.durability_mode()?;
        let audit = Path::new(&self.audit_dir);
        let escapes = audit
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if self.audit_dir.trim().is_empty() || escapes {
            return Err(StacksError::invalid_input(format!(
                "Invalid audit_dir '{}' in stacks.toml. Expected a relative path inside the data directory.",
                self.audit_dir
            )));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(StacksError::invalid_input(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.base_delay_ms, self.retry.max_delay_ms
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Stacks circulation ledger configuration
#
# Durability mode: "standard" (default) or "always"
#   "standard" = periodic fsync (~100ms), may lose last interval on crash
#   "always"   = fsync every commit, zero data loss
durability = "standard"

# Directory of the audit CSV files (registrations, issues, returns),
# relative to the data directory.
audit_dir = "audit"

# Retry policy for commit conflicts between concurrent ledger operations.
[retry]
max_retries = 64
base_delay_ms = 1
max_delay_ms = 50
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> StacksResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StacksError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: StacksConfig = toml::from_str(&content).map_err(|e| {
            StacksError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> StacksResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                StacksError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> StacksResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StacksError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            StacksError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
