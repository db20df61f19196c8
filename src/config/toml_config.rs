use crate::config::{DEFAULT_COLUMNS, DEFAULT_TIMEOUT_SECONDS};
use crate::core::cart::DEFAULT_CART_KEY;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub products_endpoint: String,
    pub categories_endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub cart_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub columns: Option<usize>,
    pub category: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StorefrontError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| StorefrontError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn columns(&self) -> usize {
        self.display
            .as_ref()
            .and_then(|d| d.columns)
            .unwrap_or(DEFAULT_COLUMNS)
    }

    pub fn category(&self) -> Option<&str> {
        self.display.as_ref().and_then(|d| d.category.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn products_endpoint(&self) -> &str {
        &self.source.products_endpoint
    }

    fn categories_endpoint(&self) -> &str {
        &self.source.categories_endpoint
    }

    fn store_path(&self) -> &str {
        &self.storage.path
    }

    fn cart_key(&self) -> &str {
        self.storage.cart_key.as_deref().unwrap_or(DEFAULT_CART_KEY)
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::config::validate_provider(self)?;
        crate::utils::validation::validate_range("display.columns", self.columns(), 1, 6)
    }
}
