pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_PRODUCTS_ENDPOINT: &str = "https://fakestoreapi.com/products";
pub const DEFAULT_CATEGORIES_ENDPOINT: &str =
    "https://8s8yxba6g8.execute-api.ap-south-1.amazonaws.com/api/categories";
pub const DEFAULT_STORE_PATH: &str = "./.storefront";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_COLUMNS: usize = 2;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-storefront")]
#[command(about = "Browse a product catalog and keep a persisted cart")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_PRODUCTS_ENDPOINT, conflicts_with = "config")]
    pub products_endpoint: String,

    #[arg(long, default_value = DEFAULT_CATEGORIES_ENDPOINT, conflicts_with = "config")]
    pub categories_endpoint: String,

    #[arg(long, default_value = DEFAULT_STORE_PATH, conflicts_with = "config")]
    pub store_path: String,

    #[arg(long, default_value = crate::core::cart::DEFAULT_CART_KEY, conflicts_with = "config")]
    pub cart_key: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS, conflicts_with = "config")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Only show products of this category (overrides the config file)")]
    pub category: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Product ids to tap (add or remove)")]
    pub toggle: Vec<u64>,

    #[arg(long, default_value_t = DEFAULT_COLUMNS, conflicts_with = "config")]
    pub columns: usize,

    #[arg(long, help = "Read source, storage and display settings from a TOML file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn products_endpoint(&self) -> &str {
        &self.products_endpoint
    }

    fn categories_endpoint(&self) -> &str {
        &self.categories_endpoint
    }

    fn store_path(&self) -> &str {
        &self.store_path
    }

    fn cart_key(&self) -> &str {
        &self.cart_key
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        validation::validate_range("columns", self.columns, 1, 6)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_url("products_endpoint", config.products_endpoint())?;
    validation::validate_url("categories_endpoint", config.categories_endpoint())?;
    validation::validate_path("store_path", config.store_path())?;
    validation::validate_store_key("cart_key", config.cart_key())?;
    validation::validate_range("timeout_seconds", config.timeout_seconds(), 1, 300)
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["small-storefront"]);

        assert_eq!(config.products_endpoint, DEFAULT_PRODUCTS_ENDPOINT);
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.columns, 2);
        assert!(config.toggle.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_toggle_list() {
        let config = CliConfig::parse_from([
            "small-storefront",
            "--toggle",
            "1,4,1",
            "--category",
            "fruits",
        ]);

        assert_eq!(config.toggle, vec![1, 4, 1]);
        assert_eq!(config.category.as_deref(), Some("fruits"));
    }

    #[test]
    fn test_cli_validation_rejects_bad_values() {
        let config = CliConfig::parse_from(["small-storefront", "--products-endpoint", "not-a-url"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["small-storefront", "--cart-key", "a/b"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["small-storefront", "--columns", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_excludes_settings_flags() {
        for flag in [
            "--products-endpoint",
            "--categories-endpoint",
            "--store-path",
            "--cart-key",
            "--timeout-seconds",
            "--columns",
        ] {
            let value = if flag == "--timeout-seconds" || flag == "--columns" {
                "3"
            } else {
                "https://example.com/x"
            };
            let result =
                CliConfig::try_parse_from(["small-storefront", "--config", "shop.toml", flag, value]);
            assert!(result.is_err(), "{} should conflict with --config", flag);
        }
    }

    #[test]
    fn test_config_file_accepts_session_flags() {
        let config = CliConfig::try_parse_from([
            "small-storefront",
            "--config",
            "shop.toml",
            "--category",
            "Fruits",
            "--toggle",
            "2",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(config.config.as_deref(), Some("shop.toml"));
        assert_eq!(config.toggle, vec![2]);
    }
}
