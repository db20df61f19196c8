use crate::core::{CatalogSource, Category, ConfigProvider, Product};
use crate::utils::error::{Result, StorefrontError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fetches the product and category lists from their JSON endpoints.
pub struct HttpCatalog {
    client: Client,
    products_endpoint: String,
    categories_endpoint: String,
}

impl HttpCatalog {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()
            .map_err(|e| StorefrontError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            products_endpoint: config.products_endpoint().to_string(),
            categories_endpoint: config.categories_endpoint().to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        tracing::debug!("Making API request to: {}", endpoint);
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|source| StorefrontError::Fetch {
                endpoint: endpoint.to_string(),
                source,
            })?;

        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(StorefrontError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|source| StorefrontError::Fetch {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let products: Vec<Product> = self.get_json(&self.products_endpoint).await?;
        let fetched = products.len();

        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                if !p.has_valid_price() {
                    tracing::warn!("Dropping product {} with invalid price {}", p.id, p.price);
                }
                p.has_valid_price()
            })
            .collect();

        tracing::debug!("Fetched {} products ({} kept)", fetched, products.len());
        Ok(products)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let categories: Vec<Category> = self.get_json(&self.categories_endpoint).await?;
        tracing::debug!("Fetched {} categories", categories.len());
        Ok(categories)
    }
}
