use crate::domain::model::{Category, Product};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable string key/value storage for the cart snapshot.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
}

pub trait ConfigProvider: Send + Sync {
    fn products_endpoint(&self) -> &str;
    fn categories_endpoint(&self) -> &str;
    fn store_path(&self) -> &str;
    fn cart_key(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
