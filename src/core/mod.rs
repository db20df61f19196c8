pub mod cart;
pub mod storefront;
pub mod writer;

pub use crate::domain::model::{Category, Product, ProductId};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, KeyValueStore};
pub use crate::utils::error::Result;
