pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{http::HttpCatalog, storage::FileStore, storage::MemoryStore};
pub use crate::core::{
    cart::{Cart, CartEntry, CartManager, CartState, LoadOutcome},
    storefront::{MountReport, Storefront},
    writer::PersistStatus,
};
pub use domain::model::{Category, Product, ProductId};
pub use utils::error::{Result, StorefrontError};
