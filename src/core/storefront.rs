use crate::core::cart::{CartManager, LoadOutcome};
use crate::domain::model::{Category, Product, ProductId};
use crate::domain::ports::{CatalogSource, KeyValueStore};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct MountReport {
    pub products: usize,
    pub categories: usize,
    pub cart: LoadOutcome,
    pub fetch_failures: usize,
}

/// The product list screen: catalog, category filter and cart.
pub struct Storefront<C: CatalogSource, S: KeyValueStore> {
    catalog: C,
    cart: CartManager<S>,
    products: Vec<Arc<Product>>,
    categories: Vec<Category>,
    selected_category: Option<String>,
}

impl<C: CatalogSource, S: KeyValueStore> Storefront<C, S> {
    pub fn new(catalog: C, cart: CartManager<S>) -> Self {
        Self {
            catalog,
            cart,
            products: Vec::new(),
            categories: Vec::new(),
            selected_category: None,
        }
    }

    /// Loads the cart and fetches both catalog lists concurrently.
    pub async fn mount(&mut self) -> MountReport {
        let (products, categories, cart) = tokio::join!(
            self.catalog.fetch_products(),
            self.catalog.fetch_categories(),
            self.cart.load(),
        );

        let mut fetch_failures = 0;

        self.products = match products {
            Ok(products) => products.into_iter().map(Arc::new).collect(),
            Err(e) => {
                tracing::error!("Error fetching products: {}", e);
                fetch_failures += 1;
                Vec::new()
            }
        };

        self.categories = match categories {
            Ok(categories) => categories,
            Err(e) => {
                tracing::error!("Error fetching categories: {}", e);
                fetch_failures += 1;
                Vec::new()
            }
        };

        let report = MountReport {
            products: self.products.len(),
            categories: self.categories.len(),
            cart,
            fetch_failures,
        };
        tracing::info!(
            "Storefront mounted: {} products, {} categories, cart {:?}",
            report.products,
            report.categories,
            report.cart
        );
        report
    }

    /// Selects a category by name, or clears the filter with `None`.
    /// Unknown names leave the selection unchanged.
    pub fn select_category(&mut self, name: Option<&str>) -> bool {
        match name {
            None => {
                self.selected_category = None;
                true
            }
            Some(name) => match self
                .categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
            {
                Some(category) => {
                    self.selected_category = Some(category.name.clone());
                    true
                }
                None => {
                    tracing::warn!("Unknown category '{}'", name);
                    false
                }
            },
        }
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn visible_products(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.iter().filter(move |p| match &self.selected_category {
            Some(selected) => p.category.eq_ignore_ascii_case(selected),
            None => true,
        })
    }

    /// Flips the cart membership of a catalog product. `None` if the id is unknown.
    pub fn tap(&mut self, id: ProductId) -> Option<bool> {
        let product = self.products.iter().find(|p| p.id == id)?;
        let in_cart = self.cart.toggle(product);
        tracing::debug!("Tapped product {}: in cart = {}", id, in_cart);
        Some(in_cart)
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn cart(&self) -> &CartManager<S> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartManager<S> {
        &mut self.cart
    }

    pub fn render(&self, columns: usize) -> String {
        let columns = columns.max(1);
        let mut lines = vec!["== Vegetables and fruits ==".to_string(), "Categories:".to_string()];

        if self.categories.is_empty() {
            lines.push("  (none)".to_string());
        }
        for category in &self.categories {
            let marker = match &self.selected_category {
                Some(selected) if *selected == category.name => "*",
                _ => " ",
            };
            lines.push(format!(" {} {}", marker, category.name));
        }

        lines.push("Products:".to_string());
        let visible: Vec<&Arc<Product>> = self.visible_products().collect();
        if visible.is_empty() {
            lines.push("  (none)".to_string());
        }
        for row in visible.chunks(columns) {
            let cards: Vec<String> = row.iter().map(|p| self.render_card(p)).collect();
            lines.push(format!("  {}", cards.join(" | ")));
        }

        lines.push(format!("Total Amount: ${:.2}", self.cart.total()));
        lines.join("\n")
    }

    fn render_card(&self, product: &Product) -> String {
        let button = if self.cart.contains(product.id) {
            "Remove"
        } else {
            "+ Add"
        };
        let rate = product
            .rate
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "[{}] #{} {} ({}) ${:.2} rate {}",
            button, product.id, product.title, product.category, product.price, rate
        )
    }
}
