use crate::core::writer::{PersistStatus, SnapshotWriter};
use crate::domain::model::{Product, ProductId};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use std::sync::Arc;

pub const DEFAULT_CART_KEY: &str = "cart";

/// A product's membership record in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub product: Arc<Product>,
}

impl CartEntry {
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Set of entries keyed by product id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from stored products, keeping the first of any duplicate ids.
    /// Entries with a negative or non-finite price are dropped.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut cart = Self::new();
        for product in products {
            if !product.has_valid_price() {
                tracing::warn!(
                    "Dropping stored cart entry {} with invalid price {}",
                    product.id,
                    product.price
                );
                continue;
            }
            if !cart.add(Arc::new(product)) {
                tracing::debug!("Dropping duplicate cart entry from storage");
            }
        }
        cart
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn add(&mut self, product: Arc<Product>) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.entries.push(CartEntry { product });
        true
    }

    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        self.entries.len() != before
    }

    /// Returns the membership after the flip.
    pub fn toggle(&mut self, product: Arc<Product>) -> bool {
        if self.remove(product.id) {
            false
        } else {
            self.add(product)
        }
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.product.price).sum()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        let products: Vec<&Product> = self.entries.iter().map(|e| e.product.as_ref()).collect();
        Ok(serde_json::to_string(&products)?)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(payload)?;
        Ok(Self::from_products(products))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Uninitialized,
    Loaded,
    Mutated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored cart was restored with this many entries.
    Restored(usize),
    /// Nothing was stored under the cart key.
    Empty,
    /// The stored cart was unreadable or corrupt; an empty cart was used.
    Recovered,
    /// The cart was already changed in memory; the stored payload was not read.
    Kept(usize),
}

/// Owns the in-memory cart and keeps the store eventually consistent with it.
pub struct CartManager<S: KeyValueStore> {
    store: Arc<S>,
    key: String,
    cart: Cart,
    state: CartState,
    version: u64,
    writer: SnapshotWriter,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Must be called from within a tokio runtime; the snapshot writer is spawned here.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let writer = SnapshotWriter::spawn(store.clone(), key.clone());
        Self {
            store,
            key,
            cart: Cart::new(),
            state: CartState::Uninitialized,
            version: 0,
            writer,
        }
    }

    /// Hydrates the cart from the store. A cart already mutated in memory is
    /// authoritative and is kept; its snapshot is already queued for the store.
    pub async fn load(&mut self) -> LoadOutcome {
        if self.state == CartState::Mutated {
            tracing::info!(
                "Cart under '{}' changed before load, keeping {} in-memory entries",
                self.key,
                self.cart.len()
            );
            return LoadOutcome::Kept(self.cart.len());
        }

        let outcome = match self.store.get(&self.key).await {
            Ok(None) => {
                self.cart = Cart::new();
                LoadOutcome::Empty
            }
            Ok(Some(payload)) => match Cart::from_json(&payload) {
                Ok(cart) => {
                    let restored = cart.len();
                    self.cart = cart;
                    LoadOutcome::Restored(restored)
                }
                Err(e) => {
                    tracing::warn!("Stored cart under '{}' is corrupt, starting empty: {}", self.key, e);
                    self.cart = Cart::new();
                    LoadOutcome::Recovered
                }
            },
            Err(e) => {
                tracing::warn!("Error loading cart from storage, starting empty: {}", e);
                self.cart = Cart::new();
                LoadOutcome::Recovered
            }
        };

        self.state = CartState::Loaded;
        tracing::debug!("Cart load finished: {:?}", outcome);
        outcome
    }

    /// Adds if absent, removes if present; returns the new membership.
    pub fn toggle(&mut self, product: &Arc<Product>) -> bool {
        let in_cart = self.cart.toggle(product.clone());
        self.after_mutation();
        in_cart
    }

    pub fn add(&mut self, product: &Arc<Product>) -> bool {
        let changed = self.cart.add(product.clone());
        if changed {
            self.after_mutation();
        }
        changed
    }

    pub fn remove(&mut self, product: &Product) -> bool {
        let changed = self.cart.remove(product.id);
        if changed {
            self.after_mutation();
        }
        changed
    }

    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    /// Queues a snapshot of the current cart and returns its version.
    pub fn persist(&mut self) -> u64 {
        self.version += 1;
        let version = self.version;

        let submitted = self
            .cart
            .to_json()
            .and_then(|payload| self.writer.submit(version, payload));
        if let Err(e) = submitted {
            tracing::warn!("Error saving cart to storage (snapshot v{}): {}", version, e);
        }

        version
    }

    pub async fn flush(&self) -> Result<PersistStatus> {
        self.writer.flush().await
    }

    pub fn persist_status(&self) -> PersistStatus {
        self.writer.status()
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    pub fn entries(&self) -> &[CartEntry] {
        self.cart.entries()
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn state(&self) -> CartState {
        self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn after_mutation(&mut self) {
        self.state = CartState::Mutated;
        self.persist();
    }
}
