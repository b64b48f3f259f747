use crate::domain::cart::{CartLineItem, ItemRef};
use crate::domain::ports::CartStore;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory cart.
///
/// Uses `Arc<RwLock<Vec<CartLineItem>>>` so test code can hold a handle onto
/// the same cart the orchestrator mutates. Clones share the underlying
/// collection, standing in for the externally owned cart of the real app.
#[derive(Default, Clone)]
pub struct InMemoryCartStore {
    items: Arc<RwLock<Vec<CartLineItem>>>,
}

impl InMemoryCartStore {
    /// Creates a new, empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart pre-seeded with the given items.
    pub fn with_items(items: Vec<CartLineItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub async fn add_item(&self, item: CartLineItem) {
        let mut items = self.items.write().await;
        items.push(item);
    }

    pub async fn items(&self) -> Vec<CartLineItem> {
        let items = self.items.read().await;
        items.clone()
    }

    pub async fn len(&self) -> usize {
        let items = self.items.read().await;
        items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn snapshot(&self) -> Result<Vec<CartLineItem>> {
        let items = self.items.read().await;
        Ok(items.clone())
    }

    async fn remove_item(&self, item_ref: &ItemRef) -> Result<()> {
        let mut items = self.items.write().await;
        items.retain(|item| item.item_ref() != *item_ref);
        Ok(())
    }
}
