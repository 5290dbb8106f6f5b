use async_trait::async_trait;

use crate::error::ServiceError;
use crate::services::cart::Cart;

/// Where cart arrays live. Values are the raw JSON text the browser wrote.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError>;

    async fn write(&self, key: &str, cart_json: &str) -> Result<(), ServiceError>;
}

/// One cart per owner, e.g. `cart:session-3f2a...` or `cart:tab-17`.
pub fn owner_cart_key(cart_key: &str, owner: &str) -> String {
    format!("{cart_key}:{owner}")
}

/// Reads the whole cart array stored under `key`.
pub async fn load_cart(store: &dyn CartStore, key: &str) -> Result<Cart, ServiceError> {
    let raw = store.read(key).await?;

    Ok(Cart::from_json(raw.as_deref())?)
}

/// Overwrites the whole cart array stored under `key`.
pub async fn store_cart(store: &dyn CartStore, key: &str, cart: &Cart) -> Result<(), ServiceError> {
    store.write(key, &cart.to_json()?).await
}

/// Resets the key to `[]` without reading what was there.
pub async fn reset_cart(store: &dyn CartStore, key: &str) -> Result<(), ServiceError> {
    store.write(key, &Cart::default().to_json()?).await
}

#[cfg(test)]
pub use memory::MemoryCartStore;
