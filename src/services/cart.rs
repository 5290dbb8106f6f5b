use serde::{Deserialize, Deserializer, Serialize};

use crate::services::db_models::Dish;

/// Browser carts carry numeric dish ids, ours carry text. Both read as text.
fn line_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(deserialize_with = "line_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_dish(dish: &Dish, files_base_url: &str) -> Self {
        Self {
            id: dish.id.to_string(),
            name: dish.name.clone(),
            price: dish.price,
            weight: dish.weight.clone(),
            image: dish.image_link(files_base_url),
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// The working set of selected dishes. Stored as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<CartLine>);

impl Cart {
    /// A missing or `null` entry reads as an empty cart.
    pub fn from_json(raw: Option<&str>) -> Result<Self, serde_json::Error> {
        match raw {
            None => Ok(Cart::default()),
            Some(raw) => Ok(serde_json::from_str::<Option<Cart>>(raw)?.unwrap_or_default()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(CartLine::subtotal).sum()
    }

    /// Adds `count` units of the line, merging with an existing line of the same id.
    /// Returns the resulting quantity.
    pub fn add(&mut self, line: CartLine, count: u32) -> u32 {
        if let Some(existing) = self.0.iter_mut().find(|l| l.id == line.id) {
            existing.quantity += count;
            return existing.quantity;
        }

        self.0.push(CartLine { quantity: count, ..line });
        count
    }

    pub fn increase(&mut self, id: &str) -> Option<u32> {
        let line = self.0.iter_mut().find(|l| l.id == id)?;
        line.quantity += 1;
        Some(line.quantity)
    }

    /// Never drops a line: at quantity 1 this leaves the cart untouched.
    pub fn decrease(&mut self, id: &str) -> Option<u32> {
        let line = self.0.iter_mut().find(|l| l.id == id)?;
        if line.quantity > 1 {
            line.quantity -= 1;
        }
        Some(line.quantity)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|l| l.id != id);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub count: usize,
    pub total: f64,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total = cart.total();
        let items = cart.0;
        Self { count: items.len(), items, total }
    }
}
