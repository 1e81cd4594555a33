//! Cart and quote state.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FieldError;
use crate::model::Row;

/// Whether the cart is headed for checkout or for a quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CartKind {
    #[default]
    Order,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    #[serde(with = "decimal_bytes")]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Builds an item from a table row.
    ///
    /// `name_field` must hold a string and `price_field` a decimal or
    /// integer amount.
    pub fn from_row(
        row_id: &str,
        row: &Row,
        name_field: &str,
        price_field: &str,
        quantity: u32,
    ) -> Result<Self, FieldError> {
        let name = row.get_string(name_field)?.unwrap_or_default();
        let price = row
            .get_decimal(price_field)?
            .ok_or_else(|| FieldError::missing(price_field))?;
        Ok(Self::new(row_id, name, price, quantity))
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Items staged for checkout or a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub kind: CartKind,
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new(kind: CartKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Adds an item. Adding a product already in the cart raises its
    /// quantity; a zero quantity is ignored.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Sets a product's quantity; zero removes it. Returns `false` if the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// Encodes a decimal as its 16-byte representation so it survives
/// non-self-describing formats such as bincode.
mod decimal_bytes {
    use rust_decimal::Decimal;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&value.serialize(), serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let bytes = <[u8; 16] as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Decimal::deserialize(bytes))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::store::FileBackend;
    use crate::store::Store;
    use crate::store::StoreBackend;

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = Cart::default();
        cart.add(CartItem::new("p-1", "Widget", price(1000), 1));
        cart.add(CartItem::new("p-2", "Gadget", price(250), 4));
        cart.add(CartItem::new("p-1", "Widget", price(1000), 2));
        cart.add(CartItem::new("p-3", "Nothing", price(100), 0));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item("p-1").unwrap().quantity, 3);
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total(), price(4000));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new(CartKind::Quote);
        cart.add(CartItem::new("p-1", "Widget", price(1000), 1));
        assert!(cart.set_quantity("p-1", 5));
        assert_eq!(cart.total(), price(5000));
        assert!(cart.set_quantity("p-1", 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity("p-1", 1));
    }

    #[test]
    fn test_item_from_row() {
        let row = Row::new()
            .set("name", "Widget")
            .set("price", price(1999));
        let item = CartItem::from_row("p-1", &row, "name", "price", 2).unwrap();
        assert_eq!(item.line_total(), price(3998));

        let unpriced = Row::new().set("name", "Widget");
        assert_eq!(
            CartItem::from_row("p-1", &unpriced, "name", "price", 1),
            Err(FieldError::missing("price"))
        );
    }

    #[test]
    fn test_cart_survives_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Rc<dyn StoreBackend> = Rc::new(FileBackend::open(dir.path()).unwrap());

        let mut store: Store<Cart> = Store::open("quote", backend.clone()).unwrap();
        store
            .update(|cart| {
                cart.kind = CartKind::Quote;
                cart.add(CartItem::new("p-1", "Widget", price(1999), 3));
            })
            .unwrap();

        let restored: Store<Cart> = Store::open("quote", backend).unwrap();
        assert_eq!(restored.get().kind, CartKind::Quote);
        assert_eq!(restored.get().total(), price(5997));
    }
}
