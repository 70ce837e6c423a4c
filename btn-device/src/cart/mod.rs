//! Guest cart
//!
//! `cartItems` holds one [`CartLine`] per dish. Every mutation is a single
//! read-modify-write of the whole list. Unknown line ids are ignored, and a
//! line whose quantity drops to zero disappears. Quantities never wrap: an
//! addition past `i32::MAX` is rejected and the cart is left as it was.

mod error;

pub use error::CartError;

use crate::store::{DeviceStore, StoreKey};
use shared::models::{CartLine, Combo, Dish};

pub type CartResult<T> = Result<T, CartError>;

#[derive(Debug, Clone)]
pub struct CartManager {
    store: DeviceStore,
}

impl CartManager {
    pub fn new(store: DeviceStore) -> Self {
        Self { store }
    }

    /// Current lines, in the order they were first added
    pub fn lines(&self) -> CartResult<Vec<CartLine>> {
        Ok(self.store.get_list(StoreKey::CartItems)?)
    }

    /// Add `quantity` of a dish, merging into its existing line
    ///
    /// A merged line keeps its note unless a non-empty one is supplied.
    /// Returns the resulting line.
    pub fn add_or_increment(
        &self,
        dish: &Dish,
        quantity: i32,
        note: Option<String>,
    ) -> CartResult<CartLine> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let note = note.filter(|n| !n.trim().is_empty());

        let line = self.merge(CartLine::from_dish(dish, quantity, note))?;
        tracing::debug!(dish_id = %dish.id, quantity = line.quantity, "Cart line added");
        Ok(line)
    }

    /// Add one combo as a single line; adding it again bumps the quantity
    pub fn add_combo(&self, combo: &Combo) -> CartResult<CartLine> {
        let line = self.merge(CartLine::from_combo(combo, 1))?;
        tracing::debug!(combo_id = %combo.id, quantity = line.quantity, "Combo added to cart");
        Ok(line)
    }

    fn merge(&self, incoming: CartLine) -> CartResult<CartLine> {
        self.store.transaction(|txn| -> CartResult<CartLine> {
            let mut lines: Vec<CartLine> = txn.get_list(StoreKey::CartItems)?;
            let line = match lines.iter().position(|l| l.id == incoming.id) {
                Some(idx) => {
                    let existing = &mut lines[idx];
                    existing.quantity = existing
                        .quantity
                        .checked_add(incoming.quantity)
                        .ok_or_else(|| CartError::QuantityOverflow(incoming.id.clone()))?;
                    if incoming.note.is_some() {
                        existing.note = incoming.note;
                    }
                    existing.clone()
                }
                None => {
                    lines.push(incoming.clone());
                    incoming
                }
            };
            txn.set(StoreKey::CartItems, &lines)?;
            Ok(line)
        })
    }

    pub fn increment(&self, line_id: &str) -> CartResult<()> {
        self.store.transaction(|txn| -> CartResult<()> {
            let mut lines: Vec<CartLine> = txn.get_list(StoreKey::CartItems)?;
            let Some(line) = lines.iter_mut().find(|l| l.id == line_id) else {
                return Ok(());
            };
            line.quantity = line
                .quantity
                .checked_add(1)
                .ok_or_else(|| CartError::QuantityOverflow(line_id.to_string()))?;
            txn.set(StoreKey::CartItems, &lines)?;
            Ok(())
        })
    }

    /// Decrease by one; the line is dropped when it reaches zero
    pub fn decrement(&self, line_id: &str) -> CartResult<()> {
        self.store
            .update_list(StoreKey::CartItems, |lines: &mut Vec<CartLine>| {
                if let Some(line) = lines.iter_mut().find(|l| l.id == line_id) {
                    line.quantity = line.quantity.saturating_sub(1);
                }
                lines.retain(|l| l.quantity > 0);
            })?;
        Ok(())
    }

    pub fn remove(&self, line_id: &str) -> CartResult<()> {
        self.store
            .update_list(StoreKey::CartItems, |lines: &mut Vec<CartLine>| {
                lines.retain(|l| l.id != line_id);
            })?;
        Ok(())
    }

    /// Replace the note of a line; an empty note clears it
    pub fn set_note(&self, line_id: &str, note: Option<String>) -> CartResult<()> {
        let note = note.filter(|n| !n.trim().is_empty());
        self.store
            .update_list(StoreKey::CartItems, |lines: &mut Vec<CartLine>| {
                if let Some(line) = lines.iter_mut().find(|l| l.id == line_id) {
                    line.note = note;
                }
            })?;
        Ok(())
    }

    pub fn clear(&self) -> CartResult<()> {
        self.store.remove(StoreKey::CartItems)?;
        tracing::debug!("Cart cleared");
        Ok(())
    }

    /// Σ price × quantity
    pub fn total(&self) -> CartResult<i64> {
        Ok(self.lines()?.iter().map(CartLine::line_total).sum())
    }

    /// Σ quantity
    pub fn count(&self) -> CartResult<i64> {
        Ok(self.lines()?.iter().map(|l| i64::from(l.quantity)).sum())
    }
}
