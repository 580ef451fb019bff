//! The order cart and its price aggregation.
//!
//! A [`Cart`] maps menu-item IDs to line entries. Every mutation is a total
//! function: incrementing an absent item inserts it, decrementing an absent
//! item is a no-op, and a quantity of zero never persists - the entry is
//! removed instead.
//!
//! Snapshot semantics: both `increment` and `decrement` store the item
//! snapshot passed on *that* call (latest-snapshot-wins). Price and
//! availability shown to the customer therefore always reflect the most
//! recent catalog fetch, not the one from when the item first entered the
//! cart.
//!
//! Totals are recomputed from the live mapping on every read; nothing is
//! cached and nothing needs invalidation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, Money};

/// Delivery fee charged on any non-empty cart, in whole currency units.
const DELIVERY_FEE_UNITS: i64 = 30;

/// A menu item snapshot, owned by the cart entry that holds it.
///
/// Cloned out of the catalog at add-to-cart time; never shared by reference
/// with any catalog cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub category: Option<String>,
    pub available: bool,
}

/// One line of the cart: an item snapshot and how many of it.
///
/// Invariant: `quantity >= 1`. An entry whose quantity would reach zero is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.item.price.times(self.quantity)
    }
}

/// In-memory cart, keyed by menu-item ID.
///
/// Insertion order is irrelevant; totals are order-independent. Serialized
/// as a list of entries so it can live in a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: HashMap<MenuItemId, CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `item`, inserting the entry if absent.
    ///
    /// The stored snapshot is replaced with `item` on every call
    /// (latest-snapshot-wins).
    pub fn increment(&mut self, item: MenuItem) {
        let quantity = self.quantity_of(item.id) + 1;
        self.entries.insert(item.id, CartEntry { item, quantity });
    }

    /// Remove one of `item`.
    ///
    /// Absent items are a no-op. If the quantity would drop to zero the
    /// entry is removed entirely; otherwise the surviving entry stores the
    /// latest snapshot.
    pub fn decrement(&mut self, item: MenuItem) {
        let Some(existing) = self.entries.get(&item.id) else {
            return;
        };
        match existing.quantity.saturating_sub(1) {
            0 => {
                self.entries.remove(&item.id);
            }
            quantity => {
                self.entries.insert(item.id, CartEntry { item, quantity });
            }
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct line entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Quantity held for `id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: MenuItemId) -> u32 {
        self.entries.get(&id).map_or(0, |entry| entry.quantity)
    }

    /// Sum of quantities across all entries (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.entries.values().map(|entry| entry.quantity).sum()
    }

    /// Iterate over entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.values()
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|entry| entry.quantity > 0)
                .map(|entry| (entry.item.id, entry))
                .collect(),
        }
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries.into_values().collect()
    }
}

/// Hook for promotion logic.
///
/// The current marketplace runs no promotions; [`NoPromotion`] yields zero.
/// New rules plug in here without touching the aggregation itself.
pub trait DiscountRule: Send + Sync {
    /// Discount to subtract, given the cart subtotal.
    fn discount(&self, subtotal: Money) -> Money;
}

/// The default rule: no discount.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPromotion;

impl DiscountRule for NoPromotion {
    fn discount(&self, _subtotal: Money) -> Money {
        Money::zero()
    }
}

/// Derived price breakdown for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub total: Money,
}

impl Totals {
    /// Compute the breakdown from the live cart.
    ///
    /// `subtotal` is the sum of line totals; the delivery fee applies only
    /// to non-empty subtotals; `total = subtotal + delivery_fee - discount`.
    #[must_use]
    pub fn compute(cart: &Cart, rule: &dyn DiscountRule) -> Self {
        let subtotal: Money = cart.entries().map(CartEntry::line_total).sum();
        let delivery_fee = if subtotal.is_positive() {
            Money::from_major(DELIVERY_FEE_UNITS)
        } else {
            Money::zero()
        };
        let discount = rule.discount(subtotal);
        Self {
            subtotal,
            delivery_fee,
            discount,
            total: subtotal + delivery_fee - discount,
        }
    }
}
