//! The cart: item snapshots waiting for checkout.

use crate::{
    entities::item,
    errors::{Error, Result},
};

/// Number of entries a cart holds unless configured otherwise.
pub const DEFAULT_CART_CAPACITY: usize = 30;

/// An ordered, bounded list of item snapshots.
///
/// Entries are copies of the item as it was when scanned, so later changes to
/// the stored item never reach them.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    entries: Vec<item::Model>,
    capacity: usize,
}

impl Cart {
    /// An empty cart holding at most `capacity` entries.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends a snapshot, failing with [`Error::CapacityExceeded`] when full.
    pub fn push(&mut self, snapshot: item::Model) -> Result<()> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.entries.push(snapshot);
        Ok(())
    }

    /// Removes and returns every entry in insertion order.
    pub fn take_all(&mut self) -> Vec<item::Model> {
        std::mem::take(&mut self.entries)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[item::Model] {
        &self.entries
    }

    /// Number of entries waiting for checkout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been added since the last checkout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether another [`Cart::push`] would fail with
    /// [`crate::errors::Error::CapacityExceeded`].
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Most entries the cart may hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of the snapshot costs.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.cost).sum()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CART_CAPACITY)
    }
}
