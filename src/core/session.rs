//! Session business logic - who is at the till, what they are looking at, and
//! what they are about to buy.
//!
//! A [`Session`] owns the current member, the current item and the cart, and
//! reaches the record store through a [`SharedStore`] handle. Every operation
//! takes the store lock once; checkout holds it for the whole settlement pass.

use crate::{
    core::{bill::Bill, cart::Cart},
    entities::{NewTransaction, item, member, transaction},
    errors::{Error, Result},
    store::{RecordStore, SharedStore},
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// State of one person using the canteen.
#[derive(Debug)]
pub struct Session<S> {
    store: SharedStore<S>,
    member: member::Model,
    item: item::Model,
    cart: Cart,
}

impl<S: RecordStore> Session<S> {
    /// A fresh session with nobody logged in and nothing inspected.
    #[must_use]
    pub fn new(store: SharedStore<S>, cart_capacity: usize) -> Self {
        Self {
            store,
            member: member::Model::nobody(),
            item: item::Model::none(),
            cart: Cart::with_capacity(cart_capacity),
        }
    }

    /// The store handle this session works against.
    #[must_use]
    pub const fn store(&self) -> &SharedStore<S> {
        &self.store
    }

    /// The logged-in member, or the "No Member" sentinel.
    #[must_use]
    pub const fn current_member(&self) -> &member::Model {
        &self.member
    }

    /// The last item found by [`Self::inspect_item`], or the "No Item" sentinel.
    #[must_use]
    pub const fn current_item(&self) -> &item::Model {
        &self.item
    }

    /// Items scanned since the last checkout.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether the current member may edit the directories.
    #[must_use]
    pub const fn require_admin(&self) -> bool {
        self.member.admin
    }

    /// Makes the member with identity key `id` the current member.
    ///
    /// Presenting a known key is all it takes; there is no secret. Returns
    /// `false` and leaves the session untouched when no such member exists.
    /// Logging in again as someone else keeps the cart, so whoever checks out
    /// is charged for it.
    ///
    /// # Arguments
    /// * `id` - Member number typed or scanned at the till
    ///
    /// # Errors
    /// [`Error::StoreUnavailable`] if the lookup fails; the session is unchanged.
    #[instrument(skip(self))]
    pub async fn login(&mut self, id: i64) -> Result<bool> {
        let found = self.store.lock().await.find_member(id).await?;
        let Some(member) = found else {
            debug!("Login refused: no member {}", id);
            return Ok(false);
        };
        info!("Member {} ({}) logged in", member.id, member.name);
        self.member = member;
        Ok(true)
    }

    /// Makes the item with `barcode` the current item.
    ///
    /// Returns `false` and keeps the previous current item when the barcode is
    /// unknown. The match is exact; barcodes are not trimmed or case-folded.
    ///
    /// # Arguments
    /// * `barcode` - Barcode as scanned
    #[instrument(skip(self))]
    pub async fn inspect_item(&mut self, barcode: &str) -> Result<bool> {
        let found = self.store.lock().await.find_item(barcode).await?;
        let Some(item) = found else {
            return Ok(false);
        };
        self.item = item;
        Ok(true)
    }

    /// Puts a snapshot of the current item in the cart.
    ///
    /// # Errors
    /// - [`Error::NoItemSelected`] if nothing has been inspected yet
    /// - [`Error::OutOfStock`] if the inspected item showed no stock
    /// - [`Error::CapacityExceeded`] if the cart is full
    pub fn add_current_item_to_cart(&mut self) -> Result<()> {
        if self.item.is_none() {
            return Err(Error::NoItemSelected);
        }
        if !self.item.in_stock() {
            return Err(Error::OutOfStock {
                barcode: self.item.barcode.clone(),
            });
        }
        self.cart.push(self.item.clone())?;
        debug!(
            "Added '{}' to cart ({}/{})",
            self.item.barcode,
            self.cart.len(),
            self.cart.capacity()
        );
        Ok(())
    }

    /// Settles the cart against the current member.
    ///
    /// Entries are settled in the order they were added. Each one re-reads its
    /// item from the store; only an item that still exists with stock left is
    /// charged, using the name and cost captured when it was added. Other
    /// entries are dropped and logged.
    ///
    /// Each charge is written together with its stock decrement through
    /// [`RecordStore::record_sale`], so a member is never charged for a unit
    /// that stayed on the shelf. The store lock is held for the whole pass.
    ///
    /// The cart is empty afterwards whatever happened. If the store fails
    /// partway, the sales recorded before the failure stay recorded and the
    /// failed entry and everything after it are discarded uncharged.
    ///
    /// Returns the transactions actually recorded, in cart order.
    ///
    /// # Errors
    /// - [`Error::NotLoggedIn`] if nobody is logged in; the cart is kept
    /// - [`Error::StoreUnavailable`] if the store fails
    #[instrument(skip(self), fields(member_id = self.member.id, entries = self.cart.len()))]
    pub async fn checkout(&mut self) -> Result<Vec<transaction::Model>> {
        if self.member.is_nobody() {
            return Err(Error::NotLoggedIn);
        }

        let entries = self.cart.take_all();
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut store = self.store.lock().await;
        let mut committed = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(current) = store.find_item(&entry.barcode).await? else {
                warn!("Dropped '{}' at checkout: item no longer exists", entry.barcode);
                continue;
            };
            if !current.in_stock() {
                warn!("Dropped '{}' at checkout: out of stock", entry.barcode);
                continue;
            }

            let sale = NewTransaction::for_item(self.member.id, &entry, Utc::now());
            match store.record_sale(sale, current.stock - 1).await {
                Ok(created) => committed.push(created),
                Err(err) => {
                    warn!(
                        "Checkout for member {} stopped after {} sales: {}",
                        self.member.id,
                        committed.len(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        info!(
            "Checkout for member {} committed {} transactions",
            self.member.id,
            committed.len()
        );
        Ok(committed)
    }

    /// Every transaction charged to `member_id`, oldest first.
    ///
    /// Any member's bill can be read; nothing here checks who is asking.
    ///
    /// # Arguments
    /// * `member_id` - Member whose transactions are wanted
    #[instrument(skip(self))]
    pub async fn bill_for(&self, member_id: i64) -> Result<Vec<transaction::Model>> {
        self.store
            .lock()
            .await
            .transactions_for_member(member_id)
            .await
    }

    /// The current member's bill.
    pub async fn bill(&self) -> Result<Bill> {
        let lines = self.bill_for(self.member.id).await?;
        Ok(Bill::new(self.member.id, lines))
    }
}
