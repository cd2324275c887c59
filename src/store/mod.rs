//! Record store - persistence of members, items and transactions.
//!
//! The session only ever talks to a [`RecordStore`]; the production
//! implementation is [`SqliteStore`], backed by `SeaORM`, while [`MemoryStore`]
//! keeps everything in process. A store is shared as a [`SharedStore`], a
//! single mutex that every session operation goes through.

pub mod memory;
pub mod sqlite;

use crate::{
    config::BootstrapAdmin,
    entities::{NewTransaction, item, member, transaction},
    errors::Result,
};
use std::{future::Future, sync::Arc};
use tokio::sync::Mutex;
use tracing::{info, instrument};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A store behind one coarse lock.
pub type SharedStore<S> = Arc<Mutex<S>>;

/// Wraps `store` so it can be handed to sessions.
pub fn shared<S: RecordStore>(store: S) -> SharedStore<S> {
    Arc::new(Mutex::new(store))
}

/// Point lookups and mutations over the three ledger tables.
///
/// Methods returning `bool` report whether a row was affected. A miss is never
/// an error; `Err` always means the store itself failed.
pub trait RecordStore: Send + Sync {
    /// Looks a member up by identity key.
    fn find_member(&self, id: i64) -> impl Future<Output = Result<Option<member::Model>>> + Send;

    /// Inserts a new member. The key must not already exist.
    fn insert_member(&mut self, member: member::Model) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a member, leaving their transactions in place.
    fn delete_member(&mut self, id: i64) -> impl Future<Output = Result<bool>> + Send;

    /// Sets a member's admin flag.
    fn set_member_admin(&mut self, id: i64, admin: bool)
    -> impl Future<Output = Result<bool>> + Send;

    /// Looks an item up by barcode.
    fn find_item(&self, barcode: &str) -> impl Future<Output = Result<Option<item::Model>>> + Send;

    /// Inserts a new item. The barcode must not already exist.
    fn insert_item(&mut self, item: item::Model) -> impl Future<Output = Result<()>> + Send;

    /// Deletes an item.
    fn delete_item(&mut self, barcode: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Replaces an item's unit cost.
    fn update_item_cost(
        &mut self,
        barcode: &str,
        cost: f64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Replaces an item's stock count.
    fn update_item_stock(
        &mut self,
        barcode: &str,
        stock: i64,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Appends a transaction and returns it with its assigned identifier.
    fn insert_transaction(
        &mut self,
        new: NewTransaction,
    ) -> impl Future<Output = Result<transaction::Model>> + Send;

    /// Records one sold unit: appends the transaction and sets the item's
    /// stock to `new_stock` as a single unit of work.
    ///
    /// Either both writes land or neither does. Fails if the item named by
    /// the sale no longer exists.
    fn record_sale(
        &mut self,
        sale: NewTransaction,
        new_stock: i64,
    ) -> impl Future<Output = Result<transaction::Model>> + Send;

    /// All transactions charged to a member, oldest first.
    fn transactions_for_member(
        &self,
        member_id: i64,
    ) -> impl Future<Output = Result<Vec<transaction::Model>>> + Send;
}

/// Inserts the configured first admin unless a member with that key already
/// exists. Returns whether a member was inserted.
#[instrument(skip(store))]
pub async fn seed_bootstrap_admin<S: RecordStore>(
    store: &mut S,
    admin: &BootstrapAdmin,
) -> Result<bool> {
    if store.find_member(admin.id).await?.is_some() {
        return Ok(false);
    }
    store
        .insert_member(member::Model {
            id: admin.id,
            name: admin.name.trim().to_string(),
            admin: true,
        })
        .await?;
    info!("Bootstrap admin {} ({}) created", admin.id, admin.name);
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn pedro() -> BootstrapAdmin {
        BootstrapAdmin {
            id: 8_618_374,
            name: "Pedro Alves".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_bootstrap_admin_on_empty_store() -> Result<()> {
        let mut store = MemoryStore::new();

        assert!(seed_bootstrap_admin(&mut store, &pedro()).await?);
        let admin = store.find_member(8_618_374).await?.unwrap();
        assert!(admin.admin);
        assert_eq!(admin.name, "Pedro Alves");

        // Second start finds the admin already there
        assert!(!seed_bootstrap_admin(&mut store, &pedro()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_leaves_existing_member_alone() -> Result<()> {
        let mut store = MemoryStore::new().with_member(8_618_374, "Demoted", false);

        assert!(!seed_bootstrap_admin(&mut store, &pedro()).await?);
        let member = store.find_member(8_618_374).await?.unwrap();
        assert!(!member.admin);
        assert_eq!(member.name, "Demoted");
        Ok(())
    }
}
