//! In-memory implementation of [`RecordStore`].
//!
//! Nothing is persisted. Used by tests and by anything that embeds the session
//! without a database file.

use super::RecordStore;
use crate::{
    entities::{NewTransaction, item, member, transaction},
    errors::{Error, Result},
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// In-memory record store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    members: BTreeMap<i64, member::Model>,
    items: BTreeMap<String, item::Model>,
    transactions: Vec<transaction::Model>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member, replacing any existing one with the same key.
    #[must_use]
    pub fn with_member(mut self, id: i64, name: &str, admin: bool) -> Self {
        self.members.insert(
            id,
            member::Model {
                id,
                name: name.to_string(),
                admin,
            },
        );
        self
    }

    /// Adds an item, replacing any existing one with the same barcode.
    #[must_use]
    pub fn with_item(mut self, barcode: &str, name: &str, cost: f64, stock: i64) -> Self {
        self.items.insert(
            barcode.to_string(),
            item::Model {
                barcode: barcode.to_string(),
                name: name.to_string(),
                cost,
                stock,
            },
        );
        self
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

fn duplicate_key(table: &str, column: &str) -> Error {
    Error::StoreUnavailable {
        message: format!("UNIQUE constraint failed: {table}.{column}"),
    }
}

fn missing_item(barcode: &str) -> Error {
    Error::StoreUnavailable {
        message: format!("item '{barcode}' disappeared during the sale"),
    }
}

impl RecordStore for MemoryStore {
    #[instrument(skip(self))]
    async fn find_member(&self, id: i64) -> Result<Option<member::Model>> {
        let found = self.members.get(&id).cloned();
        debug!("Member lookup {}: found={}", id, found.is_some());
        Ok(found)
    }

    async fn insert_member(&mut self, member: member::Model) -> Result<()> {
        if self.members.contains_key(&member.id) {
            return Err(duplicate_key("members", "id"));
        }
        self.members.insert(member.id, member);
        Ok(())
    }

    async fn delete_member(&mut self, id: i64) -> Result<bool> {
        Ok(self.members.remove(&id).is_some())
    }

    async fn set_member_admin(&mut self, id: i64, admin: bool) -> Result<bool> {
        Ok(self
            .members
            .get_mut(&id)
            .map(|member| member.admin = admin)
            .is_some())
    }

    #[instrument(skip(self))]
    async fn find_item(&self, barcode: &str) -> Result<Option<item::Model>> {
        let found = self.items.get(barcode).cloned();
        debug!("Item lookup '{}': found={}", barcode, found.is_some());
        Ok(found)
    }

    async fn insert_item(&mut self, item: item::Model) -> Result<()> {
        if self.items.contains_key(&item.barcode) {
            return Err(duplicate_key("items", "barcode"));
        }
        self.items.insert(item.barcode.clone(), item);
        Ok(())
    }

    async fn delete_item(&mut self, barcode: &str) -> Result<bool> {
        Ok(self.items.remove(barcode).is_some())
    }

    async fn update_item_cost(&mut self, barcode: &str, cost: f64) -> Result<bool> {
        Ok(self
            .items
            .get_mut(barcode)
            .map(|item| item.cost = cost)
            .is_some())
    }

    async fn update_item_stock(&mut self, barcode: &str, stock: i64) -> Result<bool> {
        Ok(self
            .items
            .get_mut(barcode)
            .map(|item| item.stock = stock)
            .is_some())
    }

    async fn insert_transaction(&mut self, new: NewTransaction) -> Result<transaction::Model> {
        let id = self.transactions.last().map_or(1, |last| last.id + 1);
        let created = transaction::Model {
            id,
            member_id: new.member_id,
            barcode: new.barcode,
            item_name: new.item_name,
            item_cost: new.item_cost,
            created_at: new.created_at,
        };
        self.transactions.push(created.clone());
        Ok(created)
    }

    async fn record_sale(
        &mut self,
        sale: NewTransaction,
        new_stock: i64,
    ) -> Result<transaction::Model> {
        if !self.items.contains_key(&sale.barcode) {
            return Err(missing_item(&sale.barcode));
        }
        let barcode = sale.barcode.clone();
        let created = self.insert_transaction(sale).await?;
        self.update_item_stock(&barcode, new_stock).await?;
        Ok(created)
    }

    async fn transactions_for_member(&self, member_id: i64) -> Result<Vec<transaction::Model>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.member_id == member_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_duplicate_member_is_rejected() -> Result<()> {
        let mut store = MemoryStore::new().with_member(7, "Ann", false);
        let result = store
            .insert_member(member::Model {
                id: 7,
                name: "Other".to_string(),
                admin: true,
            })
            .await;
        assert!(matches!(result, Err(Error::StoreUnavailable { .. })));
        assert_eq!(store.find_member(7).await?.unwrap().name, "Ann");
        Ok(())
    }

    #[tokio::test]
    async fn test_updates_report_missing_rows() -> Result<()> {
        let mut store = MemoryStore::new().with_item("ABC", "Cola", 2.0, 3);

        assert!(store.update_item_cost("ABC", 2.5).await?);
        assert!(!store.update_item_cost("XYZ", 2.5).await?);
        assert!(!store.set_member_admin(1, true).await?);
        assert!(!store.delete_item("XYZ").await?);

        assert_eq!(store.find_item("ABC").await?.unwrap().cost, 2.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_transactions_keep_insertion_order() -> Result<()> {
        let mut store = MemoryStore::new();
        let item = item::Model {
            barcode: "A".to_string(),
            name: "Chips".to_string(),
            cost: 1.5,
            stock: 1,
        };
        let now = Utc::now();

        let first = store
            .insert_transaction(NewTransaction::for_item(1, &item, now))
            .await?;
        store
            .insert_transaction(NewTransaction::for_item(2, &item, now))
            .await?;
        let third = store
            .insert_transaction(NewTransaction::for_item(1, &item, now))
            .await?;

        let bill = store.transactions_for_member(1).await?;
        assert_eq!(bill, vec![first, third]);
        assert_eq!(store.transaction_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_sale_for_missing_item_writes_nothing() -> Result<()> {
        let mut store = MemoryStore::new().with_item("ABC", "Cola", 2.0, 3);
        let gone = item::Model {
            barcode: "XYZ".to_string(),
            name: "Chips".to_string(),
            cost: 1.5,
            stock: 1,
        };

        let result = store
            .record_sale(NewTransaction::for_item(1, &gone, Utc::now()), 0)
            .await;
        assert!(result.unwrap_err().is_store_failure());
        assert_eq!(store.transaction_count(), 0);

        let cola = store.find_item("ABC").await?.unwrap();
        store
            .record_sale(NewTransaction::for_item(1, &cola, Utc::now()), 2)
            .await?;
        assert_eq!(store.transaction_count(), 1);
        assert_eq!(store.find_item("ABC").await?.unwrap().stock, 2);
        Ok(())
    }
}
