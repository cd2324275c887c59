//! Shared test utilities.
//!
//! Helpers for setting up test databases, seeded stores and sessions with
//! sensible defaults.

use crate::{
    core::session::Session,
    entities::{NewTransaction, item, member, transaction},
    errors::{Error, Result},
    store::{MemoryStore, RecordStore, SqliteStore, shared},
};
use sea_orm::ConnectionTrait;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` store with all tables initialized.
pub async fn setup_test_db() -> Result<SqliteStore> {
    SqliteStore::open("sqlite::memory:").await
}

/// An in-memory `SQLite` store seeded like [`seeded_store`].
pub async fn seeded_test_db() -> Result<SqliteStore> {
    let mut store = setup_test_db().await?;
    for (id, name, admin) in [(1, "Admin", true), (42, "Member", false)] {
        store
            .insert_member(member::Model {
                id,
                name: name.to_string(),
                admin,
            })
            .await?;
    }
    Ok(store)
}

/// Item model for seeding stores.
#[must_use]
pub fn shelf_item(barcode: &str, name: &str, cost: f64, stock: i64) -> item::Model {
    item::Model {
        barcode: barcode.to_string(),
        name: name.to_string(),
        cost,
        stock,
    }
}

/// Installs a trigger that aborts every update of the items table, so the
/// stock half of a sale fails inside the database.
pub async fn reject_item_updates(store: &SqliteStore) -> Result<()> {
    store
        .connection()
        .execute_unprepared(
            "CREATE TRIGGER reject_item_updates BEFORE UPDATE ON items \
             BEGIN SELECT RAISE(ABORT, 'items are read-only'); END;",
        )
        .await?;
    Ok(())
}

/// A memory store holding one admin (id 1, "Admin") and one regular member
/// (id 42, "Member").
#[must_use]
pub fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_member(1, "Admin", true)
        .with_member(42, "Member", false)
}

/// A session over [`seeded_store`] with room for 30 cart entries.
#[must_use]
pub fn seeded_session() -> Session<MemoryStore> {
    Session::new(shared(seeded_store()), 30)
}

/// A session over `store`, already logged in as `member_id`.
pub async fn session_logged_in_as<S: RecordStore>(store: S, member_id: i64) -> Result<Session<S>> {
    let mut session = Session::new(shared(store), 30);
    assert!(
        session.login(member_id).await?,
        "test member {member_id} must exist"
    );
    Ok(session)
}

/// A store that answers lookups from an inner [`MemoryStore`] until told to
/// fail, and then fails every call.
#[derive(Debug, Default)]
pub struct FlakyStore {
    /// Store answering while healthy
    pub inner: MemoryStore,
    /// Fail every call
    pub down: bool,
    /// Fail sales once this many have succeeded
    pub sales_before_failure: Option<usize>,
}

impl FlakyStore {
    /// A healthy store over `inner`.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            down: false,
            sales_before_failure: None,
        }
    }

    fn check(&self) -> Result<()> {
        if self.down {
            return Err(Error::StoreUnavailable {
                message: "database is locked".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    async fn find_member(&self, id: i64) -> Result<Option<member::Model>> {
        self.check()?;
        self.inner.find_member(id).await
    }

    async fn insert_member(&mut self, member: member::Model) -> Result<()> {
        self.check()?;
        self.inner.insert_member(member).await
    }

    async fn delete_member(&mut self, id: i64) -> Result<bool> {
        self.check()?;
        self.inner.delete_member(id).await
    }

    async fn set_member_admin(&mut self, id: i64, admin: bool) -> Result<bool> {
        self.check()?;
        self.inner.set_member_admin(id, admin).await
    }

    async fn find_item(&self, barcode: &str) -> Result<Option<item::Model>> {
        self.check()?;
        self.inner.find_item(barcode).await
    }

    async fn insert_item(&mut self, item: item::Model) -> Result<()> {
        self.check()?;
        self.inner.insert_item(item).await
    }

    async fn delete_item(&mut self, barcode: &str) -> Result<bool> {
        self.check()?;
        self.inner.delete_item(barcode).await
    }

    async fn update_item_cost(&mut self, barcode: &str, cost: f64) -> Result<bool> {
        self.check()?;
        self.inner.update_item_cost(barcode, cost).await
    }

    async fn update_item_stock(&mut self, barcode: &str, stock: i64) -> Result<bool> {
        self.check()?;
        self.inner.update_item_stock(barcode, stock).await
    }

    async fn insert_transaction(&mut self, new: NewTransaction) -> Result<transaction::Model> {
        self.check()?;
        self.inner.insert_transaction(new).await
    }

    async fn record_sale(
        &mut self,
        sale: NewTransaction,
        new_stock: i64,
    ) -> Result<transaction::Model> {
        self.check()?;
        if let Some(remaining) = self.sales_before_failure {
            if remaining == 0 {
                self.down = true;
                self.check()?;
            }
            self.sales_before_failure = Some(remaining - 1);
        }
        self.inner.record_sale(sale, new_stock).await
    }

    async fn transactions_for_member(&self, member_id: i64) -> Result<Vec<transaction::Model>> {
        self.check()?;
        self.inner.transactions_for_member(member_id).await
    }
}
