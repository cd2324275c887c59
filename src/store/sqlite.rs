//! `SeaORM`-backed implementation of [`RecordStore`].

use super::RecordStore;
use crate::{
    config::database::{create_connection, create_tables},
    entities::{Item, Member, NewTransaction, Transaction, item, member, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Record store over a `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection. The tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and makes sure the tables exist.
    pub async fn open(database_url: &str) -> Result<Self> {
        let db = create_connection(database_url).await?;
        create_tables(&db).await?;
        Ok(Self::new(db))
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RecordStore for SqliteStore {
    #[instrument(skip(self))]
    async fn find_member(&self, id: i64) -> Result<Option<member::Model>> {
        let found = Member::find_by_id(id).one(&self.db).await?;
        debug!("Member lookup {}: found={}", id, found.is_some());
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn insert_member(&mut self, member: member::Model) -> Result<()> {
        let active = member::ActiveModel {
            id: Set(member.id),
            name: Set(member.name),
            admin: Set(member.admin),
        };
        Member::insert(active)
            .exec_without_returning(&self.db)
            .await?;
        info!("Inserted member {}", member.id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_member(&mut self, id: i64) -> Result<bool> {
        let result = Member::delete_by_id(id).exec(&self.db).await?;
        info!("Deleted member {}: rows affected {}", id, result.rows_affected);
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn set_member_admin(&mut self, id: i64, admin: bool) -> Result<bool> {
        let result = Member::update_many()
            .col_expr(member::Column::Admin, Expr::value(admin))
            .filter(member::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        info!(
            "Set admin={} for member {}: rows affected {}",
            admin, id, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn find_item(&self, barcode: &str) -> Result<Option<item::Model>> {
        let found = Item::find_by_id(barcode).one(&self.db).await?;
        debug!("Item lookup '{}': found={}", barcode, found.is_some());
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn insert_item(&mut self, item: item::Model) -> Result<()> {
        let barcode = item.barcode.clone();
        let active = item::ActiveModel {
            barcode: Set(item.barcode),
            name: Set(item.name),
            cost: Set(item.cost),
            stock: Set(item.stock),
        };
        Item::insert(active).exec_without_returning(&self.db).await?;
        info!("Inserted item '{}'", barcode);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_item(&mut self, barcode: &str) -> Result<bool> {
        let result = Item::delete_by_id(barcode).exec(&self.db).await?;
        info!(
            "Deleted item '{}': rows affected {}",
            barcode, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn update_item_cost(&mut self, barcode: &str, cost: f64) -> Result<bool> {
        let result = Item::update_many()
            .col_expr(item::Column::Cost, Expr::value(cost))
            .filter(item::Column::Barcode.eq(barcode))
            .exec(&self.db)
            .await?;
        info!(
            "Updated cost of '{}' to {}: rows affected {}",
            barcode, cost, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn update_item_stock(&mut self, barcode: &str, stock: i64) -> Result<bool> {
        let result = Item::update_many()
            .col_expr(item::Column::Stock, Expr::value(stock))
            .filter(item::Column::Barcode.eq(barcode))
            .exec(&self.db)
            .await?;
        debug!(
            "Updated stock of '{}' to {}: rows affected {}",
            barcode, stock, result.rows_affected
        );
        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn insert_transaction(&mut self, new: NewTransaction) -> Result<transaction::Model> {
        let active = transaction::ActiveModel {
            member_id: Set(new.member_id),
            barcode: Set(new.barcode),
            item_name: Set(new.item_name),
            item_cost: Set(new.item_cost),
            created_at: Set(new.created_at),
            ..Default::default()
        };
        let created = active.insert(&self.db).await?;
        info!(
            "Recorded transaction {} for member {}: '{}' at {}",
            created.id, created.member_id, created.item_name, created.item_cost
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn record_sale(
        &mut self,
        sale: NewTransaction,
        new_stock: i64,
    ) -> Result<transaction::Model> {
        let barcode = sale.barcode.clone();

        // Charge and stock change commit together or not at all
        let txn = self.db.begin().await?;

        let created = transaction::ActiveModel {
            member_id: Set(sale.member_id),
            barcode: Set(sale.barcode),
            item_name: Set(sale.item_name),
            item_cost: Set(sale.item_cost),
            created_at: Set(sale.created_at),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let updated = Item::update_many()
            .col_expr(item::Column::Stock, Expr::value(new_stock))
            .filter(item::Column::Barcode.eq(barcode.as_str()))
            .exec(&txn)
            .await;
        let result = match updated {
            Ok(result) => result,
            Err(err) => {
                txn.rollback().await?;
                return Err(err.into());
            }
        };
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(Error::StoreUnavailable {
                message: format!("item '{barcode}' disappeared during the sale"),
            });
        }

        txn.commit().await?;
        info!(
            "Sold '{}' to member {} at {}; stock now {}",
            barcode, created.member_id, created.item_cost, new_stock
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn transactions_for_member(&self, member_id: i64) -> Result<Vec<transaction::Model>> {
        let transactions = Transaction::find()
            .filter(transaction::Column::MemberId.eq(member_id))
            .order_by_asc(transaction::Column::Id)
            .all(&self.db)
            .await?;
        debug!(
            "Fetched {} transactions for member {}",
            transactions.len(),
            member_id
        );
        Ok(transactions)
    }
}
