//! Transaction entity - One purchased unit.
//!
//! Each row records who bought what, together with the item's name and cost as
//! they were when the item went into the cart. Rows are written once by
//! checkout and never changed afterwards.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Insertion-ordered identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member who was charged
    pub member_id: i64,
    /// Barcode of the purchased item
    pub barcode: String,
    /// Item name at the time of purchase
    pub item_name: String,
    /// Item cost at the time of purchase
    pub item_cost: f64,
    /// When checkout recorded the purchase
    pub created_at: DateTimeUtc,
}

/// Transactions are kept even after their member or item is removed
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The fields of a transaction before the store assigns its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    /// Member who is charged
    pub member_id: i64,
    /// Barcode of the purchased item
    pub barcode: String,
    /// Item name snapshot
    pub item_name: String,
    /// Item cost snapshot
    pub item_cost: f64,
    /// Purchase time
    pub created_at: DateTimeUtc,
}

impl NewTransaction {
    /// Charges `member_id` for one unit of the `item` snapshot at `created_at`.
    #[must_use]
    pub fn for_item(member_id: i64, item: &super::item::Model, created_at: DateTimeUtc) -> Self {
        Self {
            member_id,
            barcode: item.barcode.clone(),
            item_name: item.name.clone(),
            item_cost: item.cost,
            created_at,
        }
    }
}
