//! Item entity - Something on the canteen shelf.
//!
//! Items are keyed by barcode and carry their unit cost and the number of units
//! left in stock.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Barcode of the "No Item" sentinel
pub const NO_ITEM_BARCODE: &str = "0";

/// Item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Scanned barcode
    #[sea_orm(primary_key, auto_increment = false)]
    pub barcode: String,
    /// Display name
    pub name: String,
    /// Unit cost in dollars
    pub cost: f64,
    /// Units on the shelf
    pub stock: i64,
}

impl Model {
    /// The item held by a session before anything is inspected.
    #[must_use]
    pub fn none() -> Self {
        Self {
            barcode: NO_ITEM_BARCODE.to_string(),
            name: "No Item".to_string(),
            cost: 0.0,
            stock: 0,
        }
    }

    /// Whether this is the "No Item" sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.barcode == NO_ITEM_BARCODE
    }

    /// Whether at least one unit is on the shelf.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// `Item` has no relationships; transactions snapshot what they need
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
