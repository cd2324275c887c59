//! Member entity - A person allowed to buy from the canteen.
//!
//! Members are identified by their service number, which doubles as the login
//! key. Admin members may edit the member and item directories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity key of the "No Member" sentinel
pub const NO_MEMBER_ID: i64 = 0;

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Service number, used as the login key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Whether the member may edit the directories
    pub admin: bool,
}

impl Model {
    /// The member held by a session before anyone logs in.
    #[must_use]
    pub fn nobody() -> Self {
        Self {
            id: NO_MEMBER_ID,
            name: "No Member".to_string(),
            admin: false,
        }
    }

    /// Whether this is the "No Member" sentinel.
    #[must_use]
    pub const fn is_nobody(&self) -> bool {
        self.id == NO_MEMBER_ID
    }
}

/// Members keep no foreign keys; their transactions outlive them
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
