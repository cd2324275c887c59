//! Directory business logic - admin-only edits to members and items.
//!
//! Every operation here checks [`Session::require_admin`] first and reports a
//! refusal as a [`DirectoryOutcome`] rather than an error, so the caller can
//! tell "you may not" apart from "the store broke". Input is validated after
//! the permission check.

use crate::{
    core::{input, session::Session},
    entities::{item, member},
    errors::{Error, Result},
    store::RecordStore,
};
use tracing::{info, instrument, warn};

/// What a directory operation did.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOutcome {
    /// The change was made
    Applied,
    /// The current member is not an admin; nothing changed
    NotAuthorized,
    /// The target member or item does not exist
    NotFound,
    /// A member or item with that key already exists
    AlreadyExists,
    /// The target is the current member; members may not remove or demote themselves
    RefusedSelf,
}

impl DirectoryOutcome {
    const fn from_rows_affected(affected: bool) -> Self {
        if affected { Self::Applied } else { Self::NotFound }
    }
}

impl<S: RecordStore> Session<S> {
    fn deny_unless_admin(&self, operation: &str) -> Option<DirectoryOutcome> {
        if self.require_admin() {
            return None;
        }
        warn!(
            "Member {} is not an admin; refused {}",
            self.current_member().id,
            operation
        );
        Some(DirectoryOutcome::NotAuthorized)
    }

    fn is_self(&self, id: i64) -> bool {
        let is_self = self.current_member().id == id;
        if is_self {
            warn!("Member {} tried to change their own membership", id);
        }
        is_self
    }

    /// Registers a new member.
    ///
    /// Only an admin may do this. The id and name are validated after the
    /// permission check, and an existing member with the same id is left
    /// alone and reported as [`DirectoryOutcome::AlreadyExists`].
    ///
    /// # Arguments
    /// * `id` - Member number, positive
    /// * `name` - Display name; surrounding whitespace is trimmed
    /// * `admin` - Whether the new member may edit the directories
    ///
    /// # Errors
    /// - [`Error::Validation`] for a non-positive id or an empty name
    /// - [`Error::StoreUnavailable`] if the store fails
    #[instrument(skip(self))]
    pub async fn create_member(
        &self,
        id: i64,
        name: &str,
        admin: bool,
    ) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("create_member") {
            return Ok(denied);
        }
        let id = input::validate_member_id(id)?;
        let name = input::validate_text(name, "member name")?;

        let mut store = self.store().lock().await;
        if store.find_member(id).await?.is_some() {
            return Ok(DirectoryOutcome::AlreadyExists);
        }
        store.insert_member(member::Model { id, name, admin }).await?;
        info!("Member {} created (admin={})", id, admin);
        Ok(DirectoryOutcome::Applied)
    }

    /// Removes a member. Their transactions stay on record.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, id: i64) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("remove_member") {
            return Ok(denied);
        }
        if self.is_self(id) {
            return Ok(DirectoryOutcome::RefusedSelf);
        }
        let removed = self.store().lock().await.delete_member(id).await?;
        Ok(DirectoryOutcome::from_rows_affected(removed))
    }

    /// Grants or revokes admin rights.
    ///
    /// An admin cannot change their own flag; that comes back as
    /// [`DirectoryOutcome::RefusedSelf`] so the TOC always keeps at least the
    /// admin who is logged in.
    ///
    /// # Arguments
    /// * `id` - Member to update
    /// * `admin` - New value of the flag
    #[instrument(skip(self))]
    pub async fn set_admin(&self, id: i64, admin: bool) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("set_admin") {
            return Ok(denied);
        }
        if self.is_self(id) {
            return Ok(DirectoryOutcome::RefusedSelf);
        }
        let updated = self
            .store()
            .lock()
            .await
            .set_member_admin(id, admin)
            .await?;
        Ok(DirectoryOutcome::from_rows_affected(updated))
    }

    /// Puts a new item on the shelf.
    ///
    /// Barcode and name are trimmed and must not be empty. Barcode `"0"` is
    /// reserved for the "No Item" sentinel and rejected.
    ///
    /// # Arguments
    /// * `barcode` - Unique barcode
    /// * `name` - Display name
    /// * `cost` - Unit cost, finite and non-negative
    /// * `stock` - Units on the shelf, zero or more
    ///
    /// # Errors
    /// - [`Error::Validation`] for any out-of-range field
    /// - [`Error::StoreUnavailable`] if the store fails
    #[instrument(skip(self))]
    pub async fn create_item(
        &self,
        barcode: &str,
        name: &str,
        cost: f64,
        stock: i64,
    ) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("create_item") {
            return Ok(denied);
        }
        let barcode = input::validate_text(barcode, "barcode")?;
        if barcode == item::NO_ITEM_BARCODE {
            return Err(Error::validation(format!(
                "barcode '{barcode}' is reserved"
            )));
        }
        let name = input::validate_text(name, "item name")?;
        let cost = input::validate_cost(cost)?;
        let stock = input::validate_stock(stock)?;

        let mut store = self.store().lock().await;
        if store.find_item(&barcode).await?.is_some() {
            return Ok(DirectoryOutcome::AlreadyExists);
        }
        store
            .insert_item(item::Model {
                barcode: barcode.clone(),
                name,
                cost,
                stock,
            })
            .await?;
        info!("Item '{}' created", barcode);
        Ok(DirectoryOutcome::Applied)
    }

    /// Takes an item off the shelf.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, barcode: &str) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("remove_item") {
            return Ok(denied);
        }
        let removed = self.store().lock().await.delete_item(barcode).await?;
        Ok(DirectoryOutcome::from_rows_affected(removed))
    }

    /// Changes an item's unit cost. Items already in a cart keep the old cost.
    #[instrument(skip(self))]
    pub async fn update_item_cost(&self, barcode: &str, cost: f64) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("update_item_cost") {
            return Ok(denied);
        }
        let cost = input::validate_cost(cost)?;
        let updated = self
            .store()
            .lock()
            .await
            .update_item_cost(barcode, cost)
            .await?;
        Ok(DirectoryOutcome::from_rows_affected(updated))
    }

    /// Sets how many units of an item are on the shelf.
    ///
    /// Checkout takes one unit per sale, so this is how admins restock. The
    /// value replaces the stored count rather than adding to it.
    ///
    /// # Arguments
    /// * `barcode` - Item to restock
    /// * `stock` - New count, zero or more
    #[instrument(skip(self))]
    pub async fn update_item_stock(&self, barcode: &str, stock: i64) -> Result<DirectoryOutcome> {
        if let Some(denied) = self.deny_unless_admin("update_item_stock") {
            return Ok(denied);
        }
        let stock = input::validate_stock(stock)?;
        let updated = self
            .store()
            .lock()
            .await
            .update_item_stock(barcode, stock)
            .await?;
        Ok(DirectoryOutcome::from_rows_affected(updated))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::*;

    async fn snapshot(session: &Session<MemoryStore>) -> MemoryStore {
        session.store().lock().await.clone()
    }

    #[tokio::test]
    async fn test_non_admin_cannot_create_item() -> Result<()> {
        init_test_tracing();
        let session = session_logged_in_as(seeded_store(), 42).await?;
        let before = snapshot(&session).await;

        let outcome = session.create_item("X", "Widget", 1.0, 10).await?;

        assert_eq!(outcome, DirectoryOutcome::NotAuthorized);
        let after = snapshot(&session).await;
        assert!(after.find_item("X").await?.is_none());
        assert_eq!(format!("{before:?}"), format!("{after:?}"));
        Ok(())
    }

    #[tokio::test]
    async fn test_every_directory_operation_is_gated() -> Result<()> {
        let store = seeded_store().with_item("ABC", "Cola", 5.0, 1);
        let session = session_logged_in_as(store, 42).await?;
        let before = format!("{:?}", snapshot(&session).await);

        let outcomes = [
            session.create_member(7, "New", false).await?,
            session.remove_member(1).await?,
            session.set_admin(42, true).await?,
            session.set_admin(1, false).await?,
            session.create_item("X", "Widget", 1.0, 10).await?,
            session.remove_item("ABC").await?,
            session.update_item_cost("ABC", 9.0).await?,
            session.update_item_stock("ABC", 9).await?,
        ];

        assert!(
            outcomes
                .iter()
                .all(|outcome| *outcome == DirectoryOutcome::NotAuthorized)
        );
        assert_eq!(before, format!("{:?}", snapshot(&session).await));
        Ok(())
    }

    #[tokio::test]
    async fn test_nobody_logged_in_is_not_an_admin() -> Result<()> {
        let session = seeded_session();
        assert_eq!(
            session.create_member(7, "New", true).await?,
            DirectoryOutcome::NotAuthorized
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_cannot_remove_or_demote_self() -> Result<()> {
        let session = session_logged_in_as(seeded_store(), 1).await?;

        assert_eq!(
            session.remove_member(1).await?,
            DirectoryOutcome::RefusedSelf
        );
        assert_eq!(
            session.set_admin(1, false).await?,
            DirectoryOutcome::RefusedSelf
        );

        let me = session.store().lock().await.find_member(1).await?.unwrap();
        assert!(me.admin);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_targeting_self_is_a_no_op() -> Result<()> {
        let session = session_logged_in_as(seeded_store(), 42).await?;

        assert_ne!(session.set_admin(42, true).await?, DirectoryOutcome::Applied);
        assert_ne!(session.remove_member(42).await?, DirectoryOutcome::Applied);

        let me = session.store().lock().await.find_member(42).await?.unwrap();
        assert!(!me.admin);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_manages_members() -> Result<()> {
        init_test_tracing();
        let session = session_logged_in_as(seeded_store(), 1).await?;

        assert_eq!(
            session.create_member(7, "  Pedro ", false).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.create_member(7, "Again", false).await?,
            DirectoryOutcome::AlreadyExists
        );
        assert_eq!(session.set_admin(7, true).await?, DirectoryOutcome::Applied);
        {
            let store = session.store().lock().await;
            let pedro = store.find_member(7).await?.unwrap();
            assert_eq!(pedro.name, "Pedro");
            assert!(pedro.admin);
        }

        assert_eq!(session.remove_member(7).await?, DirectoryOutcome::Applied);
        assert_eq!(session.remove_member(7).await?, DirectoryOutcome::NotFound);
        assert_eq!(
            session.set_admin(7, false).await?,
            DirectoryOutcome::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_manages_items() -> Result<()> {
        let session = session_logged_in_as(seeded_store(), 1).await?;

        assert_eq!(
            session.create_item("X", "Widget", 1.0, 10).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.create_item("X", "Other", 2.0, 1).await?,
            DirectoryOutcome::AlreadyExists
        );
        assert_eq!(
            session.update_item_cost("X", 1.5).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.update_item_stock("X", 3).await?,
            DirectoryOutcome::Applied
        );
        {
            let store = session.store().lock().await;
            let widget = store.find_item("X").await?.unwrap();
            assert_eq!(widget.cost, 1.5);
            assert_eq!(widget.stock, 3);
        }

        assert_eq!(session.remove_item("X").await?, DirectoryOutcome::Applied);
        assert_eq!(session.remove_item("X").await?, DirectoryOutcome::NotFound);
        assert_eq!(
            session.update_item_cost("X", 1.0).await?,
            DirectoryOutcome::NotFound
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_input_is_validated() -> Result<()> {
        let session = session_logged_in_as(seeded_store(), 1).await?;

        let invalid = [
            session.create_member(0, "Zero", false).await,
            session.create_member(9, "  ", false).await,
            session.create_item("", "Widget", 1.0, 1).await,
            session.create_item("0", "Widget", 1.0, 1).await,
            session.create_item("X", "Widget", -1.0, 1).await,
            session.create_item("X", "Widget", f64::NAN, 1).await,
            session.create_item("X", "Widget", 1.0, -1).await,
            session.update_item_cost("X", -0.5).await,
            session.update_item_stock("X", -2).await,
        ];
        for result in invalid {
            assert!(matches!(result, Err(Error::Validation { .. })));
        }

        assert!(session.store().lock().await.find_item("X").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_an_outcome() -> Result<()> {
        let session = session_logged_in_as(FlakyStore::new(seeded_store()), 1).await?;
        session.store().lock().await.down = true;

        let err = session.create_item("X", "Widget", 1.0, 1).await.unwrap_err();
        assert!(err.is_store_failure());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_cannot_create_item_on_sqlite() -> Result<()> {
        use crate::entities::{Item, Member};
        use sea_orm::EntityTrait;

        init_test_tracing();
        let session = session_logged_in_as(seeded_test_db().await?, 42).await?;

        let outcome = session.create_item("X", "Widget", 1.0, 10).await?;

        assert_eq!(outcome, DirectoryOutcome::NotAuthorized);
        let store = session.store().lock().await;
        assert!(Item::find().all(store.connection()).await?.is_empty());
        assert_eq!(Member::find().all(store.connection()).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_directory_edits_on_sqlite() -> Result<()> {
        init_test_tracing();
        let session = session_logged_in_as(seeded_test_db().await?, 1).await?;

        assert_eq!(
            session.create_item("X", "Widget", 1.0, 10).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.create_item("X", "Other", 2.0, 1).await?,
            DirectoryOutcome::AlreadyExists
        );
        assert_eq!(
            session.create_member(42, "Again", false).await?,
            DirectoryOutcome::AlreadyExists
        );
        assert_eq!(
            session.update_item_stock("X", 25).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.update_item_cost("X", 1.75).await?,
            DirectoryOutcome::Applied
        );
        assert_eq!(
            session.set_admin(42, true).await?,
            DirectoryOutcome::Applied
        );

        {
            let store = session.store().lock().await;
            let widget = store.find_item("X").await?.unwrap();
            assert_eq!(widget.name, "Widget");
            assert_eq!(widget.stock, 25);
            assert_eq!(widget.cost, 1.75);
            assert!(store.find_member(42).await?.unwrap().admin);
        }

        assert_eq!(session.remove_item("X").await?, DirectoryOutcome::Applied);
        assert_eq!(session.remove_item("X").await?, DirectoryOutcome::NotFound);
        assert_eq!(session.remove_member(42).await?, DirectoryOutcome::Applied);
        assert_eq!(session.remove_member(42).await?, DirectoryOutcome::NotFound);
        Ok(())
    }
}
