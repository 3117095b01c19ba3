//! Reference resolver.
//!
//! The store keeps cross-entity references as plain ids with no foreign
//! keys. When a referenced account or category is permanently deleted,
//! the functions here freeze its display name into every dependent
//! record's `*_label` field (which doubles as the tombstone: `Some`
//! means the row is gone). Read paths then render through the
//! lookup-or-default helpers below and never need the dangling id.

use uuid::Uuid;

use crate::Store;

use super::Engine;

/// Freeze a deleted account's name into every record referencing it.
pub(crate) fn freeze_account_references(store: &mut Store, account_id: Uuid, name: &str) {
    for transaction in store.transactions.values_mut() {
        if transaction.account_id == account_id {
            transaction.account_label = Some(name.to_string());
        }
        if transaction.to_account_id == Some(account_id) {
            transaction.to_account_label = Some(name.to_string());
        }
    }
    for goal in store.goals.values_mut() {
        for transfer in &mut goal.transfers {
            if transfer.from_account_id == account_id {
                transfer.from_account_label = Some(name.to_string());
            }
        }
    }
}

/// Freeze a deleted category's name into every transaction referencing it.
pub(crate) fn freeze_category_references(store: &mut Store, category_id: Uuid, name: &str) {
    for transaction in store.transactions.values_mut() {
        if transaction.category_id == Some(category_id) {
            transaction.category_label = Some(name.to_string());
        }
    }
}

impl Engine {
    /// Display name for an account reference: the live name while the
    /// row exists, otherwise the frozen label with a removal marker.
    #[must_use]
    pub fn account_display_name(&self, id: Uuid, frozen: Option<&str>) -> Option<String> {
        if let Some(account) = self.store.accounts.get(&id) {
            return Some(account.name.clone());
        }
        frozen.map(|label| format!("{label} (removed)"))
    }

    /// Display name for a category reference, same contract as
    /// [`account_display_name`](Engine::account_display_name).
    #[must_use]
    pub fn category_display_name(&self, id: Uuid, frozen: Option<&str>) -> Option<String> {
        if let Some(category) = self.store.categories.get(&id) {
            return Some(category.name.clone());
        }
        frozen.map(|label| format!("{label} (removed)"))
    }
}
