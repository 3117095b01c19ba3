//! Ledger transaction records.
//!
//! A `Transaction` never mutates an account on its own: creation and
//! updates go through the engine's ledger operations, which adjust the
//! referenced account(s) in the same exclusive borrow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Active,
    Archived,
}

/// A recorded monetary event.
///
/// `kind` is mandatory and authoritative everywhere, including archive
/// filtering. Income and expense reference exactly one account; a
/// transfer also carries `to_account_id`.
///
/// The `*_label` fields belong to the reference resolver: they stay
/// `None` while the referenced row exists and freeze its display name
/// when that row is permanently deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub to_account_id: Option<Uuid>,
    pub kind: TransactionKind,
    /// Unsigned; always `> 0`.
    pub amount: Money,
    pub category_id: Option<Uuid>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub status: TransactionStatus,
    pub account_label: Option<String>,
    pub to_account_label: Option<String>,
    pub category_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status == TransactionStatus::Archived
    }
}

/// Field patch for `update_transaction`. Absent fields keep their stored
/// value.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub amount: Option<Money>,
    pub category_id: Option<Uuid>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}
