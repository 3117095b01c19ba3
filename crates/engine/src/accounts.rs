//! The module contains the `Account` struct and its implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

/// What an account represents in the real world. Carried as metadata, the
/// ledger treats every kind the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    Cash,
    Card,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Archived,
}

/// Direction of a single balance mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Income,
    Expense,
}

/// One applied balance mutation.
///
/// `transaction_id` links the entry back to the ledger record that caused
/// it, so a transaction update can reverse its own entries precisely.
/// Entries created by goal funding have no transaction and leave it unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub operation: OperationKind,
    /// Unsigned magnitude; the sign comes from `operation`.
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    /// The other account of a transfer.
    pub linked_account_id: Option<Uuid>,
    pub transaction_id: Option<Uuid>,
}

impl HistoryEntry {
    /// The signed balance delta this entry contributes.
    #[must_use]
    pub fn signed(&self) -> Money {
        match self.operation {
            OperationKind::Income => self.amount,
            OperationKind::Expense => -self.amount,
        }
    }
}

/// A representation of a real bank account, card or cash reserve.
///
/// Invariant: `balance == opening_balance + Σ signed(history)`. Both sides
/// are mutated together in [`apply`] and [`reverse_transaction`], never
/// independently.
///
/// [`apply`]: Account::apply
/// [`reverse_transaction`]: Account::reverse_transaction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Money,
    pub opening_balance: Money,
    /// ISO currency code, metadata only. No conversion is ever performed.
    pub currency: String,
    pub status: AccountStatus,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: String,
        kind: AccountKind,
        opening_balance: Money,
        currency: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            balance: opening_balance,
            opening_balance,
            currency,
            status: AccountStatus::Active,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Apply one balance mutation, keeping balance and history in sync.
    pub fn apply(&mut self, entry: HistoryEntry, now: DateTime<Utc>) {
        self.balance += entry.signed();
        self.history.push(entry);
        self.updated_at = now;
    }

    /// Remove every history entry recorded for `transaction_id` and undo
    /// its effect on the balance. Returns the number of entries removed.
    pub fn reverse_transaction(&mut self, transaction_id: Uuid, now: DateTime<Utc>) -> usize {
        let before = self.history.len();
        let mut reversed = Money::ZERO;
        self.history.retain(|entry| {
            if entry.transaction_id == Some(transaction_id) {
                reversed += entry.signed();
                false
            } else {
                true
            }
        });
        let removed = before - self.history.len();
        if removed > 0 {
            self.balance -= reversed;
            self.updated_at = now;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn account() -> Account {
        Account::new(
            String::from("Checking"),
            AccountKind::Checking,
            Money::new(10_00),
            String::from("EUR"),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    fn entry(operation: OperationKind, amount: i64, transaction_id: Option<Uuid>) -> HistoryEntry {
        HistoryEntry {
            operation,
            amount: Money::new(amount),
            occurred_at: Utc.timestamp_opt(0, 0).unwrap(),
            note: None,
            linked_account_id: None,
            transaction_id,
        }
    }

    fn balance_invariant(account: &Account) -> bool {
        let derived: Money = account.history.iter().map(HistoryEntry::signed).sum();
        account.balance == account.opening_balance + derived
    }

    #[test]
    fn apply_keeps_balance_and_history_in_sync() {
        let mut account = account();
        account.apply(
            entry(OperationKind::Income, 25_00, None),
            Utc.timestamp_opt(1, 0).unwrap(),
        );
        account.apply(
            entry(OperationKind::Expense, 4_00, None),
            Utc.timestamp_opt(2, 0).unwrap(),
        );

        assert_eq!(account.balance, Money::new(31_00));
        assert_eq!(account.history.len(), 2);
        assert!(balance_invariant(&account));
    }

    #[test]
    fn reverse_removes_only_the_linked_entries() {
        let mut account = account();
        let tx = Uuid::new_v4();
        account.apply(
            entry(OperationKind::Income, 5_00, None),
            Utc.timestamp_opt(1, 0).unwrap(),
        );
        account.apply(
            entry(OperationKind::Expense, 3_00, Some(tx)),
            Utc.timestamp_opt(2, 0).unwrap(),
        );

        let removed = account.reverse_transaction(tx, Utc.timestamp_opt(3, 0).unwrap());

        assert_eq!(removed, 1);
        assert_eq!(account.balance, Money::new(15_00));
        assert_eq!(account.history.len(), 1);
        assert!(balance_invariant(&account));
    }

    #[test]
    fn reverse_of_unknown_transaction_is_a_no_op() {
        let mut account = account();
        account.apply(
            entry(OperationKind::Income, 5_00, Some(Uuid::new_v4())),
            Utc.timestamp_opt(1, 0).unwrap(),
        );

        let removed = account.reverse_transaction(Uuid::new_v4(), Utc.timestamp_opt(2, 0).unwrap());

        assert_eq!(removed, 0);
        assert_eq!(account.balance, Money::new(15_00));
    }
}
