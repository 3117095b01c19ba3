//! Ledger operations: every account-balance mutation lives here.
//!
//! All operations validate before they mutate. The single-entity ones are
//! trivially atomic; `transfer` and `update_transaction` touch two
//! accounts and rely on the engine's exclusive borrow (`&mut self`, taken
//! through the server's write lock) so no reader can observe a
//! half-applied state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Account, Debt, EngineError, Goal, GoalStatus, HistoryEntry, Money, OperationKind,
    PaymentOutcome, ResultEngine, Subscription, SubscriptionPayment, SubscriptionStatus,
    Transaction, TransactionKind, TransactionPatch, TransactionStatus,
};

use super::{Engine, normalize_optional_text};

/// Parameters for recording an income or expense transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category_id: Option<Uuid>,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Everything a subscription payment changed, echoed back to the caller.
#[derive(Clone, Debug)]
pub struct SubscriptionPaymentOutcome {
    pub subscription: Subscription,
    pub payment: SubscriptionPayment,
    pub transaction: Transaction,
    pub account: Account,
}

impl Engine {
    /// Record an income or expense against an active account.
    ///
    /// Applies `+amount` (income) or `-amount` (expense) to the account
    /// balance and appends one history entry, in the same mutation.
    pub fn record_transaction(
        &mut self,
        cmd: NewTransaction,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let operation = match cmd.kind {
            TransactionKind::Income => OperationKind::Income,
            TransactionKind::Expense => OperationKind::Expense,
            TransactionKind::Transfer => {
                return Err(EngineError::Validation(
                    "transfers are recorded through the transfer operation".to_string(),
                ));
            }
        };
        if let Some(category_id) = cmd.category_id {
            let category = self
                .store
                .categories
                .get(&category_id)
                .ok_or_else(|| EngineError::NotFound(category_id.to_string()))?;
            if !category.is_active() {
                return Err(EngineError::NotFound(format!(
                    "{category_id} is not an active category"
                )));
            }
        }
        let account = self
            .store
            .accounts
            .get_mut(&cmd.account_id)
            .ok_or_else(|| EngineError::NotFound(cmd.account_id.to_string()))?;
        if !account.is_active() {
            return Err(EngineError::NotFound(format!(
                "{} is not an active account",
                cmd.account_id
            )));
        }

        let note = normalize_optional_text(cmd.note.as_deref());
        let transaction = Transaction {
            id: Uuid::new_v4(),
            account_id: cmd.account_id,
            to_account_id: None,
            kind: cmd.kind,
            amount: cmd.amount,
            category_id: cmd.category_id,
            note: note.clone(),
            occurred_at: cmd.occurred_at,
            status: TransactionStatus::Active,
            account_label: None,
            to_account_label: None,
            category_label: None,
            created_at: now,
            updated_at: now,
        };
        account.apply(
            HistoryEntry {
                operation,
                amount: cmd.amount,
                occurred_at: cmd.occurred_at,
                note,
                linked_account_id: None,
                transaction_id: Some(transaction.id),
            },
            now,
        );

        let snapshot = transaction.clone();
        self.store.transactions.insert(transaction.id, transaction);
        Ok(snapshot)
    }

    /// Update a transaction, adjusting the affected account(s).
    ///
    /// Two phases, strictly in this order: first the stored transaction's
    /// effect is **reversed** on every account it touched, then the
    /// patched values are applied as if freshly recorded — including when
    /// the account reference itself changed. Skipping the reversal would
    /// double-count the amount.
    ///
    /// A transaction cannot change to or from the transfer kind; within a
    /// transfer, both endpoints and the amount may change.
    pub fn update_transaction(
        &mut self,
        id: Uuid,
        patch: TransactionPatch,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        let current = self
            .store
            .transactions
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?
            .clone();
        if current.is_archived() {
            return Err(EngineError::NotFound(format!("{id} is archived")));
        }

        let new_kind = patch.kind.unwrap_or(current.kind);
        let was_transfer = current.kind == TransactionKind::Transfer;
        let is_transfer = new_kind == TransactionKind::Transfer;
        if was_transfer != is_transfer {
            return Err(EngineError::Validation(
                "a transaction cannot change to or from the transfer kind".to_string(),
            ));
        }
        if !is_transfer && patch.to_account_id.is_some() {
            return Err(EngineError::Validation(
                "to_account_id only applies to transfers".to_string(),
            ));
        }

        let new_amount = patch.amount.unwrap_or(current.amount);
        if !new_amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }

        let new_account_id = patch.account_id.unwrap_or(current.account_id);
        let new_to_account_id = if is_transfer {
            let to = patch
                .to_account_id
                .or(current.to_account_id)
                .ok_or_else(|| EngineError::Validation("transfer is missing its destination".to_string()))?;
            if to == new_account_id {
                return Err(EngineError::Validation(
                    "a transfer needs two distinct accounts".to_string(),
                ));
            }
            Some(to)
        } else {
            None
        };

        let new_category_id = patch.category_id.or(current.category_id);
        if let Some(category_id) = patch.category_id {
            let category = self
                .store
                .categories
                .get(&category_id)
                .ok_or_else(|| EngineError::NotFound(category_id.to_string()))?;
            if !category.is_active() {
                return Err(EngineError::NotFound(format!(
                    "{category_id} is not an active category"
                )));
            }
        }

        self.require_active_account(new_account_id)?;
        if let Some(to) = new_to_account_id {
            self.require_active_account(to)?;
        }

        // Funds check for transfers, computed as if the old transaction
        // were already reversed so nothing has to be rolled back.
        if is_transfer {
            let from = self.account(new_account_id)?;
            let available = from.balance - contribution(from, id);
            if available < new_amount {
                return Err(EngineError::InsufficientFunds(format!(
                    "balance {available} does not cover {new_amount}"
                )));
            }
        }

        // Phase 1: reverse the old effect everywhere it was applied.
        for account_id in [Some(current.account_id), current.to_account_id]
            .into_iter()
            .flatten()
        {
            if let Some(account) = self.store.accounts.get_mut(&account_id) {
                account.reverse_transaction(id, now);
            }
        }

        let new_note = match patch.note {
            Some(note) => normalize_optional_text(Some(&note)),
            None => current.note.clone(),
        };
        let new_occurred_at = patch.occurred_at.unwrap_or(current.occurred_at);

        // Phase 2: apply the patched values as a fresh recording.
        if is_transfer {
            self.apply_transfer_entries(
                new_account_id,
                new_to_account_id.unwrap_or(new_account_id),
                new_amount,
                new_note.clone(),
                new_occurred_at,
                id,
                now,
            );
        } else {
            let operation = match new_kind {
                TransactionKind::Income => OperationKind::Income,
                _ => OperationKind::Expense,
            };
            if let Some(account) = self.store.accounts.get_mut(&new_account_id) {
                account.apply(
                    HistoryEntry {
                        operation,
                        amount: new_amount,
                        occurred_at: new_occurred_at,
                        note: new_note.clone(),
                        linked_account_id: None,
                        transaction_id: Some(id),
                    },
                    now,
                );
            }
        }

        let transaction = self
            .store
            .transactions
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        transaction.kind = new_kind;
        transaction.amount = new_amount;
        transaction.account_id = new_account_id;
        transaction.to_account_id = new_to_account_id;
        transaction.category_id = new_category_id;
        transaction.note = new_note;
        transaction.occurred_at = new_occurred_at;
        transaction.updated_at = now;
        // The references were just revalidated against live rows, so any
        // frozen labels from earlier deletions no longer apply.
        transaction.account_label = None;
        transaction.to_account_label = None;
        if patch.category_id.is_some() {
            transaction.category_label = None;
        }

        Ok(transaction.clone())
    }

    /// Move money between two active accounts.
    ///
    /// Fails with `InsufficientFunds` before any mutation if the source
    /// balance does not cover the amount; on success both sides update
    /// together under the engine's exclusive borrow, and a `Transfer`
    /// transaction referencing both accounts is stored.
    pub fn transfer(
        &mut self,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: Money,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<(Account, Account)> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        if from_account_id == to_account_id {
            return Err(EngineError::Validation(
                "a transfer needs two distinct accounts".to_string(),
            ));
        }
        self.require_active_account(from_account_id)?;
        self.require_active_account(to_account_id)?;

        let from = self.account(from_account_id)?;
        if from.balance < amount {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {} does not cover {amount}",
                from.balance
            )));
        }

        let note = normalize_optional_text(note);
        let transaction = Transaction {
            id: Uuid::new_v4(),
            account_id: from_account_id,
            to_account_id: Some(to_account_id),
            kind: TransactionKind::Transfer,
            amount,
            category_id: None,
            note: note.clone(),
            occurred_at,
            status: TransactionStatus::Active,
            account_label: None,
            to_account_label: None,
            category_label: None,
            created_at: now,
            updated_at: now,
        };
        let transaction_id = transaction.id;
        self.store.transactions.insert(transaction_id, transaction);
        self.apply_transfer_entries(
            from_account_id,
            to_account_id,
            amount,
            note,
            occurred_at,
            transaction_id,
            now,
        );

        tracing::debug!(%from_account_id, %to_account_id, %amount, "transfer applied");

        let from = self.account(from_account_id)?.clone();
        let to = self.account(to_account_id)?.clone();
        Ok((from, to))
    }

    /// Bill a subscription: records an expense against its account,
    /// appends a successful payment entry linking that transaction, and
    /// advances `next_payment_date` by one billing period.
    pub fn record_subscription_payment(
        &mut self,
        subscription_id: Uuid,
        amount: Option<Money>,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<SubscriptionPaymentOutcome> {
        let subscription = self
            .store
            .subscriptions
            .get(&subscription_id)
            .ok_or_else(|| EngineError::NotFound(subscription_id.to_string()))?;
        if subscription.is_archived() {
            return Err(EngineError::NotFound(format!("{subscription_id} is archived")));
        }
        if subscription.status == SubscriptionStatus::Cancelled {
            return Err(EngineError::Validation(
                "cannot bill a cancelled subscription".to_string(),
            ));
        }

        let amount = amount.unwrap_or(subscription.amount);
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        // Computed up front: a misconfigured billing period must fail
        // before the expense is recorded, not after.
        let next_payment_date = subscription.following_payment_date()?;
        let account_id = subscription.account_id;
        let default_note = format!("{} subscription", subscription.name);

        let transaction = self.record_transaction(
            NewTransaction {
                account_id,
                kind: TransactionKind::Expense,
                amount,
                category_id: None,
                note: Some(note.map_or(default_note, ToString::to_string)),
                occurred_at,
            },
            now,
        )?;

        let subscription = self
            .store
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or_else(|| EngineError::NotFound(subscription_id.to_string()))?;
        let payment = SubscriptionPayment {
            occurred_at,
            amount,
            outcome: PaymentOutcome::Success,
            transaction_id: Some(transaction.id),
        };
        subscription.payments.push(payment.clone());
        subscription.next_payment_date = next_payment_date;
        subscription.updated_at = now;
        let subscription = subscription.clone();

        let account = self.account(account_id)?.clone();
        Ok(SubscriptionPaymentOutcome {
            subscription,
            payment,
            transaction,
            account,
        })
    }

    /// Record a repayment against a debt. Overpayment is rejected; the
    /// debt flips to `Paid` exactly when the remaining amount reaches
    /// zero, after which further payments fail.
    pub fn record_debt_payment(
        &mut self,
        debt_id: Uuid,
        amount: Money,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<Debt> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let note = normalize_optional_text(note);
        let debt = self
            .store
            .debts
            .get_mut(&debt_id)
            .ok_or_else(|| EngineError::NotFound(debt_id.to_string()))?;
        if debt.is_archived() {
            return Err(EngineError::NotFound(format!("{debt_id} is archived")));
        }
        debt.record_payment(amount, note, occurred_at, now)?;
        Ok(debt.clone())
    }

    /// Fund a goal out of an account. Debits the account and grows the
    /// goal's progress in the same exclusive borrow; the goal completes
    /// exactly when progress reaches the target.
    pub fn record_goal_transfer(
        &mut self,
        goal_id: Uuid,
        from_account_id: Uuid,
        amount: Money,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<(Goal, Account)> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        let goal = self
            .store
            .goals
            .get(&goal_id)
            .ok_or_else(|| EngineError::NotFound(goal_id.to_string()))?;
        match goal.status {
            GoalStatus::Active => {}
            GoalStatus::Completed => {
                return Err(EngineError::Validation("goal is already completed".to_string()));
            }
            GoalStatus::Archived => {
                return Err(EngineError::NotFound(format!("{goal_id} is archived")));
            }
        }
        let goal_name = goal.name.clone();

        self.require_active_account(from_account_id)?;
        let account = self.account(from_account_id)?;
        if account.balance < amount {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {} does not cover {amount}",
                account.balance
            )));
        }

        if let Some(account) = self.store.accounts.get_mut(&from_account_id) {
            account.apply(
                HistoryEntry {
                    operation: OperationKind::Expense,
                    amount,
                    occurred_at,
                    note: Some(format!("goal: {goal_name}")),
                    linked_account_id: None,
                    transaction_id: None,
                },
                now,
            );
        }
        let goal = self
            .store
            .goals
            .get_mut(&goal_id)
            .ok_or_else(|| EngineError::NotFound(goal_id.to_string()))?;
        goal.record_transfer(amount, from_account_id, occurred_at, now);

        let goal = goal.clone();
        let account = self.account(from_account_id)?.clone();
        Ok((goal, account))
    }

    fn require_active_account(&self, id: Uuid) -> ResultEngine<()> {
        let account = self.account(id)?;
        if !account.is_active() {
            return Err(EngineError::NotFound(format!(
                "{id} is not an active account"
            )));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_transfer_entries(
        &mut self,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: Money,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
        transaction_id: Uuid,
        now: DateTime<Utc>,
    ) {
        if let Some(from) = self.store.accounts.get_mut(&from_account_id) {
            from.apply(
                HistoryEntry {
                    operation: OperationKind::Expense,
                    amount,
                    occurred_at,
                    note: note.clone(),
                    linked_account_id: Some(to_account_id),
                    transaction_id: Some(transaction_id),
                },
                now,
            );
        }
        if let Some(to) = self.store.accounts.get_mut(&to_account_id) {
            to.apply(
                HistoryEntry {
                    operation: OperationKind::Income,
                    amount,
                    occurred_at,
                    note,
                    linked_account_id: Some(from_account_id),
                    transaction_id: Some(transaction_id),
                },
                now,
            );
        }
    }
}

/// Signed contribution of `transaction_id` to the account's balance.
fn contribution(account: &Account, transaction_id: Uuid) -> Money {
    account
        .history
        .iter()
        .filter(|entry| entry.transaction_id == Some(transaction_id))
        .map(HistoryEntry::signed)
        .sum()
}
