//! Archive lifecycle: soft-delete, restore, hard-delete, statistics.
//!
//! One state machine shape shared by all six collections, dispatched
//! through the [`Lifecycle`] trait so the transitions are written once.
//!
//! [`Lifecycle`]: crate::store::Lifecycle

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Account, Category, Debt, EngineError, Goal, Page, PageRequest, ResultEngine, Subscription,
    Transaction, TransactionKind,
    store::{Lifecycle, paginate},
};

use super::{Engine, resolver};

/// The six archivable collections, named after their URL path segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Transaction,
    Category,
    Goal,
    Debt,
    Subscription,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Transaction => "transactions",
            Self::Category => "categories",
            Self::Goal => "goals",
            Self::Debt => "debts",
            Self::Subscription => "subscriptions",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accounts" => Ok(Self::Account),
            "transactions" => Ok(Self::Transaction),
            "categories" => Ok(Self::Category),
            "goals" => Ok(Self::Goal),
            "debts" => Ok(Self::Debt),
            "subscriptions" => Ok(Self::Subscription),
            other => Err(EngineError::Validation(format!(
                "unknown archive type \"{other}\""
            ))),
        }
    }
}

/// A record pulled out of the archive, still carrying its concrete type.
#[derive(Clone, Debug)]
pub enum ArchivedRecord {
    Account(Account),
    Transaction(Transaction),
    Category(Category),
    Goal(Goal),
    Debt(Debt),
    Subscription(Subscription),
}

/// Filters for an archive listing.
#[derive(Clone, Debug)]
pub struct ArchiveQuery {
    pub page: PageRequest,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Sub-filter for transaction listings only.
    pub tx_kind: Option<TransactionKind>,
}

/// Snapshot of the archive, recomputed on demand — no cached counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub total: u64,
    pub accounts: u64,
    pub transactions: u64,
    pub categories: u64,
    pub goals: u64,
    pub debts: u64,
    pub subscriptions: u64,
    /// Earliest `updated_at` among all archived records.
    pub oldest: Option<DateTime<Utc>>,
}

impl Engine {
    /// Move a record into the archive. Allowed from any non-archived
    /// status; money fields are untouched.
    pub fn archive_entity(
        &mut self,
        kind: EntityKind,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let result = match kind {
            EntityKind::Account => archive_in(&mut self.store.accounts, id, now),
            EntityKind::Transaction => archive_in(&mut self.store.transactions, id, now),
            EntityKind::Category => archive_in(&mut self.store.categories, id, now),
            EntityKind::Goal => archive_in(&mut self.store.goals, id, now),
            EntityKind::Debt => archive_in(&mut self.store.debts, id, now),
            EntityKind::Subscription => archive_in(&mut self.store.subscriptions, id, now),
        };
        if result.is_ok() {
            tracing::debug!(%kind, %id, "archived");
        }
        result
    }

    /// Bring a record back from the archive. It always returns to the
    /// plain active status: a pre-archive `Paid`/`Completed`/`Cancelled`
    /// is deliberately not remembered.
    pub fn restore_entity(
        &mut self,
        kind: EntityKind,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<ArchivedRecord> {
        match kind {
            EntityKind::Account => {
                restore_in(&mut self.store.accounts, id, now).map(ArchivedRecord::Account)
            }
            EntityKind::Transaction => {
                restore_in(&mut self.store.transactions, id, now).map(ArchivedRecord::Transaction)
            }
            EntityKind::Category => {
                restore_in(&mut self.store.categories, id, now).map(ArchivedRecord::Category)
            }
            EntityKind::Goal => restore_in(&mut self.store.goals, id, now).map(ArchivedRecord::Goal),
            EntityKind::Debt => restore_in(&mut self.store.debts, id, now).map(ArchivedRecord::Debt),
            EntityKind::Subscription => {
                restore_in(&mut self.store.subscriptions, id, now).map(ArchivedRecord::Subscription)
            }
        }
    }

    /// Permanently remove an archived record. Deleting an account or a
    /// category first freezes its display name into every record that
    /// references it, so history stays readable after the row is gone.
    pub fn delete_archived(&mut self, kind: EntityKind, id: Uuid) -> ResultEngine<()> {
        match kind {
            EntityKind::Account => {
                require_archived(&self.store.accounts, id)?;
                if let Some(account) = self.store.accounts.remove(&id) {
                    resolver::freeze_account_references(&mut self.store, id, &account.name);
                }
            }
            EntityKind::Category => {
                require_archived(&self.store.categories, id)?;
                if let Some(category) = self.store.categories.remove(&id) {
                    resolver::freeze_category_references(&mut self.store, id, &category.name);
                }
            }
            EntityKind::Transaction => {
                require_archived(&self.store.transactions, id)?;
                self.store.transactions.remove(&id);
            }
            EntityKind::Goal => {
                require_archived(&self.store.goals, id)?;
                self.store.goals.remove(&id);
            }
            EntityKind::Debt => {
                require_archived(&self.store.debts, id)?;
                self.store.debts.remove(&id);
            }
            EntityKind::Subscription => {
                require_archived(&self.store.subscriptions, id)?;
                self.store.subscriptions.remove(&id);
            }
        }
        tracing::info!(%kind, %id, "permanently deleted");
        Ok(())
    }

    /// Counts per collection and the oldest archived timestamp.
    pub fn archive_stats(&self) -> ArchiveStats {
        let accounts = count_archived(&self.store.accounts);
        let transactions = count_archived(&self.store.transactions);
        let categories = count_archived(&self.store.categories);
        let goals = count_archived(&self.store.goals);
        let debts = count_archived(&self.store.debts);
        let subscriptions = count_archived(&self.store.subscriptions);

        let oldest = [
            oldest_archived(&self.store.accounts),
            oldest_archived(&self.store.transactions),
            oldest_archived(&self.store.categories),
            oldest_archived(&self.store.goals),
            oldest_archived(&self.store.debts),
            oldest_archived(&self.store.subscriptions),
        ]
        .into_iter()
        .flatten()
        .min();

        ArchiveStats {
            total: accounts + transactions + categories + goals + debts + subscriptions,
            accounts,
            transactions,
            categories,
            goals,
            debts,
            subscriptions,
            oldest,
        }
    }

    /// List one collection's archived records, newest first.
    pub fn list_archived(
        &self,
        kind: EntityKind,
        query: &ArchiveQuery,
    ) -> ResultEngine<Page<ArchivedRecord>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date)
            && end < start
        {
            return Err(EngineError::Validation(
                "end date is before start date".to_string(),
            ));
        }
        if query.tx_kind.is_some() && kind != EntityKind::Transaction {
            return Err(EngineError::Validation(
                "the kind filter only applies to transactions".to_string(),
            ));
        }

        let records = match kind {
            EntityKind::Account => collect_archived(&self.store.accounts, query)
                .into_iter()
                .map(ArchivedRecord::Account)
                .collect(),
            EntityKind::Transaction => {
                let mut transactions = collect_archived(&self.store.transactions, query);
                if let Some(tx_kind) = query.tx_kind {
                    transactions.retain(|tx| tx.kind == tx_kind);
                }
                transactions
                    .into_iter()
                    .map(ArchivedRecord::Transaction)
                    .collect()
            }
            EntityKind::Category => collect_archived(&self.store.categories, query)
                .into_iter()
                .map(ArchivedRecord::Category)
                .collect(),
            EntityKind::Goal => collect_archived(&self.store.goals, query)
                .into_iter()
                .map(ArchivedRecord::Goal)
                .collect(),
            EntityKind::Debt => collect_archived(&self.store.debts, query)
                .into_iter()
                .map(ArchivedRecord::Debt)
                .collect(),
            EntityKind::Subscription => collect_archived(&self.store.subscriptions, query)
                .into_iter()
                .map(ArchivedRecord::Subscription)
                .collect(),
        };
        Ok(paginate(records, query.page))
    }
}

fn archive_in<T: Lifecycle>(
    collection: &mut HashMap<Uuid, T>,
    id: Uuid,
    now: DateTime<Utc>,
) -> ResultEngine<()> {
    match collection.get_mut(&id) {
        Some(record) if record.is_archived() => {
            Err(EngineError::NotFound(format!("{id} is already archived")))
        }
        Some(record) => {
            record.archive(now);
            Ok(())
        }
        None => Err(EngineError::NotFound(id.to_string())),
    }
}

fn restore_in<T: Lifecycle + Clone>(
    collection: &mut HashMap<Uuid, T>,
    id: Uuid,
    now: DateTime<Utc>,
) -> ResultEngine<T> {
    match collection.get_mut(&id) {
        Some(record) if record.is_archived() => {
            record.restore(now);
            Ok(record.clone())
        }
        Some(_) => Err(EngineError::NotFound(format!("{id} is not archived"))),
        None => Err(EngineError::NotFound(id.to_string())),
    }
}

fn require_archived<T: Lifecycle>(collection: &HashMap<Uuid, T>, id: Uuid) -> ResultEngine<()> {
    match collection.get(&id) {
        Some(record) if record.is_archived() => Ok(()),
        Some(_) => Err(EngineError::Conflict(format!(
            "{id} must be archived before it can be deleted"
        ))),
        None => Err(EngineError::NotFound(id.to_string())),
    }
}

fn count_archived<T: Lifecycle>(collection: &HashMap<Uuid, T>) -> u64 {
    collection.values().filter(|r| r.is_archived()).count() as u64
}

fn oldest_archived<T: Lifecycle>(collection: &HashMap<Uuid, T>) -> Option<DateTime<Utc>> {
    collection
        .values()
        .filter(|r| r.is_archived())
        .map(Lifecycle::updated_at)
        .min()
}

fn collect_archived<T: Lifecycle + Clone>(
    collection: &HashMap<Uuid, T>,
    query: &ArchiveQuery,
) -> Vec<T> {
    let needle = query.search.as_deref().map(str::to_lowercase);
    let mut records: Vec<T> = collection
        .values()
        .filter(|record| record.is_archived())
        .filter(|record| match &needle {
            Some(needle) => record.haystack().to_lowercase().contains(needle),
            None => true,
        })
        .filter(|record| query.start_date.is_none_or(|start| record.updated_at() >= start))
        .filter(|record| query.end_date.is_none_or(|end| record.updated_at() <= end))
        .cloned()
        .collect();
    records.sort_by_key(|record| std::cmp::Reverse(record.updated_at()));
    records
}
