//! The in-memory entity store.
//!
//! Six independently keyed collections, owned by the [`Engine`] and
//! injected at construction. All mutation goes through engine operations;
//! the store itself enforces nothing beyond key uniqueness. Swapping in a
//! persistent backend means replacing this type behind the same seam.
//!
//! [`Engine`]: crate::Engine

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Account, AccountStatus, Category, CategoryStatus, Debt, DebtStatus, EngineError, Goal,
    GoalStatus, ResultEngine, Subscription, SubscriptionStatus, Transaction, TransactionStatus,
};

#[derive(Debug, Default)]
pub struct Store {
    pub accounts: HashMap<Uuid, Account>,
    pub transactions: HashMap<Uuid, Transaction>,
    pub categories: HashMap<Uuid, Category>,
    pub goals: HashMap<Uuid, Goal>,
    pub debts: HashMap<Uuid, Debt>,
    pub subscriptions: HashMap<Uuid, Subscription>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Validated pagination parameters. `page` is 1-based.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    pub fn new(page: u64, limit: u64) -> ResultEngine<Self> {
        if page == 0 {
            return Err(EngineError::Validation("page must be >= 1".to_string()));
        }
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(EngineError::Validation(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self { page, limit })
    }

    fn offset(self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }
}

/// One page of results plus the pre-pagination total.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

pub(crate) fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit as usize)
        .collect();
    Page { items, total }
}

/// Archive lifecycle seams shared by every entity type: the archive
/// manager never needs to know which concrete status enum a record uses.
///
/// `restore` always lands on the plain active status, discarding any
/// terminal status (`Paid`, `Completed`, `Cancelled`) the record had
/// before archiving.
pub(crate) trait Lifecycle {
    fn is_archived(&self) -> bool;
    fn archive(&mut self, now: DateTime<Utc>);
    fn restore(&mut self, now: DateTime<Utc>);
    fn updated_at(&self) -> DateTime<Utc>;
    /// Text the archive search matches against.
    fn haystack(&self) -> &str;
}

impl Lifecycle for Account {
    fn is_archived(&self) -> bool {
        self.status == AccountStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = AccountStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = AccountStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        &self.name
    }
}

impl Lifecycle for Transaction {
    fn is_archived(&self) -> bool {
        self.status == TransactionStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = TransactionStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = TransactionStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}

impl Lifecycle for Category {
    fn is_archived(&self) -> bool {
        self.status == CategoryStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = CategoryStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = CategoryStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        &self.name
    }
}

impl Lifecycle for Goal {
    fn is_archived(&self) -> bool {
        self.status == GoalStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = GoalStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = GoalStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        &self.name
    }
}

impl Lifecycle for Debt {
    fn is_archived(&self) -> bool {
        self.status == DebtStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = DebtStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = DebtStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        &self.name
    }
}

impl Lifecycle for Subscription {
    fn is_archived(&self) -> bool {
        self.status == SubscriptionStatus::Archived
    }

    fn archive(&mut self, now: DateTime<Utc>) {
        self.status = SubscriptionStatus::Archived;
        self.updated_at = now;
    }

    fn restore(&mut self, now: DateTime<Utc>) {
        self.status = SubscriptionStatus::Active;
        self.updated_at = now;
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn haystack(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(3, 100).is_ok());
    }

    #[test]
    fn paginate_slices_and_counts() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(items, PageRequest { page: 3, limit: 10 });
        assert_eq!(page.total, 25);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = paginate(vec![1, 2, 3], PageRequest { page: 5, limit: 10 });
        assert_eq!(page.total, 3);
        assert!(page.items.is_empty());
    }
}
