//! Entity creation, reads and filtered listings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    Account, AccountKind, AccountStatus, Category, CategoryKind, CategoryStatus, Debt, DebtKind,
    DebtStatus, EngineError, Frequency, Goal, GoalStatus, Money, Page, PageRequest, ResultEngine,
    Subscription, SubscriptionStatus, Transaction, TransactionKind, TransactionStatus,
    store::paginate,
};

use super::{Engine, normalize_optional_text, normalize_required_name};

/// Parameters for creating a subscription.
#[derive(Clone, Debug)]
pub struct NewSubscription {
    pub name: String,
    pub amount: Money,
    pub account_id: Uuid,
    pub frequency: Frequency,
    pub custom_frequency_days: Option<u32>,
    pub next_payment_date: NaiveDate,
}

/// Listing filter for transactions. All fields optional; absent means
/// "do not filter".
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub statuses: Option<Vec<TransactionStatus>>,
    pub account_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
}

impl Engine {
    pub fn new_account(
        &mut self,
        name: &str,
        kind: AccountKind,
        opening_balance: Money,
        currency: Option<&str>,
        now: DateTime<Utc>,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        let currency = normalize_optional_text(currency).unwrap_or_else(|| "EUR".to_string());
        let account = Account::new(name, kind, opening_balance, currency, now);
        let snapshot = account.clone();
        self.store.accounts.insert(account.id, account);
        Ok(snapshot)
    }

    pub fn account(&self, id: Uuid) -> ResultEngine<&Account> {
        self.store
            .accounts
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn list_accounts(
        &self,
        statuses: Option<&[AccountStatus]>,
        page: PageRequest,
    ) -> Page<Account> {
        let mut accounts: Vec<Account> = self
            .store
            .accounts
            .values()
            .filter(|account| match statuses {
                Some(statuses) => statuses.contains(&account.status),
                None => true,
            })
            .cloned()
            .collect();
        sort_newest_first(&mut accounts, |account| (account.created_at, account.id));
        paginate(accounts, page)
    }

    pub fn new_category(
        &mut self,
        name: &str,
        kind: CategoryKind,
        now: DateTime<Utc>,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        let category = Category::new(name, kind, now);
        let snapshot = category.clone();
        self.store.categories.insert(category.id, category);
        Ok(snapshot)
    }

    pub fn list_categories(
        &self,
        statuses: Option<&[CategoryStatus]>,
        kind: Option<CategoryKind>,
        page: PageRequest,
    ) -> Page<Category> {
        let mut categories: Vec<Category> = self
            .store
            .categories
            .values()
            .filter(|category| match statuses {
                Some(statuses) => statuses.contains(&category.status),
                None => true,
            })
            .filter(|category| kind.is_none_or(|kind| category.kind == kind))
            .cloned()
            .collect();
        sort_newest_first(&mut categories, |category| (category.created_at, category.id));
        paginate(categories, page)
    }

    pub fn transaction(&self, id: Uuid) -> ResultEngine<&Transaction> {
        self.store
            .transactions
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Page<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .store
            .transactions
            .values()
            .filter(|tx| match &filter.statuses {
                Some(statuses) => statuses.contains(&tx.status),
                None => true,
            })
            .filter(|tx| {
                filter
                    .account_id
                    .is_none_or(|id| tx.account_id == id || tx.to_account_id == Some(id))
            })
            .filter(|tx| filter.kind.is_none_or(|kind| tx.kind == kind))
            .cloned()
            .collect();
        sort_newest_first(&mut transactions, |tx| (tx.occurred_at, tx.id));
        paginate(transactions, page)
    }

    pub fn new_goal(
        &mut self,
        name: &str,
        target: Money,
        now: DateTime<Utc>,
    ) -> ResultEngine<Goal> {
        let name = normalize_required_name(name, "goal")?;
        if !target.is_positive() {
            return Err(EngineError::Validation(
                "target amount must be > 0".to_string(),
            ));
        }
        let goal = Goal::new(name, target, now);
        let snapshot = goal.clone();
        self.store.goals.insert(goal.id, goal);
        Ok(snapshot)
    }

    pub fn goal(&self, id: Uuid) -> ResultEngine<&Goal> {
        self.store
            .goals
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn list_goals(&self, statuses: Option<&[GoalStatus]>, page: PageRequest) -> Page<Goal> {
        let mut goals: Vec<Goal> = self
            .store
            .goals
            .values()
            .filter(|goal| match statuses {
                Some(statuses) => statuses.contains(&goal.status),
                None => true,
            })
            .cloned()
            .collect();
        sort_newest_first(&mut goals, |goal| (goal.created_at, goal.id));
        paginate(goals, page)
    }

    pub fn new_debt(
        &mut self,
        name: &str,
        kind: DebtKind,
        initial: Money,
        now: DateTime<Utc>,
    ) -> ResultEngine<Debt> {
        let name = normalize_required_name(name, "debt")?;
        if !initial.is_positive() {
            return Err(EngineError::Validation(
                "initial amount must be > 0".to_string(),
            ));
        }
        let debt = Debt::new(name, kind, initial, now);
        let snapshot = debt.clone();
        self.store.debts.insert(debt.id, debt);
        Ok(snapshot)
    }

    pub fn debt(&self, id: Uuid) -> ResultEngine<&Debt> {
        self.store
            .debts
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn list_debts(&self, statuses: Option<&[DebtStatus]>, page: PageRequest) -> Page<Debt> {
        let mut debts: Vec<Debt> = self
            .store
            .debts
            .values()
            .filter(|debt| match statuses {
                Some(statuses) => statuses.contains(&debt.status),
                None => true,
            })
            .cloned()
            .collect();
        sort_newest_first(&mut debts, |debt| (debt.created_at, debt.id));
        paginate(debts, page)
    }

    /// Mark a debt as defaulted, or move a defaulted debt back to active.
    /// `Paid` is derived from payments and can never be set directly.
    pub fn set_debt_status(
        &mut self,
        id: Uuid,
        status: DebtStatus,
        now: DateTime<Utc>,
    ) -> ResultEngine<Debt> {
        let debt = self
            .store
            .debts
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        if debt.is_archived() {
            return Err(EngineError::NotFound(format!("{id} is archived")));
        }
        match (debt.status, status) {
            (DebtStatus::Active, DebtStatus::Defaulted)
            | (DebtStatus::Defaulted, DebtStatus::Active) => {
                debt.status = status;
                debt.updated_at = now;
                Ok(debt.clone())
            }
            _ => Err(EngineError::Validation(format!(
                "cannot move a {:?} debt to {status:?}",
                debt.status
            ))),
        }
    }

    pub fn new_subscription(
        &mut self,
        cmd: NewSubscription,
        now: DateTime<Utc>,
    ) -> ResultEngine<Subscription> {
        let name = normalize_required_name(&cmd.name, "subscription")?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        match (cmd.frequency, cmd.custom_frequency_days) {
            (Frequency::Custom, None) => {
                return Err(EngineError::Validation(
                    "custom frequency requires custom_frequency_days".to_string(),
                ));
            }
            (Frequency::Custom, Some(0)) => {
                return Err(EngineError::Validation(
                    "custom_frequency_days must be > 0".to_string(),
                ));
            }
            (Frequency::Custom, Some(_)) => {}
            (_, Some(_)) => {
                return Err(EngineError::Validation(
                    "custom_frequency_days only applies to the custom frequency".to_string(),
                ));
            }
            (_, None) => {}
        }
        let account = self.account(cmd.account_id)?;
        if !account.is_active() {
            return Err(EngineError::NotFound(format!(
                "{} is not an active account",
                cmd.account_id
            )));
        }

        let subscription = Subscription {
            id: Uuid::new_v4(),
            name,
            amount: cmd.amount,
            account_id: cmd.account_id,
            frequency: cmd.frequency,
            custom_frequency_days: cmd.custom_frequency_days,
            next_payment_date: cmd.next_payment_date,
            payments: Vec::new(),
            status: SubscriptionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let snapshot = subscription.clone();
        self.store.subscriptions.insert(subscription.id, subscription);
        Ok(snapshot)
    }

    pub fn subscription(&self, id: Uuid) -> ResultEngine<&Subscription> {
        self.store
            .subscriptions
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    pub fn list_subscriptions(
        &self,
        statuses: Option<&[SubscriptionStatus]>,
        page: PageRequest,
    ) -> Page<Subscription> {
        let mut subscriptions: Vec<Subscription> = self
            .store
            .subscriptions
            .values()
            .filter(|subscription| match statuses {
                Some(statuses) => statuses.contains(&subscription.status),
                None => true,
            })
            .cloned()
            .collect();
        sort_newest_first(&mut subscriptions, |s| (s.created_at, s.id));
        paginate(subscriptions, page)
    }

    /// Pause, resume or cancel a subscription. `Archived` is reachable
    /// only through the archive operations.
    pub fn set_subscription_status(
        &mut self,
        id: Uuid,
        status: SubscriptionStatus,
        now: DateTime<Utc>,
    ) -> ResultEngine<Subscription> {
        if status == SubscriptionStatus::Archived {
            return Err(EngineError::Validation(
                "archiving goes through the archive endpoints".to_string(),
            ));
        }
        let subscription = self
            .store
            .subscriptions
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        if subscription.is_archived() {
            return Err(EngineError::NotFound(format!("{id} is archived")));
        }
        subscription.status = status;
        subscription.updated_at = now;
        Ok(subscription.clone())
    }
}

fn sort_newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}
