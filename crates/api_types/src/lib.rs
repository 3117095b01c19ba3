//! Request/response types shared by the server and its clients.
//!
//! All monetary fields carry integer minor units and are named
//! `*_minor`. Request bodies accept RFC3339 timestamps with any offset;
//! responses are always UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pagination metadata returned by every listing endpoint.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

/// Body-less acknowledgement for archive/restore.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod account {
    use super::*;

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

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OperationKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: AccountKind,
        #[serde(default)]
        pub opening_balance_minor: i64,
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryEntryView {
        pub operation: OperationKind,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub note: Option<String>,
        pub linked_account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub currency: String,
        pub status: AccountStatus,
        pub history: Vec<HistoryEntryView>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct AccountListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        /// Comma-separated status list, e.g. `active,archived`.
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountListResponse {
        pub accounts: Vec<AccountView>,
        pub pagination: Pagination,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_account_id: Uuid,
        pub to_account_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub from_account: AccountView,
        pub to_account: AccountView,
    }
}

pub mod transaction {
    use super::*;

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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// Absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionPatch {
        pub kind: Option<TransactionKind>,
        pub account_id: Option<Uuid>,
        pub to_account_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        pub category_id: Option<Uuid>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// A transaction with its references resolved to display names. The
    /// name fields survive deletion of the referenced account/category.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub account_name: String,
        pub to_account_id: Option<Uuid>,
        pub to_account_name: Option<String>,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category_id: Option<Uuid>,
        pub category_name: Option<String>,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub status: TransactionStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct TransactionListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub status: Option<String>,
        pub account_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub pagination: Pagination,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryStatus {
        Active,
        Archived,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub status: CategoryStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct CategoryListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub status: Option<String>,
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
        pub pagination: Pagination,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalStatus {
        Active,
        Completed,
        Archived,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalTransferView {
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub from_account_id: Uuid,
        pub from_account_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub progress_minor: i64,
        pub transfers: Vec<GoalTransferView>,
        pub status: GoalStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalTransferNew {
        pub from_account_id: Uuid,
        pub amount_minor: i64,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalFundResponse {
        pub goal: GoalView,
        pub account: super::account::AccountView,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct GoalListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
        pub pagination: Pagination,
    }
}

pub mod debt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtKind {
        Owed,
        Lent,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtStatus {
        Active,
        Paid,
        Defaulted,
        Archived,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub name: String,
        pub kind: DebtKind,
        pub initial_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtPaymentView {
        pub occurred_at: DateTime<Utc>,
        pub amount_minor: i64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub name: String,
        pub kind: DebtKind,
        pub initial_minor: i64,
        pub remaining_minor: i64,
        pub payments: Vec<DebtPaymentView>,
        pub status: DebtStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtPaymentNew {
        pub amount_minor: i64,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// `paid` is derived from payments and cannot be set here.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtStatusUpdate {
        pub status: DebtStatus,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct DebtListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtListResponse {
        pub debts: Vec<DebtView>,
        pub pagination: Pagination,
    }
}

pub mod subscription {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Weekly,
        Biweekly,
        Monthly,
        Quarterly,
        Yearly,
        Custom,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubscriptionStatus {
        Active,
        Paused,
        Cancelled,
        Archived,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentOutcome {
        Success,
        Pending,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionNew {
        pub name: String,
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub frequency: Frequency,
        pub custom_frequency_days: Option<u32>,
        pub next_payment_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionPaymentView {
        pub occurred_at: DateTime<Utc>,
        pub amount_minor: i64,
        pub outcome: PaymentOutcome,
        pub transaction_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub frequency: Frequency,
        pub custom_frequency_days: Option<u32>,
        pub next_payment_date: NaiveDate,
        pub payments: Vec<SubscriptionPaymentView>,
        pub status: SubscriptionStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Defaults to the subscription's own amount when `amount_minor` is
    /// absent.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubscriptionPaymentNew {
        pub amount_minor: Option<i64>,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionPaymentResponse {
        pub subscription: SubscriptionView,
        pub payment: SubscriptionPaymentView,
        pub transaction: super::transaction::TransactionView,
        pub account: super::account::AccountView,
    }

    /// `archived` is reachable only through the archive endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionStatusUpdate {
        pub status: SubscriptionStatus,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct SubscriptionListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubscriptionListResponse {
        pub subscriptions: Vec<SubscriptionView>,
        pub pagination: Pagination,
    }
}

pub mod archive {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    pub struct ArchiveListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub search: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        /// Transaction listings only: income, expense or transfer.
        pub kind: Option<super::transaction::TransactionKind>,
    }

    /// Counts of archived records per collection.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArchiveByKind {
        pub accounts: u64,
        pub transactions: u64,
        pub categories: u64,
        pub goals: u64,
        pub debts: u64,
        pub subscriptions: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArchiveStatsResponse {
        pub total: u64,
        pub by_kind: ArchiveByKind,
        pub oldest: Option<DateTime<Utc>>,
    }

    /// One archived record; the concrete shape depends on the listed
    /// collection.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ArchivedItem {
        Account(super::account::AccountView),
        Transaction(super::transaction::TransactionView),
        Category(super::category::CategoryView),
        Goal(super::goal::GoalView),
        Debt(super::debt::DebtView),
        Subscription(super::subscription::SubscriptionView),
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArchiveListResponse {
        pub items: Vec<ArchivedItem>,
        pub pagination: Pagination,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ArchiveRestoreResponse {
        pub message: String,
        pub item: ArchivedItem,
    }
}
