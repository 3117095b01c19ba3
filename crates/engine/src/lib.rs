//! Core engine for the tally personal-finance backend.
//!
//! The engine owns the in-memory [`Store`] and is the only writer to it.
//! Three concerns live behind one API surface:
//!
//! - the **ledger**: every balance mutation (transactions, transfers,
//!   subscription and debt payments, goal funding) flows through
//!   operations that keep `Account::balance` and `Account::history` in
//!   sync atomically;
//! - the **archive**: soft-delete, restore and hard-delete lifecycle for
//!   all six entity collections, plus archive statistics and listing;
//! - the **reference resolver**: when an account or category is
//!   permanently deleted, its display name is frozen into every record
//!   that referenced it.
//!
//! The engine is synchronous and has no interior locking: the server
//! wraps it in one `RwLock`, which serializes every write operation
//! end-to-end. That is what makes the two-account transfer and the
//! reverse-then-apply transaction update atomic with respect to readers.

pub use accounts::{Account, AccountKind, AccountStatus, HistoryEntry, OperationKind};
pub use categories::{Category, CategoryKind, CategoryStatus};
pub use debts::{Debt, DebtKind, DebtPayment, DebtStatus};
pub use error::EngineError;
pub use goals::{Goal, GoalStatus, GoalTransfer};
pub use money::Money;
pub use ops::{
    ArchiveQuery, ArchiveStats, ArchivedRecord, Engine, EngineBuilder, EntityKind, NewSubscription,
    NewTransaction, SubscriptionPaymentOutcome, TransactionFilter,
};
pub use store::{Page, PageRequest, Store};
pub use subscriptions::{
    Frequency, PaymentOutcome, Subscription, SubscriptionPayment, SubscriptionStatus,
};
pub use transactions::{Transaction, TransactionKind, TransactionPatch, TransactionStatus};

mod accounts;
mod categories;
mod debts;
mod error;
mod goals;
mod money;
mod ops;
mod store;
mod subscriptions;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
