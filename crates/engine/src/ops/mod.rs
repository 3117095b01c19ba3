use crate::{EngineError, ResultEngine, Store};

mod archive;
mod entities;
mod ledger;
mod resolver;

pub use archive::{ArchiveQuery, ArchiveStats, ArchivedRecord, EntityKind};
pub use entities::{NewSubscription, TransactionFilter};
pub use ledger::{NewTransaction, SubscriptionPaymentOutcome};

/// The engine. Owns the entity store; every read and write goes through
/// the `impl` blocks in this module's submodules.
#[derive(Debug, Default)]
pub struct Engine {
    pub(crate) store: Store,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    store: Store,
}

impl EngineBuilder {
    /// Use an existing store (pre-seeded, or a fresh [`Store::new`]).
    pub fn store(mut self, store: Store) -> EngineBuilder {
        self.store = store;
        self
    }

    /// Construct the `Engine`.
    pub fn build(self) -> Engine {
        Engine { store: self.store }
    }
}
