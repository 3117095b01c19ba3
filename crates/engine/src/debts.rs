//! Debts and their repayment history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Direction of the debt: money the user owes, or money lent out.
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

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebtPayment {
    pub occurred_at: DateTime<Utc>,
    pub amount: Money,
    pub note: Option<String>,
}

/// A debt. `initial` is immutable once created; `remaining` only moves
/// down through [`record_payment`] and never below zero.
///
/// [`record_payment`]: Debt::record_payment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub name: String,
    pub kind: DebtKind,
    pub initial: Money,
    pub remaining: Money,
    pub payments: Vec<DebtPayment>,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(name: String, kind: DebtKind, initial: Money, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            initial,
            remaining: initial,
            payments: Vec::new(),
            status: DebtStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status == DebtStatus::Archived
    }

    /// Record a repayment. Overpayment is rejected, so `remaining` can
    /// never go negative. The status flips to `Paid` exactly when the
    /// remaining amount reaches zero.
    pub fn record_payment(
        &mut self,
        amount: Money,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<&DebtPayment> {
        if amount > self.remaining {
            return Err(EngineError::InsufficientFunds(format!(
                "payment of {amount} exceeds the remaining {}",
                self.remaining
            )));
        }

        self.remaining -= amount;
        self.payments.push(DebtPayment {
            occurred_at,
            amount,
            note,
        });
        if self.remaining.is_zero() {
            self.status = DebtStatus::Paid;
        }
        self.updated_at = now;

        Ok(&self.payments[self.payments.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn debt(initial: i64) -> Debt {
        Debt::new(
            String::from("Car loan"),
            DebtKind::Owed,
            Money::new(initial),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    #[test]
    fn pays_down_to_zero_and_flips_to_paid() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let mut debt = debt(1000_00);

        debt.record_payment(Money::new(400_00), None, now, now).unwrap();
        assert_eq!(debt.remaining, Money::new(600_00));
        assert_eq!(debt.status, DebtStatus::Active);

        debt.record_payment(Money::new(600_00), None, now, now).unwrap();
        assert_eq!(debt.remaining, Money::ZERO);
        assert_eq!(debt.status, DebtStatus::Paid);
        assert_eq!(debt.payments.len(), 2);
    }

    #[test]
    fn rejects_overpayment() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let mut debt = debt(100_00);

        let err = debt
            .record_payment(Money::new(150_00), None, now, now)
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientFunds(_)));
        assert_eq!(debt.remaining, Money::new(100_00));
        assert!(debt.payments.is_empty());
    }
}
