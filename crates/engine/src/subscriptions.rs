//! Recurring subscriptions and their billing schedule.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Billing period. `Custom` uses the subscription's
/// `custom_frequency_days`.
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

impl Frequency {
    /// The billing date one period after `from`.
    ///
    /// Month-based periods clamp to the end of the month when the day
    /// does not exist (Jan 31 + 1 month = Feb 28/29).
    pub fn advance(self, from: NaiveDate, custom_days: Option<u32>) -> ResultEngine<NaiveDate> {
        let overflow = || EngineError::Validation("billing date out of range".to_string());
        match self {
            Frequency::Weekly => from.checked_add_days(Days::new(7)).ok_or_else(overflow),
            Frequency::Biweekly => from.checked_add_days(Days::new(14)).ok_or_else(overflow),
            Frequency::Monthly => from.checked_add_months(Months::new(1)).ok_or_else(overflow),
            Frequency::Quarterly => from.checked_add_months(Months::new(3)).ok_or_else(overflow),
            Frequency::Yearly => from.checked_add_months(Months::new(12)).ok_or_else(overflow),
            Frequency::Custom => {
                let days = custom_days.ok_or_else(|| {
                    EngineError::Validation(
                        "custom frequency requires custom_frequency_days".to_string(),
                    )
                })?;
                if days == 0 {
                    return Err(EngineError::Validation(
                        "custom_frequency_days must be > 0".to_string(),
                    ));
                }
                from.checked_add_days(Days::new(u64::from(days)))
                    .ok_or_else(overflow)
            }
        }
    }
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

/// One billed payment. A successful payment links the ledger transaction
/// that debited the account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPayment {
    pub occurred_at: DateTime<Utc>,
    pub amount: Money,
    pub outcome: PaymentOutcome,
    pub transaction_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: Money,
    pub account_id: Uuid,
    pub frequency: Frequency,
    pub custom_frequency_days: Option<u32>,
    pub next_payment_date: NaiveDate,
    pub payments: Vec<SubscriptionPayment>,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status == SubscriptionStatus::Archived
    }

    /// The billing date after the next one, per the configured frequency.
    pub fn following_payment_date(&self) -> ResultEngine<NaiveDate> {
        self.frequency
            .advance(self.next_payment_date, self.custom_frequency_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_periods() {
        assert_eq!(
            Frequency::Weekly.advance(date(2024, 1, 10), None).unwrap(),
            date(2024, 1, 17)
        );
        assert_eq!(
            Frequency::Biweekly.advance(date(2024, 1, 10), None).unwrap(),
            date(2024, 1, 24)
        );
        assert_eq!(
            Frequency::Monthly.advance(date(2024, 1, 10), None).unwrap(),
            date(2024, 2, 10)
        );
        assert_eq!(
            Frequency::Quarterly.advance(date(2024, 1, 10), None).unwrap(),
            date(2024, 4, 10)
        );
        assert_eq!(
            Frequency::Yearly.advance(date(2024, 1, 10), None).unwrap(),
            date(2025, 1, 10)
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_month() {
        assert_eq!(
            Frequency::Monthly.advance(date(2024, 1, 31), None).unwrap(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn custom_requires_days() {
        assert_eq!(
            Frequency::Custom.advance(date(2024, 1, 10), Some(10)).unwrap(),
            date(2024, 1, 20)
        );
        assert!(Frequency::Custom.advance(date(2024, 1, 10), None).is_err());
        assert!(Frequency::Custom.advance(date(2024, 1, 10), Some(0)).is_err());
    }
}
