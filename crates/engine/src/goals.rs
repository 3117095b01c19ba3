//! Savings goals funded by transfers out of accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Archived,
}

/// One funding event. `from_account_label` is the resolver's frozen
/// display name, set when the source account is permanently deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalTransfer {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub from_account_id: Uuid,
    pub from_account_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target: Money,
    /// Accumulated funding. Monotonically non-decreasing.
    pub progress: Money,
    pub transfers: Vec<GoalTransfer>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: String, target: Money, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            target,
            progress: Money::ZERO,
            transfers: Vec::new(),
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a funding transfer. Flips the status to `Completed` exactly
    /// when progress reaches the target.
    pub fn record_transfer(
        &mut self,
        amount: Money,
        from_account_id: Uuid,
        occurred_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        self.progress += amount;
        self.transfers.push(GoalTransfer {
            amount,
            occurred_at,
            from_account_id,
            from_account_label: None,
        });
        if self.status == GoalStatus::Active && self.progress >= self.target {
            self.status = GoalStatus::Completed;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn completes_exactly_at_target() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let mut goal = Goal::new(String::from("Bike"), Money::new(500_00), now);
        let account = Uuid::new_v4();

        goal.record_transfer(Money::new(300_00), account, now, now);
        assert_eq!(goal.status, GoalStatus::Active);

        goal.record_transfer(Money::new(200_00), account, now, now);
        assert_eq!(goal.status, GoalStatus::Completed);
        assert_eq!(goal.progress, Money::new(500_00));
        assert_eq!(goal.transfers.len(), 2);
    }
}
