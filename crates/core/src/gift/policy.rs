use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::DomainError;

pub const DEFAULT_STEPS: [u64; 8] =
    [30_000, 50_000, 70_000, 100_000, 150_000, 200_000, 300_000, 500_000];

/// Added on top of the per-head meal cost for attending guests.
pub const DEFAULT_COURTESY_MARGIN: u64 = 10_000;

/// Hotel catering multiplier, 1.5.
pub const DEFAULT_VENUE_PREMIUM: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

pub const DEFAULT_ABSENT_AMOUNT: u64 = 50_000;
pub const DEFAULT_ABSENT_CLOSE_AMOUNT: u64 = 100_000;

/// Conventional gift denominations, strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepTable(Vec<u64>);

impl StepTable {
    pub fn new(steps: Vec<u64>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::EmptyStepTable);
        }

        if let Some(index) = steps.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(DomainError::StepTableNotIncreasing { index: index + 1 });
        }

        Ok(Self(steps))
    }

    /// Smallest step at or above `target`, or the largest step when none is.
    pub fn snap_up(&self, target: u64) -> u64 {
        self.0.iter().copied().find(|step| *step >= target).unwrap_or_else(|| self.largest())
    }

    pub fn largest(&self) -> u64 {
        self.0.last().copied().unwrap_or_default()
    }

    pub fn contains(&self, amount: u64) -> bool {
        self.0.binary_search(&amount).is_ok()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl Default for StepTable {
    fn default() -> Self {
        Self(DEFAULT_STEPS.to_vec())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GiftPolicy {
    pub steps: StepTable,
    pub courtesy_margin: u64,
    pub venue_premium: Decimal,
    pub absent_amount: u64,
    pub absent_close_amount: u64,
}

impl Default for GiftPolicy {
    fn default() -> Self {
        Self {
            steps: StepTable::default(),
            courtesy_margin: DEFAULT_COURTESY_MARGIN,
            venue_premium: DEFAULT_VENUE_PREMIUM,
            absent_amount: DEFAULT_ABSENT_AMOUNT,
            absent_close_amount: DEFAULT_ABSENT_CLOSE_AMOUNT,
        }
    }
}

impl GiftPolicy {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.venue_premium < Decimal::ONE {
            return Err(DomainError::InvariantViolation(
                "venue premium must be at least 1".to_string(),
            ));
        }

        if self.absent_amount > self.absent_close_amount {
            return Err(DomainError::InvariantViolation(
                "absent amount must not exceed the close-tier absent amount".to_string(),
            ));
        }

        if let Some(amount) = [self.absent_amount, self.absent_close_amount]
            .into_iter()
            .find(|amount| !self.steps.contains(*amount))
        {
            return Err(DomainError::AbsentAmountNotAStep(amount));
        }

        Ok(())
    }
}
