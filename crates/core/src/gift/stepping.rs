use serde::{Deserialize, Serialize};

use crate::{domain::selection::MealPlan, gift::catalog::TierEntry, gift::policy::GiftPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedAmount {
    pub amount: u64,
    pub target: Option<u64>,
}

pub fn step_amount(
    base_meal_cost: u64,
    meal: MealPlan,
    tier: &TierEntry,
    policy: &GiftPolicy,
) -> SteppedAmount {
    if !meal.attends() {
        let amount = if tier.top_tier { policy.absent_close_amount } else { policy.absent_amount };
        return SteppedAmount { amount, target: None };
    }

    let target = attending_target(base_meal_cost, tier, policy);
    SteppedAmount { amount: policy.steps.snap_up(target), target: Some(target) }
}

pub fn attending_target(base_meal_cost: u64, tier: &TierEntry, policy: &GiftPolicy) -> u64 {
    base_meal_cost.saturating_add(policy.courtesy_margin).saturating_add(tier.bonus)
}
