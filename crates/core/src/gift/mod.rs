pub mod base_cost;
pub mod catalog;
pub mod message;
pub mod policy;
pub mod stepping;

use tracing::debug;

use crate::{
    config::AppConfig,
    domain::{
        recommendation::{GiftOutcome, IncompleteReason, Recommendation},
        region::RegionTable,
        selection::{Selection, Venue},
    },
    errors::ApplicationError,
};

use self::{
    base_cost::resolve_base_cost,
    catalog::TierCatalog,
    message::{explanation, select_message, MessageContext, HOTEL_NOTE},
    policy::GiftPolicy,
    stepping::step_amount,
};

pub trait GiftEngine: Send + Sync {
    fn evaluate(&self, selection: &Selection) -> GiftOutcome;
}

/// Owns the immutable tables and evaluates selections against them.
#[derive(Clone, Debug)]
pub struct DeterministicGiftEngine {
    regions: RegionTable,
    policy: GiftPolicy,
    catalog: TierCatalog,
}

impl DeterministicGiftEngine {
    pub fn new(regions: RegionTable, policy: GiftPolicy, catalog: TierCatalog) -> Self {
        Self { regions, policy, catalog }
    }

    /// Region table, policy constants and tier catalog from validated config.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        Ok(Self::new(config.region_table()?, config.gift_policy()?, config.tier_catalog()?))
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    pub fn policy(&self) -> &GiftPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }
}

impl GiftEngine for DeterministicGiftEngine {
    fn evaluate(&self, selection: &Selection) -> GiftOutcome {
        compute_gift(selection, &self.regions, &self.policy, &self.catalog)
    }
}

/// Maps a selection to a recommendation. Never fails: anything that cannot
/// be evaluated comes back as [`GiftOutcome::Incomplete`].
pub fn compute_gift(
    selection: &Selection,
    regions: &RegionTable,
    policy: &GiftPolicy,
    catalog: &TierCatalog,
) -> GiftOutcome {
    let (Some(region_id), Some(venue), Some(meal), Some(relationship)) =
        (&selection.region, selection.venue, selection.meal, selection.relationship)
    else {
        let fields = selection.missing_fields();
        debug!(
            event_name = "gift.recommendation.incomplete",
            reason = "missing_fields",
            missing = ?fields,
            "selection is not complete yet"
        );
        return GiftOutcome::Incomplete(IncompleteReason::MissingFields { fields });
    };

    let Some(resolved) = resolve_base_cost(regions, region_id, venue, policy.venue_premium) else {
        debug!(
            event_name = "gift.recommendation.incomplete",
            reason = "unknown_region",
            region_id = %region_id,
            "region is not in the region table"
        );
        return GiftOutcome::Incomplete(IncompleteReason::UnknownRegion {
            region: region_id.clone(),
        });
    };

    let Some(tier) = catalog.entry(relationship) else {
        debug!(
            event_name = "gift.recommendation.incomplete",
            reason = "unsupported_tier",
            tier = relationship.as_str(),
            revision = catalog.revision().as_str(),
            "relationship tier is not part of the active catalog"
        );
        return GiftOutcome::Incomplete(IncompleteReason::UnsupportedTier { tier: relationship });
    };

    let stepped = step_amount(resolved.base_meal_cost, meal, tier, policy);
    let message = catalog.messages().and_then(|messages| {
        select_message(&MessageContext { venue, meal, relationship }, messages)
            .map(|(_, message)| message.clone())
    });

    let mut notes = Vec::new();
    if venue == Venue::Hotel {
        notes.push(HOTEL_NOTE.to_string());
    }

    debug!(
        event_name = "gift.recommendation.computed",
        region_id = %region_id,
        venue = venue.as_str(),
        meal = meal.as_str(),
        tier = relationship.as_str(),
        base_meal_cost = resolved.base_meal_cost,
        amount = stepped.amount,
        "gift recommendation computed"
    );

    GiftOutcome::Recommended(Recommendation {
        amount: stepped.amount,
        message,
        explanation: explanation(&resolved.region.name, resolved.base_meal_cost),
        base_meal_cost: resolved.base_meal_cost,
        target: stepped.target,
        notes,
        revision: catalog.revision(),
    })
}
