use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{
    region::{RegionEntry, RegionId, RegionTable},
    selection::Venue,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedBaseCost<'a> {
    pub region: &'a RegionEntry,
    pub base_meal_cost: u64,
}

/// Looks up the region and applies the venue premium. `None` for unknown ids.
pub fn resolve_base_cost<'a>(
    regions: &'a RegionTable,
    region_id: &RegionId,
    venue: Venue,
    venue_premium: Decimal,
) -> Option<ResolvedBaseCost<'a>> {
    let region = regions.find(region_id)?;
    Some(ResolvedBaseCost {
        region,
        base_meal_cost: base_meal_cost(region.avg_meal_cost, venue, venue_premium),
    })
}

pub fn base_meal_cost(avg_meal_cost: u64, venue: Venue, venue_premium: Decimal) -> u64 {
    match venue {
        Venue::Hall => avg_meal_cost,
        Venue::Hotel => (Decimal::from(avg_meal_cost) * venue_premium)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{base_meal_cost, resolve_base_cost};
    use crate::{
        domain::{
            region::{RegionEntry, RegionId, RegionTable},
            selection::Venue,
        },
        gift::policy::DEFAULT_VENUE_PREMIUM,
    };

    #[test]
    fn hall_uses_the_regional_average_unchanged() {
        assert_eq!(base_meal_cost(47_000, Venue::Hall, DEFAULT_VENUE_PREMIUM), 47_000);
    }

    #[test]
    fn hotel_scales_by_premium() {
        assert_eq!(base_meal_cost(90_000, Venue::Hotel, DEFAULT_VENUE_PREMIUM), 135_000);
    }

    #[test]
    fn hotel_rounds_half_up() {
        assert_eq!(base_meal_cost(45_001, Venue::Hotel, DEFAULT_VENUE_PREMIUM), 67_502);
        assert_eq!(base_meal_cost(3, Venue::Hotel, DEFAULT_VENUE_PREMIUM), 5);
        assert_eq!(base_meal_cost(10, Venue::Hotel, Decimal::new(125, 2)), 13);
    }

    #[test]
    fn unknown_region_resolves_to_none() {
        let table = RegionTable::new(
            NaiveDate::from_ymd_opt(2026, 1, 30).unwrap_or_default(),
            "test",
            vec![RegionEntry {
                id: RegionId::from("seoul"),
                name: "서울".to_owned(),
                avg_meal_cost: 60_000,
            }],
        )
        .expect("valid table");

        assert!(resolve_base_cost(
            &table,
            &RegionId::from("pyongyang"),
            Venue::Hall,
            DEFAULT_VENUE_PREMIUM
        )
        .is_none());

        let resolved =
            resolve_base_cost(&table, &RegionId::from("seoul"), Venue::Hotel, DEFAULT_VENUE_PREMIUM)
                .expect("seoul resolves");
        assert_eq!(resolved.base_meal_cost, 90_000);
        assert_eq!(resolved.region.name, "서울");
    }
}
