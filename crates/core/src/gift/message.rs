use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        recommendation::GiftMessage,
        selection::{MealPlan, Relationship, Venue},
    },
    format::format_manwon,
    gift::catalog::MessageCatalog,
};

pub const EXPLANATION_TEMPLATE: &str =
    "선택하신 {{region}} 지역의 평균 식대(약 {{meal_cost}}만원)를 고려하여 산출되었습니다.";

pub const HOTEL_NOTE: &str = "* 호텔 식대는 일반 예식장보다 높게 반영되었습니다.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRule {
    PremiumVenue,
    NoCatering,
    ByRelationship,
}

/// Evaluated top to bottom; the first rule that yields a message wins.
pub const MESSAGE_RULES: [MessageRule; 3] =
    [MessageRule::PremiumVenue, MessageRule::NoCatering, MessageRule::ByRelationship];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageContext {
    pub venue: Venue,
    pub meal: MealPlan,
    pub relationship: Relationship,
}

impl MessageRule {
    pub fn apply<'a>(
        self,
        context: &MessageContext,
        catalog: &'a MessageCatalog,
    ) -> Option<&'a GiftMessage> {
        match self {
            Self::PremiumVenue => {
                (context.venue == Venue::Hotel).then_some(&catalog.premium_venue)
            }
            Self::NoCatering => {
                (context.meal != MealPlan::WithMeal).then_some(&catalog.no_catering)
            }
            Self::ByRelationship => catalog.tiers.get(&context.relationship),
        }
    }
}

pub fn select_message<'a>(
    context: &MessageContext,
    catalog: &'a MessageCatalog,
) -> Option<(MessageRule, &'a GiftMessage)> {
    MESSAGE_RULES
        .iter()
        .find_map(|rule| rule.apply(context, catalog).map(|message| (*rule, message)))
}

pub fn explanation(region_name: &str, base_meal_cost: u64) -> String {
    let meal_cost = format_manwon(base_meal_cost);
    substitute_variables(
        EXPLANATION_TEMPLATE,
        &[("region", region_name), ("meal_cost", meal_cost.as_str())],
    )
}

/// Single left-to-right pass; substituted values are never rescanned, and
/// unknown placeholders are kept verbatim.
fn substitute_variables(template: &str, variables: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after_open[..end];
        match variables.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + end + 4]),
        }
        rest = &after_open[end + 2..];
    }

    output.push_str(rest);
    output
}
