//! Shareable links.
//!
//! A selection round-trips through four short query parameters so a shared
//! link reproduces the same recommendation when it is evaluated again.

use thiserror::Error;

use crate::{
    domain::{
        recommendation::Recommendation,
        region::RegionId,
        selection::{Selection, SelectionParseError},
    },
    format::format_won,
};

pub const REGION_PARAM: &str = "region";
pub const VENUE_PARAM: &str = "venue";
pub const MEAL_PARAM: &str = "meal";
pub const RELATIONSHIP_PARAM: &str = "rel";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error(transparent)]
    InvalidValue(#[from] SelectionParseError),
    #[error("region id `{0}` contains characters outside [a-z0-9_-]")]
    InvalidRegionId(String),
    #[error("malformed percent escape in `{0}`")]
    MalformedEscape(String),
}

/// Writes the present fields in a fixed order, skipping unset ones.
pub fn encode_query(selection: &Selection) -> String {
    let mut pairs = Vec::with_capacity(4);
    if let Some(region) = &selection.region {
        pairs.push(format!("{REGION_PARAM}={}", region.as_str()));
    }
    if let Some(venue) = selection.venue {
        pairs.push(format!("{VENUE_PARAM}={}", venue.as_str()));
    }
    if let Some(meal) = selection.meal {
        pairs.push(format!("{MEAL_PARAM}={}", escape(meal.as_str())));
    }
    if let Some(relationship) = selection.relationship {
        pairs.push(format!("{RELATIONSHIP_PARAM}={}", relationship.as_str()));
    }
    pairs.join("&")
}

/// Parses a query string back into a selection. Unknown keys are ignored and
/// empty values leave the field unset; a later duplicate key wins.
pub fn decode_query(query: &str) -> Result<Selection, ShareError> {
    let query = query.trim().trim_start_matches('?');
    let mut selection = Selection::default();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = unescape(raw_value)?;
        if value.is_empty() {
            continue;
        }

        match key {
            REGION_PARAM => selection.region = Some(parse_region_id(&value)?),
            VENUE_PARAM => selection.venue = Some(value.parse()?),
            MEAL_PARAM => selection.meal = Some(value.parse()?),
            RELATIONSHIP_PARAM => selection.relationship = Some(value.parse()?),
            _ => {}
        }
    }

    Ok(selection)
}

pub fn share_text(recommendation: &Recommendation) -> String {
    format!("내 추천 축의금은 {}입니다!", format_won(recommendation.amount))
}

fn parse_region_id(value: &str) -> Result<RegionId, ShareError> {
    let valid = value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-');
    if !valid {
        return Err(ShareError::InvalidRegionId(value.to_string()));
    }
    Ok(RegionId(value.to_string()))
}

fn escape(value: &str) -> String {
    value.replace('/', "%2F")
}

fn unescape(value: &str) -> Result<String, ShareError> {
    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let hex = bytes
                    .get(index + 1..index + 3)
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| ShareError::MalformedEscape(value.to_string()))?;
                output.push(hex);
                index += 3;
            }
            b'+' => {
                output.push(b' ');
                index += 1;
            }
            byte => {
                output.push(byte);
                index += 1;
            }
        }
    }

    String::from_utf8(output).map_err(|_| ShareError::MalformedEscape(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{decode_query, encode_query, share_text, ShareError};
    use crate::{
        domain::{
            recommendation::Recommendation,
            selection::{MealPlan, Relationship, Selection, SelectionField, Venue},
        },
        gift::catalog::CatalogRevision,
    };

    #[test]
    fn encodes_fields_in_fixed_order() {
        let selection =
            Selection::complete("seoul", Venue::Hotel, MealPlan::NotAttending, Relationship::Close);

        assert_eq!(encode_query(&selection), "region=seoul&venue=hotel&meal=n%2Fa&rel=close");
    }

    #[test]
    fn partial_selection_skips_unset_fields() {
        let selection = Selection { venue: Some(Venue::Hall), ..Selection::default() };
        assert_eq!(encode_query(&selection), "venue=hall");
    }

    #[test]
    fn decodes_a_shared_link() {
        let selection = decode_query("?region=busan&venue=hall&meal=yes&rel=family&utm=kakao")
            .expect("valid query");

        assert_eq!(
            selection,
            Selection::complete("busan", Venue::Hall, MealPlan::WithMeal, Relationship::Family)
        );
    }

    #[test]
    fn decodes_escaped_and_raw_not_attending_tokens() {
        for query in ["meal=n%2Fa", "meal=n/a", "meal=n%2fa"] {
            let selection = decode_query(query).expect("valid query");
            assert_eq!(selection.meal, Some(MealPlan::NotAttending), "{query}");
        }
    }

    #[test]
    fn empty_values_leave_fields_unset() {
        let selection = decode_query("region=&venue=hotel").expect("valid query");
        assert_eq!(selection.region, None);
        assert_eq!(selection.venue, Some(Venue::Hotel));
        assert_eq!(selection.missing_fields().first(), Some(&SelectionField::Region));
    }

    #[test]
    fn rejects_unknown_values_and_bad_escapes() {
        assert!(matches!(decode_query("venue=castle"), Err(ShareError::InvalidValue(_))));
        assert!(matches!(decode_query("meal=%ZZ"), Err(ShareError::MalformedEscape(_))));
        assert_eq!(
            decode_query("region=Seoul%20City"),
            Err(ShareError::InvalidRegionId("Seoul City".to_string()))
        );
    }

    #[test]
    fn encoded_query_decodes_to_the_same_selection() {
        let selection = Selection::complete(
            "jeju",
            Venue::Hall,
            MealPlan::WithoutMeal,
            Relationship::Colleague,
        );
        assert_eq!(decode_query(&encode_query(&selection)), Ok(selection));
    }

    #[test]
    fn share_text_uses_grouped_won() {
        let recommendation = Recommendation {
            amount: 150_000,
            message: None,
            explanation: String::new(),
            base_meal_cost: 135_000,
            target: Some(145_000),
            notes: Vec::new(),
            revision: CatalogRevision::Extended,
        };

        assert_eq!(share_text(&recommendation), "내 추천 축의금은 150,000원입니다!");
    }
}
