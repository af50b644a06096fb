use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        region::RegionId,
        selection::{Relationship, SelectionField},
    },
    gift::catalog::CatalogRevision,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftMessage {
    pub title: String,
    pub body: String,
}

impl GiftMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub amount: u64,
    pub message: Option<GiftMessage>,
    pub explanation: String,
    pub base_meal_cost: u64,
    /// Fair amount before snapping; absent when the guest does not attend.
    pub target: Option<u64>,
    pub notes: Vec<String>,
    pub revision: CatalogRevision,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncompleteReason {
    MissingFields { fields: Vec<SelectionField> },
    UnknownRegion { region: RegionId },
    UnsupportedTier { tier: Relationship },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GiftOutcome {
    Recommended(Recommendation),
    Incomplete(IncompleteReason),
}

impl GiftOutcome {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Recommended(recommendation) => Some(recommendation),
            Self::Incomplete(_) => None,
        }
    }

    pub fn into_recommendation(self) -> Option<Recommendation> {
        match self {
            Self::Recommended(recommendation) => Some(recommendation),
            Self::Incomplete(_) => None,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }
}
