use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::region::RegionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Venue {
    Hall,
    Hotel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealPlan {
    #[serde(rename = "yes")]
    WithMeal,
    #[serde(rename = "no")]
    WithoutMeal,
    #[serde(rename = "n/a")]
    NotAttending,
}

/// Closeness tiers, declared from least to most close.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Acquaintance,
    Colleague,
    Friend,
    Close,
    Family,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    Region,
    Venue,
    Meal,
    Relationship,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {field} value `{value}`")]
pub struct SelectionParseError {
    pub field: SelectionField,
    pub value: String,
}

/// A snapshot of the four form choices. Any of them may still be unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub region: Option<RegionId>,
    pub venue: Option<Venue>,
    pub meal: Option<MealPlan>,
    pub relationship: Option<Relationship>,
}

impl Selection {
    pub fn complete(
        region: impl Into<RegionId>,
        venue: Venue,
        meal: MealPlan,
        relationship: Relationship,
    ) -> Self {
        Self {
            region: Some(region.into()),
            venue: Some(venue),
            meal: Some(meal),
            relationship: Some(relationship),
        }
    }

    /// Unset fields, in form order.
    pub fn missing_fields(&self) -> Vec<SelectionField> {
        let mut missing = Vec::new();
        if self.region.is_none() {
            missing.push(SelectionField::Region);
        }
        if self.venue.is_none() {
            missing.push(SelectionField::Venue);
        }
        if self.meal.is_none() {
            missing.push(SelectionField::Meal);
        }
        if self.relationship.is_none() {
            missing.push(SelectionField::Relationship);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl Venue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hall => "hall",
            Self::Hotel => "hotel",
        }
    }
}

impl MealPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithMeal => "yes",
            Self::WithoutMeal => "no",
            Self::NotAttending => "n/a",
        }
    }

    pub fn attends(self) -> bool {
        !matches!(self, Self::NotAttending)
    }
}

impl Relationship {
    pub const ALL: [Relationship; 5] =
        [Self::Acquaintance, Self::Colleague, Self::Friend, Self::Close, Self::Family];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Acquaintance => "acquaintance",
            Self::Colleague => "colleague",
            Self::Friend => "friend",
            Self::Close => "close",
            Self::Family => "family",
        }
    }
}

impl SelectionField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Venue => "venue",
            Self::Meal => "meal",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = SelectionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hall" => Ok(Self::Hall),
            "hotel" => Ok(Self::Hotel),
            _ => Err(SelectionParseError { field: SelectionField::Venue, value: value.to_owned() }),
        }
    }
}

impl FromStr for MealPlan {
    type Err = SelectionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::WithMeal),
            "no" => Ok(Self::WithoutMeal),
            "n/a" | "na" => Ok(Self::NotAttending),
            _ => Err(SelectionParseError { field: SelectionField::Meal, value: value.to_owned() }),
        }
    }
}

impl FromStr for Relationship {
    type Err = SelectionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tier| tier.as_str() == normalized).ok_or_else(|| {
            SelectionParseError { field: SelectionField::Relationship, value: value.to_owned() }
        })
    }
}
