use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ApplicationError, DomainError};

const BUNDLED_REGIONS: &str = include_str!("../../data/regions.json");

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub String);

impl RegionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionEntry {
    pub id: RegionId,
    pub name: String,
    pub avg_meal_cost: u64,
}

/// Read-only lookup of average per-head meal cost by region, in table order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTable {
    published_on: NaiveDate,
    source: String,
    regions: Vec<RegionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionTableDocument {
    published_on: NaiveDate,
    source: String,
    regions: Vec<RegionEntry>,
}

impl RegionTable {
    pub fn new(
        published_on: NaiveDate,
        source: impl Into<String>,
        regions: Vec<RegionEntry>,
    ) -> Result<Self, DomainError> {
        if regions.is_empty() {
            return Err(DomainError::EmptyRegionTable);
        }

        let mut seen = HashSet::new();
        for region in &regions {
            if !seen.insert(region.id.clone()) {
                return Err(DomainError::DuplicateRegion(region.id.clone()));
            }
            if region.avg_meal_cost == 0 {
                return Err(DomainError::NonPositiveMealCost(region.id.clone()));
            }
        }

        Ok(Self { published_on, source: source.into(), regions })
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self, ApplicationError> {
        Self::from_json(BUNDLED_REGIONS)
    }

    pub fn from_json(raw: &str) -> Result<Self, ApplicationError> {
        let document = serde_json::from_str::<RegionTableDocument>(raw)
            .map_err(|error| ApplicationError::RegionData(error.to_string()))?;
        Ok(Self::new(document.published_on, document.source, document.regions)?)
    }

    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            ApplicationError::RegionData(format!(
                "could not read region table `{}`: {error}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn find(&self, region_id: &RegionId) -> Option<&RegionEntry> {
        self.regions.iter().find(|region| &region.id == region_id)
    }

    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    pub fn published_on(&self) -> NaiveDate {
        self.published_on
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{RegionEntry, RegionId, RegionTable};
    use crate::errors::{ApplicationError, DomainError};

    fn entry(id: &str, avg_meal_cost: u64) -> RegionEntry {
        RegionEntry { id: RegionId::from(id), name: id.to_uppercase(), avg_meal_cost }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 30).unwrap_or_default()
    }

    #[test]
    fn bundled_table_loads_and_keeps_order() {
        let table = RegionTable::bundled().expect("bundled table should be valid");

        assert_eq!(table.len(), 17);
        assert_eq!(table.regions()[0].id, RegionId::from("seoul"));
        assert_eq!(table.published_on(), date());
        assert!(table.regions().iter().all(|region| region.avg_meal_cost > 0));
        assert!(table.source().starts_with("illustrative placeholder"), "{}", table.source());
    }

    #[test]
    fn find_returns_matching_region_only() {
        let table =
            RegionTable::new(date(), "test", vec![entry("seoul", 60_000), entry("busan", 50_000)])
                .expect("valid table");

        assert_eq!(table.find(&RegionId::from("busan")).map(|r| r.avg_meal_cost), Some(50_000));
        assert!(table.find(&RegionId::from("atlantis")).is_none());
    }

    #[test]
    fn rejects_empty_duplicate_and_zero_cost_tables() {
        assert_eq!(
            RegionTable::new(date(), "test", Vec::new()),
            Err(DomainError::EmptyRegionTable)
        );

        let duplicate =
            RegionTable::new(date(), "test", vec![entry("seoul", 60_000), entry("seoul", 1)]);
        assert_eq!(duplicate, Err(DomainError::DuplicateRegion(RegionId::from("seoul"))));

        let zero = RegionTable::new(date(), "test", vec![entry("jeju", 0)]);
        assert_eq!(zero, Err(DomainError::NonPositiveMealCost(RegionId::from("jeju"))));
    }

    #[test]
    fn from_json_reads_camel_case_documents() {
        let raw = r#"{
            "publishedOn": "2026-01-30",
            "source": "fixture",
            "regions": [{ "id": "test", "name": "테스트", "avgMealCost": 90000 }]
        }"#;

        let table = RegionTable::from_json(raw).expect("fixture should parse");
        assert_eq!(table.find(&RegionId::from("test")).map(|r| r.avg_meal_cost), Some(90_000));
        assert_eq!(table.source(), "fixture");
    }

    #[test]
    fn malformed_json_is_a_region_data_error() {
        let error = RegionTable::from_json("{ not json").expect_err("should fail");
        assert!(matches!(error, ApplicationError::RegionData(_)));
    }
}
