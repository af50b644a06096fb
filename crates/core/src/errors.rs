use thiserror::Error;

use crate::{
    config::ConfigError,
    domain::{region::RegionId, selection::Relationship},
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("region table must contain at least one region")]
    EmptyRegionTable,
    #[error("duplicate region id `{0}` in region table")]
    DuplicateRegion(RegionId),
    #[error("region `{0}` must have a positive average meal cost")]
    NonPositiveMealCost(RegionId),
    #[error("step table must contain at least one amount")]
    EmptyStepTable,
    #[error("step table must be strictly increasing (violated at index {index})")]
    StepTableNotIncreasing { index: usize },
    #[error("not-attending amount {0} is not one of the configured steps")]
    AbsentAmountNotAStep(u64),
    #[error("tier {0:?} appears more than once in the catalog")]
    DuplicateTier(Relationship),
    #[error("tier {tier:?} bonus is lower than a less close tier")]
    DecreasingBonus { tier: Relationship },
    #[error("tier {0:?} has no message in the catalog")]
    MissingTierMessage(Relationship),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("region data failure: {0}")]
    RegionData(String),
}

impl ApplicationError {
    /// Stable machine-readable class used in CLI payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Config(_) => "config_validation",
            Self::RegionData(_) => "region_data",
        }
    }
}
