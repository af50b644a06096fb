pub mod config;
pub mod domain;
pub mod errors;
pub mod format;
pub mod gift;
pub mod share;

pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::recommendation::{GiftMessage, GiftOutcome, IncompleteReason, Recommendation};
pub use domain::region::{RegionEntry, RegionId, RegionTable};
pub use domain::selection::{MealPlan, Relationship, Selection, SelectionField, Venue};
pub use errors::{ApplicationError, DomainError};
pub use gift::catalog::{CatalogRevision, TierCatalog};
pub use gift::policy::{GiftPolicy, StepTable};
pub use gift::{compute_gift, DeterministicGiftEngine, GiftEngine};
