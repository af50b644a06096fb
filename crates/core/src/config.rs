use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::region::RegionTable,
    errors::ApplicationError,
    gift::{
        catalog::{CatalogRevision, TierCatalog},
        policy::{
            GiftPolicy, StepTable, DEFAULT_ABSENT_AMOUNT, DEFAULT_ABSENT_CLOSE_AMOUNT,
            DEFAULT_COURTESY_MARGIN, DEFAULT_STEPS, DEFAULT_VENUE_PREMIUM,
        },
    },
};

pub const CONFIG_FILE_NAME: &str = "chukui.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub regions: RegionsConfig,
    pub policy: PolicyConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionsConfig {
    /// JSON region table replacing the bundled one.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolicyConfig {
    pub steps: Vec<u64>,
    pub courtesy_margin: u64,
    pub venue_premium: Decimal,
    pub absent_amount: u64,
    pub absent_close_amount: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub revision: CatalogRevision,
    pub colleague_bonus: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub regions_path: Option<PathBuf>,
    pub catalog_revision: Option<CatalogRevision>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            regions: RegionsConfig::default(),
            policy: PolicyConfig {
                steps: DEFAULT_STEPS.to_vec(),
                courtesy_margin: DEFAULT_COURTESY_MARGIN,
                venue_premium: DEFAULT_VENUE_PREMIUM,
                absent_amount: DEFAULT_ABSENT_AMOUNT,
                absent_close_amount: DEFAULT_ABSENT_CLOSE_AMOUNT,
            },
            catalog: CatalogConfig { revision: CatalogRevision::default(), colleague_bonus: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(regions) = patch.regions {
            if let Some(path) = regions.path {
                self.regions.path = Some(path);
            }
        }

        if let Some(policy) = patch.policy {
            if let Some(steps) = policy.steps {
                self.policy.steps = steps;
            }
            if let Some(courtesy_margin) = policy.courtesy_margin {
                self.policy.courtesy_margin = courtesy_margin;
            }
            if let Some(venue_premium) = policy.venue_premium {
                self.policy.venue_premium = venue_premium;
            }
            if let Some(absent_amount) = policy.absent_amount {
                self.policy.absent_amount = absent_amount;
            }
            if let Some(absent_close_amount) = policy.absent_close_amount {
                self.policy.absent_close_amount = absent_close_amount;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(revision) = catalog.revision {
                self.catalog.revision = revision;
            }
            if let Some(colleague_bonus) = catalog.colleague_bonus {
                self.catalog.colleague_bonus = Some(colleague_bonus);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CHUKUI_REGIONS_PATH") {
            self.regions.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("CHUKUI_POLICY_STEPS") {
            self.policy.steps = parse_u64_list("CHUKUI_POLICY_STEPS", &value)?;
        }
        if let Some(value) = read_env("CHUKUI_POLICY_COURTESY_MARGIN") {
            self.policy.courtesy_margin = parse_u64("CHUKUI_POLICY_COURTESY_MARGIN", &value)?;
        }
        if let Some(value) = read_env("CHUKUI_POLICY_VENUE_PREMIUM") {
            self.policy.venue_premium = parse_decimal("CHUKUI_POLICY_VENUE_PREMIUM", &value)?;
        }
        if let Some(value) = read_env("CHUKUI_POLICY_ABSENT_AMOUNT") {
            self.policy.absent_amount = parse_u64("CHUKUI_POLICY_ABSENT_AMOUNT", &value)?;
        }
        if let Some(value) = read_env("CHUKUI_POLICY_ABSENT_CLOSE_AMOUNT") {
            self.policy.absent_close_amount =
                parse_u64("CHUKUI_POLICY_ABSENT_CLOSE_AMOUNT", &value)?;
        }

        if let Some(value) = read_env("CHUKUI_CATALOG_REVISION") {
            self.catalog.revision = value.parse().map_err(ConfigError::Validation)?;
        }
        if let Some(value) = read_env("CHUKUI_CATALOG_COLLEAGUE_BONUS") {
            self.catalog.colleague_bonus =
                Some(parse_u64("CHUKUI_CATALOG_COLLEAGUE_BONUS", &value)?);
        }

        let log_level = read_env("CHUKUI_LOGGING_LEVEL").or_else(|| read_env("CHUKUI_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CHUKUI_LOGGING_FORMAT").or_else(|| read_env("CHUKUI_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(regions_path) = overrides.regions_path {
            self.regions.path = Some(regions_path);
        }
        if let Some(revision) = overrides.catalog_revision {
            self.catalog.revision = revision;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_policy(&self.policy)?;
        validate_catalog(&self.catalog)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    pub fn gift_policy(&self) -> Result<GiftPolicy, ApplicationError> {
        let policy = GiftPolicy {
            steps: StepTable::new(self.policy.steps.clone())?,
            courtesy_margin: self.policy.courtesy_margin,
            venue_premium: self.policy.venue_premium,
            absent_amount: self.policy.absent_amount,
            absent_close_amount: self.policy.absent_close_amount,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn tier_catalog(&self) -> Result<TierCatalog, ApplicationError> {
        let catalog = TierCatalog::for_revision(self.catalog.revision)?;
        match self.catalog.colleague_bonus {
            Some(bonus) => Ok(catalog.with_colleague_bonus(bonus)?),
            None => Ok(catalog),
        }
    }

    pub fn region_table(&self) -> Result<RegionTable, ApplicationError> {
        match &self.regions.path {
            Some(path) => RegionTable::load(path),
            None => RegionTable::bundled(),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from("config").join(CONFIG_FILE_NAME)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    let steps = StepTable::new(policy.steps.clone())
        .map_err(|error| ConfigError::Validation(format!("policy.steps: {error}")))?;

    if policy.venue_premium < Decimal::ONE || policy.venue_premium > Decimal::from(5) {
        return Err(ConfigError::Validation(
            "policy.venue_premium must be in range 1..=5".to_string(),
        ));
    }

    if policy.absent_amount == 0 {
        return Err(ConfigError::Validation(
            "policy.absent_amount must be greater than zero".to_string(),
        ));
    }

    if policy.absent_amount > policy.absent_close_amount {
        return Err(ConfigError::Validation(
            "policy.absent_amount must not exceed policy.absent_close_amount".to_string(),
        ));
    }

    for (key, amount) in [
        ("policy.absent_amount", policy.absent_amount),
        ("policy.absent_close_amount", policy.absent_close_amount),
    ] {
        if !steps.contains(amount) {
            return Err(ConfigError::Validation(format!(
                "{key} ({amount}) must be one of policy.steps"
            )));
        }
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    let Some(bonus) = catalog.colleague_bonus else {
        return Ok(());
    };

    if catalog.revision != CatalogRevision::Extended {
        return Err(ConfigError::Validation(format!(
            "catalog.colleague_bonus requires the extended revision (active: {})",
            catalog.revision
        )));
    }

    TierCatalog::for_revision(catalog.revision)
        .and_then(|tiers| tiers.with_colleague_bonus(bonus))
        .map(|_| ())
        .map_err(|error| ConfigError::Validation(format!("catalog.colleague_bonus: {error}")))
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64_list(key: &str, value: &str) -> Result<Vec<u64>, ConfigError> {
    value.split(',').map(|item| parse_u64(key, item)).collect()
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.trim().parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    regions: Option<RegionsPatch>,
    policy: Option<PolicyPatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RegionsPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    steps: Option<Vec<u64>>,
    courtesy_margin: Option<u64>,
    venue_premium: Option<Decimal>,
    absent_amount: Option<u64>,
    absent_close_amount: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    revision: Option<CatalogRevision>,
    colleague_bonus: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
