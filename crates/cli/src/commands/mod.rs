pub mod config;
pub mod doctor;
pub mod recommend;
pub mod regions;

use anyhow::Context;
use chukui_core::{
    config::{AppConfig, ConfigError, LoadOptions},
    errors::ApplicationError,
    DeterministicGiftEngine,
};
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INCOMPLETE: u8 = 3;
pub const EXIT_SHARE_QUERY: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }

    /// Wraps an arbitrary serializable report, falling back to an error payload.
    pub fn report(command: &str, exit_code: u8, report: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(report) {
            Ok(output) => Self { exit_code, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

fn serialize_payload(payload: &CommandOutcome) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_engine() -> anyhow::Result<DeterministicGiftEngine> {
    let config =
        AppConfig::load(LoadOptions::default()).context("configuration did not load")?;
    DeterministicGiftEngine::from_config(&config).context("gift engine tables did not load")
}

pub(crate) fn error_class(error: &anyhow::Error) -> &'static str {
    if error.downcast_ref::<ConfigError>().is_some() {
        return "config_validation";
    }
    error
        .downcast_ref::<ApplicationError>()
        .map(ApplicationError::error_class)
        .unwrap_or("internal")
}
