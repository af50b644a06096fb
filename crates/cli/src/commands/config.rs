use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chukui_core::config::{AppConfig, LoadOptions, CONFIG_FILE_NAME};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let steps: Vec<String> = config.policy.steps.iter().map(u64::to_string).collect();
    let fields: [(&str, String, &[&str]); 10] = [
        (
            "regions.path",
            config
                .regions
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<bundled>".to_string()),
            &["CHUKUI_REGIONS_PATH"],
        ),
        ("policy.steps", format!("[{}]", steps.join(", ")), &["CHUKUI_POLICY_STEPS"]),
        (
            "policy.courtesy_margin",
            config.policy.courtesy_margin.to_string(),
            &["CHUKUI_POLICY_COURTESY_MARGIN"],
        ),
        (
            "policy.venue_premium",
            config.policy.venue_premium.to_string(),
            &["CHUKUI_POLICY_VENUE_PREMIUM"],
        ),
        (
            "policy.absent_amount",
            config.policy.absent_amount.to_string(),
            &["CHUKUI_POLICY_ABSENT_AMOUNT"],
        ),
        (
            "policy.absent_close_amount",
            config.policy.absent_close_amount.to_string(),
            &["CHUKUI_POLICY_ABSENT_CLOSE_AMOUNT"],
        ),
        ("catalog.revision", config.catalog.revision.to_string(), &["CHUKUI_CATALOG_REVISION"]),
        (
            "catalog.colleague_bonus",
            config
                .catalog
                .colleague_bonus
                .map(|bonus| bonus.to_string())
                .unwrap_or_else(|| "<catalog default>".to_string()),
            &["CHUKUI_CATALOG_COLLEAGUE_BONUS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CHUKUI_LOGGING_LEVEL", "CHUKUI_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CHUKUI_LOGGING_FORMAT", "CHUKUI_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in &fields {
        lines.push(render_line(
            key,
            value,
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from(CONFIG_FILE_NAME);
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config").join(CONFIG_FILE_NAME);
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Blank values are skipped by the loader too; the first non-blank name wins.
    let applied = env_keys
        .iter()
        .find(|key| env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = applied {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::env;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_toml_documents() {
        let doc = "[policy]\ncourtesy_margin = 20000\n".parse::<Value>().expect("valid toml");

        assert!(contains_path(&doc, "policy.courtesy_margin"));
        assert!(!contains_path(&doc, "policy.steps"));
        assert!(!contains_path(&doc, "catalog.revision"));
    }

    #[test]
    fn file_source_is_reported_when_key_present() {
        let doc = "[catalog]\nrevision = \"classic\"\n".parse::<Value>().expect("valid toml");

        assert_eq!(
            field_source("catalog.revision", &[], Some(&doc), None),
            "file (config file)"
        );
        assert_eq!(field_source("logging.level", &[], Some(&doc), None), "default");
    }

    #[test]
    fn env_aliases_count_and_blank_values_do_not() {
        let doc = "[logging]\nlevel = \"debug\"\n".parse::<Value>().expect("valid toml");
        let keys = ["CHUKUI_TEST_SOURCE_PRIMARY", "CHUKUI_TEST_SOURCE_ALIAS"];
        env::set_var(keys[0], "  ");
        env::remove_var(keys[1]);

        assert_eq!(field_source("logging.level", &keys, Some(&doc), None), "file (config file)");

        env::set_var(keys[1], "warn");
        assert_eq!(
            field_source("logging.level", &keys, Some(&doc), None),
            "env (CHUKUI_TEST_SOURCE_ALIAS)"
        );

        env::remove_var(keys[0]);
        env::remove_var(keys[1]);
    }
}
