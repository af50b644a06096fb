use std::env;
use std::sync::{Mutex, OnceLock};

use chukui_cli::commands::{config, doctor, recommend, recommend::RecommendArgs, regions};
use chukui_core::{MealPlan, Relationship, Venue};
use serde_json::Value;

fn seoul_friend_args() -> RecommendArgs {
    RecommendArgs {
        region: Some("seoul".to_string()),
        venue: Some(Venue::Hall),
        meal: Some(MealPlan::WithMeal),
        relationship: Some(Relationship::Friend),
        json: true,
        ..RecommendArgs::default()
    }
}

#[test]
fn recommend_returns_amount_with_default_config() {
    with_env(&[], || {
        let result = recommend::run(&seoul_friend_args());
        assert_eq!(result.exit_code, 0, "expected a recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["recommendation"]["amount"], 100_000);
        assert_eq!(payload["formatted_amount"], "100,000원");
        assert_eq!(payload["share_query"], "region=seoul&venue=hall&meal=yes&rel=friend");
    });
}

#[test]
fn recommend_reads_selection_from_share_query() {
    with_env(&[], || {
        let args = RecommendArgs {
            query: Some("?region=seoul&venue=hotel&meal=yes&rel=close".to_string()),
            json: true,
            ..RecommendArgs::default()
        };
        let result = recommend::run(&args);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["recommendation"]["amount"], 150_000);
        assert_eq!(payload["recommendation"]["base_meal_cost"], 90_000);
    });
}

#[test]
fn recommend_reports_incomplete_selection() {
    with_env(&[], || {
        let args = RecommendArgs {
            region: Some("seoul".to_string()),
            json: true,
            ..RecommendArgs::default()
        };
        let result = recommend::run(&args);
        assert_eq!(result.exit_code, 3, "expected incomplete exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "incomplete");
        assert_eq!(payload["incomplete"]["kind"], "missing_fields");
        assert!(payload.get("recommendation").is_none());
    });
}

#[test]
fn recommend_rejects_malformed_share_query() {
    with_env(&[], || {
        let args =
            RecommendArgs { query: Some("meal=maybe".to_string()), ..RecommendArgs::default() };
        let result = recommend::run(&args);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "share_query");
    });
}

#[test]
fn recommend_returns_config_failure_for_unsorted_steps() {
    with_env(&[("CHUKUI_POLICY_STEPS", "50000,30000")], || {
        let result = recommend::run(&seoul_friend_args());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_respects_catalog_revision_from_env() {
    with_env(&[("CHUKUI_CATALOG_REVISION", "legacy")], || {
        let result = recommend::run(&seoul_friend_args());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["recommendation"]["revision"], "legacy");
        assert!(payload["recommendation"]["message"].is_null());
    });
}

#[test]
fn regions_lists_bundled_table() {
    with_env(&[], || {
        let result = regions::run(true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let entries = payload["regions"].as_array().expect("regions array");
        assert_eq!(entries.len(), 17);
        assert_eq!(entries[0]["id"], "seoul");
        assert_eq!(entries[0]["avgMealCost"], 60_000);
    });
}

#[test]
fn regions_human_output_formats_costs() {
    with_env(&[], || {
        let result = regions::run(false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("- seoul 서울: 60,000원 (약 6.0만원)"), "{}", result.output);
    });
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected all doctor checks to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(checks.len(), 6);
        assert!(checks.iter().all(|check| check["status"] == "pass"));
    });
}

#[test]
fn doctor_skips_engine_checks_when_config_fails() {
    with_env(&[("CHUKUI_POLICY_VENUE_PREMIUM", "0.5")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["name"], "config_validation");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn absent_amount_outside_step_table_is_a_config_failure() {
    with_env(&[("CHUKUI_POLICY_STEPS", "30000,70000,150000")], || {
        let args = RecommendArgs {
            meal: Some(MealPlan::NotAttending),
            relationship: Some(Relationship::Acquaintance),
            ..seoul_friend_args()
        };
        let result = recommend::run(&args);
        assert_eq!(result.exit_code, 2, "absent amount 50000 is not a configured step");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload.get("recommendation").is_none());

        let result = doctor::run(true);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        let details = payload["checks"][0]["details"].as_str().unwrap_or_default();
        assert!(details.contains("policy.absent_amount"), "{details}");
    });
}

#[test]
fn config_attributes_values_set_through_env_aliases() {
    with_env(&[("CHUKUI_LOGGING_LEVEL", " "), ("CHUKUI_LOG_LEVEL", "warn")], || {
        let output = config::run();
        assert!(
            output.contains("- logging.level = warn (source: env (CHUKUI_LOG_LEVEL))"),
            "{output}"
        );
        assert!(output.contains("- catalog.revision = extended (source: default)"), "{output}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid json")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CHUKUI_REGIONS_PATH",
        "CHUKUI_POLICY_STEPS",
        "CHUKUI_POLICY_COURTESY_MARGIN",
        "CHUKUI_POLICY_VENUE_PREMIUM",
        "CHUKUI_POLICY_ABSENT_AMOUNT",
        "CHUKUI_POLICY_ABSENT_CLOSE_AMOUNT",
        "CHUKUI_CATALOG_REVISION",
        "CHUKUI_CATALOG_COLLEAGUE_BONUS",
        "CHUKUI_LOGGING_LEVEL",
        "CHUKUI_LOGGING_FORMAT",
        "CHUKUI_LOG_LEVEL",
        "CHUKUI_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
