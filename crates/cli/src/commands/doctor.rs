use chukui_core::{
    config::{AppConfig, LoadOptions},
    errors::ApplicationError,
    share, DeterministicGiftEngine, GiftEngine, GiftPolicy, MealPlan, RegionTable, Selection,
    TierCatalog, Venue,
};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        return CommandResult::report("doctor", exit_code, &report);
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });

            let regions = record(&mut checks, "region_table", config.region_table(), |table| {
                let published_on = table.published_on();
                format!("{} regions from {} ({published_on})", table.len(), table.source())
            });
            let policy = record(&mut checks, "gift_policy", config.gift_policy(), |policy| {
                format!("{} steps up to {}", policy.steps.as_slice().len(), policy.steps.largest())
            });
            let catalog = record(&mut checks, "tier_catalog", config.tier_catalog(), |catalog| {
                let messages = if catalog.messages().is_some() { "with" } else { "without" };
                format!(
                    "revision {} with {} tiers, {messages} messages",
                    catalog.revision(),
                    catalog.tiers().len()
                )
            });

            match (regions, policy, catalog) {
                (Some(regions), Some(policy), Some(catalog)) => {
                    checks.extend(check_samples(regions, policy, catalog));
                }
                _ => {
                    for name in ["sample_recommendation", "absent_recommendation"] {
                        checks.push(skipped(name, "engine tables did not load"));
                    }
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in [
                "region_table",
                "gift_policy",
                "tier_catalog",
                "sample_recommendation",
                "absent_recommendation",
            ] {
                checks.push(skipped(name, "configuration did not load"));
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn record<T>(
    checks: &mut Vec<DoctorCheck>,
    name: &'static str,
    result: Result<T, ApplicationError>,
    describe: impl FnOnce(&T) -> String,
) -> Option<T> {
    match result {
        Ok(value) => {
            checks.push(DoctorCheck { name, status: CheckStatus::Pass, details: describe(&value) });
            Some(value)
        }
        Err(error) => {
            let details = error.to_string();
            checks.push(DoctorCheck { name, status: CheckStatus::Fail, details });
            None
        }
    }
}

fn check_samples(
    regions: RegionTable,
    policy: GiftPolicy,
    catalog: TierCatalog,
) -> Vec<DoctorCheck> {
    let region = regions.regions().first().map(|region| region.id.clone());
    let lowest = catalog.tiers().first().map(|entry| entry.tier);
    let highest = catalog.tiers().last().map(|entry| entry.tier);
    let (Some(region), Some(lowest), Some(highest)) = (region, lowest, highest) else {
        return vec![
            skipped("sample_recommendation", "region table or catalog is empty"),
            skipped("absent_recommendation", "region table or catalog is empty"),
        ];
    };

    let engine = DeterministicGiftEngine::new(regions, policy, catalog);
    let attending = [Selection::complete(region.clone(), Venue::Hall, MealPlan::WithMeal, lowest)];
    let absent = [lowest, highest]
        .map(|tier| Selection::complete(region.clone(), Venue::Hall, MealPlan::NotAttending, tier));

    vec![
        sample_check(&engine, "sample_recommendation", &attending),
        sample_check(&engine, "absent_recommendation", &absent),
    ]
}

/// Every sample must produce a recommendation landing on a configured step.
fn sample_check(
    engine: &DeterministicGiftEngine,
    name: &'static str,
    samples: &[Selection],
) -> DoctorCheck {
    let mut evaluated = Vec::new();

    for selection in samples {
        let label = share::encode_query(selection);
        match engine.evaluate(selection).into_recommendation() {
            Some(recommendation) if engine.policy().steps.contains(recommendation.amount) => {
                evaluated.push(format!("{label} -> {}", recommendation.amount));
            }
            Some(recommendation) => {
                return DoctorCheck {
                    name,
                    status: CheckStatus::Fail,
                    details: format!(
                        "{label}: amount {} is not a configured step",
                        recommendation.amount
                    ),
                };
            }
            None => {
                return DoctorCheck {
                    name,
                    status: CheckStatus::Fail,
                    details: format!("{label}: complete sample selection came back incomplete"),
                };
            }
        }
    }

    DoctorCheck { name, status: CheckStatus::Pass, details: evaluated.join("; ") }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chukui_core::{
        DeterministicGiftEngine, GiftPolicy, MealPlan, RegionTable, Relationship, Selection,
        StepTable, TierCatalog, Venue,
    };

    use super::{check_samples, sample_check, CheckStatus};

    #[test]
    fn absent_sample_flags_amounts_outside_the_step_table() {
        let regions = RegionTable::bundled().expect("bundled regions");
        let steps = StepTable::new(vec![30_000, 70_000, 150_000]).expect("valid steps");
        let policy = GiftPolicy { steps, ..GiftPolicy::default() };
        let engine = DeterministicGiftEngine::new(regions, policy, TierCatalog::default());

        let absent = [Selection::complete(
            "seoul",
            Venue::Hall,
            MealPlan::NotAttending,
            Relationship::Acquaintance,
        )];
        let check = sample_check(&engine, "absent_recommendation", &absent);

        assert_eq!(check.status, CheckStatus::Fail);
        assert!(check.details.contains("50000 is not a configured step"), "{}", check.details);
    }

    #[test]
    fn default_tables_pass_both_samples() {
        let regions = RegionTable::bundled().expect("bundled regions");
        let checks = check_samples(regions, GiftPolicy::default(), TierCatalog::default());

        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|check| check.status == CheckStatus::Pass));
        let absent = &checks[1].details;
        assert!(absent.contains("meal=n%2Fa&rel=family -> 100000"), "{absent}");
    }
}
