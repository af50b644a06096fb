use chukui_core::{
    format::format_won,
    share::{decode_query, encode_query, share_text},
    GiftEngine, GiftOutcome, IncompleteReason, MealPlan, Recommendation, RegionId, Relationship,
    Selection, Venue,
};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::commands::{
    error_class, load_engine, CommandResult, EXIT_CONFIG, EXIT_INCOMPLETE, EXIT_SHARE_QUERY,
};

#[derive(Debug, Clone, Default, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Region id, e.g. seoul (see `chukui regions`)")]
    pub region: Option<String>,
    #[arg(long, help = "Venue: hall | hotel")]
    pub venue: Option<Venue>,
    #[arg(long, help = "Meal: yes | no | n/a (not attending)")]
    pub meal: Option<MealPlan>,
    #[arg(long, help = "Relationship: acquaintance | colleague | friend | close | family")]
    pub relationship: Option<Relationship>,
    #[arg(long, help = "Shared link query string; explicit flags take precedence")]
    pub query: Option<String>,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    command: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendation: Option<&'a Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    incomplete: Option<&'a IncompleteReason>,
    share_query: String,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    let selection = match build_selection(args) {
        Ok(selection) => selection,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "share_query",
                error.to_string(),
                EXIT_SHARE_QUERY,
            )
        }
    };

    let engine = match load_engine() {
        Ok(engine) => engine,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                error_class(&error),
                format!("{error:#}"),
                EXIT_CONFIG,
            )
        }
    };

    let outcome = engine.evaluate(&selection);
    let share_query = encode_query(&selection);

    let exit_code = match &outcome {
        GiftOutcome::Recommended(recommendation) => {
            info!(
                event_name = "cli.recommend.completed",
                amount = recommendation.amount,
                revision = recommendation.revision.as_str(),
                share_query = %share_query,
                "recommendation rendered"
            );
            0
        }
        GiftOutcome::Incomplete(reason) => {
            info!(
                event_name = "cli.recommend.incomplete",
                reason = ?reason,
                share_query = %share_query,
                "selection did not produce a recommendation"
            );
            EXIT_INCOMPLETE
        }
    };

    if args.json {
        let report = RecommendReport {
            command: "recommend",
            status: if outcome.is_incomplete() { "incomplete" } else { "ok" },
            recommendation: outcome.recommendation(),
            formatted_amount: outcome.recommendation().map(|r| format_won(r.amount)),
            share_text: outcome.recommendation().map(share_text),
            incomplete: match &outcome {
                GiftOutcome::Incomplete(reason) => Some(reason),
                GiftOutcome::Recommended(_) => None,
            },
            share_query,
        };
        return CommandResult::report("recommend", exit_code, &report);
    }

    let output = match &outcome {
        GiftOutcome::Recommended(recommendation) => render_human(recommendation, &share_query),
        GiftOutcome::Incomplete(reason) => describe_incomplete(reason),
    };
    CommandResult { exit_code, output }
}

/// Share query first, then explicit flags on top.
pub fn build_selection(args: &RecommendArgs) -> Result<Selection, chukui_core::share::ShareError> {
    let mut selection = match args.query.as_deref() {
        Some(query) => decode_query(query)?,
        None => Selection::default(),
    };

    if let Some(region) = args.region.as_deref() {
        selection.region = Some(RegionId(region.trim().to_ascii_lowercase()));
    }
    if let Some(venue) = args.venue {
        selection.venue = Some(venue);
    }
    if let Some(meal) = args.meal {
        selection.meal = Some(meal);
    }
    if let Some(relationship) = args.relationship {
        selection.relationship = Some(relationship);
    }

    Ok(selection)
}

fn render_human(recommendation: &Recommendation, share_query: &str) -> String {
    let mut lines = vec![format!("추천 축의금: {}", format_won(recommendation.amount))];

    if let Some(message) = &recommendation.message {
        lines.push(format!("{}: {}", message.title, message.body));
    }
    lines.push(recommendation.explanation.clone());
    lines.extend(recommendation.notes.iter().cloned());
    lines.push(format!("share: ?{share_query}"));

    lines.join("\n")
}

fn describe_incomplete(reason: &IncompleteReason) -> String {
    match reason {
        IncompleteReason::MissingFields { fields } => {
            let names: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
            format!("incomplete: missing {}", names.join(", "))
        }
        IncompleteReason::UnknownRegion { region } => {
            format!("incomplete: unknown region `{region}` (see `chukui regions`)")
        }
        IncompleteReason::UnsupportedTier { tier } => {
            format!(
                "incomplete: relationship `{}` is not offered by the active catalog",
                tier.as_str()
            )
        }
    }
}
