use chukui_core::format::{format_manwon, format_won};

use crate::commands::{error_class, load_engine, CommandResult, EXIT_CONFIG};

pub fn run(json_output: bool) -> CommandResult {
    let engine = match load_engine() {
        Ok(engine) => engine,
        Err(error) => {
            return CommandResult::failure(
                "regions",
                error_class(&error),
                format!("{error:#}"),
                EXIT_CONFIG,
            )
        }
    };
    let table = engine.regions();

    if json_output {
        return CommandResult::report("regions", 0, table);
    }

    let mut lines = vec![format!(
        "region table: {} ({}, {} regions)",
        table.source(),
        table.published_on(),
        table.len()
    )];
    for region in table.regions() {
        lines.push(format!(
            "- {} {}: {} (약 {}만원)",
            region.id,
            region.name,
            format_won(region.avg_meal_cost),
            format_manwon(region.avg_meal_cost)
        ));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}
