use serde_json::json;

use crate::aggregate::daily::build_daily_forest;
use crate::aggregate::habit::habit_series;
use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::models::HabitSeries;
use crate::output;
use crate::vault::Vault;

pub fn run(global: &GlobalArgs) -> i32 {
    crate::cli::finish(run_inner(global), global.json)
}

fn run_inner(global: &GlobalArgs) -> Result<i32, OkrError> {
    let config = global.load_config()?;
    let vault = Vault::open(config.vault_root()?)?;
    let (forest, failures) = build_daily_forest(&vault, &config)?;
    let today = global.today();
    let habits: Vec<HabitSeries> = config
        .habits
        .iter()
        .map(|h| habit_series(h, &forest, today))
        .collect();

    if global.json {
        let habits_json: Vec<_> = habits.iter().map(output::json::habit_json).collect();
        output::json::print(&output::json::success(json!({
            "habits": habits_json,
            "failures": output::json::failures_json(&failures)
        })));
    } else {
        output::text::print_habits(&habits);
        output::text::print_failures(&failures);
    }
    Ok(0)
}
