use chrono::NaiveDate;
use serde_json::json;

use crate::aggregate::daily::build_daily_forest;
use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::output;
use crate::tree::filter::{filter_by_dates, filter_by_keywords};
use crate::vault::Vault;

pub fn run(
    keywords: &[String],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    global: &GlobalArgs,
) -> i32 {
    crate::cli::finish(run_inner(keywords, from, to, global), global.json)
}

fn run_inner(
    keywords: &[String],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    global: &GlobalArgs,
) -> Result<i32, OkrError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(OkrError::validation(format!("--from {from} is after --to {to}")));
        }
    }
    let config = global.load_config()?;
    let vault = Vault::open(config.vault_root()?)?;
    let (forest, failures) = build_daily_forest(&vault, &config)?;
    // Without --keyword the listing is bounded by date only.
    let forest = if keywords.is_empty() {
        filter_by_dates(&forest, from, to)
    } else {
        filter_by_keywords(&forest, keywords, from, to)
    };

    if global.json {
        output::json::print(&output::json::success(json!({
            "count": forest.len(),
            "tasks": output::json::forest_json(&forest),
            "failures": output::json::failures_json(&failures)
        })));
    } else {
        output::text::print_task_tree(&forest);
        output::text::print_failures(&failures);
    }
    Ok(0)
}
