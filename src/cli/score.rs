use serde_json::json;

use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::models::ScoreRow;
use crate::output;
use crate::snapshot::SnapshotStore;

pub fn run(kr: Option<&str>, global: &GlobalArgs) -> i32 {
    crate::cli::finish(run_inner(kr, global), global.json)
}

fn run_inner(kr: Option<&str>, global: &GlobalArgs) -> Result<i32, OkrError> {
    let config = global.load_config()?;
    let mut store = SnapshotStore::new();
    let snapshot = store.reload(&config, global.today())?;

    let rows: Vec<&ScoreRow> = match kr {
        Some(label) => {
            let rows: Vec<&ScoreRow> = snapshot
                .scores
                .iter()
                .filter(|r| r.label().eq_ignore_ascii_case(label.trim()))
                .collect();
            if rows.is_empty() {
                return Err(OkrError::validation(format!("Key result not found: {label}")));
            }
            rows
        }
        None => snapshot.scores.iter().collect(),
    };

    if global.json {
        let rows_json: Vec<_> = rows.iter().map(|r| output::json::score_row_json(r)).collect();
        output::json::print(&output::json::success(json!({
            "snapshot": snapshot.id.to_string(),
            "cycle": output::json::cycle_json(&snapshot.cycle),
            "rows": rows_json,
            "failures": output::json::failures_json(&snapshot.failures)
        })));
    } else {
        output::text::print_scores(&rows);
        output::text::print_failures(&snapshot.failures);
    }
    Ok(0)
}
