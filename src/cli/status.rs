use serde_json::json;

use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::output;
use crate::snapshot::SnapshotStore;

pub fn run(global: &GlobalArgs) -> i32 {
    crate::cli::finish(run_inner(global), global.json)
}

fn run_inner(global: &GlobalArgs) -> Result<i32, OkrError> {
    let config = global.load_config()?;
    let mut store = SnapshotStore::new();
    let snapshot = store.reload(&config, global.today())?;
    let key_results: usize = snapshot
        .cycle
        .objectives
        .iter()
        .map(|o| o.key_results.len())
        .sum();

    if global.json {
        output::json::print(&output::json::success(json!({
            "snapshot": snapshot.id.to_string(),
            "built_at": snapshot.built_at.to_rfc3339(),
            "today": snapshot.today,
            "cycle": {
                "note": snapshot.cycle.note,
                "start_date": snapshot.cycle.start_date,
                "end_date": snapshot.cycle.end_date,
                "objectives": snapshot.cycle.objectives.len(),
                "key_results": key_results
            },
            "tasks": {
                "daily": snapshot.daily_forest.len(),
                "vault": snapshot.vault_forest.len()
            },
            "failures": output::json::failures_json(&snapshot.failures)
        })));
    } else {
        let cycle = &snapshot.cycle;
        println!("Cycle: {} ({} → {})", cycle.note, cycle.start_date, cycle.end_date);
        println!(
            "  {} objectives, {} key results",
            cycle.objectives.len(),
            key_results
        );
        println!(
            "Tasks: {} in daily notes, {} in vault",
            snapshot.daily_forest.len(),
            snapshot.vault_forest.len()
        );
        output::text::print_failures(&snapshot.failures);
    }
    Ok(0)
}
