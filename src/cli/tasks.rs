use serde_json::json;

use crate::aggregate::daily::{enrich_daily, extract_note, parse_note_date};
use crate::cli::GlobalArgs;
use crate::error::OkrError;
use crate::output;
use crate::tree::filter::filter_by_okr_tag;
use crate::vault::Vault;

pub fn run(note: &str, okr: Option<&str>, global: &GlobalArgs) -> i32 {
    crate::cli::finish(run_inner(note, okr, global), global.json)
}

fn run_inner(note: &str, okr: Option<&str>, global: &GlobalArgs) -> Result<i32, OkrError> {
    let config = global.load_config()?;
    let vault = Vault::open(config.vault_root()?)?;
    let mut tree = extract_note(&vault, note)?;

    let is_daily = vault.notes_under(&config.daily_notes).iter().any(|n| n == note);
    if let Some(date) = parse_note_date(note, &config.daily_note_format).filter(|_| is_daily) {
        enrich_daily(&mut tree, date);
    }
    if let Some(tag) = okr {
        tree = filter_by_okr_tag(&tree, tag);
    }

    if global.json {
        output::json::print(&output::json::success(json!({
            "note": note,
            "count": tree.len(),
            "tasks": output::json::forest_json(&tree)
        })));
    } else {
        println!("Note: {note} ({} tasks)", tree.len());
        output::text::print_task_tree(&tree);
    }
    Ok(0)
}
