use std::borrow::Cow;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::aggregate::NoteFailure;
use crate::config::Config;
use crate::error::OkrError;
use crate::extract::{extract_tasks, parse_event};
use crate::render;
use crate::tree::TaskTree;
use crate::vault::Vault;

/// Render and extract one note.
pub fn extract_note(vault: &Vault, name: &str) -> Result<TaskTree, OkrError> {
    let text = vault.source_text(name)?;
    extract_tasks(&render::parse(&text), name)
}

pub fn parse_note_date(name: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, format).ok()
}

/// Stamp every task with its note's date and read time-range events from titles.
pub fn enrich_daily(tree: &mut TaskTree, date: NaiveDate) {
    tree.for_each_task_mut(|task| {
        task.source_date = Some(date);
        task.event = parse_event(&task.title, date);
    });
}

/// Splice each forest's top-level tasks under one root, in the given order.
pub fn merge_forests<'a>(trees: impl IntoIterator<Item = &'a TaskTree>) -> TaskTree {
    let mut merged = TaskTree::new();
    for tree in trees {
        merged.graft_children(TaskTree::ROOT, tree, TaskTree::ROOT);
    }
    merged
}

/// Daily notes as `(date, name)`, oldest first. Names that are not dates are skipped.
pub fn daily_notes(vault: &Vault, config: &Config) -> Vec<(NaiveDate, String)> {
    let mut notes: Vec<(NaiveDate, String)> = vault
        .notes_under(&config.daily_notes)
        .into_iter()
        .filter_map(|name| match parse_note_date(&name, &config.daily_note_format) {
            Some(date) => Some((date, name)),
            None => {
                warn!(note = %name, format = %config.daily_note_format, "daily note name is not a date");
                None
            }
        })
        .collect();
    notes.sort();
    notes
}

#[derive(Debug, Clone)]
pub struct DailyNote {
    pub date: NaiveDate,
    pub name: String,
    pub tree: TaskTree,
}

/// Every extracted daily note, oldest first, and the daily notes left out.
#[derive(Debug, Clone, Default)]
pub struct DailyNotes {
    pub notes: Vec<DailyNote>,
    pub failures: Vec<NoteFailure>,
}

impl DailyNotes {
    /// All daily tasks under one root, in date order.
    pub fn forest(&self) -> TaskTree {
        merge_forests(self.notes.iter().map(|n| &n.tree))
    }

    pub fn tree(&self, name: &str) -> Option<&TaskTree> {
        self.notes.iter().find(|n| n.name == name).map(|n| &n.tree)
    }

    pub fn failed(&self, name: &str) -> bool {
        self.failures.iter().any(|f| f.note == name)
    }
}

/// Extract every daily note. Notes that fail with a note-level error are
/// reported and left out; other errors abort.
pub fn extract_daily_notes(vault: &Vault, config: &Config) -> Result<DailyNotes, OkrError> {
    let mut daily = DailyNotes::default();
    for (date, name) in daily_notes(vault, config) {
        match extract_note(vault, &name) {
            Ok(mut tree) => {
                enrich_daily(&mut tree, date);
                daily.notes.push(DailyNote { date, name, tree });
            }
            Err(e) if e.code.is_note_level() => {
                warn!(note = %name, error = %e, "skipping daily note");
                daily.failures.push(NoteFailure::new(&name, &e));
            }
            Err(e) => return Err(e),
        }
    }
    debug!(notes = daily.notes.len(), failures = daily.failures.len(), "extracted daily notes");
    Ok(daily)
}

/// Merge the task trees of every daily note.
pub fn build_daily_forest(
    vault: &Vault,
    config: &Config,
) -> Result<(TaskTree, Vec<NoteFailure>), OkrError> {
    let daily = extract_daily_notes(vault, config)?;
    let forest = daily.forest();
    debug!(tasks = forest.len(), "built daily forest");
    Ok((forest, daily.failures))
}

/// Merge the task trees of every note in the vault. Daily notes come from
/// `daily` as already extracted; the returned failures cover the other notes.
pub fn build_vault_forest(
    vault: &Vault,
    daily: &DailyNotes,
) -> Result<(TaskTree, Vec<NoteFailure>), OkrError> {
    let mut trees: Vec<Cow<'_, TaskTree>> = Vec::new();
    let mut failures = Vec::new();
    for name in vault.note_names() {
        if let Some(tree) = daily.tree(name) {
            trees.push(Cow::Borrowed(tree));
            continue;
        }
        if daily.failed(name) {
            continue;
        }
        match extract_note(vault, name) {
            Ok(tree) => trees.push(Cow::Owned(tree)),
            Err(e) if e.code.is_note_level() => {
                warn!(note = %name, error = %e, "skipping note");
                failures.push(NoteFailure::new(name, &e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok((merge_forests(trees.iter().map(|t| &**t)), failures))
}
