use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use ulid::Ulid;

use crate::aggregate::daily::{build_vault_forest, extract_daily_notes};
use crate::aggregate::habit::habit_series;
use crate::aggregate::score::score_cycle;
use crate::aggregate::NoteFailure;
use crate::config::Config;
use crate::error::OkrError;
use crate::extract::parse_objectives;
use crate::models::{HabitSeries, OkrCycle, ScoreRow};
use crate::render;
use crate::tree::TaskTree;
use crate::vault::Vault;

/// Everything one pipeline run produces. Never modified after construction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: Ulid,
    pub built_at: DateTime<Utc>,
    pub today: NaiveDate,
    pub cycle: OkrCycle,
    pub daily_forest: TaskTree,
    pub vault_forest: TaskTree,
    pub scores: Vec<ScoreRow>,
    pub habits: Vec<HabitSeries>,
    pub failures: Vec<NoteFailure>,
}

/// Parse the cycle note: dates from its front matter, objectives from its headings.
pub fn load_cycle(vault: &Vault, config: &Config) -> Result<OkrCycle, OkrError> {
    let note = config.cycle_note()?;
    if !vault.exists(note) {
        return Err(OkrError::note_not_found(note));
    }
    let front_matter = vault.front_matter(note)?;
    let start_date = front_matter
        .start_date
        .ok_or_else(|| OkrError::invalid_front_matter(note, "missing start_date"))?;
    let end_date = front_matter
        .end_date
        .ok_or_else(|| OkrError::invalid_front_matter(note, "missing end_date"))?;
    if end_date < start_date {
        return Err(OkrError::invalid_front_matter(
            note,
            "end_date is before start_date",
        ));
    }
    let doc = render::parse(&vault.source_text(note)?);
    let objectives = parse_objectives(&doc, note, &config.criteria)?;
    Ok(OkrCycle {
        note: note.to_string(),
        start_date,
        end_date,
        objectives,
    })
}

/// Run extraction and aggregation from scratch.
pub fn build_snapshot(config: &Config, today: NaiveDate) -> Result<Snapshot, OkrError> {
    config.validate()?;
    let vault = Vault::open(config.vault_root()?)?;
    let cycle = load_cycle(&vault, config)?;

    let daily = extract_daily_notes(&vault, config)?;
    let daily_forest = daily.forest();
    let (vault_forest, vault_failures) = build_vault_forest(&vault, &daily)?;
    let mut failures = daily.failures;
    failures.extend(vault_failures);

    let scores = score_cycle(&cycle, &daily_forest, &vault_forest, today);
    let habits = config
        .habits
        .iter()
        .map(|h| habit_series(h, &daily_forest, today))
        .collect();

    let snapshot = Snapshot {
        id: Ulid::new(),
        built_at: Utc::now(),
        today,
        cycle,
        daily_forest,
        vault_forest,
        scores,
        habits,
        failures,
    };
    info!(
        snapshot = %snapshot.id,
        tasks = snapshot.vault_forest.len(),
        rows = snapshot.scores.len(),
        failures = snapshot.failures.len(),
        "built snapshot"
    );
    Ok(snapshot)
}

/// Holds the latest successful snapshot. A failed reload leaves it in place.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn reload(&mut self, config: &Config, today: NaiveDate) -> Result<Arc<Snapshot>, OkrError> {
        self.reload_with(|| build_snapshot(config, today))
    }

    pub fn reload_with(
        &mut self,
        build: impl FnOnce() -> Result<Snapshot, OkrError>,
    ) -> Result<Arc<Snapshot>, OkrError> {
        match build() {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.current = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, kept = ?self.current.as_ref().map(|s| s.id), "reload failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const CYCLE: &str = "---\nstart_date: 2024-11-18\nend_date: 2024-11-24\n---\n\
# O1: Ship\n\
### O1 KR1: Launch\n\
[criteria::story-points]\n\
### O1 KR2: Standups\n\
[criteria::count] [target::5] (keywords::[\"standup\"])\n";

    fn write_vault(root: &Path) {
        fs::create_dir_all(root.join("Daily")).unwrap();
        fs::write(root.join("Cycle.md"), CYCLE).unwrap();
        fs::write(
            root.join("Project.md"),
            "- [/] Launch #epic (okr:: [[Cycle#O1 KR1 Launch]])\n\
             \x20   - [x] Build #task ✅ 2024-11-19\n\
             \x20   - [ ] Polish #task\n",
        )
        .unwrap();
        fs::write(root.join("Daily/2024-11-18.md"), "- [x] 9-9:15 Standup\n").unwrap();
        fs::write(root.join("Daily/2024-11-19.md"), "- [x] Standup\n").unwrap();
        fs::write(root.join("Daily/2024-11-21.md"), "- [x] Standup\n- [ ] a #epic #story\n").unwrap();
    }

    fn config(root: &Path) -> Config {
        Config::default().with_overrides(Some(root.to_path_buf()), Some("Cycle".to_string()))
    }

    #[test]
    fn test_build_snapshot() {
        let dir = TempDir::new().unwrap();
        write_vault(dir.path());
        let today: NaiveDate = "2024-11-20".parse().unwrap();
        let snapshot = build_snapshot(&config(dir.path()), today).unwrap();

        assert_eq!(snapshot.cycle.objectives[0].key_results.len(), 2);
        assert_eq!(snapshot.scores.len(), 14);
        let launch: Vec<&ScoreRow> = snapshot.scores.iter().filter(|r| r.key_result == "KR1").collect();
        assert_eq!(launch[1].score, Some(1.0));
        assert_eq!(launch[6].target, Some(2.0));

        let standups: Vec<&ScoreRow> = snapshot.scores.iter().filter(|r| r.key_result == "KR2").collect();
        assert_eq!(standups[0].score, Some(1.0));
        assert_eq!(standups[2].cumulative, Some(2.0));
        assert_eq!(standups[3].score, None);

        assert_eq!(snapshot.failures.len(), 1);
        assert_eq!(snapshot.failures[0].note, "2024-11-21");
    }

    #[test]
    fn test_unreadable_note_does_not_abort_snapshot() {
        let dir = TempDir::new().unwrap();
        write_vault(dir.path());
        fs::write(dir.path().join("Legacy.md"), b"- [ ] caf\xe9\n").unwrap();
        let snapshot = build_snapshot(&config(dir.path()), "2024-11-20".parse().unwrap()).unwrap();

        assert_eq!(snapshot.scores.len(), 14);
        let legacy = snapshot.failures.iter().find(|f| f.note == "Legacy").unwrap();
        assert_eq!(legacy.code, "UNREADABLE_NOTE");
        assert_eq!(snapshot.failures.len(), 2);
    }

    #[test]
    fn test_missing_cycle_note() {
        let dir = TempDir::new().unwrap();
        write_vault(dir.path());
        let config = config(dir.path()).with_overrides(None, Some("Nope".to_string()));
        let err = build_snapshot(&config, "2024-11-20".parse().unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoteNotFound);
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        write_vault(dir.path());
        let config = config(dir.path());
        let today: NaiveDate = "2024-11-20".parse().unwrap();

        let mut store = SnapshotStore::new();
        assert!(store.current().is_none());
        let first = store.reload(&config, today).unwrap();

        fs::write(
            dir.path().join("Cycle.md"),
            "---\nstart_date: 2024-11-18\nend_date: 2024-11-24\n---\n# O1: A\n### O1 KR1: B\nno config\n",
        )
        .unwrap();
        let err = store.reload(&config, today).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingCriteria);
        assert_eq!(store.current().unwrap().id, first.id);
    }
}
