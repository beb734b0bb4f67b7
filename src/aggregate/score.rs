use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Criteria, DateKind, KeyResult, OkrCycle, ScoreRow, Task};
use crate::tree::filter::{filter_by_keywords, filter_by_okr_tag};
use crate::tree::TaskTree;

pub const THRESHOLD_RATIO: f64 = 0.7;

/// Score every key result of the cycle. Story-point key results read the
/// tasks tagged for them anywhere in `vault_forest`; count and duration key
/// results read keyword matches from `daily_forest` within the cycle.
pub fn score_cycle(
    cycle: &OkrCycle,
    daily_forest: &TaskTree,
    vault_forest: &TaskTree,
    today: NaiveDate,
) -> Vec<ScoreRow> {
    let mut rows = Vec::new();
    for objective in &cycle.objectives {
        for kr in &objective.key_results {
            let data = select_tasks(kr, cycle, daily_forest, vault_forest);
            debug!(objective = %objective.id, key_result = %kr.id, tasks = data.len(), "scoring key result");
            rows.extend(score_key_result(&objective.id, kr, &data, cycle, today));
        }
    }
    rows
}

pub fn select_tasks(
    kr: &KeyResult,
    cycle: &OkrCycle,
    daily_forest: &TaskTree,
    vault_forest: &TaskTree,
) -> TaskTree {
    match kr.criteria {
        Criteria::StoryPoints => filter_by_okr_tag(vault_forest, &kr.okr_tag),
        Criteria::Count | Criteria::Duration => filter_by_keywords(
            daily_forest,
            kr.keywords.as_deref().unwrap_or_default(),
            Some(cycle.start_date),
            Some(cycle.end_date),
        ),
    }
}

/// One row per cycle day. Days after `today` carry targets but no score.
pub fn score_key_result(
    objective: &str,
    kr: &KeyResult,
    data: &TaskTree,
    cycle: &OkrCycle,
    today: NaiveDate,
) -> Vec<ScoreRow> {
    let daily = daily_scores(kr.criteria, data);
    let target = match kr.criteria {
        Criteria::StoryPoints => Some(story_point_total(data)),
        Criteria::Count | Criteria::Duration => kr.target,
    };
    let total_days = cycle.total_days() as f64;

    let mut cumulative = 0.0;
    cycle
        .days()
        .enumerate()
        .map(|(i, date)| {
            let score = (date <= today).then(|| daily.get(&date).copied().unwrap_or(0.0));
            let running = score.map(|s| {
                cumulative += s;
                cumulative
            });
            let to_date = target.map(|t| t * (i + 1) as f64 / total_days);
            ScoreRow {
                objective: objective.to_string(),
                key_result: kr.id.clone(),
                date,
                score,
                cumulative: running,
                target: to_date,
                target_70_pct: to_date.map(|t| t * THRESHOLD_RATIO),
            }
        })
        .collect()
}

/// Raw per-day score totals for `criteria`.
pub fn daily_scores(criteria: Criteria, data: &TaskTree) -> BTreeMap<NaiveDate, f64> {
    let mut scores: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for task in data.tasks() {
        let entry = match criteria {
            Criteria::Count => task.source_date.map(|d| (d, 1.0)),
            Criteria::Duration => task.source_date.map(|d| (d, task.effective_duration())),
            Criteria::StoryPoints => story_points_done(task),
        };
        if let Some((date, value)) = entry {
            *scores.entry(date).or_insert(0.0) += value;
        }
    }
    scores
}

fn story_points_done(task: &Task) -> Option<(NaiveDate, f64)> {
    if task.is_cancelled() {
        return None;
    }
    task.date(DateKind::Done)
        .map(|d| (d, task.story_points.unwrap_or(0.0)))
}

/// Story points of every non-cancelled task, regardless of dates.
pub fn story_point_total(data: &TaskTree) -> f64 {
    data.tasks()
        .filter(|t| !t.is_cancelled())
        .map(|t| t.story_points.unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::parse_task;
    use crate::models::Objective;
    use crate::tree::tests::task;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn cycle(krs: Vec<KeyResult>) -> OkrCycle {
        OkrCycle {
            note: "Cycle".to_string(),
            start_date: date("2024-11-01"),
            end_date: date("2024-11-10"),
            objectives: vec![Objective {
                id: "O1".to_string(),
                name: "Objective".to_string(),
                key_results: krs,
            }],
        }
    }

    fn kr(criteria: Criteria, target: Option<f64>, keywords: Option<Vec<&str>>) -> KeyResult {
        KeyResult {
            id: "KR1".to_string(),
            name: "Key result".to_string(),
            criteria,
            target,
            keywords: keywords.map(|k| k.into_iter().map(str::to_string).collect()),
            okr_tag: "[[Cycle#O1 KR1 Key result]]".to_string(),
        }
    }

    fn daily(title: &str, day: &str) -> Task {
        let mut t = task(title);
        t.source_date = Some(date(day));
        t
    }

    #[test]
    fn test_count_rows_and_targets() {
        let kr = kr(Criteria::Count, Some(20.0), Some(vec!["run"]));
        let cycle = cycle(vec![kr.clone()]);
        let mut forest = TaskTree::new();
        forest.push(TaskTree::ROOT, daily("Run 5k", "2024-11-02"));
        forest.push(TaskTree::ROOT, daily("run again", "2024-11-02"));
        forest.push(TaskTree::ROOT, daily("Swim", "2024-11-03"));
        forest.push(TaskTree::ROOT, daily("Run late", "2024-11-08"));
        forest.push(TaskTree::ROOT, daily("Run outside", "2024-12-01"));

        let rows = score_cycle(&cycle, &forest, &TaskTree::new(), date("2024-11-05"));
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].score, Some(0.0));
        assert_eq!(rows[1].score, Some(2.0));
        assert_eq!(rows[1].cumulative, Some(2.0));
        assert_eq!(rows[4].cumulative, Some(2.0));
        assert_eq!(rows[5].score, None);
        assert_eq!(rows[7].score, None);
        assert_eq!(rows[0].target, Some(2.0));
        assert_eq!(rows[9].target, Some(20.0));
        assert!((rows[9].target_70_pct.unwrap() - 14.0).abs() < 1e-9);
        assert_eq!(rows[0].label(), "O1 KR1");
    }

    #[test]
    fn test_duration_sums_event_hours() {
        let kr = kr(Criteria::Duration, None, Some(vec!["deep work"]));
        let cycle = cycle(vec![kr.clone()]);
        let mut forest = TaskTree::new();
        let mut a = daily("9-11 Deep work", "2024-11-01");
        a.event = crate::extract::parse_event(&a.title, date("2024-11-01"));
        let mut b = daily("Deep work", "2024-11-01");
        b.duration = Some(0.5);
        forest.push(TaskTree::ROOT, a);
        forest.push(TaskTree::ROOT, b);
        forest.push(TaskTree::ROOT, daily("deep work, no hours", "2024-11-02"));

        let rows = score_cycle(&cycle, &forest, &TaskTree::new(), date("2024-11-10"));
        assert_eq!(rows[0].score, Some(2.5));
        assert_eq!(rows[1].score, Some(0.0));
        assert_eq!(rows[9].cumulative, Some(2.5));
        assert_eq!(rows[0].target, None);
    }

    #[test]
    fn test_story_points_use_done_date_and_skip_cancelled() {
        let tag = "[[Cycle#O1 KR1 Key result]]";
        let kr = kr(Criteria::StoryPoints, Some(99.0), None);
        let cycle = cycle(vec![kr.clone()]);

        let mut vault = TaskTree::new();
        let epic = vault.push(
            TaskTree::ROOT,
            parse_task(&format!("[/] Launch #epic (okr:: {tag})"), "Project").unwrap(),
        );
        vault.push(
            epic,
            parse_task("[x] Design #story [Story Points:: 3] ✅ 2024-11-02", "Project").unwrap(),
        );
        vault.push(
            epic,
            parse_task("[x] Build #task [Story Points:: 5] ✅ 2024-11-04", "Project").unwrap(),
        );
        vault.push(
            epic,
            parse_task("[-] Dropped #task [Story Points:: 8] ✅ 2024-11-04", "Project").unwrap(),
        );
        vault.push(epic, parse_task("[ ] Test #task", "Project").unwrap());
        vault.push(TaskTree::ROOT, parse_task("[x] Other #task ✅ 2024-11-02", "Project").unwrap());

        let rows = score_cycle(&cycle, &TaskTree::new(), &vault, date("2024-11-10"));
        assert_eq!(rows[1].score, Some(3.0));
        assert_eq!(rows[3].score, Some(5.0));
        assert_eq!(rows[9].cumulative, Some(8.0));
        // 0 (epic) + 3 + 5 + 1 (default for the open task)
        assert_eq!(rows[9].target, Some(9.0));
    }

    #[test]
    fn test_count_without_keywords_scores_nothing() {
        let kr = kr(Criteria::Count, Some(10.0), None);
        let cycle = cycle(vec![kr.clone()]);
        let mut forest = TaskTree::new();
        forest.push(TaskTree::ROOT, daily("Run 5k", "2024-11-02"));
        forest.push(TaskTree::ROOT, daily("Swim", "2024-11-03"));

        assert!(select_tasks(&kr, &cycle, &forest, &TaskTree::new()).is_empty());
        let rows = score_cycle(&cycle, &forest, &TaskTree::new(), date("2024-11-10"));
        assert!(rows.iter().all(|r| r.score == Some(0.0)));
        assert_eq!(rows[9].cumulative, Some(0.0));
        assert_eq!(rows[9].target, Some(10.0));
    }

    #[test]
    fn test_cycle_of_one_day() {
        let kr = kr(Criteria::Count, Some(4.0), None);
        let mut c = cycle(vec![kr.clone()]);
        c.end_date = c.start_date;
        let rows = score_key_result("O1", &kr, &TaskTree::new(), &c, date("2024-11-01"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].target, Some(4.0));
        assert_eq!(rows[0].score, Some(0.0));
    }
}
