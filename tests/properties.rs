use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use okrtrack::aggregate::score::score_key_result;
use okrtrack::models::{
    Criteria, DateKind, KeyResult, OkrCycle, Task, TaskStatus, TaskType,
};
use okrtrack::tree::filter::{filter_by_keywords, filter_by_okr_tag};
use okrtrack::tree::{TaskId, TaskTree};
use proptest::prelude::*;

const TAG: &str = "[[Cycle#O1 KR1 Goal]]";
const WORDS: [&str; 4] = ["Run", "read", "Write", "gym"];

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
}

#[derive(Debug, Clone)]
struct NodeSeed {
    parent: usize,
    word: usize,
    tagged: bool,
    cancelled: bool,
    day: i64,
    points: u8,
}

fn node_seed() -> impl Strategy<Value = NodeSeed> {
    (0usize..64, 0usize..4, any::<bool>(), any::<bool>(), 0i64..15, 0u8..8).prop_map(
        |(parent, word, tagged, cancelled, day, points)| NodeSeed {
            parent,
            word,
            tagged,
            cancelled,
            day,
            points,
        },
    )
}

fn build(seeds: &[NodeSeed]) -> TaskTree {
    let mut tree = TaskTree::new();
    let mut ids: Vec<TaskId> = vec![TaskTree::ROOT];
    for s in seeds {
        let date = base() + Duration::days(s.day);
        let mut dates = BTreeMap::new();
        dates.insert(DateKind::Done, date);
        let task = Task {
            raw_text: String::new(),
            title: format!("{} {}", WORDS[s.word], s.day),
            status: Some(if s.cancelled {
                TaskStatus::Cancelled
            } else {
                TaskStatus::Done
            }),
            tags: Vec::new(),
            priority: None,
            dates,
            okr: s.tagged.then(|| TAG.to_string()),
            story_points: Some(f64::from(s.points)),
            duration: None,
            fields: BTreeMap::new(),
            task_type: TaskType::Task,
            note: "n".to_string(),
            source_date: Some(date),
            event: None,
        };
        let parent = ids[s.parent % ids.len()];
        ids.push(tree.push(parent, task));
    }
    tree
}

fn cycle() -> OkrCycle {
    OkrCycle {
        note: "Cycle".to_string(),
        start_date: base(),
        end_date: base() + Duration::days(9),
        objectives: Vec::new(),
    }
}

fn kr(criteria: Criteria) -> KeyResult {
    KeyResult {
        id: "KR1".to_string(),
        name: "Goal".to_string(),
        criteria,
        target: Some(10.0),
        keywords: None,
        okr_tag: TAG.to_string(),
    }
}

proptest! {
    #[test]
    fn tag_filter_is_idempotent(seeds in prop::collection::vec(node_seed(), 0..40)) {
        let tree = build(&seeds);
        let once = filter_by_okr_tag(&tree, TAG);
        let twice = filter_by_okr_tag(&once, TAG);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn tag_filter_tops_carry_the_tag(seeds in prop::collection::vec(node_seed(), 0..40)) {
        let tree = build(&seeds);
        let filtered = filter_by_okr_tag(&tree, TAG);
        for &id in filtered.children(TaskTree::ROOT) {
            prop_assert_eq!(filtered.task(id).unwrap().okr.as_deref(), Some(TAG));
        }
    }

    #[test]
    fn keyword_filter_without_keywords_is_empty(seeds in prop::collection::vec(node_seed(), 0..40)) {
        let tree = build(&seeds);
        prop_assert!(filter_by_keywords(&tree, &[], None, None).is_empty());
    }

    #[test]
    fn keyword_filter_keeps_only_matches(
        seeds in prop::collection::vec(node_seed(), 0..40),
        word in 0usize..4,
        start in 0i64..15,
        span in 0i64..10,
    ) {
        let tree = build(&seeds);
        let from = base() + Duration::days(start);
        let to = from + Duration::days(span);
        let keyword = WORDS[word].to_uppercase();
        let filtered = filter_by_keywords(&tree, &[keyword.clone()], Some(from), Some(to));

        let expected = tree
            .tasks()
            .filter(|t| {
                let d = t.source_date.unwrap();
                d >= from && d <= to && t.title.to_lowercase().contains(&keyword.to_lowercase())
            })
            .count();
        prop_assert_eq!(filtered.len(), expected);
        for t in filtered.tasks() {
            let d = t.source_date.unwrap();
            prop_assert!(d >= from && d <= to);
            prop_assert!(t.title.to_lowercase().contains(&keyword.to_lowercase()));
        }
    }

    #[test]
    fn cumulative_score_never_decreases(
        seeds in prop::collection::vec(node_seed(), 0..40),
        today in 0i64..12,
        story_points in any::<bool>(),
    ) {
        let tree = build(&seeds);
        let criteria = if story_points { Criteria::StoryPoints } else { Criteria::Count };
        let data = if story_points { filter_by_okr_tag(&tree, TAG) } else { tree };
        let rows = score_key_result("O1", &kr(criteria), &data, &cycle(), base() + Duration::days(today));

        prop_assert_eq!(rows.len(), 10);
        let mut last = 0.0;
        for row in &rows {
            if let Some(c) = row.cumulative {
                prop_assert!(c >= last);
                last = c;
            }
        }
    }
}
