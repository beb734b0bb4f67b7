use chrono::NaiveDate;

use crate::models::Task;
use crate::tree::{TaskId, TaskTree};

/// Subtrees whose top task carries `(okr:: tag)`, re-rooted under a fresh root.
/// Descendants of a matching task are kept as they are, without checking them.
pub fn filter_by_okr_tag(tree: &TaskTree, tag: &str) -> TaskTree {
    let mut out = TaskTree::new();
    collect_tagged(tree, tree.root(), tag, &mut out);
    out
}

fn collect_tagged(tree: &TaskTree, node: TaskId, tag: &str, out: &mut TaskTree) {
    for &child in tree.children(node) {
        let matches = tree
            .task(child)
            .is_some_and(|t| t.okr.as_deref() == Some(tag));
        if matches {
            out.graft(TaskTree::ROOT, tree, child);
        } else {
            collect_tagged(tree, child, tag, out);
        }
    }
}

/// Keep tasks whose title contains one of `keywords` (case-insensitive) and
/// whose source-note date falls within the inclusive bounds. With no keywords
/// nothing matches.
pub fn filter_by_keywords(
    forest: &TaskTree,
    keywords: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> TaskTree {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    forest.retain(|task| {
        within_bounds(task.source_date, start, end) && title_matches(task, &needles)
    })
}

/// Keep tasks whose source-note date falls within the inclusive bounds,
/// whatever their title.
pub fn filter_by_dates(forest: &TaskTree, start: Option<NaiveDate>, end: Option<NaiveDate>) -> TaskTree {
    forest.retain(|task| within_bounds(task.source_date, start, end))
}

/// Keep tasks tagged `#tag`.
pub fn filter_by_tag(forest: &TaskTree, tag: &str) -> TaskTree {
    let tag = tag.trim_start_matches('#');
    forest.retain(|task| task.has_tag(tag))
}

fn title_matches(task: &Task, needles: &[String]) -> bool {
    let title = task.title.to_lowercase();
    needles.iter().any(|n| title.contains(n.as_str()))
}

pub fn within_bounds(date: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    match date {
        Some(d) => start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e),
        None => false,
    }
}
