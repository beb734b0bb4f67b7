use tracing::debug;

use crate::error::OkrError;
use crate::extract::fields::{self, Annotation};
use crate::models::{Element, Task, TaskStatus, TaskType};
use crate::tree::{TaskId, TaskTree};

/// Build the task tree of one note.
///
/// Any element may contain tasks; only checklist items become nodes, so a task
/// nested in a plain bullet is attached to the closest enclosing task (or the
/// root). The whole note fails if a single item fails.
pub fn extract_tasks(doc: &Element, note: &str) -> Result<TaskTree, OkrError> {
    let mut tree = TaskTree::new();
    collect(doc, note, &mut tree, TaskTree::ROOT)?;
    debug!(note, tasks = tree.len(), "extracted tasks");
    Ok(tree)
}

fn collect(elem: &Element, note: &str, tree: &mut TaskTree, parent: TaskId) -> Result<(), OkrError> {
    for child in &elem.children {
        if child.is_list_item() && is_task_text(&child.text) {
            let task = parse_task(&child.text, note)?;
            let id = tree.push(parent, task);
            collect(child, note, tree, id)?;
        } else {
            collect(child, note, tree, parent)?;
        }
    }
    Ok(())
}

/// True when the visible text opens with a `[?]` checkbox marker.
pub fn is_task_text(inline: &str) -> bool {
    let plain = fields::plain_text(inline);
    let chars: Vec<char> = plain.trim_start().chars().take(3).collect();
    chars.len() == 3 && chars[0] == '[' && chars[2] == ']'
}

/// Parse one checklist item's inline text into a [`Task`].
pub fn parse_task(inline: &str, note: &str) -> Result<Task, OkrError> {
    let plain = fields::plain_text(inline);
    let plain = plain.trim_start();
    let marker: String = plain.chars().take(3).collect();
    let status = TaskStatus::from_marker(&marker);
    let body = plain[marker.len()..].trim();

    let tags = fields::tags(body);
    let glyphs = fields::take_glyphs(body);
    let (text, okr) = fields::take_okr(&glyphs.rest);
    let (text, annotations) = fields::take_annotations(&text);
    let title = fields::collapse_whitespace(&fields::strip_tags(&text));

    let task_type = infer_type(inline, &tags)?;
    let mut task = Task {
        raw_text: inline.to_string(),
        title,
        status,
        tags,
        priority: glyphs.priority,
        dates: glyphs.dates,
        okr,
        story_points: None,
        duration: None,
        fields: Default::default(),
        task_type,
        note: note.to_string(),
        source_date: None,
        event: None,
    };
    for annotation in annotations {
        apply_annotation(&mut task, annotation);
    }
    if task.story_points.is_none() {
        task.story_points = task.task_type.default_story_points();
    }
    Ok(task)
}

fn infer_type(raw: &str, tags: &[String]) -> Result<TaskType, OkrError> {
    let mut found: Vec<TaskType> = Vec::new();
    for t in tags.iter().filter_map(|t| TaskType::from_tag(t)) {
        if !found.contains(&t) {
            found.push(t);
        }
    }
    match found.as_slice() {
        [] => Ok(TaskType::Todo),
        [only] => Ok(*only),
        many => {
            let names: Vec<&str> = many.iter().map(|t| t.as_str()).collect();
            Err(OkrError::ambiguous_task_type(raw, &names))
        }
    }
}

fn apply_annotation(task: &mut Task, Annotation { key, value }: Annotation) {
    if key.eq_ignore_ascii_case("story points") {
        match value.parse::<f64>() {
            Ok(points) => task.story_points = Some(points),
            Err(_) => debug!(value = %value, "ignoring non-numeric story points"),
        }
    } else if key.eq_ignore_ascii_case("duration") {
        match value.parse::<f64>() {
            Ok(hours) => task.duration = Some(hours),
            Err(_) => debug!(value = %value, "ignoring non-numeric duration"),
        }
    } else {
        task.fields.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::{DateKind, ElementKind, Priority};
    use crate::render;

    #[test]
    fn test_full_annotation_set() {
        let task = parse_task(
            "[x] Ship feature #task (okr:: [[Cycle#O1 KR1]]) [Story Points:: 3] ✅ 2024-11-20",
            "Project",
        )
        .unwrap();
        assert_eq!(task.status, Some(TaskStatus::Done));
        assert_eq!(task.task_type, TaskType::Task);
        assert_eq!(task.story_points, Some(3.0));
        assert_eq!(task.date(DateKind::Done).unwrap().to_string(), "2024-11-20");
        assert_eq!(task.okr.as_deref(), Some("[[Cycle#O1 KR1]]"));
        assert_eq!(task.title, "Ship feature");
        assert_eq!(task.tags, vec!["task"]);
        assert_eq!(task.note, "Project");
    }

    #[test]
    fn test_status_markers() {
        let cases = [
            ("[ ] a", Some(TaskStatus::Todo)),
            ("[x] a", Some(TaskStatus::Done)),
            ("[/] a", Some(TaskStatus::InProgress)),
            ("[-] a", Some(TaskStatus::Cancelled)),
            ("[|] a", Some(TaskStatus::Blocked)),
            ("[?] a", None),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_task(text, "n").unwrap().status, expected, "{text}");
        }
    }

    #[test]
    fn test_story_point_defaults() {
        assert_eq!(parse_task("[ ] a #epic", "n").unwrap().story_points, Some(0.0));
        assert_eq!(parse_task("[ ] a #story", "n").unwrap().story_points, Some(0.0));
        assert_eq!(parse_task("[ ] a #task", "n").unwrap().story_points, Some(1.0));
        assert_eq!(parse_task("[ ] a", "n").unwrap().story_points, None);
    }

    #[test]
    fn test_priority_and_extra_fields() {
        let task = parse_task("[ ] Call 🔺 [owner:: Sam] (duration:: 0.5) %%hidden%%", "n").unwrap();
        assert_eq!(task.priority, Some(Priority::Highest));
        assert_eq!(task.fields.get("owner").map(String::as_str), Some("Sam"));
        assert_eq!(task.duration, Some(0.5));
        assert_eq!(task.title, "Call");
    }

    #[test]
    fn test_non_numeric_story_points_left_unset() {
        let task = parse_task("[ ] a #story [Story Points:: lots]", "n").unwrap();
        assert_eq!(task.story_points, Some(0.0));
    }

    #[test]
    fn test_ambiguous_type() {
        let err = parse_task("[ ] Plan #epic #story", "n").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousTaskType);
        assert_eq!(err.subject.as_deref(), Some("[ ] Plan #epic #story"));
    }

    #[test]
    fn test_repeated_type_tag_is_not_ambiguous() {
        let task = parse_task("[ ] a #task #task", "n").unwrap();
        assert_eq!(task.task_type, TaskType::Task);
        assert_eq!(task.tags, vec!["task", "task"]);
    }

    #[test]
    fn test_tree_follows_task_nesting_not_markup() {
        let doc = render::parse(
            "# Heading\n\
             - [ ] parent\n\
             \x20   - plain bullet\n\
             \x20       - [ ] grandchild hoisted\n\
             \x20   - [x] child\n\
             - not a task\n\
             \x20   - [ ] hoisted to root\n",
        );
        let tree = extract_tasks(&doc, "n").unwrap();
        let root_titles: Vec<&str> = tree
            .children(TaskTree::ROOT)
            .iter()
            .map(|&id| tree.task(id).unwrap().title.as_str())
            .collect();
        assert_eq!(root_titles, vec!["parent", "hoisted to root"]);

        let parent = tree.children(TaskTree::ROOT)[0];
        let child_titles: Vec<&str> = tree
            .children(parent)
            .iter()
            .map(|&id| tree.task(id).unwrap().title.as_str())
            .collect();
        assert_eq!(child_titles, vec!["grandchild hoisted", "child"]);
    }

    #[test]
    fn test_ambiguous_item_fails_whole_note() {
        let doc = render::parse("- [ ] fine\n- [ ] broken #epic #task\n");
        let err = extract_tasks(&doc, "n").unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousTaskType);
    }

    #[test]
    fn test_wiki_link_item_is_not_a_task() {
        let mut doc = Element::document(Vec::new());
        let mut list = Element::new(ElementKind::List, "");
        list.children.push(Element::new(ElementKind::ListItem, "[[Some Note]] link"));
        doc.children.push(list);
        assert!(extract_tasks(&doc, "n").unwrap().is_empty());
    }
}
