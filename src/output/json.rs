use serde_json::{json, Value};

use crate::aggregate::NoteFailure;
use crate::error::OkrError;
use crate::models::{HabitSeries, KeyResult, Objective, OkrCycle, ScoreRow};
use crate::tree::{TaskId, TaskTree};

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &OkrError) -> Value {
    let mut e = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if let Some(ref subject) = err.subject {
        e["subject"] = json!(subject);
    }
    json!({
        "success": false,
        "error": e
    })
}

pub fn task_json(tree: &TaskTree, id: TaskId) -> Value {
    let Some(t) = tree.task(id) else {
        return Value::Null;
    };
    let children: Vec<Value> = tree.children(id).iter().map(|&c| task_json(tree, c)).collect();
    let mut v = json!({
        "id": id.index(),
        "title": t.title,
        "raw_text": t.raw_text,
        "status": t.status.map(|s| s.as_str()),
        "type": t.task_type.as_str(),
        "tags": t.tags,
        "note": t.note,
        "children": children
    });
    if let Some(priority) = t.priority {
        v["priority"] = json!(priority.as_str());
    }
    if !t.dates.is_empty() {
        v["dates"] = json!(t.dates);
    }
    if let Some(ref okr) = t.okr {
        v["okr"] = json!(okr);
    }
    if let Some(points) = t.story_points {
        v["story_points"] = json!(points);
    }
    if let Some(duration) = t.duration {
        v["duration"] = json!(duration);
    }
    if !t.fields.is_empty() {
        v["fields"] = json!(t.fields);
    }
    if let Some(date) = t.source_date {
        v["source_date"] = json!(date);
    }
    if let Some(ref event) = t.event {
        v["event"] = json!({
            "start": event.start,
            "end": event.end,
            "duration": event.duration
        });
    }
    v
}

pub fn forest_json(tree: &TaskTree) -> Value {
    let roots: Vec<Value> = tree
        .children(TaskTree::ROOT)
        .iter()
        .map(|&id| task_json(tree, id))
        .collect();
    json!(roots)
}

pub fn key_result_json(kr: &KeyResult) -> Value {
    json!({
        "id": kr.id,
        "name": kr.name,
        "criteria": kr.criteria.as_str(),
        "target": kr.target,
        "keywords": kr.keywords,
        "okr_tag": kr.okr_tag
    })
}

pub fn objective_json(o: &Objective) -> Value {
    let krs: Vec<Value> = o.key_results.iter().map(key_result_json).collect();
    json!({
        "id": o.id,
        "name": o.name,
        "key_results": krs
    })
}

pub fn cycle_json(c: &OkrCycle) -> Value {
    let objectives: Vec<Value> = c.objectives.iter().map(objective_json).collect();
    json!({
        "note": c.note,
        "start_date": c.start_date,
        "end_date": c.end_date,
        "objectives": objectives
    })
}

pub fn score_row_json(r: &ScoreRow) -> Value {
    json!({
        "objective": r.objective,
        "key_result": r.key_result,
        "date": r.date,
        "score": r.score,
        "cumulative": r.cumulative,
        "target": r.target,
        "target_70_pct": r.target_70_pct
    })
}

pub fn habit_json(h: &HabitSeries) -> Value {
    json!({
        "name": h.habit.name,
        "criteria": h.habit.criteria.as_str(),
        "start_date": h.habit.start_date,
        "days": h.days,
        "weeks": h.weeks
    })
}

pub fn failures_json(failures: &[NoteFailure]) -> Value {
    json!(failures)
}
