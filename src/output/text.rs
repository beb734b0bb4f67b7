use crate::aggregate::NoteFailure;
use crate::models::{HabitSeries, OkrCycle, ScoreRow, Task, TaskStatus};
use crate::tree::TaskTree;

fn marker(status: Option<TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::Todo) => "[ ]",
        Some(TaskStatus::Done) => "[x]",
        Some(TaskStatus::InProgress) => "[/]",
        Some(TaskStatus::Cancelled) => "[-]",
        Some(TaskStatus::Blocked) => "[|]",
        None => "[?]",
    }
}

fn task_line(t: &Task) -> String {
    let mut line = format!("{} {}", marker(t.status), t.title);
    if !t.tags.is_empty() {
        let tags: Vec<String> = t.tags.iter().map(|tag| format!("#{tag}")).collect();
        line.push_str(&format!(" {}", tags.join(" ")));
    }
    let mut meta = vec![t.task_type.as_str().to_string()];
    if let Some(points) = t.story_points {
        meta.push(format!("sp={points}"));
    }
    if let Some(priority) = t.priority {
        meta.push(format!("p={}", priority.as_str()));
    }
    for (kind, date) in &t.dates {
        meta.push(format!("{}={date}", kind.as_str()));
    }
    if let Some(ref event) = t.event {
        meta.push(format!("{}h", event.duration));
    }
    line.push_str(&format!(" ({})", meta.join(", ")));
    line
}

pub fn print_task_tree(tree: &TaskTree) {
    if tree.is_empty() {
        println!("No tasks found.");
        return;
    }
    for (id, depth) in tree.walk() {
        if let Some(t) = tree.task(id) {
            println!("{}{}", "  ".repeat(depth), task_line(t));
        }
    }
}

pub fn print_cycle(c: &OkrCycle) {
    println!("Cycle: {} ({} → {})", c.note, c.start_date, c.end_date);
    for o in &c.objectives {
        println!("  {}: {}", o.id, o.name);
        for kr in &o.key_results {
            let target = kr.target.map(|t| format!(" target={t}")).unwrap_or_default();
            println!("    {} {}: {} [{}]{}", o.id, kr.id, kr.name, kr.criteria.as_str(), target);
            if let Some(ref keywords) = kr.keywords {
                println!("      keywords: {}", keywords.join(", "));
            }
            println!("      tag: {}", kr.okr_tag);
        }
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

pub fn print_scores(rows: &[&ScoreRow]) {
    if rows.is_empty() {
        println!("No key results found.");
        return;
    }
    let mut current = String::new();
    for r in rows {
        let label = r.label();
        if label != current {
            println!("\n{label}");
            println!("  {:<10} {:>8} {:>10} {:>8} {:>8}", "date", "score", "cumulative", "target", "70%");
            current = label;
        }
        println!(
            "  {:<10} {:>8} {:>10} {:>8} {:>8}",
            r.date.to_string(),
            fmt_opt(r.score),
            fmt_opt(r.cumulative),
            fmt_opt(r.target),
            fmt_opt(r.target_70_pct)
        );
    }
}

pub fn print_habits(habits: &[HabitSeries]) {
    if habits.is_empty() {
        println!("No habits configured.");
        return;
    }
    for h in habits {
        println!("\n{} [{}] since {}", h.habit.name, h.habit.criteria.as_str(), h.habit.start_date);
        for w in &h.weeks {
            println!("  week of {}: {}", w.week_start, w.score);
        }
    }
}

pub fn print_failures(failures: &[NoteFailure]) {
    if failures.is_empty() {
        return;
    }
    println!("\nSkipped notes:");
    for f in failures {
        println!("  {} [{}] {}", f.note, f.code, f.message);
    }
}
