use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::aggregate::score::daily_scores;
use crate::models::{Habit, HabitDay, HabitSeries, HabitWeek};
use crate::tree::filter::{filter_by_keywords, filter_by_tag};
use crate::tree::TaskTree;

/// Daily and weekly totals of a habit from its start date through `today`.
/// `#name` habits match tagged tasks; other names match titles.
pub fn habit_series(habit: &Habit, daily_forest: &TaskTree, today: NaiveDate) -> HabitSeries {
    let matches = if habit.name.starts_with('#') {
        filter_by_tag(daily_forest, &habit.name)
    } else {
        filter_by_keywords(daily_forest, std::slice::from_ref(&habit.name), None, None)
    };
    let scores = daily_scores(habit.criteria, &matches);

    let days: Vec<HabitDay> = habit
        .start_date
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| HabitDay {
            date,
            score: scores.get(&date).copied().unwrap_or(0.0),
        })
        .collect();

    let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for day in &days {
        *weeks.entry(week_start(day.date)).or_insert(0.0) += day.score;
    }

    HabitSeries {
        habit: habit.clone(),
        days,
        weeks: weeks
            .into_iter()
            .map(|(week_start, score)| HabitWeek { week_start, score })
            .collect(),
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
