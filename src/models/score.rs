use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Criteria;

/// One day of one key result's progress. `score` and `cumulative` are `None`
/// for days that have not happened yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub objective: String,
    pub key_result: String,
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub cumulative: Option<f64>,
    pub target: Option<f64>,
    pub target_70_pct: Option<f64>,
}

impl ScoreRow {
    /// Label used by charts, e.g. `O1 KR2`.
    pub fn label(&self) -> String {
        format!("{} {}", self.objective, self.key_result)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub criteria: Criteria,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDay {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitWeek {
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSeries {
    pub habit: Habit,
    pub days: Vec<HabitDay>,
    pub weeks: Vec<HabitWeek>,
}
