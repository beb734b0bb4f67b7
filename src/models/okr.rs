use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criteria {
    Count,
    Duration,
    StoryPoints,
}

impl Criteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Duration => "duration",
            Self::StoryPoints => "story-points",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    /// `KR1`, `KR2`, ...
    pub id: String,
    pub name: String,
    pub criteria: Criteria,
    pub target: Option<f64>,
    pub keywords: Option<Vec<String>>,
    /// Link tasks use in `(okr:: ...)` to point back at this key result.
    pub okr_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// `O1`, `O2`, ...
    pub id: String,
    pub name: String,
    pub key_results: Vec<KeyResult>,
}

impl Objective {
    pub fn key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkrCycle {
    pub note: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub objectives: Vec<Objective>,
}

impl OkrCycle {
    pub fn objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Number of calendar days in the cycle, both ends included.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

/// Words used in `[criteria:: ...]` annotations for each scoring method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaVocabulary {
    pub count: String,
    pub duration: String,
    pub story_points: String,
}

impl Default for CriteriaVocabulary {
    fn default() -> Self {
        Self {
            count: Criteria::Count.as_str().to_string(),
            duration: Criteria::Duration.as_str().to_string(),
            story_points: Criteria::StoryPoints.as_str().to_string(),
        }
    }
}

impl CriteriaVocabulary {
    pub fn resolve(&self, word: &str) -> Option<Criteria> {
        let word = word.trim();
        if word.eq_ignore_ascii_case(&self.count) {
            Some(Criteria::Count)
        } else if word.eq_ignore_ascii_case(&self.duration) {
            Some(Criteria::Duration)
        } else if word.eq_ignore_ascii_case(&self.story_points) {
            Some(Criteria::StoryPoints)
        } else {
            None
        }
    }
}
