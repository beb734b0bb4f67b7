use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Done,
    InProgress,
    Cancelled,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
            Self::InProgress => "in_progress",
            Self::Cancelled => "cancelled",
            Self::Blocked => "blocked",
        }
    }

    /// Map a three-character checkbox marker (`[ ]`, `[x]`, ...) to a status.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "[ ]" => Some(Self::Todo),
            "[x]" => Some(Self::Done),
            "[/]" => Some(Self::InProgress),
            "[-]" => Some(Self::Cancelled),
            "[|]" => Some(Self::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Lowest => "lowest",
        }
    }

    pub fn from_glyph(token: &str) -> Option<Self> {
        match token {
            "🔺" => Some(Self::Highest),
            "⏫" => Some(Self::High),
            "🔼" => Some(Self::Medium),
            "🔽" => Some(Self::Low),
            "⏬" => Some(Self::Lowest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    Created,
    Started,
    Scheduled,
    Due,
    Done,
    Cancelled,
}

impl DateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Scheduled => "scheduled",
            Self::Due => "due",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_glyph(token: &str) -> Option<Self> {
        match token {
            "➕" => Some(Self::Created),
            "🛫" => Some(Self::Started),
            "⏳" => Some(Self::Scheduled),
            "📅" => Some(Self::Due),
            "✅" => Some(Self::Done),
            "❌" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Epic,
    Story,
    Task,
    Todo,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Task => "task",
            Self::Todo => "todo",
        }
    }

    /// Tags that assign a type. `todo` is the fallback and never comes from a tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "epic" => Some(Self::Epic),
            "story" => Some(Self::Story),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    pub fn default_story_points(&self) -> Option<f64> {
        match self {
            Self::Epic | Self::Story => Some(0.0),
            Self::Task => Some(1.0),
            Self::Todo => None,
        }
    }
}

/// A timed entry in a daily note, e.g. `9:30-11 AM Standup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Length in hours.
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub raw_text: String,
    pub title: String,
    pub status: Option<TaskStatus>,
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
    pub dates: BTreeMap<DateKind, NaiveDate>,
    /// Back-reference to a key result heading, e.g. `[[2024 Oct#O1 KR1 Ship]]`.
    pub okr: Option<String>,
    pub story_points: Option<f64>,
    pub duration: Option<f64>,
    /// `key::value` annotations without a dedicated field.
    pub fields: BTreeMap<String, String>,
    pub task_type: TaskType,
    pub note: String,
    pub source_date: Option<NaiveDate>,
    pub event: Option<Event>,
}

impl Task {
    pub fn date(&self, kind: DateKind) -> Option<NaiveDate> {
        self.dates.get(&kind).copied()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == Some(TaskStatus::Cancelled)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Hours spent: the event span when the title carries a time range,
    /// otherwise an explicit `[duration::]` annotation, otherwise zero.
    pub fn effective_duration(&self) -> f64 {
        self.event
            .as_ref()
            .map(|e| e.duration)
            .or(self.duration)
            .unwrap_or(0.0)
    }
}
