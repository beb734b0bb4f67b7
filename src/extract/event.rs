use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;

use crate::models::Event;

static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\d{1,2})(?::(\d{2}))?\s*([ap]m)?\s*-\s*(\d{1,2})(?::(\d{2}))?\s*([ap]m)?(?:\s|$)",
    )
    .expect("valid time range regex")
});

/// Read a leading `<start>-<end>` time range from a daily-note title and
/// anchor it to `date`. Without AM/PM an hour is taken as written (24-hour
/// clock). An end earlier than the start rolls over to the next day.
pub fn parse_event(title: &str, date: NaiveDate) -> Option<Event> {
    let caps = TIME_RANGE_RE.captures(title)?;
    let start = time_of_day(&caps[1], caps.get(2).map(|m| m.as_str()), caps.get(3).map(|m| m.as_str()))?;
    let end = time_of_day(&caps[4], caps.get(5).map(|m| m.as_str()), caps.get(6).map(|m| m.as_str()))?;

    let start = date.and_time(start);
    let mut end = date.and_time(end);
    if end < start {
        end += Duration::days(1);
    }
    let duration = (end - start).num_minutes() as f64 / 60.0;
    Some(Event {
        start,
        end,
        duration,
    })
}

fn time_of_day(hour: &str, minute: Option<&str>, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.map_or(Some(0), |m| m.parse().ok())?;
    let hour = match meridiem.map(str::to_ascii_lowercase).as_deref() {
        Some("am") if (1..=12).contains(&hour) => hour % 12,
        Some("pm") if (1..=12).contains(&hour) => hour % 12 + 12,
        Some(_) => return None,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
