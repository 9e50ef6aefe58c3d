use chrono::NaiveTime;

use crate::time::{serde_clock, TimeRange};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Timeline {
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Day {
    pub label: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub time: String,
    #[serde(with = "serde_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "serde_clock::option", default)]
    pub end_time: Option<NaiveTime>,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    General,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    /// Days that hold at least one activity; header-only days are skipped.
    pub fn populated_days(&self) -> impl Iterator<Item = &Day> {
        self.days.iter().filter(|day| !day.is_empty())
    }
}

impl Day {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            activities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl Activity {
    pub fn new(time: impl Into<String>, range: TimeRange, description: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            start_time: range.start,
            end_time: range.end,
            description: description.into(),
            kind: ActivityKind::General,
        }
    }

    /// An activity read from a timed line; its label is the canonical range text.
    pub fn timed(range: TimeRange, description: impl Into<String>) -> Self {
        Self::new(range.to_string(), range, description)
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::time::parse_range;

    #[test]
    fn activity_serializes_with_wire_field_names() {
        let range = parse_range("8:00 - 9:00").unwrap();
        let activity = Activity::timed(range, "Ăn sáng");

        assert_eq!(
            serde_json::to_value(&activity).unwrap(),
            json!({
                "time": "08:00 - 09:00",
                "startTime": "08:00",
                "endTime": "09:00",
                "description": "Ăn sáng",
                "type": "general",
            })
        );
    }

    #[test]
    fn point_time_serializes_null_end() {
        let activity = Activity::timed(parse_range("21:00").unwrap(), "Kết thúc");
        let value = serde_json::to_value(&activity).unwrap();

        assert_eq!(value["time"], "21:00");
        assert!(value["endTime"].is_null());
    }

    #[test]
    fn stored_timeline_reads_back() {
        let stored = r#"{"days":[{"label":"Ngày 2","activities":[
            {"time":"Chiều","startTime":"14:00","endTime":null,"description":"Bảo tàng"}
        ]}]}"#;
        let timeline: Timeline = serde_json::from_str(stored).unwrap();
        let activity = &timeline.days[0].activities[0];

        assert_eq!(activity.kind, ActivityKind::General);
        assert_eq!(activity.range().to_string(), "14:00");
        assert_eq!(timeline.activity_count(), 1);
    }

    #[test]
    fn populated_days_skips_header_only_days() {
        let mut first = Day::new("Ngày 1");
        first
            .activities
            .push(Activity::timed(parse_range("9:00").unwrap(), "Đi bộ"));
        let timeline = Timeline {
            days: vec![first, Day::new("Ngày 2")],
        };

        let labels: Vec<_> = timeline.populated_days().map(|day| &day.label).collect();
        assert_eq!(labels, ["Ngày 1"]);
    }
}
