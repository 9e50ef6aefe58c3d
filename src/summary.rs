use chrono::{NaiveTime, TimeDelta};

use crate::{
    ast::{Activity, Day, Timeline},
    time::serde_clock,
};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub label: String,
    pub activity_count: usize,
    #[serde(with = "serde_clock::option")]
    pub first_start: Option<NaiveTime>,
    #[serde(with = "serde_clock::option")]
    pub last_end: Option<NaiveTime>,
    /// Total minutes covered by activities that have an end time.
    pub scheduled_minutes: i64,
}

pub fn summarize(timeline: &Timeline) -> Vec<DaySummary> {
    timeline.days.iter().map(summarize_day).collect()
}

fn summarize_day(day: &Day) -> DaySummary {
    let first_start = day.activities.iter().map(|a| a.start_time).min();
    let last_end = day.activities.iter().filter_map(|a| a.end_time).max();
    let scheduled = day
        .activities
        .iter()
        .filter_map(span)
        .fold(TimeDelta::zero(), |sum, delta| sum + delta);

    DaySummary {
        label: day.label.clone(),
        activity_count: day.activities.len(),
        first_start,
        last_end,
        scheduled_minutes: scheduled.num_minutes(),
    }
}

// An end before the start means the activity runs past midnight.
fn span(activity: &Activity) -> Option<TimeDelta> {
    let end = activity.end_time?;
    let span = end - activity.start_time;
    if span < TimeDelta::zero() {
        Some(span + TimeDelta::days(1))
    } else {
        Some(span)
    }
}
