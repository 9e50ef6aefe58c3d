//! The day/activity state machine that turns classified lines into a [`Timeline`].

use std::mem;

use tracing::debug;

use crate::{
    ast::{Activity, Day, Timeline},
    line::{Classified, LineTag},
    parser::{Diagnostic, DiagnosticKind, Report},
    settings::Settings,
};

#[derive(Debug)]
enum State {
    Idle,
    InDay(Day),
    /// Only period headers stay open; timed lines are complete on their own.
    InActivity {
        day: Day,
        activity: Activity,
        opened_at: usize,
    },
}

#[derive(Debug)]
pub struct TimelineBuilder<'s> {
    settings: &'s Settings,
    state: State,
    days: Vec<Day>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> TimelineBuilder<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            state: State::Idle,
            days: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Applies one classified line; `line` is its 1-based position in the source text.
    pub fn feed(&mut self, line: usize, classified: Classified) {
        if let Some(kind) = classified.anomaly {
            self.note(line, kind);
        }

        let state = mem::replace(&mut self.state, State::Idle);
        self.state = match classified.tag {
            LineTag::DayHeader { label } => {
                self.close_day(state);
                State::InDay(Day::new(label))
            }
            LineTag::PeriodHeader { label, range, note } => {
                let day = self.current_day(line, state);
                let range = range.unwrap_or_else(|| self.settings.period_window(&label));
                State::InActivity {
                    day,
                    activity: Activity::new(label, range, note.unwrap_or_default()),
                    opened_at: line,
                }
            }
            LineTag::TimedActivity { range, description } => {
                let mut day = self.current_day(line, state);
                day.activities.push(Activity::timed(range, description));
                State::InDay(day)
            }
            LineTag::Continuation { text } => match state {
                State::InActivity {
                    day,
                    mut activity,
                    opened_at,
                } => {
                    activity.description.push(' ');
                    activity.description.push_str(&text);
                    State::InActivity {
                        day,
                        activity,
                        opened_at,
                    }
                }
                other => {
                    self.note(line, DiagnosticKind::DiscardedText { text });
                    other
                }
            },
        };
    }

    pub fn finish(mut self) -> Report {
        let state = mem::replace(&mut self.state, State::Idle);
        self.close_day(state);

        Report {
            timeline: Timeline { days: self.days },
            diagnostics: self.diagnostics,
        }
    }

    /// Flushes any open activity and hands back the open day, synthesizing the default day
    /// when nothing is open yet.
    fn current_day(&mut self, line: usize, state: State) -> Day {
        match state {
            State::Idle => {
                let label = self.settings.default_day_label.clone();
                self.note(
                    line,
                    DiagnosticKind::SynthesizedDay {
                        label: label.clone(),
                    },
                );
                Day::new(label)
            }
            State::InDay(day) => day,
            State::InActivity {
                mut day,
                activity,
                opened_at,
            } => {
                self.flush_activity(&mut day, activity, opened_at);
                day
            }
        }
    }

    fn close_day(&mut self, state: State) {
        match state {
            State::Idle => {}
            State::InDay(day) => self.days.push(day),
            State::InActivity {
                mut day,
                activity,
                opened_at,
            } => {
                self.flush_activity(&mut day, activity, opened_at);
                self.days.push(day);
            }
        }
    }

    fn flush_activity(&mut self, day: &mut Day, mut activity: Activity, opened_at: usize) {
        let description = activity.description.trim();
        if description.is_empty() {
            self.note(
                opened_at,
                DiagnosticKind::EmptyPeriodDropped {
                    label: activity.time,
                },
            );
            return;
        }

        activity.description = description.to_string();
        day.activities.push(activity);
    }

    fn note(&mut self, line: usize, kind: DiagnosticKind) {
        debug!(line, ?kind, "itinerary anomaly");
        self.diagnostics.push(Diagnostic { line, kind });
    }
}
