//! Per-line classification: day header, period header, timed activity, else continuation.

use regex::{Captures, Regex};

use crate::{
    parser::{DiagnosticKind, ParseErrorKind},
    settings::Settings,
    time::{parse_clock, parse_range, TimeRange, CLOCK_TOKEN, RANGE_SEPARATOR},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag {
    DayHeader {
        label: String,
    },
    PeriodHeader {
        label: String,
        range: Option<TimeRange>,
        /// Inline text after the header's colon, e.g. `Sáng: Ăn phở`.
        note: Option<String>,
    },
    TimedActivity {
        range: TimeRange,
        description: String,
    },
    Continuation {
        text: String,
    },
}

/// A classified line plus anything odd noticed while classifying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub tag: LineTag,
    pub anomaly: Option<DiagnosticKind>,
}

impl Classified {
    fn clean(tag: LineTag) -> Self {
        Self { tag, anomaly: None }
    }

    fn demoted(line: &str, reason: String) -> Self {
        Self {
            tag: LineTag::Continuation {
                text: line.to_string(),
            },
            anomaly: Some(DiagnosticKind::DemotedLine { reason }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    day_header: Option<Regex>,
    period_header: Option<Regex>,
    timed_activity: Regex,
}

impl Classifier {
    pub fn new(settings: &Settings) -> Result<Self, regex::Error> {
        let day_header = match alternation(&settings.day_keywords) {
            Some(keywords) => Some(Regex::new(&format!(
                r"(?i)^[#*\s]*(?:{keywords})\s*[0-9]+(?:$|[^0-9\p{{L}}])"
            ))?),
            None => None,
        };

        let prefix = alternation(&settings.period_prefixes)
            .map(|prefixes| format!(r"(?:(?:{prefixes})\s+)?"))
            .unwrap_or_default();
        let period_header =
            match alternation(settings.periods.iter().map(|period| &period.keyword)) {
                Some(periods) => Some(Regex::new(&format!(
                    r"(?i)^[#*\s]*(?:[-•+]\s*)?[*\s]*(?P<label>{prefix}(?:{periods}))[*\s]*(?:\((?P<range>[^)]*)\)[*\s]*)?(?::(?P<note>.*))?$"
                ))?),
                None => None,
            };

        // The delimiter colon must not run into a digit, or `08:00 text` would split as `08` + `00 text`.
        let timed_activity = Regex::new(&format!(
            r"^(?:[-•*+]\s*)?\**\s*(?P<start>{CLOCK_TOKEN})\s*(?:{RANGE_SEPARATOR}\s*(?P<end>{CLOCK_TOKEN}))?\s*\**\s*:\**(?P<description>(?:[^0-9].*)?)$"
        ))?;

        Ok(Self {
            day_header,
            period_header,
            timed_activity,
        })
    }

    pub fn classify(&self, line: &str) -> Result<Classified, ParseErrorKind> {
        let line = line.trim();

        if self.day_header.as_ref().is_some_and(|re| re.is_match(line)) {
            // Bold may wrap only the ordinal, as in `**Ngày 1**: Hà Nội`.
            let unbolded = line.replace('*', "");
            return Ok(Classified::clean(LineTag::DayHeader {
                label: strip_markers(&unbolded).to_string(),
            }));
        }

        if let Some(caps) = self.period_header.as_ref().and_then(|re| re.captures(line)) {
            return classify_period(&caps);
        }

        if let Some(caps) = self.timed_activity.captures(line) {
            return classify_timed(line, &caps);
        }

        Ok(Classified::clean(LineTag::Continuation {
            text: line.to_string(),
        }))
    }
}

fn classify_period(caps: &Captures<'_>) -> Result<Classified, ParseErrorKind> {
    let label = capture(caps, "label")?.split_whitespace().collect::<Vec<_>>().join(" ");
    let note = caps
        .name("note")
        .map(|note| strip_markers(note.as_str()))
        .filter(|note| !note.is_empty())
        .map(str::to_string);

    let (range, anomaly) = match caps.name("range").map(|range| range.as_str()) {
        None => (None, None),
        Some(raw) => match parse_range(raw) {
            Some(range) => (Some(range), None),
            None => (
                None,
                Some(DiagnosticKind::DefaultPeriodWindow {
                    range: raw.trim().to_string(),
                }),
            ),
        },
    };

    Ok(Classified {
        tag: LineTag::PeriodHeader { label, range, note },
        anomaly,
    })
}

fn classify_timed(line: &str, caps: &Captures<'_>) -> Result<Classified, ParseErrorKind> {
    let start_token = capture(caps, "start")?;
    let Some(start) = parse_clock(start_token) else {
        return Ok(Classified::demoted(
            line,
            format!("invalid time `{start_token}`"),
        ));
    };

    let end = match caps.name("end").map(|end| end.as_str()) {
        None => None,
        Some(end_token) => match parse_clock(end_token) {
            Some(end) => Some(end),
            None => {
                return Ok(Classified::demoted(
                    line,
                    format!("invalid time `{end_token}`"),
                ))
            }
        },
    };

    let description = capture(caps, "description")?.trim();
    if description.is_empty() {
        return Ok(Classified::demoted(line, "empty description".to_string()));
    }

    Ok(Classified::clean(LineTag::TimedActivity {
        range: TimeRange::new(start, end),
        description: description.to_string(),
    }))
}

fn capture<'t>(caps: &Captures<'t>, group: &'static str) -> Result<&'t str, ParseErrorKind> {
    caps.name(group)
        .map(|m| m.as_str())
        .ok_or(ParseErrorKind::MissingCapture(group))
}

/// Strips leading `#`/`*` markers and trailing `*`/`:` markers, e.g. `**Ngày 1:**` -> `Ngày 1`.
pub fn strip_markers(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .trim_end_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
}

/// Escaped keyword alternation, longest first so `Tối muộn` wins over `Tối`.
#[cfg(test)]
impl Classifier {
    /// Swaps in a custom timed-activity pattern so tests can exercise capture failures.
    pub(crate) fn with_timed_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.timed_activity = Regex::new(pattern)?;
        Ok(self)
    }
}

fn alternation<'a>(keywords: impl IntoIterator<Item = &'a String>) -> Option<String> {
    let mut keywords: Vec<&str> = keywords
        .into_iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    if keywords.is_empty() {
        return None;
    }
    keywords.sort_by_key(|keyword| std::cmp::Reverse(keyword.chars().count()));

    let alternation = keywords
        .into_iter()
        .map(|keyword| {
            keyword
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Some(alternation)
}
