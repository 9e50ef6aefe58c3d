//! Clock-token normalization into `HH:MM` [`NaiveTime`] values.

use std::fmt;

use chrono::NaiveTime;

/// Regex fragment matching one clock token; validated afterwards by [`parse_clock`].
pub const CLOCK_TOKEN: &str = r"\d{1,2}(?:[:hH]\d{0,2})?";

/// Regex fragment matching any accepted range separator.
pub const RANGE_SEPARATOR: &str = r"[-–—]";

const RANGE_SEPARATORS: [char; 3] = ['-', '–', '—'];
const CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: Option<NaiveTime>) -> Self {
        Self { start, end }
    }

    pub fn window(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(start, Some(end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{} - {}", format_clock(self.start), format_clock(end)),
            None => f.write_str(&format_clock(self.start)),
        }
    }
}

/// Parses a single clock token such as `8`, `8:`, `8:5`, `08:30` or `8h30`.
///
/// Hours take one or two digits, minutes zero to two (missing minutes mean `00`).
/// Out-of-range values yield `None`.
pub fn parse_clock(token: &str) -> Option<NaiveTime> {
    let token = token.trim();
    let (hours, minutes) = match token.find([':', 'h', 'H']) {
        Some(index) => (&token[..index], &token[index + 1..]),
        None => (token, ""),
    };

    if !is_digits(hours, 1..=2) || !is_digits(minutes, 0..=2) {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = if minutes.is_empty() {
        0
    } else {
        minutes.parse().ok()?
    };

    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Parses `start`, or `start - end` with any accepted separator.
pub fn parse_range(text: &str) -> Option<TimeRange> {
    let text = text.trim();
    match text.split_once(RANGE_SEPARATORS) {
        Some((start, end)) => Some(TimeRange::new(
            parse_clock(start)?,
            Some(parse_clock(end)?),
        )),
        None => Some(TimeRange::new(parse_clock(text)?, None)),
    }
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

fn is_digits(text: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Serde adapter storing a [`NaiveTime`] as `"HH:MM"`.
pub mod serde_clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid clock time `{raw}`")))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&crate::time::format_clock(*time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let Some(raw) = Option::<String>::deserialize(deserializer)? else {
                return Ok(None);
            };
            crate::time::parse_clock(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid clock time `{raw}`")))
        }
    }
}
