use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use thiserror::Error;
use tracing::warn;

use crate::{
    ast::Timeline,
    builder::TimelineBuilder,
    envelope::unwrap_envelope,
    line::Classifier,
    settings::{Settings, SettingsError},
};

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("pattern matched without capture group `{0}`")]
    MissingCapture(&'static str),
}

/// Something the parser tolerated rather than failed on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// 1-based source line, or 0 when the event concerns the whole input.
    pub line: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Continuation text with no open period to attach to.
    DiscardedText { text: String },
    /// A timed line that could not be normalized and was read as plain text.
    DemotedLine { reason: String },
    /// A period header whose explicit range was unreadable.
    DefaultPeriodWindow { range: String },
    SynthesizedDay { label: String },
    /// A period header that never received any description.
    EmptyPeriodDropped { label: String },
    Recovered { error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    pub timeline: Timeline,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn recovered(line: usize, error: String) -> Self {
        Self {
            timeline: Timeline::default(),
            diagnostics: vec![Diagnostic {
                line,
                kind: DiagnosticKind::Recovered { error },
            }],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Turns free-form itinerary text into a [`Timeline`].
///
/// A parser holds only compiled, immutable patterns, so one instance can serve any number of
/// threads; every call builds its own state machine.
#[derive(Debug, Clone)]
pub struct Parser {
    settings: Settings,
    classifier: Classifier,
}

impl Parser {
    pub fn new(settings: Settings) -> std::result::Result<Self, SettingsError> {
        settings.validate()?;
        let classifier = Classifier::new(&settings)?;
        Ok(Self {
            settings,
            classifier,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Best-effort parse. Never panics and never fails; the worst case is an empty timeline.
    pub fn parse(&self, raw: &str) -> Timeline {
        self.parse_report(raw).timeline
    }

    /// Like [`Parser::parse`], but keeps the diagnostics gathered on the way.
    pub fn parse_report(&self, raw: &str) -> Report {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_parse(raw))) {
            Ok(Ok(report)) => report,
            Ok(Err(err)) => {
                warn!(line = err.line, error = %err, "itinerary parse failed, returning empty timeline");
                Report::recovered(err.line, err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(error = %message, "itinerary parser panicked, returning empty timeline");
                Report::recovered(0, message)
            }
        }
    }

    /// The pipeline without the failure boundary.
    pub fn try_parse(&self, raw: &str) -> Result<Report> {
        let text = unwrap_envelope(raw);
        let mut builder = TimelineBuilder::new(&self.settings);

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let classified = self
                .classifier
                .classify(line)
                .map_err(|kind| ParseError::new(kind, index + 1))?;
            builder.feed(index + 1, classified);
        }

        Ok(builder.finish())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
