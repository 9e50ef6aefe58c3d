//! Parses LLM-written travel itineraries into a day-by-day [`Timeline`].

use std::sync::OnceLock;

use tracing::error;

pub mod ast;
pub mod builder;
pub mod envelope;
pub mod line;
pub mod logging;
pub mod parser;
pub mod settings;
pub mod summary;
pub mod time;

pub use ast::{Activity, ActivityKind, Day, Timeline};
pub use parser::{Diagnostic, DiagnosticKind, ParseError, ParseErrorKind, Parser, Report};
pub use settings::{Settings, SettingsError};

/// Parses itinerary text with the built-in Vietnamese vocabulary.
pub fn parse_itinerary(raw: &str) -> Timeline {
    match default_parser() {
        Some(parser) => parser.parse(raw),
        None => Timeline::default(),
    }
}

fn default_parser() -> Option<&'static Parser> {
    static PARSER: OnceLock<Option<Parser>> = OnceLock::new();
    PARSER
        .get_or_init(|| match Parser::new(Settings::default()) {
            Ok(parser) => Some(parser),
            Err(err) => {
                error!(error = %err, "built-in itinerary vocabulary failed to compile");
                None
            }
        })
        .as_ref()
}
