//! Unwrapping of the optional `{"content": "..."}` JSON envelope around itinerary text.

use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

/// Returns the envelope's `content` string, or `text` unchanged when it is not an envelope.
///
/// Only one level is unwrapped. Text that is not JSON, JSON that is not an object and objects
/// without a string `content` field are all passed through silently.
pub fn unwrap_envelope(text: &str) -> Cow<'_, str> {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(text) else {
        return Cow::Borrowed(text);
    };

    match object.remove("content") {
        Some(Value::String(content)) => {
            trace!(len = content.len(), "unwrapped JSON envelope");
            Cow::Owned(content)
        }
        _ => Cow::Borrowed(text),
    }
}
