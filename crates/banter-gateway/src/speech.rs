//! Speech-safe response text.

use serde_json::Value;
use std::fmt;

/// A sentence ready for text-to-speech.
///
/// Construction strips markup tags and control characters so downstream
/// speech synthesis never receives SSML fragments or stray escape bytes.
/// One gateway outcome maps to exactly one `SpokenResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenResponse(String);

impl SpokenResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self(sanitize(&text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SpokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SpokenResponse> for String {
    fn from(response: SpokenResponse) -> Self {
        response.0
    }
}

/// Renders a JSON value the way it should be spoken: strings without their
/// surrounding quotes, everything else in compact JSON form.
pub fn speakable(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Strips markup tags and control characters from `text`.
///
/// Tag spans (`<` up to the closing `>`) are dropped entirely; runs of
/// control characters collapse into a single space.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c => out.push(c),
        }
    }
    out.trim().to_string()
}
