//! Scene debug console messages.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Colour markup the controller wraps around debug text.
static SPAN_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span style="color:([a-z]+);">"#).expect("valid regex"));
static SPAN_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</span>").expect("valid regex"));

/// One entry of a scene's debug console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugMessage {
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub txt: String,
}

impl DebugMessage {
    /// Message text without colour markup.
    pub fn plain_text(&self) -> String {
        let text = SPAN_OPEN_RE.replace_all(&self.txt, "");
        SPAN_CLOSE_RE.replace_all(&text, "").into_owned()
    }

    /// Render as `[type] HH:MM:SS: text` in the given time zone.
    pub fn format_line<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let time = DateTime::from_timestamp(self.timestamp, 0)
            .map(|t| t.with_timezone(tz).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        format!("[{}] {}: {}", self.kind, time, self.plain_text())
    }
}

/// Remembers how much of a scene's debug log has been printed.
///
/// The controller returns the whole log on every poll and restarts it when
/// the scene runs again; a newer first timestamp means a fresh log.
#[derive(Debug, Clone, Default)]
pub struct DebugCursor {
    first_timestamp: i64,
    printed: usize,
}

impl DebugCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the messages not yet seen and advance the cursor past them.
    pub fn advance<'a>(&mut self, messages: &'a [DebugMessage]) -> &'a [DebugMessage] {
        if let Some(first) = messages.first() {
            if first.timestamp > self.first_timestamp {
                self.first_timestamp = first.timestamp;
                self.printed = 0;
            }
        }
        let start = self.printed.min(messages.len());
        self.printed = messages.len();
        &messages[start..]
    }
}
