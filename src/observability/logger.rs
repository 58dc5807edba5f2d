//! Structured JSON logger.
//!
//! One event per line, emitted synchronously with no buffering. Every line
//! carries an RFC 3339 timestamp, a level, and an event name, followed by
//! the caller's fields in sorted order so the same event always serializes
//! identically. INFO and below go to stdout, ERROR and FATAL to stderr.

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};

/// Log levels, ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emit an event at the given level.
pub fn emit(level: Level, event: &str, fields: &[(&str, &str)]) {
    let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    if level >= Level::Error {
        write_line(&mut io::stderr(), &ts, level, event, fields);
    } else {
        write_line(&mut io::stdout(), &ts, level, event, fields);
    }
}

pub fn trace(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Trace, event, fields);
}

pub fn info(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Info, event, fields);
}

pub fn warn(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Warn, event, fields);
}

pub fn error(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Error, event, fields);
}

pub fn fatal(event: &str, fields: &[(&str, &str)]) {
    emit(Level::Fatal, event, fields);
}

/// Render one line into the writer. The line is assembled in full before a
/// single `write_all` so concurrent emitters cannot interleave fields.
fn write_line<W: Write>(
    writer: &mut W,
    ts: &str,
    level: Level,
    event: &str,
    fields: &[(&str, &str)],
) {
    let mut line = String::with_capacity(128);

    line.push_str("{\"ts\":\"");
    line.push_str(ts);
    line.push_str("\",\"level\":\"");
    line.push_str(level.as_str());
    line.push_str("\",\"event\":\"");
    escape_into(&mut line, event);
    line.push('"');

    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        line.push_str(",\"");
        escape_into(&mut line, key);
        line.push_str("\":\"");
        escape_into(&mut line, value);
        line.push('"');
    }

    line.push_str("}\n");

    let _ = writer.write_all(line.as_bytes());
    let _ = writer.flush();
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
fn capture(level: Level, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    write_line(&mut buffer, "2026-01-01T00:00:00.000Z", level, event, fields);
    String::from_utf8(buffer).unwrap()
}
