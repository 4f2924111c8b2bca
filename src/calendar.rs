//! Calendar export: RFC 5545 `.ics` content and Google Calendar template links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use uuid::Uuid;

const PRODID: &str = "-//CooksyApp//Meal Plan Calendar//EN";
const UID_DOMAIN: &str = "cooksy.app";
const GOOGLE_CALENDAR_RENDER_URL: &str = "https://www.google.com/calendar/render";
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
}

impl CalendarEvent {
    pub fn recurrence_rule(&self) -> Option<&str> {
        self.recurrence
            .as_ref()
            .and_then(|rules| rules.first())
            .map(String::as_str)
    }
}

/// `YYYYMMDDTHHMMSSZ`, the UTC form used by both ICS and Google links.
pub fn format_utc_stamp(date_time: &DateTime<Utc>) -> String {
    date_time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes TEXT values: backslash, semicolon and comma get a backslash, newlines become `\n`.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | ';' | ',' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Folds a content line so no physical line exceeds 75 octets, never splitting a
/// UTF-8 sequence. Continuation lines start with a single space.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut limit = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > limit {
            folded.push_str("\r\n ");
            // the leading space counts against the next line
            limit = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        folded.push(c);
        used += c.len_utf8();
    }
    folded
}

pub fn generate_ics_file_content(events: &[CalendarEvent]) -> String {
    render_ics(events, Utc::now(), || Uuid::new_v4().to_string())
}

/// Renders a VCALENDAR with a fixed DTSTAMP and a caller-supplied UID source.
pub fn render_ics(
    events: &[CalendarEvent],
    stamp: DateTime<Utc>,
    mut next_uid: impl FnMut() -> String,
) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@{UID_DOMAIN}", next_uid()));
        lines.push(format!("DTSTAMP:{}", format_utc_stamp(&stamp)));
        lines.push(format!("DTSTART:{}", format_utc_stamp(&event.start.date_time)));
        lines.push(format!("DTEND:{}", format_utc_stamp(&event.end.date_time)));
        if let Some(rule) = event.recurrence_rule() {
            lines.push(format!("RRULE:{rule}"));
        }
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut content = lines
        .iter()
        .map(|line| fold_line(line))
        .collect::<Vec<_>>()
        .join("\r\n");
    content.push_str("\r\n");
    content
}

/// A "create event" link. Template links cannot carry RRULEs, so a recurring
/// event gets its rule appended to the details text instead.
pub fn generate_google_calendar_link(event: &CalendarEvent) -> String {
    let dates = format!(
        "{}/{}",
        format_utc_stamp(&event.start.date_time),
        format_utc_stamp(&event.end.date_time)
    );
    let details = match event.recurrence_rule() {
        Some(rule) => format!("{}\n\nSuggested recurrence: {}", event.description, rule),
        None => event.description.clone(),
    };

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.summary)
        .append_pair("dates", &dates)
        .append_pair("details", &details)
        .append_pair("ctz", &event.start.time_zone)
        .finish();
    format!("{GOOGLE_CALENDAR_RENDER_URL}?{query}")
}
