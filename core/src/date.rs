//! Display formatting for dates coming from the API or the UI.
//!
//! Everything renders as `DD/MM/YYYY HH:MM` in host local time, or as the
//! [`INVALID_DATE`] marker when there is nothing sensible to show.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use tokio::sync::watch;

pub const INVALID_DATE: &str = "Data inválida";

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Anything `format_date` knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// A wall-clock time, already in local time.
    Naive(NaiveDateTime),
    /// An instant with a known offset; converted to local time for display.
    Instant(DateTime<FixedOffset>),
    /// Text as sent by the API (ISO 8601 / RFC 3339).
    Text(String),
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::Naive(value)
    }
}

/// A bare date means local midnight.
impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Naive(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        DateInput::Instant(value.fixed_offset())
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<&DateInput> for DateInput {
    fn from(value: &DateInput) -> Self {
        value.clone()
    }
}

impl DateInput {
    /// Resolve to a local wall-clock time, or `None` when the input does not
    /// denote a real local instant.
    pub fn to_local(&self) -> Option<NaiveDateTime> {
        match self {
            DateInput::Naive(naive) => Some(*naive),
            DateInput::Instant(instant) => Some(instant.with_timezone(&Local).naive_local()),
            DateInput::Text(text) => parse_text(text.trim()),
        }
    }
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Local).naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return resolve_local(naive, |naive| {
                Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|local| local.naive_local())
            });
        }
    }
    // Date-only ISO strings denote UTC midnight.
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let utc = date.and_time(chrono::NaiveTime::MIN).and_utc();
        return Some(utc.with_timezone(&Local).naive_local());
    }
    None
}

/// A wall-clock time skipped by a forward DST jump is moved past the gap.
fn resolve_local(
    naive: NaiveDateTime,
    lookup: impl Fn(NaiveDateTime) -> Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    lookup(naive).or_else(|| lookup(naive + TimeDelta::hours(1)))
}

/// Render `input` as `DD/MM/YYYY HH:MM`, or [`INVALID_DATE`] when it is
/// absent, empty or unparseable.
pub fn format_date<D: Into<DateInput>>(input: Option<D>) -> String {
    input
        .map(Into::into)
        .and_then(|date| date.to_local())
        .map(|local| local.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// A formatted date bound to a mutable source.
///
/// The text is computed on first read and recomputed only after the source
/// publishes a new value.
#[derive(Debug)]
pub struct FormattedDate {
    source: watch::Receiver<Option<DateInput>>,
    cached: Option<String>,
    computations: usize,
}

impl FormattedDate {
    pub fn new(source: watch::Receiver<Option<DateInput>>) -> Self {
        Self {
            source,
            cached: None,
            computations: 0,
        }
    }

    /// Create a source channel seeded with `initial` and a view bound to it.
    pub fn channel(initial: Option<DateInput>) -> (watch::Sender<Option<DateInput>>, Self) {
        let (tx, rx) = watch::channel(initial);
        (tx, Self::new(rx))
    }

    pub fn get(&mut self) -> &str {
        // A closed source keeps serving its last value.
        let changed = self.source.has_changed().unwrap_or(false);
        if changed || self.cached.is_none() {
            let formatted = {
                let current = self.source.borrow_and_update();
                format_date((*current).as_ref())
            };
            self.computations += 1;
            self.cached = Some(formatted);
        }
        self.cached.as_deref().unwrap_or(INVALID_DATE)
    }
}
