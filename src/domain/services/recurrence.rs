use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecurrenceError {
    #[error("Malformed recurrence part: {0}")]
    Malformed(String),
    #[error("Unsupported recurrence frequency: {0}")]
    UnsupportedFrequency(String),
    #[error("Unsupported recurrence interval: {0}")]
    UnsupportedInterval(String),
    #[error("Weekly recurrence requires BYDAY")]
    MissingByDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

/// Parsed recurrence expression, an RRULE subset:
/// `FREQ=WEEKLY;BYDAY=MO,WE,FR` or `FREQ=DAILY`. The grammar lives behind
/// this type so the expander never sees the raw string.
#[derive(Debug, Clone)]
pub struct Recurrence {
    pub freq: Frequency,
    pub by_day: Vec<Weekday>,
}

impl Recurrence {
    pub fn parse(expr: &str) -> Result<Self, RecurrenceError> {
        let mut freq = None;
        let mut by_day = Vec::new();

        for part in expr.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RecurrenceError::Malformed(part.to_string()))?;

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => match value.trim().to_ascii_uppercase().as_str() {
                    "DAILY" => freq = Some(Frequency::Daily),
                    "WEEKLY" => freq = Some(Frequency::Weekly),
                    other => return Err(RecurrenceError::UnsupportedFrequency(other.to_string())),
                },
                "BYDAY" => {
                    for token in value.split(',').map(str::trim) {
                        by_day.push(parse_weekday(token)?);
                    }
                }
                // Anything beyond every-occurrence expansion is rejected
                // rather than silently mis-expanded.
                "INTERVAL" => {
                    if value.trim() != "1" {
                        return Err(RecurrenceError::UnsupportedInterval(value.to_string()));
                    }
                }
                _ => return Err(RecurrenceError::Malformed(part.to_string())),
            }
        }

        let freq = freq.ok_or_else(|| RecurrenceError::Malformed("missing FREQ".to_string()))?;

        if freq == Frequency::Weekly && by_day.is_empty() {
            return Err(RecurrenceError::MissingByDay);
        }

        Ok(Self { freq, by_day })
    }

    pub fn fires_on(&self, date: NaiveDate) -> bool {
        match self.freq {
            Frequency::Daily => true,
            Frequency::Weekly => self.by_day.contains(&date.weekday()),
        }
    }

    /// All fired dates in the inclusive calendar range.
    pub fn dates_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = start;
        while current <= end {
            if self.fires_on(current) {
                dates.push(current);
            }
            current += Duration::days(1);
        }
        dates
    }
}

fn parse_weekday(token: &str) -> Result<Weekday, RecurrenceError> {
    match token.to_ascii_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        other => Err(RecurrenceError::Malformed(other.to_string())),
    }
}
