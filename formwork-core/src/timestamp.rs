//! Timestamp scalars, accepting the layouts HTML date inputs and
//! hand-typed dates produce.

use chrono::format::{Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc, Weekday};

use crate::{Scalar, ScalarError, ScalarKind};

/// One accepted timestamp layout.
#[derive(Clone, Copy)]
enum Layout {
    /// A full calendar date, midnight UTC
    Date(&'static str),
    /// `YYYY-MM`, on the first of the month
    Month,
    /// `YYYY`, on the first of January
    Year,
    /// RFC 3339, keeping the offset
    Rfc3339,
    /// A date and time without offset, read as UTC
    DateTime(&'static str),
}

/// Tried in order after the ISO week form; the first match wins.
const LAYOUTS: &[Layout] = &[
    // <input type="date">
    Layout::Date("%Y-%m-%d"),
    // <input type="month">
    Layout::Month,
    Layout::Year,
    Layout::Rfc3339,
    // <input type="datetime-local">
    Layout::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Date("%d/%m/%Y"),
    Layout::DateTime("%d/%m/%Y %H:%M:%S"),
];

impl Layout {
    fn parse(self, raw: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Layout::Date(fmt) => NaiveDate::parse_from_str(raw, fmt).ok().map(midnight_utc),
            Layout::Month => parse_partial_date(raw, "%Y-%m", false).map(midnight_utc),
            Layout::Year => parse_partial_date(raw, "%Y", true).map(midnight_utc),
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(raw).ok(),
            Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|dt| dt.and_utc().fixed_offset()),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset()
}

fn parse_partial_date(raw: &str, fmt: &str, fill_month: bool) -> Option<NaiveDate> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(fmt)).ok()?;
    if fill_month {
        parsed.set_month(1).ok()?;
    }
    parsed.set_day(1).ok()?;
    parsed.to_naive_date().ok()
}

/// `<input type="week">` sends `YYYY-Www`; it resolves to the Monday
/// starting that ISO week.
fn parse_iso_week(raw: &str) -> Option<NaiveDate> {
    let (year, week) = raw.split_once("-W")?;
    if year.len() != 4 || week.len() != 2 {
        return None;
    }
    if !year.bytes().chain(week.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)
}

/// Parse a timestamp from any of the accepted layouts.
///
/// In priority order:
///
/// 1. `2023-W42` (ISO week, resolves to its Monday)
/// 2. `2023-10-19`
/// 3. `2023-10` (first of the month)
/// 4. `2023` (first of January)
/// 5. `2023-10-19T08:30:00+02:00` (RFC 3339, offset kept)
/// 6. `2023-10-19T08:30:00`, optionally with fractional seconds
/// 7. `19/10/2023`
/// 8. `19/10/2023 08:30:00`
///
/// Everything without an explicit offset is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, ScalarError> {
    if let Some(monday) = parse_iso_week(raw) {
        return Ok(midnight_utc(monday));
    }
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(raw))
        .ok_or_else(|| ScalarError::new(format!("could not parse date: `{raw}`")))
}

impl Scalar for DateTime<FixedOffset> {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        parse_timestamp(raw)
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        parse_timestamp(raw).map(|dt| dt.with_timezone(&Utc))
    }
}

impl Scalar for NaiveDate {
    const KIND: ScalarKind = ScalarKind::Timestamp;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        parse_timestamp(raw).map(|dt| dt.date_naive())
    }
}
