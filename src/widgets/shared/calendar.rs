use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Date = NaiveDate;

/// Display format used for the input text and the bound form value.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d";

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of "today". Navigation falls back to it when nothing is rendered yet.
pub trait Clock {
    fn today(&self) -> Date;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

// ── Week layout ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    pub fn headers(self) -> [&'static str; 7] {
        match self {
            Self::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
            Self::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
        }
    }
}

/// One rendered day of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub in_displayed_month: bool,
}

// ── Month arithmetic ──────────────────────────────────────────────────────────

pub fn first_of_month(date: Date) -> Date {
    date - Duration::days(date.day0() as i64)
}

pub fn last_of_month(date: Date) -> Date {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next - Duration::days(1),
        None => Date::MAX,
    }
}

/// Shifts `date` by whole months, clamping the day to the target month's length.
/// Saturates at the representable range.
pub fn add_months(date: Date, delta: i32) -> Date {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

pub fn is_same_month(a: Date, b: Date) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// The 1st of `count` successive months, starting with the month containing `anchor`.
pub fn first_days_of_consecutive_months(count: usize, anchor: Date) -> Vec<Date> {
    let first = first_of_month(anchor);
    let mut out = Vec::with_capacity(count);
    for index in 0..count {
        let Ok(delta) = i32::try_from(index) else {
            break;
        };
        out.push(first_of_month(add_months(first, delta)));
    }
    out
}

pub fn start_of_week(date: Date, week_start: WeekStart) -> Date {
    let offset = (7 + date.weekday().num_days_from_monday()
        - week_start.weekday().num_days_from_monday())
        % 7;
    date - Duration::days(offset as i64)
}

pub fn end_of_week(date: Date, week_start: WeekStart) -> Date {
    start_of_week(date, week_start) + Duration::days(6)
}

/// Full calendar weeks covering the month of `month_anchor`.
pub fn month_grid(month_anchor: Date, week_start: WeekStart) -> Vec<DayCell> {
    let start = start_of_week(first_of_month(month_anchor), week_start);
    let end = end_of_week(last_of_month(month_anchor), week_start);

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| DayCell {
            date,
            in_displayed_month: is_same_month(date, month_anchor),
        })
        .collect()
}

pub fn weeks(cells: &[DayCell]) -> impl Iterator<Item = &[DayCell]> {
    cells.chunks(7)
}

pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Two-digit month number, used as a month grid title.
pub fn month_title(anchor: Date) -> String {
    anchor.format("%m").to_string()
}

/// `yyyy/M` heading for the first visible month.
pub fn year_month_heading(anchor: Date) -> String {
    format!("{}/{}", anchor.year(), anchor.month())
}

// ── Parsing ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date text")]
    Empty,
    #[error("malformed date text: {0:?}")]
    Malformed(String),
    #[error("date out of range: {0:?}")]
    OutOfRange(String),
}

/// Strict ISO-8601 date parse.
///
/// Accepts calendar dates (`YYYY-MM-DD`, `YYYYMMDD`, `YYYY-MM`, `YYYY`),
/// week dates (`YYYY-Www[-D]`, `YYYYWww[D]`) and ordinal dates (`YYYY-DDD`,
/// `YYYYDDD`), optionally followed by a time of day after `T` or a space.
/// The time is validated, then dropped; `24:00` moves to the next day.
pub fn parse_date_text(text: &str) -> Result<Date, DateParseError> {
    if text.is_empty() {
        return Err(DateParseError::Empty);
    }

    let (date_part, time_part) = match text.find(['T', ' ']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };

    let date = if date_part.contains('W') {
        parse_week_date(date_part, text)?
    } else {
        parse_calendar_date(date_part, text)?
    };
    let end_of_day = match time_part {
        Some(time) => parse_time_of_day(time, text)?,
        None => false,
    };
    if end_of_day {
        return date
            .succ_opt()
            .ok_or_else(|| DateParseError::OutOfRange(text.to_string()));
    }
    Ok(date)
}

/// `YYYY-Www[-D]` or `YYYYWww[D]`. The weekday defaults to Monday.
fn parse_week_date(part: &str, text: &str) -> Result<Date, DateParseError> {
    let malformed = || DateParseError::Malformed(text.to_string());

    let (year, rest) = part.split_once('W').ok_or_else(malformed)?;
    let (year, extended) = match year.strip_suffix('-') {
        Some(year) => (year, true),
        None => (year, false),
    };
    if !is_field(year, 4) || !rest.is_ascii() {
        return Err(malformed());
    }
    let (week, day) = match (rest.len(), extended) {
        (2, _) => (rest, None),
        (4, true) if rest.as_bytes()[2] == b'-' => (&rest[0..2], Some(&rest[3..4])),
        (3, false) => (&rest[0..2], Some(&rest[2..3])),
        _ => return Err(malformed()),
    };
    if !all_digits(week) || !day.is_none_or(all_digits) {
        return Err(malformed());
    }

    let (Some(year), Some(week)) = (number(year), number(week)) else {
        return Err(malformed());
    };
    let weekday = match day.map(number) {
        None => Some(Weekday::Mon),
        Some(Some(day @ 1..=7)) => Weekday::try_from((day - 1) as u8).ok(),
        Some(_) => None,
    };
    weekday
        .and_then(|weekday| Date::from_isoywd_opt(year as i32, week, weekday))
        .ok_or_else(|| DateParseError::OutOfRange(text.to_string()))
}

fn parse_calendar_date(part: &str, text: &str) -> Result<Date, DateParseError> {
    let malformed = || DateParseError::Malformed(text.to_string());
    let fields: Vec<&str> = part.split('-').collect();

    let (year, month, day) = match fields.as_slice() {
        [compact] if compact.len() == 8 && all_digits(compact) => (
            number(&compact[0..4]),
            number(&compact[4..6]),
            number(&compact[6..8]),
        ),
        [ordinal] if ordinal.len() == 7 && all_digits(ordinal) => {
            return ordinal_date(number(&ordinal[0..4]), number(&ordinal[4..7]), text);
        }
        [y] if y.len() == 4 && all_digits(y) => (number(y), Some(1), Some(1)),
        [y, d] if is_field(y, 4) && is_field(d, 3) => {
            return ordinal_date(number(y), number(d), text);
        }
        [y, m] if is_field(y, 4) && is_field(m, 2) => (number(y), number(m), Some(1)),
        [y, m, d] if is_field(y, 4) && is_field(m, 2) && is_field(d, 2) => {
            (number(y), number(m), number(d))
        }
        _ => return Err(malformed()),
    };

    let (Some(year), Some(month), Some(day)) = (year, month, day) else {
        return Err(malformed());
    };
    Date::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(text.to_string()))
}

fn ordinal_date(year: Option<u32>, day: Option<u32>, text: &str) -> Result<Date, DateParseError> {
    let (Some(year), Some(day)) = (year, day) else {
        return Err(DateParseError::Malformed(text.to_string()));
    };
    Date::from_yo_opt(year as i32, day).ok_or_else(|| DateParseError::OutOfRange(text.to_string()))
}

/// Validates a time of day. Returns true for `24:00[:00[.0]]`, the end of the day.
fn parse_time_of_day(part: &str, text: &str) -> Result<bool, DateParseError> {
    let malformed = || DateParseError::Malformed(text.to_string());

    let clock = strip_zone(part).ok_or_else(malformed)?;
    let (hms, fraction) = match clock.find(['.', ',']) {
        Some(idx) => (&clock[..idx], Some(&clock[idx + 1..])),
        None => (clock, None),
    };
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !all_digits(fraction) {
            return Err(malformed());
        }
    }

    let fields: Vec<&str> = hms.split(':').collect();
    let (h, m, s) = match fields.as_slice() {
        [h] if h.len() == 2 && all_digits(h) => (number(h), Some(0), Some(0)),
        [hm] if hm.len() == 4 && all_digits(hm) => {
            (number(&hm[0..2]), number(&hm[2..4]), Some(0))
        }
        [hms] if hms.len() == 6 && all_digits(hms) => (
            number(&hms[0..2]),
            number(&hms[2..4]),
            number(&hms[4..6]),
        ),
        [h, m] if is_field(h, 2) && is_field(m, 2) => (number(h), number(m), Some(0)),
        [h, m, s] if is_field(h, 2) && is_field(m, 2) && is_field(s, 2) => {
            (number(h), number(m), number(s))
        }
        _ => return Err(malformed()),
    };

    let (Some(h), Some(m), Some(s)) = (h, m, s) else {
        return Err(malformed());
    };
    if h == 24 {
        let zero_fraction = fraction.is_none_or(|f| f.bytes().all(|b| b == b'0'));
        return if m == 0 && s == 0 && zero_fraction {
            Ok(true)
        } else {
            Err(DateParseError::OutOfRange(text.to_string()))
        };
    }
    NaiveTime::from_hms_opt(h, m, s)
        .map(|_| false)
        .ok_or_else(|| DateParseError::OutOfRange(text.to_string()))
}

/// Strips a trailing `Z` or `±HH[:MM]` offset, returning the clock part.
fn strip_zone(part: &str) -> Option<&str> {
    if let Some(clock) = part.strip_suffix('Z') {
        return Some(clock);
    }
    let Some(idx) = part.find(['+', '-']) else {
        return Some(part);
    };
    let offset = &part[idx + 1..];
    let valid = match offset.len() {
        2 => all_digits(offset),
        4 => all_digits(offset),
        5 => {
            offset.as_bytes()[2] == b':' && all_digits(&offset[0..2]) && all_digits(&offset[3..5])
        }
        _ => false,
    };
    if !valid {
        return None;
    }
    match number(&offset[0..2]) {
        Some(hours) if hours <= 23 => Some(&part[..idx]),
        _ => None,
    }
}

fn is_field(field: &str, width: usize) -> bool {
    field.len() == width && all_digits(field)
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn number(value: &str) -> Option<u32> {
    value.parse().ok()
}
