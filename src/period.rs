use crate::errors::ReportError;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed calendar-day interval. Only constructible with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange(format!(
                "start date {} is after end date {}",
                date_key(start),
                date_key(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ReportError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_key(&self) -> String {
        date_key(self.start)
    }

    pub fn end_key(&self) -> String {
        date_key(self.end)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    fn unchecked(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_key(), self.end_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl FromStr for QuickPeriod {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(ReportError::InvalidRange(format!(
                "unknown period '{other}', expected today, week, month or year"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    pub fn for_range(range: &DateRange) -> Self {
        if is_single_calendar_month(range) {
            Self::Daily
        } else {
            Self::Monthly
        }
    }
}

pub fn quick_period(kind: QuickPeriod) -> DateRange {
    quick_period_at(kind, Local::now().date_naive())
}

pub fn quick_period_at(kind: QuickPeriod, reference: NaiveDate) -> DateRange {
    match kind {
        QuickPeriod::Today => DateRange::unchecked(reference, reference),
        QuickPeriod::Week => {
            let back = reference.weekday().num_days_from_sunday() as i64;
            DateRange::unchecked(reference - Duration::days(back), reference)
        }
        QuickPeriod::Month => {
            let first = first_of_month(reference);
            DateRange::unchecked(first, last_of_month(reference).unwrap_or(reference))
        }
        QuickPeriod::Year => {
            let year = reference.year();
            let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference);
            let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference);
            DateRange::unchecked(first, last)
        }
    }
}

pub fn current_year() -> DateRange {
    quick_period(QuickPeriod::Year)
}

pub fn is_single_calendar_month(range: &DateRange) -> bool {
    let (start, end) = (range.start, range.end);
    if start.year() != end.year() || start.month() != end.month() {
        return false;
    }
    start.day() == 1 && last_of_month(start).is_some_and(|last| last.day() == end.day())
}

pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| ReportError::InvalidRange(format!("invalid date '{value}': {err}")))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
