//! Calendar months and the half-open date ranges used to bucket expenses.

use std::fmt::Display;

use time::{Date, Month, macros::format_description};

use crate::Error;

/// A half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// The first day of the month, inclusive.
    pub start: Date,
    /// The first day of the following month, exclusive.
    pub end: Date,
}

impl MonthRange {
    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// The start of the range as an ISO 8601 date string, e.g. "2024-12-01".
    pub fn start_iso(&self) -> String {
        format_iso_date(self.start)
    }

    /// The end of the range as an ISO 8601 date string, e.g. "2025-01-01".
    pub fn end_iso(&self) -> String {
        format_iso_date(self.end)
    }
}

/// A calendar month in a specific year.
///
/// A `YearMonth` can only be constructed if both its first day and the first
/// day of the following month are representable dates, so its range is always
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    start: Date,
    end: Date,
}

impl YearMonth {
    /// Create a year-month from a year and a 1-based month number.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is not in 1-12, `year` is not
    /// positive, or the month after it cannot be represented.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(year, month);

        if year < 1 {
            return Err(invalid());
        }

        let calendar_month = Month::try_from(month).map_err(|_| invalid())?;
        let start = Date::from_calendar_date(year, calendar_month, 1).map_err(|_| invalid())?;
        let end = match calendar_month {
            Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
            calendar_month => Date::from_calendar_date(year, calendar_month.next(), 1),
        }
        .map_err(|_| invalid())?;

        Ok(Self { start, end })
    }

    /// The month that `date` falls in.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month after `date` cannot be represented.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::new(date.year(), date.month().into())
    }

    /// Parse a "YYYY-MM" string such as the prefix of a stored date.
    pub fn parse(text: &str) -> Option<Self> {
        let (year, month) = text.split_once('-')?;
        let year = year.parse().ok()?;
        let month = month.parse().ok()?;

        Self::new(year, month).ok()
    }

    /// The year, e.g. 2024.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The 1-based month number, e.g. 12 for December.
    pub fn month(&self) -> u8 {
        self.start.month().into()
    }

    /// The half-open range of dates in this month.
    pub fn range(&self) -> MonthRange {
        MonthRange {
            start: self.start,
            end: self.end,
        }
    }

    /// The previous month, if it can be represented.
    pub fn previous(&self) -> Option<Self> {
        match self.month() {
            1 => Self::new(self.year() - 1, 12).ok(),
            month => Self::new(self.year(), month - 1).ok(),
        }
    }

    /// The next month, if it can be represented.
    pub fn next(&self) -> Option<Self> {
        Self::containing(self.end).ok()
    }

    /// A human readable name, e.g. "March 2024".
    pub fn name(&self) -> String {
        format!("{} {}", self.start.month(), self.year())
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Get the half-open range `[start, end)` for `month` of `year`.
///
/// `start` is the first day of the month and `end` is the first day of the
/// following month, so December rolls over into January of the next year.
///
/// # Errors
/// Returns [Error::InvalidMonth] if the year and month do not form a valid [YearMonth].
pub fn get_month_range(year: i32, month: u8) -> Result<MonthRange, Error> {
    YearMonth::new(year, month).map(|year_month| year_month.range())
}

/// Pick the month to display from optional `year` and `month` parameters.
///
/// Each parameter falls back to the year or month of `today` independently
/// when it is missing or out of range.
///
/// # Errors
/// Returns [Error::InvalidMonth] only if the month containing `today` cannot be represented.
pub fn resolve_year_month(
    year: Option<i32>,
    month: Option<i32>,
    today: Date,
) -> Result<YearMonth, Error> {
    let year = year
        .filter(|year| (1..=9999).contains(year))
        .unwrap_or(today.year());
    let month = month
        .and_then(|month| u8::try_from(month).ok())
        .filter(|month| (1..=12).contains(month))
        .unwrap_or(today.month().into());

    YearMonth::new(year, month).or_else(|_| YearMonth::containing(today))
}

/// The month to return to after a form submission, if the client gave one.
///
/// Both parts must be present and form a valid [YearMonth].
pub fn redirect_target(year: Option<i32>, month: Option<i32>) -> Option<YearMonth> {
    let month = u8::try_from(month?).ok()?;

    YearMonth::new(year?, month).ok()
}

/// Parse `text` as a positive integer, treating anything else as missing.
pub fn parse_positive_int(text: Option<&str>) -> Option<i32> {
    text.map(str::trim)
        .and_then(|text| text.parse::<i32>().ok())
        .filter(|value| *value > 0)
}

/// Parse a "YYYY-MM-DD" date, falling back to `today` if `text` is blank or invalid.
pub fn parse_date_or_today(text: Option<&str>, today: Date) -> Date {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(|text| Date::parse(text, format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or(today)
}

/// Format `date` as "YYYY-MM-DD".
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
