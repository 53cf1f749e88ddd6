//! The source of "today" for the month views and entry defaults.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Where the current date comes from.
///
/// Handlers never read the system clock directly, they ask the [Clock] held
/// in the app state so that tests can pin the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clock {
    /// The system clock converted to a canonical timezone, e.g. "Asia/Tokyo".
    Local(String),
    /// A clock that is always on the same date.
    Fixed(Date),
}

impl Clock {
    /// Create a clock for the canonical timezone name `timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `timezone` is not a known
    /// canonical timezone name.
    pub fn local(timezone: &str) -> Result<Self, Error> {
        match get_local_offset(timezone) {
            Some(_) => Ok(Self::Local(timezone.to_owned())),
            None => Err(Error::InvalidTimezoneError(timezone.to_owned())),
        }
    }

    /// The current date according to this clock.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if a local clock was constructed
    /// with an unknown timezone.
    pub fn today(&self) -> Result<Date, Error> {
        match self {
            Clock::Fixed(date) => Ok(*date),
            Clock::Local(timezone) => {
                let offset = get_local_offset(timezone).ok_or_else(|| {
                    tracing::error!("Invalid timezone {timezone}");
                    Error::InvalidTimezoneError(timezone.to_owned())
                })?;

                Ok(OffsetDateTime::now_utc().to_offset(offset).date())
            }
        }
    }
}

fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod clock_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{Error, clock::Clock};

    #[test]
    fn fixed_clock_returns_its_date() {
        let clock = Clock::Fixed(date!(2024 - 03 - 15));

        assert_eq!(clock.today(), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn local_clock_accepts_canonical_timezone() {
        let clock = Clock::local("Etc/UTC").expect("Could not create clock");

        assert_eq!(clock.today(), Ok(OffsetDateTime::now_utc().date()));
    }

    #[test]
    fn local_clock_rejects_unknown_timezone() {
        let clock = Clock::local("Middle/Earth");

        assert_eq!(
            clock,
            Err(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn unchecked_local_clock_errors_on_today() {
        let clock = Clock::Local("Middle/Earth".to_owned());

        assert_eq!(
            clock.today(),
            Err(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }
}
