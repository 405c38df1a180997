//! # Time handling
//!
//! Conversions between the textual time encodings met by the pipeline and
//! [`hifitime::Epoch`] values in the **UTC** scale:
//!
//! * [`tle_epoch_to_utc`] – Two-line element epoch field (`YYDDD.DDDDDDDD`) → [`Epoch`].
//! * [`parse_sighting_datetime`] – Sighting report timestamp (`M/D/YYYY H:MM`) → [`Epoch`].
//! * [`JulianDate`] – Split Julian date (midnight day number + fraction of day) used as
//!   the propagation time argument.
//!
//! Leap seconds are never counted when measuring time since an element-set epoch:
//! both ends are expressed as UTC Julian days, so one UTC day is always 1440 minutes.
use std::str::FromStr;
use std::sync::LazyLock;

use hifitime::Epoch;
use regex::Regex;
use thiserror::Error;

use crate::constants::{JulianDay, MINUTES_PER_DAY, TLE_YEAR_PIVOT};

/// Sighting timestamps: `month/day/year hour:minute`, one or two digits for every field but the year.
static SIGHTING_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}) (\d{1,2}):(\d{1,2})$")
        .expect("valid sighting datetime regex")
});

/// Failure to read a sighting timestamp.
///
/// Variants
/// -----------------
/// * `InvalidFormat` – The text does not follow `M/D/YYYY H:MM`.
/// * `InvalidDate` – The fields are well formed but do not name a calendar instant
///   (e.g. `2/30/2010 10:00` or `7/15/2020 24:00`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    #[error("Timestamp does not match M/D/YYYY H:MM: {0:?}")]
    InvalidFormat(String),
    #[error("Timestamp is not a valid calendar date: {0:?}")]
    InvalidDate(String),
}

/// Transformation from a two-line element epoch field to a UTC epoch
///
/// Argument
/// --------
/// * `field`: the epoch field of line 1, two-digit year followed by the fractional day of year
///   (e.g. `"08264.51782528"`). Day `1.0` is January 1st at 00:00 UTC.
///
/// Return
/// ------
/// * the decoded epoch in the UTC time scale. Years `>= 57` are in the 1900s, the others in the 2000s.
pub fn tle_epoch_to_utc(field: &str) -> Result<Epoch, String> {
    let year_field = field.get(..2).ok_or("epoch field shorter than two characters")?;
    let day_field = field.get(2..).ok_or("epoch field has no day of year")?;

    let two_digit_year = i32::from_str(year_field.trim()).map_err(|_| "invalid year")?;
    let day_of_year = f64::from_str(day_field.trim()).map_err(|_| "invalid day of year")?;
    if !(1.0..367.0).contains(&day_of_year) {
        return Err(format!("day of year out of range: {day_of_year}"));
    }

    let year = if two_digit_year >= TLE_YEAR_PIVOT {
        1900 + two_digit_year
    } else {
        2000 + two_digit_year
    };

    // UTC day arithmetic: a leap second inside the year must not shift the decoded epoch
    let new_year_mjd = Epoch::from_gregorian_utc_at_midnight(year, 1, 1).to_mjd_utc_days();
    Ok(Epoch::from_mjd_utc(new_year_mjd + day_of_year - 1.0))
}

/// Parse a sighting report timestamp, treated as UTC.
///
/// Accepted layout is exactly `M/D/YYYY H:MM` (month, day, hour, minute on one or two digits,
/// no seconds, no surrounding whitespace).
pub fn parse_sighting_datetime(text: &str) -> Result<Epoch, TimestampError> {
    let caps = SIGHTING_DATETIME
        .captures(text)
        .ok_or_else(|| TimestampError::InvalidFormat(text.to_string()))?;

    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let invalid_date = || TimestampError::InvalidDate(text.to_string());

    let month = u8::from_str(field(1)).map_err(|_| invalid_date())?;
    let day = u8::from_str(field(2)).map_err(|_| invalid_date())?;
    let year = i32::from_str(field(3)).map_err(|_| invalid_date())?;
    let hour = u8::from_str(field(4)).map_err(|_| invalid_date())?;
    let minute = u8::from_str(field(5)).map_err(|_| invalid_date())?;

    // hifitime accepts 24:00 as the end of day
    if hour > 23 || minute > 59 {
        return Err(invalid_date());
    }

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, 0, 0)
        .map_err(|_| invalid_date())
}

/// Julian date split into the Julian day number at the preceding UTC midnight and the
/// fraction of day elapsed since, the way numerical propagators expect their time argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    /// Julian day at 00:00 UTC (always ends in `.5`)
    pub day: JulianDay,
    /// Fraction of the UTC day in `[0, 1)`
    pub fraction: f64,
}

impl JulianDate {
    pub fn from_epoch(epoch: &Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
        let midnight = Epoch::from_gregorian_utc_at_midnight(year, month, day);

        let seconds_of_day = f64::from(hour) * 3600.0
            + f64::from(minute) * 60.0
            + f64::from(second)
            + f64::from(nanos) * 1e-9;

        JulianDate {
            day: midnight.to_jde_utc_days(),
            fraction: seconds_of_day / 86_400.0,
        }
    }

    /// Full Julian date (day + fraction)
    pub fn jd(&self) -> JulianDay {
        self.day + self.fraction
    }

    /// Minutes elapsed from `epoch` to `self` (negative when `self` is earlier).
    pub fn minutes_since(&self, epoch: &JulianDate) -> f64 {
        ((self.day - epoch.day) + (self.fraction - epoch.fraction)) * MINUTES_PER_DAY
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::Unit;

    fn assert_epoch_close(actual: Epoch, expected: Epoch) {
        assert!(
            (actual - expected).abs() < 1 * Unit::Microsecond,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_tle_epoch_to_utc() {
        assert_epoch_close(
            tle_epoch_to_utc("08264.51782528").unwrap(),
            Epoch::from_gregorian_utc(2008, 9, 20, 12, 25, 40, 104_192_000),
        );
    }

    #[test]
    fn test_tle_epoch_day_one_is_new_year() {
        assert_epoch_close(
            tle_epoch_to_utc("20001.00000000").unwrap(),
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
        );
    }

    #[test]
    fn test_tle_epoch_year_pivot() {
        assert_epoch_close(
            tle_epoch_to_utc("57001.00000000").unwrap(),
            Epoch::from_gregorian_utc_at_midnight(1957, 1, 1),
        );
        assert_epoch_close(
            tle_epoch_to_utc("56001.00000000").unwrap(),
            Epoch::from_gregorian_utc_at_midnight(2056, 1, 1),
        );
        assert_epoch_close(
            tle_epoch_to_utc("98001.50000000").unwrap(),
            Epoch::from_gregorian_utc_hms(1998, 1, 1, 12, 0, 0),
        );
    }

    #[test]
    fn test_tle_epoch_after_mid_year_leap_second() {
        // a leap second was inserted on 2015-06-30
        assert_epoch_close(
            tle_epoch_to_utc("15182.25000000").unwrap(),
            Epoch::from_gregorian_utc_hms(2015, 7, 1, 6, 0, 0),
        );
    }

    #[test]
    fn test_tle_epoch_invalid() {
        assert!(tle_epoch_to_utc("xx264.51782528").is_err());
        assert!(tle_epoch_to_utc("08abc.51782528").is_err());
        assert!(tle_epoch_to_utc("0").is_err());
        assert!(tle_epoch_to_utc("08").is_err());
    }

    #[test]
    fn test_tle_epoch_day_out_of_range() {
        for field in ["08 1e300      ", "08-99999999999", "08000.99999999", "08367.00000000", "08  NaN       "] {
            assert!(tle_epoch_to_utc(field).is_err(), "{field:?}");
        }
        assert!(tle_epoch_to_utc("08366.99999999").is_ok());
    }

    #[test]
    fn test_parse_sighting_datetime() {
        assert_eq!(
            parse_sighting_datetime("10/10/1949 20:30").unwrap(),
            Epoch::from_gregorian_utc_hms(1949, 10, 10, 20, 30, 0)
        );
        assert_eq!(
            parse_sighting_datetime("1/5/2001 0:00").unwrap(),
            Epoch::from_gregorian_utc_at_midnight(2001, 1, 5)
        );
    }

    #[test]
    fn test_parse_sighting_datetime_rejects_other_layouts() {
        for text in [
            "",
            "10/10/1949",
            "10/10/1949 20:30:15",
            " 10/10/1949 20:30",
            "1949-10-10 20:30",
            "10/10/49 20:30",
        ] {
            assert_eq!(
                parse_sighting_datetime(text),
                Err(TimestampError::InvalidFormat(text.to_string())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_sighting_datetime_rejects_invalid_dates() {
        for text in ["13/01/2000 10:00", "2/30/2010 10:00", "7/15/2020 24:00", "7/15/2020 10:60"] {
            assert_eq!(
                parse_sighting_datetime(text),
                Err(TimestampError::InvalidDate(text.to_string())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_julian_date_split() {
        let j2000 = JulianDate::from_epoch(&Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0));
        assert_relative_eq!(j2000.day, 2451544.5, epsilon = 1e-9);
        assert_eq!(j2000.fraction, 0.5);
        assert_relative_eq!(j2000.jd(), 2451545.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minutes_since() {
        let epoch = JulianDate::from_epoch(&Epoch::from_gregorian_utc_hms(2020, 7, 12, 21, 0, 0));
        let later = JulianDate::from_epoch(&Epoch::from_gregorian_utc_hms(2020, 7, 13, 1, 30, 0));
        assert_relative_eq!(later.minutes_since(&epoch), 270.0, epsilon = 1e-6);
        assert_relative_eq!(epoch.minutes_since(&later), -270.0, epsilon = 1e-6);
    }
}
