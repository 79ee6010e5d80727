use std::fmt;
use std::str::FromStr;

/// A timezone offset from UTC, in minutes, as used by `xsd:dateTime`/`xsd:date`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct TimezoneOffset {
    minutes: i16,
}

impl TimezoneOffset {
    pub const UTC: Self = Self { minutes: 0 };

    #[inline]
    pub fn new(minutes: i16) -> Self {
        Self { minutes }
    }

    #[inline]
    pub const fn minutes(self) -> i16 {
        self.minutes
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes == 0 {
            return f.write_str("Z");
        }
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

/// [XML Schema `dateTime`](https://www.w3.org/TR/xmlschema11-2/#dateTime), reduced to the
/// subset of the value space a query engine's comparison/arithmetic needs: a proleptic
/// Gregorian year/month/day/time plus an optional timezone offset.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct DateTime {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    /// Seconds * 1000, to keep fractional seconds without pulling in a Decimal dependency here.
    millisecond: u32,
    timezone_offset: Option<TimezoneOffset>,
}

impl DateTime {
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        millisecond: u32,
        timezone_offset: Option<TimezoneOffset>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            millisecond,
            timezone_offset,
        }
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    #[inline]
    pub const fn second(&self) -> u32 {
        self.millisecond / 1000
    }

    #[inline]
    pub const fn timezone_offset(&self) -> Option<TimezoneOffset> {
        self.timezone_offset
    }

    /// Returns this `dateTime` with an explicit timezone, defaulting to UTC when absent.
    ///
    /// Used by the SPARQL numeric-promotion lattice's `Date`/`DateTime` rung: a
    /// timezone-less operand compared against a timezone-ed one is interpreted as UTC.
    #[inline]
    pub fn with_utc_fallback(&self) -> Self {
        Self {
            timezone_offset: Some(self.timezone_offset.unwrap_or(TimezoneOffset::UTC)),
            ..*self
        }
    }

    /// A single `i64` of milliseconds-since-epoch-ish ordering key, treating a missing
    /// timezone as UTC. Used only for ordering, not for calendar-correct arithmetic.
    fn ordering_key(&self) -> i64 {
        let date_days = days_from_civil(self.year, self.month, self.day);
        let tz_minutes = self
            .timezone_offset
            .unwrap_or(TimezoneOffset::UTC)
            .minutes() as i64;
        let millis_in_day = (i64::from(self.hour) * 3600 + i64::from(self.minute) * 60) * 1000
            + i64::from(self.millisecond)
            - tz_minutes * 60_000;
        date_days * 86_400_000 + millis_in_day
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Howard Hinnant's algorithm).
fn days_from_civil(y: i32, m: u8, d: u8) -> i64 {
    let y = i64::from(y) - i64::from(m <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64;
    let mp = (i64::from(m) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(d) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:",
            self.year, self.month, self.day, self.hour, self.minute
        )?;
        let seconds = self.millisecond / 1000;
        let millis = self.millisecond % 1000;
        if millis == 0 {
            write!(f, "{seconds:02}")?;
        } else {
            write!(f, "{seconds:02}.{millis:03}")?;
        }
        if let Some(tz) = self.timezone_offset {
            write!(f, "{tz}")?;
        }
        Ok(())
    }
}

impl FromStr for DateTime {
    type Err = ParseDateTimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (date_part, rest) = input.split_once('T').ok_or(ParseDateTimeError)?;
        let date = parse_date_part(date_part)?;
        let (time_part, timezone_offset) = split_timezone(rest);
        let mut fields = time_part.splitn(3, ':');
        let hour: u8 = fields
            .next()
            .ok_or(ParseDateTimeError)?
            .parse()
            .map_err(|_| ParseDateTimeError)?;
        let minute: u8 = fields
            .next()
            .ok_or(ParseDateTimeError)?
            .parse()
            .map_err(|_| ParseDateTimeError)?;
        let second_part = fields.next().ok_or(ParseDateTimeError)?;
        let millisecond = parse_seconds_to_millis(second_part)?;
        Ok(Self {
            year: date.0,
            month: date.1,
            day: date.2,
            hour,
            minute,
            millisecond,
            timezone_offset,
        })
    }
}

fn parse_seconds_to_millis(input: &str) -> Result<u32, ParseDateTimeError> {
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    let seconds: u32 = whole.parse().map_err(|_| ParseDateTimeError)?;
    let mut millis = 0_u32;
    for (i, c) in frac.chars().take(3).enumerate() {
        let digit = c.to_digit(10).ok_or(ParseDateTimeError)?;
        millis += digit * 10_u32.pow(2 - i as u32);
    }
    Ok(seconds * 1000 + millis)
}

fn split_timezone(input: &str) -> (&str, Option<TimezoneOffset>) {
    if let Some(stripped) = input.strip_suffix('Z') {
        return (stripped, Some(TimezoneOffset::UTC));
    }
    if let Some(pos) = input.rfind(['+', '-']) {
        // A "-" inside the time part itself never occurs (HH:MM:SS has no sign), so the
        // right-most +/- after position 0 is always the timezone marker.
        if pos > 0 {
            let (time, tz) = input.split_at(pos);
            if let Some((h, m)) = tz[1..].split_once(':') {
                if let (Ok(h), Ok(m)) = (h.parse::<i16>(), m.parse::<i16>()) {
                    let sign = if tz.starts_with('-') { -1 } else { 1 };
                    return (time, Some(TimezoneOffset::new(sign * (h * 60 + m))));
                }
            }
        }
    }
    (input, None)
}

fn parse_date_part(input: &str) -> Result<(i32, u8, u8), ParseDateTimeError> {
    let mut parts = input.splitn(3, '-');
    let (year_str, rest_is_negative) = if let Some(stripped) = input.strip_prefix('-') {
        parts = stripped.splitn(3, '-');
        (parts.next().ok_or(ParseDateTimeError)?, true)
    } else {
        (parts.next().ok_or(ParseDateTimeError)?, false)
    };
    let mut year: i32 = year_str.parse().map_err(|_| ParseDateTimeError)?;
    if rest_is_negative {
        year = -year;
    }
    let month: u8 = parts
        .next()
        .ok_or(ParseDateTimeError)?
        .parse()
        .map_err(|_| ParseDateTimeError)?;
    let day: u8 = parts
        .next()
        .ok_or(ParseDateTimeError)?
        .parse()
        .map_err(|_| ParseDateTimeError)?;
    Ok((year, month, day))
}

/// [XML Schema `date`](https://www.w3.org/TR/xmlschema11-2/#date).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
    timezone_offset: Option<TimezoneOffset>,
}

impl Date {
    #[inline]
    pub fn new(year: i32, month: u8, day: u8, timezone_offset: Option<TimezoneOffset>) -> Self {
        Self {
            year,
            month,
            day,
            timezone_offset,
        }
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub const fn timezone_offset(&self) -> Option<TimezoneOffset> {
        self.timezone_offset
    }

    /// Promotes this `date` to `dateTime` at midnight, per the numeric-promotion lattice
    /// (spec §4.3): `Date` promotes to `DateTime` for comparison.
    #[inline]
    pub fn to_date_time(self) -> DateTime {
        DateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: 0,
            minute: 0,
            millisecond: 0,
            timezone_offset: self.timezone_offset,
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(tz) = self.timezone_offset {
            write!(f, "{tz}")?;
        }
        Ok(())
    }
}

impl FromStr for Date {
    type Err = ParseDateTimeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (date_part, timezone_offset) = split_timezone(input);
        let (year, month, day) = parse_date_part(date_part)?;
        Ok(Self {
            year,
            month,
            day,
            timezone_offset,
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("invalid xsd:dateTime/xsd:date lexical form")]
pub struct ParseDateTimeError;

impl DateTime {
    /// Compares two `dateTime`s for ordering after both are assigned a timezone
    /// (a missing timezone defaults to UTC, per spec §4.3).
    pub fn compare_with_utc_fallback(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering_key().cmp(&other.ordering_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_date_time() {
        let dt: DateTime = "2024-03-05T10:15:30Z".parse().unwrap();
        assert_eq!(dt.to_string(), "2024-03-05T10:15:30Z");
        assert_eq!(dt.timezone_offset(), Some(TimezoneOffset::UTC));
    }

    #[test]
    fn parse_date_time_with_offset() {
        let dt: DateTime = "2024-03-05T10:15:30.5+02:00".parse().unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.timezone_offset(), Some(TimezoneOffset::new(120)));
    }

    #[test]
    fn parse_date_time_without_timezone() {
        let dt: DateTime = "2024-03-05T10:15:30".parse().unwrap();
        assert_eq!(dt.timezone_offset(), None);
        assert_eq!(dt.with_utc_fallback().timezone_offset(), Some(TimezoneOffset::UTC));
    }

    #[test]
    fn date_promotes_to_midnight_date_time() {
        let d: Date = "2024-03-05".parse().unwrap();
        let dt = d.to_date_time();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.to_string(), "2024-03-05T00:00:00");
    }

    #[test]
    fn ordering_accounts_for_timezone() {
        let a: DateTime = "2024-01-01T00:00:00+01:00".parse().unwrap();
        let b: DateTime = "2023-12-31T23:00:00Z".parse().unwrap();
        assert_eq!(a.compare_with_utc_fallback(&b), std::cmp::Ordering::Equal);
    }
}
