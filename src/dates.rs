//! Display formatting for instants in the conference timezone or the
//! viewer's own zone.

use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// The zone instants are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A fixed IANA zone, normally the conference's local zone.
    Conference(Tz),
    /// Whatever zone the viewer's machine is set to.
    Viewer,
}

impl Zone {
    pub fn format(&self, instant: DateTime<Utc>, fmt: &str) -> String {
        match self {
            Zone::Conference(tz) => instant.with_timezone(tz).format(fmt).to_string(),
            Zone::Viewer => instant.with_timezone(&Local).format(fmt).to_string(),
        }
    }
}

/// Calendar date of `instant` in `zone`, as `YYYY-MM-DD`.
pub fn day_key(instant: DateTime<Utc>, zone: Zone) -> String {
    zone.format(instant, DAY_KEY_FORMAT)
}

/// Short weekday name, e.g. `Thu`.
pub fn weekday_label(instant: DateTime<Utc>, zone: Zone) -> String {
    zone.format(instant, "%a")
}

/// Single instant, e.g. `Fri, Aug 11, 10:00 PDT`.
pub fn event_time(instant: DateTime<Utc>, zone: Zone, with_zone: bool) -> String {
    if with_zone {
        zone.format(instant, "%a, %b %-d, %H:%M %Z")
    } else {
        zone.format(instant, "%a, %b %-d, %H:%M")
    }
}

fn opening_bound(begin: DateTime<Utc>, zone: Zone, with_zone: bool) -> String {
    if with_zone {
        zone.format(begin, "%a %b %-d, %H:%M %Z")
    } else {
        zone.format(begin, "%a %b %-d, %H:%M")
    }
}

fn closing_bound(end: DateTime<Utc>, zone: Zone, with_zone: bool) -> String {
    if with_zone {
        zone.format(end, "%H:%M %Z")
    } else {
        zone.format(end, "%H:%M")
    }
}

/// `Fri Aug 11, 10:00 PDT - 11:00 PDT`, or without suffixes.
pub fn time_range(
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    zone: Zone,
    include_zone_suffix: bool,
) -> String {
    format!(
        "{} - {}",
        opening_bound(begin, zone, include_zone_suffix),
        closing_bound(end, zone, include_zone_suffix)
    )
}

/// Like [`time_range`] but only the closing bound names the zone.
pub fn compact_time_range(begin: DateTime<Utc>, end: DateTime<Utc>, zone: Zone) -> String {
    format!(
        "{} - {}",
        opening_bound(begin, zone, false),
        closing_bound(end, zone, true)
    )
}

fn parse_day_key(day_key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day_key, DAY_KEY_FORMAT).ok()
}

/// Heading for a day group, e.g. `August 11`. Unparseable keys pass through.
pub fn date_group_title(day_key: &str) -> String {
    parse_day_key(day_key)
        .map(|d| d.format("%B %-d").to_string())
        .unwrap_or_else(|| day_key.to_string())
}

/// Short form for a day tab, e.g. `Aug 11`.
pub fn tab_date_title(day_key: &str) -> String {
    parse_day_key(day_key)
        .map(|d| d.format("%b %-d").to_string())
        .unwrap_or_else(|| day_key.to_string())
}

/// Wall clock for the kiosk sidebar.
pub fn clock(now: DateTime<Utc>, zone: Zone) -> String {
    zone.format(now, "%H:%M:%S %Z")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days {} hours {} minutes {} seconds",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Remaining time until `target`, each field floored.
///
/// Each unit is floored from the truncated remainder of the previous one, so
/// once `now` passes `target` the fields go negative. Callers hide or clamp
/// the display themselves.
pub fn countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let total = (target - now).num_milliseconds();
    let days = total.div_euclid(MILLIS_PER_DAY);
    let rem = total % MILLIS_PER_DAY;
    let hours = rem.div_euclid(MILLIS_PER_HOUR);
    let rem = rem % MILLIS_PER_HOUR;
    let minutes = rem.div_euclid(MILLIS_PER_MINUTE);
    let rem = rem % MILLIS_PER_MINUTE;
    let seconds = rem.div_euclid(MILLIS_PER_SECOND);
    Countdown {
        days,
        hours,
        minutes,
        seconds,
    }
}
