//! Deadline engine.
//!
//! Turns a goal's next due moment into the countdown shown next to it and
//! decides whether that countdown is urgent. Also rolls a goal's daily
//! deadline time forward to its next due timestamp.
//!
//! Every function here is pure with respect to the `now` it is handed;
//! [`time_until_deadline`] is the only entry point that samples the clock.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, LocalResult, Months, NaiveDate,
    NaiveDateTime, NaiveTime, TimeZone,
};
use serde::Serialize;

use crate::error::{CoreError, Result, ValidationError};
use crate::goal::{Goal, GoalInterval};

/// Text shown once the deadline has passed.
pub const OVERDUE: &str = "OVERDUE";

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Countdowns below this many hours are urgent.
pub const URGENT_WITHIN_HOURS: i64 = 2;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Time left until a deadline, rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// `"OVERDUE"`, `"45m"`, `"5h 12m"` or `"3d 4h"`.
    pub text: String,
    /// Less than two hours left, or already overdue.
    pub urgent: bool,
    pub overdue: bool,
}

impl Countdown {
    /// Render a remaining duration. Negative durations are overdue.
    pub fn from_remaining(remaining: Duration) -> Self {
        let ms = remaining.num_milliseconds();
        if ms < 0 {
            return Self {
                text: OVERDUE.to_string(),
                urgent: true,
                overdue: true,
            };
        }

        let hours = ms / MS_PER_HOUR;
        let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;

        let text = if hours < 1 {
            format!("{minutes}m")
        } else if hours < 24 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{}d {}h", hours / 24, hours % 24)
        };

        Self {
            text,
            urgent: hours < URGENT_WITHIN_HOURS,
            overdue: false,
        }
    }
}

/// Countdown from the current local time to `deadline`.
///
/// The clock is sampled on every call; nothing is cached.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] if `deadline` cannot be parsed.
pub fn time_until_deadline(deadline: &str) -> Result<Countdown> {
    time_until_deadline_at(deadline, &Local::now())
}

/// Countdown from `now` to `deadline`. Offset-less timestamps are read in
/// `now`'s time zone.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] if `deadline` cannot be parsed.
pub fn time_until_deadline_at<Tz: TimeZone>(deadline: &str, now: &DateTime<Tz>) -> Result<Countdown> {
    let due = parse_deadline(deadline, &now.timezone())?;
    Ok(Countdown::from_remaining(due - now.clone()))
}

/// Parse an absolute deadline.
///
/// Accepts RFC 3339 (any offset), naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` (also
/// with a space separator) and bare dates, which mean local midnight. Naive
/// values are placed in `tz`.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] if no format matches or the local
/// time does not exist in `tz`.
pub fn parse_deadline<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let invalid = || CoreError::InvalidTimestamp {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Some(dt) = DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .or_else(|| parse_offset_without_seconds(trimmed))
    {
        return Ok(dt.with_timezone(tz));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(invalid)?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(invalid()),
    }
}

/// `YYYY-MM-DDTHH:MM` followed by `Z` or a numeric offset.
fn parse_offset_without_seconds(input: &str) -> Option<DateTime<FixedOffset>> {
    if let Some(utc) = input.strip_suffix('Z').or_else(|| input.strip_suffix('z')) {
        return NaiveDateTime::parse_from_str(utc, "%Y-%m-%dT%H:%M")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset());
    }
    DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M%#z").ok()
}

/// Parse a `HH:mm` or `HH:mm:ss` time of day.
///
/// # Errors
/// Returns [`ValidationError::DeadlineTime`] for anything else.
pub fn parse_deadline_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ValidationError::DeadlineTime(input.to_string()))
}

/// Normalize a deadline time to `HH:mm:ss`, the form the API expects.
///
/// # Errors
/// Returns [`ValidationError::DeadlineTime`] if the input is not a valid time.
pub fn normalize_deadline_time(input: &str) -> Result<String, ValidationError> {
    Ok(parse_deadline_time(input)?.format("%H:%M:%S").to_string())
}

/// Next due moment for a recurring deadline, strictly after `now`.
///
/// Daily goals are due today at `deadline_time`, weekly goals on the Sunday
/// closing the ISO week, monthly goals on the last day of the month. A due
/// moment that has already passed rolls to the following period.
pub fn next_deadline<Tz: TimeZone>(
    interval: GoalInterval,
    deadline_time: NaiveTime,
    now: &DateTime<Tz>,
) -> Result<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();

    let this_period = match interval {
        GoalInterval::Daily => today,
        GoalInterval::Weekly => {
            today + Duration::days(6 - i64::from(today.weekday().num_days_from_monday()))
        }
        GoalInterval::Monthly => last_day_of_month(today)?,
    };

    let candidate = at_local_time(&tz, this_period, deadline_time)?;
    if candidate > *now {
        return Ok(candidate);
    }

    let next_period = match interval {
        GoalInterval::Daily => this_period + Duration::days(1),
        GoalInterval::Weekly => this_period + Duration::days(7),
        GoalInterval::Monthly => {
            let next_month = this_period
                .with_day(1)
                .and_then(|d| d.checked_add_months(Months::new(1)))
                .ok_or_else(|| out_of_range(this_period))?;
            last_day_of_month(next_month)?
        }
    };
    at_local_time(&tz, next_period, deadline_time)
}

/// Next due moment for `goal`, computed from its interval and deadline time.
///
/// Used when the server did not send `nextDeadlineDateTime`.
pub fn next_deadline_for<Tz: TimeZone>(goal: &Goal, now: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    let time = parse_deadline_time(&goal.deadline_time)?;
    next_deadline(goal.interval, time, now)
}

fn last_day_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn at_local_time<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        // Skipped by a DST jump: the same wall time an hour later exists.
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| out_of_range(date)),
    }
}

fn out_of_range(date: NaiveDate) -> CoreError {
    CoreError::InvalidTimestamp {
        input: date.to_string(),
    }
}
