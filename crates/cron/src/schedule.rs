//! Next-run computation.

use {
    chrono::{DateTime, Utc},
    cron::Schedule,
};

use crate::{Error, Result, types::CronSchedule};

/// Parse a cron expression, accepting the usual five fields.
///
/// The `cron` crate wants seconds and year too, so a five-field
/// expression is padded to `0 <expr> *`. Its day-of-week field counts
/// 1-7 from Sunday, so Unix numbering (0-6, 7 = Sunday) is shifted.
pub fn parse_cron(expr: &str) -> Result<Schedule> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let normalized = if let [minute, hour, dom, month, dow] = fields.as_slice() {
        format!("0 {minute} {hour} {dom} {month} {} *", unix_weekdays(dow))
    } else {
        expr.to_string()
    };
    normalized
        .parse::<Schedule>()
        .map_err(|source| Error::InvalidCron {
            expr: expr.to_string(),
            source,
        })
}

fn unix_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(|item| {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            // A stepped range ending on Sunday is spelled out, since the step
            // cannot carry across the wrap.
            if let (Some((start, "7")), Some(step)) = (range.split_once('-'), step)
                && let Some(days) = stepped_days(start, step)
            {
                return days;
            }
            let shifted = match range.split_once('-') {
                // A range ending on Sunday wraps: Saturday is the crate's last day.
                Some((start, "7")) => format!("{}-7,1", shift_day(start)),
                Some((start, end)) => format!("{}-{}", shift_day(start), shift_day(end)),
                None => shift_day(range),
            };
            match step {
                Some(step) => format!("{shifted}/{step}"),
                None => shifted,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `start-7/step` as an explicit list of shifted days.
fn stepped_days(start: &str, step: &str) -> Option<String> {
    let start = start.parse::<u8>().ok()?;
    let step = step.parse::<usize>().ok().filter(|s| *s > 0)?;
    let mut days: Vec<String> = (start..=7)
        .step_by(step)
        .map(|d| shift_day(&d.to_string()))
        .collect();
    days.dedup();
    Some(days.join(","))
}

fn shift_day(day: &str) -> String {
    match day.parse::<u8>() {
        Ok(7) => "1".to_string(),
        Ok(n) => n.saturating_add(1).to_string(),
        Err(_) => day.to_string(),
    }
}

/// Next fire time in epoch millis, or `None` when the schedule is spent.
pub fn compute_next_run(schedule: &CronSchedule, now_ms: u64) -> Result<Option<u64>> {
    match schedule {
        CronSchedule::At { at_ms } => Ok((*at_ms > now_ms).then_some(*at_ms)),
        CronSchedule::Every {
            every_ms,
            anchor_ms,
        } => {
            if *every_ms == 0 {
                return Err(Error::invalid_schedule("every_ms must be > 0"));
            }
            let anchor = anchor_ms.unwrap_or(now_ms);
            if anchor > now_ms {
                return Ok(Some(anchor));
            }
            let intervals = (now_ms - anchor) / every_ms;
            Ok(Some(anchor + (intervals + 1) * every_ms))
        },
        CronSchedule::Cron { expr, tz } => {
            let schedule = parse_cron(expr)?;
            let now: DateTime<Utc> =
                DateTime::from_timestamp_millis(now_ms as i64).unwrap_or_default();

            let next = match tz {
                Some(name) => {
                    let tz: chrono_tz::Tz = name.parse().map_err(|_| Error::UnknownTimezone {
                        timezone: name.clone(),
                    })?;
                    schedule
                        .after(&now.with_timezone(&tz))
                        .next()
                        .map(|dt| dt.timestamp_millis() as u64)
                },
                None => schedule
                    .after(&now)
                    .next()
                    .map(|dt| dt.timestamp_millis() as u64),
            };
            Ok(next)
        },
    }
}
