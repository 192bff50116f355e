use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use geom::{Duration, Time};

/// Parses "HH:MM", "HH:MM:SS", "HH:MM:SS.fff", or a full date-time string. The date is ignored;
/// a replay only covers one service day. Hours past 23 are allowed for clock strings, since
/// timetables describe trips running after midnight as "25:10:00".
pub fn parse_time(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(from_naive_time(dt.naive_local().time()));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(from_naive_time(dt.time()));
        }
    }

    // Some exports glue a date and a clock together with other separators. Try the last
    // whitespace-separated piece as a plain clock.
    let clock = raw.rsplit(|c: char| c.is_whitespace() || c == 'T').next()?;
    parse_clock(clock)
}

/// Like `parse_time`, but falls back to midnight. Used for fields that have a sensible
/// replacement downstream, like a departure time that gets raised to the arrival time.
pub fn parse_time_or_midnight(raw: &str) -> Time {
    match parse_time(raw) {
        Some(t) => t,
        None => {
            warn!("Couldn't parse time {:?}, treating it as midnight", raw);
            Time::START_OF_DAY
        }
    }
}

pub fn seconds_to_time(seconds: f64) -> Time {
    if seconds.is_finite() && seconds > 0.0 {
        Time::START_OF_DAY + Duration::seconds(seconds)
    } else {
        Time::START_OF_DAY
    }
}

fn from_naive_time(t: NaiveTime) -> Time {
    let seconds = (t.hour() * 3600 + t.minute() * 60 + t.second()) as f64
        + t.nanosecond() as f64 / 1e9;
    seconds_to_time(seconds)
}

fn parse_clock(raw: &str) -> Option<Time> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let hours = parts[0].parse::<u32>().ok()?;
    let minutes = parts[1].parse::<u32>().ok()?;
    if minutes >= 60 {
        return None;
    }
    let seconds = match parts.get(2) {
        Some(x) => x.parse::<f64>().ok()?,
        None => 0.0,
    };
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some(seconds_to_time(
        hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
    ))
}
