use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Wall-clock parts of an instant in a specific zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

pub fn wall_clock(at: DateTime<Utc>, tz: Tz) -> WallClock {
    let local = at.with_timezone(&tz);
    WallClock {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
    }
}

pub fn from_wall_clock(wc: WallClock, tz: Tz) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(wc.year, wc.month, wc.day)?;
    let time = NaiveTime::from_hms_opt(wc.hour, wc.minute, wc.second)?;
    Some(resolve_local(date.and_time(time), tz))
}

/// Maps a local datetime to UTC. On a DST fold the earlier instant wins; a
/// local time inside a spring-forward gap is shifted forward until it exists.
pub fn resolve_local(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    let mut candidate = local;
    loop {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
}

pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Combines a calendar date with a wall-clock time in the given zone.
pub fn at_time(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(time), tz)
}

/// Half-open [midnight, next midnight) bounds of a calendar date in the zone.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_local(date.and_time(NaiveTime::MIN), tz);
    let end = resolve_local((date + Duration::days(1)).and_time(NaiveTime::MIN), tz);
    (start, end)
}

pub fn start_of_day(at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    resolve_local(local_date(at, tz).and_time(NaiveTime::MIN), tz)
}

/// Monday-anchored start of week.
pub fn start_of_week(at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = local_date(at, tz);
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    resolve_local(monday.and_time(NaiveTime::MIN), tz)
}

pub fn start_of_month(at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = local_date(at, tz);
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap();
    resolve_local(first.and_time(NaiveTime::MIN), tz)
}

pub fn start_of_year(at: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = local_date(at, tz);
    let first = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap();
    resolve_local(first.and_time(NaiveTime::MIN), tz)
}

/// Adds calendar days while preserving the wall-clock time in the zone, so
/// crossing a DST boundary never shifts the local hour.
pub fn add_days(at: DateTime<Utc>, tz: Tz, days: i64) -> DateTime<Utc> {
    let local = at.with_timezone(&tz);
    let shifted = local.date_naive() + Duration::days(days);
    resolve_local(shifted.and_time(local.time()), tz)
}

/// Adds calendar months, clamping the day of month to the target month's
/// length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(at: DateTime<Utc>, tz: Tz, months: i32) -> DateTime<Utc> {
    let local = at.with_timezone(&tz);
    let total = local.year() * 12 + local.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    let day = local.day().min(days_in_month(year, month0 + 1));
    let shifted = NaiveDate::from_ymd_opt(year, month0 + 1, day).unwrap();
    resolve_local(shifted.and_time(local.time()), tz)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    next.pred_opt().unwrap().day()
}
