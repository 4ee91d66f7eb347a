//! Unix time to the dashboard's clock and date text.

use platform::{TimeInfo, TruncatingWriter};

use core::fmt::Write;

/// India Standard Time, UTC+05:30.
pub const UTC_OFFSET_SECS: i64 = 5 * 3600 + 30 * 60;

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Proleptic Gregorian `(year, month 1..=12, day 1..=31)` for a day count
/// relative to 1970-01-01.
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (
        year,
        u32::try_from(month).unwrap_or(1),
        u32::try_from(day).unwrap_or(1),
    )
}

/// Time record for `timestamp` at `offset` seconds from UTC, on a 12-hour
/// clock: `"03:05"`, `"PM"`, `"Wed, 15 Oct 2026"`.
pub fn time_info(timestamp: u32, offset: i64) -> TimeInfo {
    let local = i64::from(timestamp) + offset;
    let days = local.div_euclid(86_400);
    let secs = local.rem_euclid(86_400);
    let (hour, minute) = (secs / 3600, secs % 3600 / 60);
    let (year, month, day) = civil_from_days(days);

    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let mut clock = TruncatingWriter::<16>::new();
    let _ = write!(clock, "{hour12:02}:{minute:02}");

    let weekday = usize::try_from(days.rem_euclid(7))
        .ok()
        .and_then(|i| WEEKDAYS.get(i))
        .copied()
        .unwrap_or("");
    let month_name = usize::try_from(month)
        .ok()
        .and_then(|m| MONTHS.get(m.wrapping_sub(1)))
        .copied()
        .unwrap_or("");
    let mut date = TruncatingWriter::<48>::new();
    let _ = write!(date, "{weekday}, {day} {month_name} {year}");

    TimeInfo::new(
        timestamp,
        clock.into_inner().as_str(),
        if hour < 12 { "AM" } else { "PM" },
        date.into_inner().as_str(),
    )
}
