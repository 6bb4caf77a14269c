use chrono::{DateTime, Datelike, Duration, Months, Utc, Weekday};

use crate::models::{Repeat, Task};

/// Derive the next occurrence from a due date and a repeat rule.
///
/// Monthly and yearly steps clamp to the last valid day of the target month
/// (Jan 31 -> Feb 28, Feb 29 -> Feb 28 next year). The time of day is kept.
pub fn next_due_date(due: DateTime<Utc>, repeat: Repeat) -> Option<DateTime<Utc>> {
    match repeat {
        Repeat::Never => None,
        Repeat::Daily => Some(due + Duration::days(1)),
        Repeat::Weekdays => Some(next_weekday(due)),
        Repeat::Weekly => Some(due + Duration::days(7)),
        Repeat::Monthly => due.checked_add_months(Months::new(1)),
        Repeat::Yearly => due.checked_add_months(Months::new(12)),
    }
}

fn next_weekday(due: DateTime<Utc>) -> DateTime<Utc> {
    let mut next = due + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

/// The due date at which a task's alarm should be registered.
///
/// A repeating task whose due date has already passed is advanced rule step
/// by rule step until strictly after `now`; other tasks keep their stored
/// due date. Returns None for tasks without one.
pub fn next_scheduled_due_date(task: &Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut due = task.due_date?;
    if task.repeat == Repeat::Never {
        return Some(due);
    }
    while due <= now {
        due = next_due_date(due, task.repeat)?;
    }
    Some(due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_daily_advances_one_day() {
        let due = at(2021, 1, 19, 9, 30);
        assert_eq!(
            next_due_date(due, Repeat::Daily),
            Some(at(2021, 1, 20, 9, 30))
        );
    }

    #[test]
    fn test_weekdays_skips_weekend() {
        // 2021-01-22 is a Friday; the next weekday is Monday the 25th.
        let friday = at(2021, 1, 22, 17, 0);
        assert_eq!(
            next_due_date(friday, Repeat::Weekdays),
            Some(at(2021, 1, 25, 17, 0))
        );

        let wednesday = at(2021, 1, 20, 8, 0);
        assert_eq!(
            next_due_date(wednesday, Repeat::Weekdays),
            Some(at(2021, 1, 21, 8, 0))
        );
    }

    #[test]
    fn test_weekly_advances_seven_days() {
        let due = at(2021, 1, 19, 9, 0);
        assert_eq!(
            next_due_date(due, Repeat::Weekly),
            Some(at(2021, 1, 26, 9, 0))
        );
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let due = at(2021, 1, 31, 10, 0);
        assert_eq!(
            next_due_date(due, Repeat::Monthly),
            Some(at(2021, 2, 28, 10, 0))
        );
    }

    #[test]
    fn test_yearly_clamps_leap_day() {
        let due = at(2020, 2, 29, 9, 0);
        assert_eq!(
            next_due_date(due, Repeat::Yearly),
            Some(at(2021, 2, 28, 9, 0))
        );
    }

    #[test]
    fn test_never_has_no_next() {
        assert_eq!(next_due_date(at(2021, 1, 19, 9, 0), Repeat::Never), None);
    }

    #[test]
    fn test_scheduled_due_date_catches_up_past_occurrences() {
        let mut task = crate::models::Task::new("water plants".to_string(), "l1".to_string());
        task.due_date = Some(at(2021, 1, 10, 9, 0));
        task.repeat = Repeat::Daily;

        let now = at(2021, 1, 19, 12, 0);
        assert_eq!(
            next_scheduled_due_date(&task, now),
            Some(at(2021, 1, 20, 9, 0))
        );
    }

    #[test]
    fn test_scheduled_due_date_keeps_future_occurrence() {
        let mut task = crate::models::Task::new("water plants".to_string(), "l1".to_string());
        task.due_date = Some(at(2021, 1, 25, 9, 0));
        task.repeat = Repeat::Weekly;

        let now = at(2021, 1, 19, 12, 0);
        assert_eq!(
            next_scheduled_due_date(&task, now),
            Some(at(2021, 1, 25, 9, 0))
        );
    }

    #[test]
    fn test_scheduled_due_date_non_repeating_is_unchanged() {
        let mut task = crate::models::Task::new("file taxes".to_string(), "l1".to_string());
        task.due_date = Some(at(2021, 1, 10, 9, 0));

        // Even in the past: a one-shot task keeps its stored due date.
        let now = at(2021, 1, 19, 12, 0);
        assert_eq!(
            next_scheduled_due_date(&task, now),
            Some(at(2021, 1, 10, 9, 0))
        );
        task.due_date = None;
        assert_eq!(next_scheduled_due_date(&task, now), None);
    }
}
