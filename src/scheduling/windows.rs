use time::{Date, Time};

use crate::db::{AvailabilityOverride, WeeklySchedule};

/// A contiguous open window within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenWindow {
    pub start: Time,
    pub end: Time,
}

/// The weekly-default window for a date, if its weekday is enabled.
pub fn weekly_window(schedule: &WeeklySchedule, date: Date) -> Option<OpenWindow> {
    schedule
        .day(date.weekday())
        .window()
        .map(|(start, end)| OpenWindow { start, end })
}

/// Open windows for a specific date. Any override row for the date takes
/// the weekly default out of play entirely; only `is_available = true`
/// overrides then contribute windows. A date whose only overrides are
/// `is_available = false` therefore has no open windows at all.
pub fn open_windows(
    schedule: &WeeklySchedule,
    date: Date,
    overrides: &[AvailabilityOverride],
) -> Vec<OpenWindow> {
    let mut has_override = false;
    let mut windows: Vec<OpenWindow> = overrides
        .iter()
        .filter(|o| o.date == date)
        .inspect(|_| has_override = true)
        .filter(|o| o.is_available && o.start_time < o.end_time)
        .map(|o| OpenWindow {
            start: o.start_time,
            end: o.end_time,
        })
        .collect();

    if !has_override {
        return weekly_window(schedule, date).into_iter().collect();
    }

    windows.sort_by_key(|w| w.start);
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DaySchedule;
    use time::macros::{date, time};
    use uuid::Uuid;

    fn schedule_with_monday(start: Time, end: Time) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::default();
        schedule.0[0] = DaySchedule {
            enabled: true,
            start_time: Some(start),
            end_time: Some(end),
        };
        schedule
    }

    fn make_override(date: Date, start: Time, end: Time, is_available: bool) -> AvailabilityOverride {
        AvailabilityOverride {
            id: Uuid::new_v4(),
            calendar_id: Uuid::nil(),
            date,
            start_time: start,
            end_time: end,
            is_available,
            note: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    // 2026-09-07 is a Monday, 2026-09-13 a Sunday.
    const MONDAY: Date = date!(2026 - 09 - 07);
    const SUNDAY: Date = date!(2026 - 09 - 13);

    #[test]
    fn disabled_weekday_has_no_window() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        assert_eq!(open_windows(&schedule, SUNDAY, &[]), vec![]);
    }

    #[test]
    fn enabled_weekday_yields_default_window() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        assert_eq!(
            open_windows(&schedule, MONDAY, &[]),
            vec![OpenWindow {
                start: time!(09:00),
                end: time!(17:00)
            }]
        );
    }

    #[test]
    fn available_override_replaces_weekly_default() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        let overrides = [make_override(MONDAY, time!(13:00), time!(15:00), true)];
        assert_eq!(
            open_windows(&schedule, MONDAY, &overrides),
            vec![OpenWindow {
                start: time!(13:00),
                end: time!(15:00)
            }]
        );
    }

    #[test]
    fn blocked_override_closes_the_whole_date() {
        // A lone is_available = false row suppresses the weekly default and
        // adds nothing itself.
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        let overrides = [make_override(MONDAY, time!(09:00), time!(12:00), false)];
        assert_eq!(open_windows(&schedule, MONDAY, &overrides), vec![]);
    }

    #[test]
    fn multiple_available_overrides_sorted_by_start() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        let overrides = [
            make_override(MONDAY, time!(14:00), time!(17:00), true),
            make_override(MONDAY, time!(09:00), time!(12:00), true),
        ];
        assert_eq!(
            open_windows(&schedule, MONDAY, &overrides),
            vec![
                OpenWindow {
                    start: time!(09:00),
                    end: time!(12:00)
                },
                OpenWindow {
                    start: time!(14:00),
                    end: time!(17:00)
                },
            ]
        );
    }

    #[test]
    fn overrides_for_other_dates_are_ignored() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        let overrides = [make_override(SUNDAY, time!(10:00), time!(12:00), true)];
        assert_eq!(
            open_windows(&schedule, MONDAY, &overrides),
            vec![OpenWindow {
                start: time!(09:00),
                end: time!(17:00)
            }]
        );
    }

    #[test]
    fn override_opens_an_otherwise_closed_day() {
        let schedule = schedule_with_monday(time!(09:00), time!(17:00));
        let overrides = [make_override(SUNDAY, time!(10:00), time!(12:00), true)];
        assert_eq!(
            open_windows(&schedule, SUNDAY, &overrides),
            vec![OpenWindow {
                start: time!(10:00),
                end: time!(12:00)
            }]
        );
    }
}
