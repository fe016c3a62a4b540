use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{OffsetDateTime, Time, Weekday};

/// A bookable calendar. Weekly opening hours live in
/// `calendar_day_schedules`, one row per weekday.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub timezone: String,
    pub booking_window_days: i32,
    pub buffer_minutes: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Opening hours for a single weekday. `start_time`/`end_time` are only
/// meaningful when `enabled` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub enabled: bool,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
}

impl DaySchedule {
    pub fn window(&self) -> Option<(Time, Time)> {
        if !self.enabled {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}

/// Row shape of `calendar_day_schedules`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayScheduleRow {
    pub weekday: i16,
    pub enabled: bool,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
}

/// Seven `DaySchedule` entries indexed by weekday, 0 = Monday .. 6 = Sunday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule(pub [DaySchedule; 7]);

impl WeeklySchedule {
    pub fn from_rows(rows: &[DayScheduleRow]) -> Self {
        let mut schedule = Self::default();
        for row in rows {
            // Rows outside 0..=6 are rejected by the schema; skip rather
            // than panic if one ever appears.
            if let Some(day) = usize::try_from(row.weekday)
                .ok()
                .and_then(|ix| schedule.0.get_mut(ix))
            {
                *day = DaySchedule {
                    enabled: row.enabled,
                    start_time: row.start_time,
                    end_time: row.end_time,
                };
            }
        }
        schedule
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.0[weekday.number_days_from_monday() as usize]
    }

    pub fn days(&self) -> &[DaySchedule; 7] {
        &self.0
    }

    pub fn validate_windows(&self) -> Result<(), String> {
        for (weekday, day) in self.0.iter().enumerate() {
            if !day.enabled {
                continue;
            }
            match (day.start_time, day.end_time) {
                (Some(start), Some(end)) if start < end => {}
                _ => {
                    return Err(format!(
                        "weekday {}: enabled days require start_time < end_time",
                        weekday
                    ))
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    fn open_day(start: Time, end: Time) -> DaySchedule {
        DaySchedule {
            enabled: true,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    #[test]
    fn from_rows_fills_listed_days_and_leaves_rest_disabled() {
        let rows = vec![DayScheduleRow {
            weekday: 0,
            enabled: true,
            start_time: Some(time!(09:00)),
            end_time: Some(time!(17:00)),
        }];
        let schedule = WeeklySchedule::from_rows(&rows);
        assert!(schedule.day(Weekday::Monday).enabled);
        assert!(!schedule.day(Weekday::Tuesday).enabled);
        assert!(!schedule.day(Weekday::Sunday).enabled);
    }

    #[test]
    fn from_rows_ignores_out_of_range_weekday() {
        let rows = vec![DayScheduleRow {
            weekday: 9,
            enabled: true,
            start_time: Some(time!(09:00)),
            end_time: Some(time!(17:00)),
        }];
        let schedule = WeeklySchedule::from_rows(&rows);
        assert_eq!(schedule, WeeklySchedule::default());
    }

    #[test]
    fn window_requires_enabled_and_ordered_times() {
        assert_eq!(
            open_day(time!(09:00), time!(17:00)).window(),
            Some((time!(09:00), time!(17:00)))
        );
        assert_eq!(open_day(time!(17:00), time!(09:00)).window(), None);
        assert_eq!(DaySchedule::default().window(), None);
    }

    #[test]
    fn validate_windows_rejects_enabled_day_without_times() {
        let mut schedule = WeeklySchedule::default();
        schedule.0[2].enabled = true;
        assert!(schedule.validate_windows().is_err());

        schedule.0[2] = open_day(time!(08:30), time!(12:00));
        assert!(schedule.validate_windows().is_ok());
    }
}
