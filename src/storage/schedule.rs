use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::keys::NOTIFICATION_SCHEDULE_KEY;
use super::store::{fail_soft, LocalStore};
use super::types::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

/// Daily news alarm as entered on the settings screen (12-hour clock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSchedule {
    /// 1-12
    pub hour: u32,
    pub minute: u32,
    pub ampm: Meridiem,
    pub enabled: bool,
}

impl NotificationSchedule {
    pub fn from_daily_time(time: NaiveTime, enabled: bool) -> Self {
        let (pm, hour) = time.hour12();
        Self {
            hour,
            minute: time.minute(),
            ampm: if pm { Meridiem::Pm } else { Meridiem::Am },
            enabled,
        }
    }

    /// The alarm as a 24-hour time; `None` if the stored fields are out of range.
    pub fn daily_time(&self) -> Option<NaiveTime> {
        if !(1..=12).contains(&self.hour) {
            return None;
        }
        let hour = match self.ampm {
            Meridiem::Am => self.hour % 12,
            Meridiem::Pm => self.hour % 12 + 12,
        };
        NaiveTime::from_hms_opt(hour, self.minute, 0)
    }

    /// Next moment the alarm fires: today if the time is still ahead of
    /// `now`, otherwise tomorrow.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let fire = now.date().and_time(self.daily_time()?);
        if fire < now {
            Some(fire + Duration::days(1))
        } else {
            Some(fire)
        }
    }
}

impl LocalStore {
    pub fn notification_schedule(&self) -> ScheduleStore<'_> {
        ScheduleStore { store: self }
    }
}

pub struct ScheduleStore<'a> {
    store: &'a LocalStore,
}

impl ScheduleStore<'_> {
    /// The saved alarm, if one was ever set.
    pub async fn get(&self) -> Option<NotificationSchedule> {
        fail_soft("notification_schedule.get", self.try_get().await, || None)
    }

    pub async fn save(&self, schedule: &NotificationSchedule) -> bool {
        fail_soft(
            "notification_schedule.save",
            self.try_save(schedule).await.map(|()| true),
            || false,
        )
    }

    async fn try_get(&self) -> Result<Option<NotificationSchedule>, StoreError> {
        self.store.read_optional(NOTIFICATION_SCHEDULE_KEY).await
    }

    async fn try_save(&self, schedule: &NotificationSchedule) -> Result<(), StoreError> {
        self.store.write_record(NOTIFICATION_SCHEDULE_KEY, schedule).await?;
        tracing::debug!(
            hour = schedule.hour,
            minute = schedule.minute,
            enabled = schedule.enabled,
            "Notification schedule saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::{FixedSession, MemoryStore};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn schedule(hour: u32, minute: u32, ampm: Meridiem) -> NotificationSchedule {
        NotificationSchedule {
            hour,
            minute,
            ampm,
            enabled: true,
        }
    }

    #[test]
    fn test_twelve_hour_conversion() {
        assert_eq!(
            schedule(12, 0, Meridiem::Am).daily_time(),
            NaiveTime::from_hms_opt(0, 0, 0)
        );
        assert_eq!(
            schedule(12, 30, Meridiem::Pm).daily_time(),
            NaiveTime::from_hms_opt(12, 30, 0)
        );
        assert_eq!(
            schedule(7, 5, Meridiem::Pm).daily_time(),
            NaiveTime::from_hms_opt(19, 5, 0)
        );
        assert_eq!(schedule(13, 0, Meridiem::Am).daily_time(), None);
        assert_eq!(schedule(0, 0, Meridiem::Am).daily_time(), None);
        assert_eq!(schedule(9, 60, Meridiem::Am).daily_time(), None);
    }

    #[test]
    fn test_from_daily_time() {
        let time = NaiveTime::from_hms_opt(21, 45, 0).unwrap();
        let s = NotificationSchedule::from_daily_time(time, true);
        assert_eq!(s, schedule(9, 45, Meridiem::Pm));
        assert_eq!(s.daily_time(), Some(time));

        let midnight =
            NotificationSchedule::from_daily_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap(), false);
        assert_eq!(midnight.hour, 12);
        assert_eq!(midnight.ampm, Meridiem::Am);
    }

    #[test]
    fn test_next_fire_later_today() {
        let s = schedule(8, 0, Meridiem::Pm);
        assert_eq!(s.next_fire_after(at(9, 0)), Some(at(20, 0)));
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let s = schedule(7, 0, Meridiem::Am);
        assert_eq!(
            s.next_fire_after(at(9, 0)),
            Some(at(7, 0) + Duration::days(1))
        );
    }

    #[test]
    fn test_next_fire_exact_time_is_today() {
        let s = schedule(9, 0, Meridiem::Am);
        assert_eq!(s.next_fire_after(at(9, 0)), Some(at(9, 0)));
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_string(&schedule(8, 5, Meridiem::Am)).unwrap();
        assert_eq!(json, r#"{"hour":8,"minute":5,"ampm":"AM","enabled":true}"#);
    }

    #[tokio::test]
    async fn test_store_roundtrip() {
        let store = LocalStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FixedSession::user("u")),
        );
        assert_eq!(store.notification_schedule().get().await, None);

        let s = schedule(6, 30, Meridiem::Am);
        assert!(store.notification_schedule().save(&s).await);
        assert_eq!(store.notification_schedule().get().await, Some(s));
    }
}
