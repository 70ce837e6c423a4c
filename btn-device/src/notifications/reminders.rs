//! Daily meal recommendation reminders
//!
//! Times are wall-clock times of the device. Scheduling the actual OS alarm
//! belongs to the platform; this module only knows what fires and when.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use shared::models::{Notification, NotificationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReminder {
    pub hour: u32,
    pub minute: u32,
    pub kind: NotificationKind,
    pub title: &'static str,
    pub body: &'static str,
}

/// 11:30 lunch, 17:30 dinner
pub static DAILY_REMINDERS: [DailyReminder; 2] = [
    DailyReminder {
        hour: 11,
        minute: 30,
        kind: NotificationKind::LunchRecommendation,
        title: "Gợi ý món ăn trưa",
        body: "Đã đến giờ ăn trưa! Xem những combo cơm ngon được chọn riêng cho bạn",
    },
    DailyReminder {
        hour: 17,
        minute: 30,
        kind: NotificationKind::DinnerRecommendation,
        title: "Gợi ý món ăn tối",
        body: "Bữa tối ăn gì nhỉ? Khám phá những món ngon được chọn riêng cho bạn!",
    },
];

impl DailyReminder {
    fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// First firing strictly after `now`
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time());
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }

    pub fn to_notification(&self) -> Notification {
        Notification::new(self.kind, self.title, self.body)
    }
}

/// The reminder that fires next after `now`, with its firing time
pub fn next_reminder(now: NaiveDateTime) -> Option<(&'static DailyReminder, NaiveDateTime)> {
    DAILY_REMINDERS
        .iter()
        .map(|r| (r, r.next_after(now)))
        .min_by_key(|(_, at)| *at)
}
