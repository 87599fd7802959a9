use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use crate::config::DiaryConfig;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Display flags for one slot of the day view.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SlotFlags {
    pub current: bool,
    pub trading: bool,
    pub historic: bool,
    pub before_advance: bool,
    pub allow_dnd: bool,
}

/// Slots from `min_time` to `max_time` inclusive, `time_inc` apart.
pub fn time_slots(config: &DiaryConfig) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if config.time_inc <= chrono::Duration::zero() {
        return slots;
    }

    let day = NaiveDate::MIN;
    let mut cursor = day.and_time(config.min_time);
    let finish = day.and_time(config.max_time);
    while cursor <= finish {
        let next = cursor + config.time_inc;
        slots.push(TimeSlot {
            label: cursor.format("%H:%M").to_string(),
            start: cursor.time(),
            end: next.time(),
        });
        cursor = next;
    }
    slots
}

pub fn evaluate_slot(day: NaiveDate, start: NaiveTime, end: NaiveTime, now: NaiveDateTime, config: &DiaryConfig) -> SlotFlags {
    let today = now.date();
    let now_time = now.time();
    let hours = config.hours_for(day);

    let current = day == today && now_time >= start && now_time < end;
    let trading = start >= hours.opening && end <= hours.closing;
    let historic = day < today || (day == today && end < now_time);
    let before_advance = day < config.booking_threshold(today);

    SlotFlags {
        current,
        trading,
        historic,
        before_advance,
        allow_dnd: trading && !(historic || before_advance),
    }
}
