use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The half-open span `[start, start + duration)` on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration: Duration,
}

impl TimeInterval {
    pub fn new(date: NaiveDate, start: NaiveTime, duration: Duration) -> Self {
        Self { date, start, duration }
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// End of the span as a full timestamp. An interval ending at 24:00 ends at
    /// midnight of the following date.
    pub fn end_at(&self) -> NaiveDateTime {
        self.start_at() + self.duration
    }

    /// Wall-clock end time.
    pub fn end(&self) -> NaiveTime {
        self.end_at().time()
    }

    /// False when the duration is negative or the span runs past midnight.
    pub fn fits_in_day(&self) -> bool {
        let Some(next_day) = self.date.succ_opt() else {
            return false;
        };
        self.duration >= Duration::zero() && self.end_at() <= next_day.and_time(NaiveTime::MIN)
    }
}

/// Whether two intervals compete for the same time.
///
/// Not an equivalence relation: `a` may overlap `b` and `b` overlap `c` while `a` and
/// `c` are disjoint. The end of an interval is exclusive, so back-to-back intervals do
/// not overlap.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    if a.date != b.date {
        return false;
    }

    // a entirely before b
    if a.start < b.start && a.end_at() <= b.start_at() {
        return false;
    }

    // a entirely after b
    if a.start > b.start && a.start_at() >= b.end_at() {
        return false;
    }

    true
}
