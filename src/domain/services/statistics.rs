use serde::Serialize;
use crate::domain::models::entry::Entry;

/// Booking counts over a set of entries.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub cancelled: usize,
    pub no_show: usize,
    pub bookings: usize,
}

impl Statistics {
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let (mut total, mut cancelled, mut no_show) = (0, 0, 0);
        for entry in entries {
            total += 1;
            if entry.cancelled { cancelled += 1; }
            if entry.no_show { no_show += 1; }
        }

        Self {
            total,
            cancelled,
            no_show,
            bookings: total.saturating_sub(cancelled + no_show),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::services::test_support::entry_at;

    #[test]
    fn test_empty() {
        assert_eq!(Statistics::collect(&Vec::<Entry>::new()), Statistics::default());
    }

    #[test]
    fn test_counts() {
        let date = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
        let mut entries: Vec<_> = (9..14).map(|h| entry_at(date, h, 0, 30)).collect();
        entries[0].cancelled = true;
        entries[1].cancelled = true;
        entries[2].no_show = true;

        let stats = Statistics::collect(&entries);
        assert_eq!(stats, Statistics { total: 5, cancelled: 2, no_show: 1, bookings: 2 });

        entries.reverse();
        assert_eq!(Statistics::collect(&entries), stats);
    }
}
