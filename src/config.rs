use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use std::env;

/// Opening and closing time for one weekday. A day with `opening == closing` is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingHours {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
}

impl TradingHours {
    pub fn new(opening: NaiveTime, closing: NaiveTime) -> Self {
        Self { opening, closing }
    }
}

/// Business settings used by the booking rules, the rescheduler and the day view.
#[derive(Debug, Clone)]
pub struct DiaryConfig {
    pub timezone: Tz,
    /// Indexed by `Weekday::num_days_from_monday`.
    pub trading_hours: [TradingHours; 7],
    pub min_booking_days: i64,
    pub time_inc: Duration,
    pub min_time: NaiveTime,
    pub max_time: NaiveTime,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        let weekday = TradingHours::new(hm(9, 0), hm(17, 0));
        Self {
            timezone: chrono_tz::UTC,
            trading_hours: [
                weekday,
                weekday,
                weekday,
                weekday,
                weekday,
                TradingHours::new(hm(9, 0), hm(12, 0)),
                TradingHours::new(hm(0, 0), hm(0, 0)),
            ],
            min_booking_days: 1,
            time_inc: Duration::minutes(30),
            min_time: hm(8, 0),
            max_time: hm(18, 0),
        }
    }
}

impl DiaryConfig {
    pub fn hours_for(&self, date: NaiveDate) -> TradingHours {
        self.trading_hours[date.weekday().num_days_from_monday() as usize]
    }

    /// Wall-clock "now" in the diary's timezone.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    /// First date on which non-staff users may book.
    pub fn booking_threshold(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.min_booking_days)
    }

    fn from_env() -> Self {
        let defaults = Self::default();

        let timezone = env::var("DIARY_TIMEZONE")
            .ok()
            .map(|tz| tz.parse::<Tz>().expect("DIARY_TIMEZONE must be an IANA timezone name"))
            .unwrap_or(defaults.timezone);

        let trading_hours = match (env::var("DIARY_OPENING_TIMES"), env::var("DIARY_CLOSING_TIMES")) {
            (Ok(open), Ok(close)) => parse_trading_hours(&open, &close)
                .expect("DIARY_OPENING_TIMES / DIARY_CLOSING_TIMES must each hold seven HH:MM values"),
            _ => defaults.trading_hours,
        };

        let min_booking_days = env::var("DIARY_MIN_BOOKING")
            .map(|v| v.parse().expect("DIARY_MIN_BOOKING must be a number of days"))
            .unwrap_or(defaults.min_booking_days);

        let time_inc = env::var("DIARY_TIME_INC")
            .map(|v| Duration::minutes(v.parse().expect("DIARY_TIME_INC must be a number of minutes")))
            .unwrap_or(defaults.time_inc);

        let min_time = env::var("DIARY_MIN_TIME")
            .map(|v| parse_hhmm(&v).expect("DIARY_MIN_TIME must be HH:MM"))
            .unwrap_or(defaults.min_time);
        let max_time = env::var("DIARY_MAX_TIME")
            .map(|v| parse_hhmm(&v).expect("DIARY_MAX_TIME must be HH:MM"))
            .unwrap_or(defaults.max_time);

        Self {
            timezone,
            trading_hours,
            min_booking_days,
            time_inc,
            min_time,
            max_time,
        }
    }
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Parses two comma separated lists of seven `HH:MM` values, Monday first.
pub fn parse_trading_hours(opening: &str, closing: &str) -> Option<[TradingHours; 7]> {
    let open: Vec<NaiveTime> = opening.split(',').map(parse_hhmm).collect::<Option<_>>()?;
    let close: Vec<NaiveTime> = closing.split(',').map(parse_hhmm).collect::<Option<_>>()?;
    if open.len() != 7 || close.len() != 7 {
        return None;
    }

    let mut hours = [TradingHours::new(NaiveTime::MIN, NaiveTime::MIN); 7];
    for (i, slot) in hours.iter_mut().enumerate() {
        *slot = TradingHours::new(open[i], close[i]);
    }
    Some(hours)
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub diary: DiaryConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            diary: DiaryConfig::from_env(),
        }
    }
}
