use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A wall-clock time of day, e.g. a commute departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a time in HH:MM format, got {0:?}")]
pub struct ParseTimeError(pub String);

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn total_minutes(&self) -> i32 {
        i32::from(self.hour) * 60 + i32::from(self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if !(1..=2).contains(&h.len()) || m.len() != 2 || !all_digits(h) || !all_digits(m) {
            return Err(err());
        }

        let hour = h.parse().map_err(|_| err())?;
        let minute = m.parse().map_err(|_| err())?;

        TimeOfDay::new(hour, minute).ok_or_else(err)
    }
}

/// Human format used in messages: `08h30`, or `09h` on the hour.
impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minute > 0 {
            write!(f, "{:02}h{:02}", self.hour, self.minute)
        } else {
            write!(f, "{:02}h", self.hour)
        }
    }
}

/// The local time-of-day interval a commute leg covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: TimeOfDay,
    pub to: TimeOfDay,
}

impl TimeWindow {
    pub fn new(from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { from, to }
    }

    /// Provider data is bucketed on the hour, so the bucket that covers the
    /// window start may begin up to 59 minutes before it. The upper bound is exact.
    pub fn contains_minute(&self, minute_of_day: i32) -> bool {
        minute_of_day >= self.from.total_minutes() - 59 && minute_of_day <= self.to.total_minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One raw hourly timestep as returned by a forecast provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastStep {
    /// Unix timestamp, seconds.
    pub dt: i64,
    pub temp: f64,
    /// Probability of precipitation, 0..=1.
    pub pop: f64,
    pub rain_1h: Option<f64>,
    pub snow_1h: Option<f64>,
    pub weather_id: Option<u32>,
    pub description: String,
    pub icon: String,
}

/// One raw daily entry as returned by a forecast provider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyStep {
    pub dt: i64,
    pub temp_day: f64,
    pub pop: f64,
    pub description: String,
    pub icon: String,
}

/// A normalized hour of forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyCondition {
    pub hour: u32,
    pub rain_probability_pct: u8,
    pub rain_mm: f64,
    pub snow_mm: f64,
    pub ice_present: bool,
    pub description: String,
    pub icon: String,
    pub temperature_c: i32,
}

/// Aggregate over both endpoints of one commute leg.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteForecast {
    pub departure_hours: Vec<HourlyCondition>,
    pub arrival_hours: Vec<HourlyCondition>,
    pub worst_case_rain_pct: u8,
    pub avg_temperature_c: i32,
    pub description: String,
    pub icon: String,
    pub has_snow: bool,
    pub has_ice: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySummary {
    pub avg_temperature_c: i32,
    pub rain_probability_pct: u8,
    pub description: String,
    pub icon: String,
}

/// Rounds half-up toward positive infinity: `-1.5` becomes `-1`, `0.5` becomes `1`.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Converts a provider probability (0..=1) to a whole percentage.
pub fn probability_pct(pop: f64) -> u8 {
    round_half_up(pop * 100.0).clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_padded_times() {
        assert_eq!("8:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(8, 30).unwrap());
        assert_eq!("09:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 0).unwrap());
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().total_minutes(), 23 * 60 + 59);
    }

    #[test]
    fn rejects_malformed_times() {
        for raw in ["8", "8:3", "24:00", "12:60", "ab:cd", "123:00", "", "-1:00", "8:30:00"] {
            let err = raw.parse::<TimeOfDay>().unwrap_err();
            assert!(err.to_string().contains("HH:MM"), "{raw}");
        }
    }

    #[test]
    fn displays_hours_and_minutes() {
        assert_eq!(TimeOfDay::new(8, 30).unwrap().to_string(), "08h30");
        assert_eq!(TimeOfDay::new(9, 0).unwrap().to_string(), "09h");
        assert_eq!(TimeOfDay::new(17, 5).unwrap().to_string(), "17h05");
    }

    #[test]
    fn window_bounds_are_asymmetric() {
        let window = TimeWindow::new(TimeOfDay::new(8, 30).unwrap(), TimeOfDay::new(9, 0).unwrap());
        let from = 8 * 60 + 30;
        let to = 9 * 60;

        assert!(window.contains_minute(from - 59));
        assert!(window.contains_minute(to));
        assert!(!window.contains_minute(from - 60));
        assert!(!window.contains_minute(to + 1));
    }

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(round_half_up(12.5), 13);
        assert_eq!(round_half_up(12.4), 12);
        assert_eq!(round_half_up(-1.5), -1);
        assert_eq!(round_half_up(-1.6), -2);
        assert_eq!(probability_pct(0.6), 60);
        assert_eq!(probability_pct(0.005), 1);
        assert_eq!(probability_pct(1.0), 100);
    }
}
