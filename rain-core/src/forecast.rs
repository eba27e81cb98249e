//! Hourly forecast extraction for a single location.
//!
//! The provider returns a rolling 48h series in UTC epoch seconds. We keep the
//! timesteps that fall on *tomorrow* in the caller's time zone and inside the
//! commute window, then normalize them into [`HourlyCondition`]s.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Timelike};
use tracing::debug;

use crate::{
    error::Result,
    glyph::glyph_for,
    model::{Coordinates, ForecastStep, HourlyCondition, TimeWindow, probability_pct, round_half_up},
    provider::ForecastProvider,
};

/// OpenWeather condition codes for sleet and freezing rain.
const SLEET_CODES: std::ops::RangeInclusive<u32> = 611..=616;

/// Epoch-second bounds `[start, end)` of the calendar day after `now`, in `now`'s time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: i64,
    pub end: i64,
}

impl DayBounds {
    pub fn tomorrow<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        Self {
            start: local_midnight(&tz, today + Days::new(1)),
            end: local_midnight(&tz, today + Days::new(2)),
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts < self.end
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);

    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt.timestamp();
    }

    // Midnight skipped by a DST jump: take the first hour that exists.
    (1..=3)
        .find_map(|h| tz.from_local_datetime(&(midnight + chrono::Duration::hours(h))).earliest())
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Filters raw provider steps down to tomorrow's window and normalizes them.
///
/// Order follows the provider. An empty result is not an error.
pub fn extract_hours<Tz: TimeZone>(
    steps: &[ForecastStep],
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Vec<HourlyCondition> {
    let bounds = DayBounds::tomorrow(now);
    let tz = now.timezone();

    steps
        .iter()
        .filter(|step| bounds.contains(step.dt))
        .filter_map(|step| {
            let local = tz.timestamp_opt(step.dt, 0).single()?;
            let minute_of_day = (local.hour() * 60 + local.minute()) as i32;

            window
                .contains_minute(minute_of_day)
                .then(|| normalize(step, local.hour()))
        })
        .collect()
}

fn normalize(step: &ForecastStep, hour: u32) -> HourlyCondition {
    let rain_probability_pct = probability_pct(step.pop);
    let temperature_c = round_half_up(step.temp);

    let sleet = step.weather_id.is_some_and(|id| SLEET_CODES.contains(&id));
    let freezing = temperature_c <= 0 && rain_probability_pct > 0;

    HourlyCondition {
        hour,
        rain_probability_pct,
        rain_mm: step.rain_1h.unwrap_or(0.0),
        snow_mm: step.snow_1h.unwrap_or(0.0),
        ice_present: sleet || freezing,
        description: step.description.clone(),
        icon: glyph_for(&step.icon).to_string(),
        temperature_c,
    }
}

/// Fetches and extracts tomorrow's hours for one location.
pub async fn fetch_location_forecast<Tz: TimeZone>(
    provider: &dyn ForecastProvider,
    at: Coordinates,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<Vec<HourlyCondition>> {
    let steps = provider.hourly(at).await?;
    let hours = extract_hours(&steps, window, now);

    debug!(lat = at.lat, lon = at.lon, ?hours, "Parsed forecast hours");
    Ok(hours)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::TimeOfDay;
    use chrono::FixedOffset;

    pub(crate) fn paris() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    /// Mid-afternoon on 2026-03-10, so "tomorrow" is 2026-03-11.
    pub(crate) fn now() -> DateTime<FixedOffset> {
        paris().with_ymd_and_hms(2026, 3, 10, 15, 20, 0).unwrap()
    }

    pub(crate) fn at_tomorrow(hour: u32, minute: u32) -> i64 {
        paris()
            .with_ymd_and_hms(2026, 3, 11, hour, minute, 0)
            .unwrap()
            .timestamp()
    }

    pub(crate) fn step(dt: i64, pop: f64, rain: f64) -> ForecastStep {
        ForecastStep {
            dt,
            temp: 15.0,
            pop,
            rain_1h: (rain > 0.0).then_some(rain),
            snow_1h: None,
            weather_id: Some(500),
            description: "pluie légère".into(),
            icon: "10d".into(),
        }
    }

    fn window(from: (u8, u8), to: (u8, u8)) -> TimeWindow {
        TimeWindow::new(
            TimeOfDay::new(from.0, from.1).unwrap(),
            TimeOfDay::new(to.0, to.1).unwrap(),
        )
    }

    #[test]
    fn tomorrow_bounds_follow_local_midnight() {
        let bounds = DayBounds::tomorrow(&now());
        assert_eq!(bounds.start, at_tomorrow(0, 0));
        assert_eq!(bounds.end - bounds.start, 86_400);
        assert!(bounds.contains(at_tomorrow(23, 0)));
        assert!(!bounds.contains(bounds.end));
    }

    #[test]
    fn skipped_midnight_starts_tomorrow_at_the_first_valid_hour() {
        use chrono_tz::America::Santiago;

        // Chile springs forward at midnight: 2026-09-06 00:00 does not exist.
        let now = Santiago.with_ymd_and_hms(2026, 9, 5, 12, 0, 0).unwrap();
        let bounds = DayBounds::tomorrow(&now);

        let first_hour = Santiago.with_ymd_and_hms(2026, 9, 6, 1, 0, 0).unwrap();
        assert_eq!(bounds.start, first_hour.timestamp());
        assert_eq!(bounds.start, 1_788_667_200);
        assert_eq!(bounds.end - bounds.start, 82_800);
    }

    #[test]
    fn fall_back_day_lasts_25_hours_and_keeps_both_2am_steps() {
        use chrono::Utc;
        use chrono_tz::Europe::Paris;

        let now = Paris.with_ymd_and_hms(2026, 10, 24, 12, 0, 0).unwrap();
        let bounds = DayBounds::tomorrow(&now);
        assert_eq!(bounds.end - bounds.start, 90_000);

        // 00:00 and 01:00 UTC are both 02:00 in Paris on 2026-10-25.
        let summer = Utc.with_ymd_and_hms(2026, 10, 25, 0, 0, 0).unwrap().timestamp();
        let winter = Utc.with_ymd_and_hms(2026, 10, 25, 1, 0, 0).unwrap().timestamp();
        let steps = vec![step(summer, 0.5, 0.0), step(winter, 0.6, 0.0)];

        let hours = extract_hours(&steps, window((2, 0), (2, 0)), &now);
        let seen: Vec<(u32, u8)> = hours.iter().map(|h| (h.hour, h.rain_probability_pct)).collect();

        assert_eq!(seen, vec![(2, 50), (2, 60)]);
    }

    #[test]
    fn keeps_only_hours_inside_the_window_in_order() {
        let steps = vec![
            step(at_tomorrow(7, 0), 0.1, 0.0),
            step(at_tomorrow(8, 0), 0.6, 1.2),
            step(at_tomorrow(9, 0), 0.8, 2.5),
            step(at_tomorrow(10, 0), 0.2, 0.0),
        ];

        let hours = extract_hours(&steps, window((8, 0), (9, 0)), &now());

        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].hour, 8);
        assert_eq!(hours[0].rain_probability_pct, 60);
        assert_eq!(hours[0].rain_mm, 1.2);
        assert_eq!(hours[0].snow_mm, 0.0);
        assert!(!hours[0].ice_present);
        assert_eq!(hours[0].icon, "🌦️");
        assert_eq!(hours[1].hour, 9);
        assert_eq!(hours[1].rain_probability_pct, 80);
    }

    #[test]
    fn window_start_keeps_the_bucket_up_to_59_minutes_before() {
        // Window 08:30-09:00: 07:31 is exactly from - 59, 07:30 is from - 60.
        let steps = vec![
            step(at_tomorrow(7, 30), 0.1, 0.0),
            step(at_tomorrow(7, 31), 0.2, 0.0),
            step(at_tomorrow(9, 0), 0.3, 0.0),
            step(at_tomorrow(9, 1), 0.4, 0.0),
        ];

        let hours = extract_hours(&steps, window((8, 30), (9, 0)), &now());
        let pcts: Vec<u8> = hours.iter().map(|h| h.rain_probability_pct).collect();

        assert_eq!(pcts, vec![20, 30]);
    }

    #[test]
    fn ignores_today_and_the_day_after_tomorrow() {
        let today_8 = paris().with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap().timestamp();
        let after_8 = paris().with_ymd_and_hms(2026, 3, 12, 8, 0, 0).unwrap().timestamp();
        let steps = vec![step(today_8, 0.9, 0.0), step(after_8, 0.9, 0.0)];

        assert!(extract_hours(&steps, window((8, 0), (9, 0)), &now()).is_empty());
    }

    #[test]
    fn no_matching_hours_is_empty_not_an_error() {
        let steps = vec![step(at_tomorrow(12, 0), 0.5, 1.0)];
        assert!(extract_hours(&steps, window((8, 0), (9, 0)), &now()).is_empty());
        assert!(extract_hours(&[], window((8, 0), (9, 0)), &now()).is_empty());
    }

    #[test]
    fn sleet_codes_mean_ice_regardless_of_temperature() {
        for code in [611, 613, 616] {
            let mut s = step(at_tomorrow(8, 0), 0.0, 0.0);
            s.temp = 6.0;
            s.weather_id = Some(code);
            let hours = extract_hours(&[s], window((8, 0), (8, 0)), &now());
            assert!(hours[0].ice_present, "code {code}");
        }
    }

    #[test]
    fn freezing_with_precipitation_risk_means_ice() {
        let mut cold_wet = step(at_tomorrow(8, 0), 0.7, 0.5);
        cold_wet.temp = -1.0;
        cold_wet.weather_id = Some(601);
        cold_wet.snow_1h = Some(3.5);

        let mut cold_dry = step(at_tomorrow(9, 0), 0.0, 0.0);
        cold_dry.temp = -3.0;
        cold_dry.weather_id = Some(800);

        let mut mild_wet = step(at_tomorrow(10, 0), 0.9, 2.0);
        mild_wet.temp = 1.0;
        mild_wet.weather_id = Some(610);

        let hours = extract_hours(&[cold_wet, cold_dry, mild_wet], window((8, 0), (10, 0)), &now());

        assert!(hours[0].ice_present);
        assert_eq!(hours[0].snow_mm, 3.5);
        assert!(!hours[1].ice_present);
        assert!(!hours[2].ice_present);
    }

    #[test]
    fn temperatures_and_unknown_icons_are_normalized() {
        let mut s = step(at_tomorrow(8, 0), 0.125, 0.0);
        s.temp = 12.5;
        s.icon = String::new();

        let hours = extract_hours(&[s], window((8, 0), (8, 0)), &now());

        assert_eq!(hours[0].temperature_c, 13);
        assert_eq!(hours[0].rain_probability_pct, 13);
        assert_eq!(hours[0].icon, "🌡️");
    }
}
