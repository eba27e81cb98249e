use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::{
    error::Result,
    forecast::DayBounds,
    glyph::glyph_for,
    model::{Coordinates, DailyStep, DailySummary, probability_pct, round_half_up},
    provider::ForecastProvider,
};

/// Picks tomorrow's entry out of the daily series.
///
/// Falls back to a zero-valued summary when the provider has no entry for tomorrow.
pub fn extract_daily<Tz: TimeZone>(days: &[DailyStep], now: &DateTime<Tz>) -> DailySummary {
    let bounds = DayBounds::tomorrow(now);

    let Some(day) = days.iter().find(|d| bounds.contains(d.dt)) else {
        debug!("No daily data found for tomorrow");
        return DailySummary::default();
    };

    DailySummary {
        avg_temperature_c: round_half_up(day.temp_day),
        rain_probability_pct: probability_pct(day.pop),
        description: day.description.clone(),
        icon: glyph_for(&day.icon).to_string(),
    }
}

pub async fn fetch_daily_summary<Tz: TimeZone>(
    provider: &dyn ForecastProvider,
    at: Coordinates,
    now: &DateTime<Tz>,
) -> Result<DailySummary> {
    debug!(lat = at.lat, lon = at.lon, "Fetching daily summary");

    let days = provider.daily(at).await?;
    Ok(extract_daily(&days, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::tests::{at_tomorrow, now, paris};

    fn day(dt: i64, temp_day: f64, pop: f64) -> DailyStep {
        DailyStep {
            dt,
            temp_day,
            pop,
            description: "pluie modérée".into(),
            icon: "10d".into(),
        }
    }

    #[test]
    fn picks_the_entry_for_tomorrow() {
        let today = paris().with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap().timestamp();
        let days = vec![
            day(today, 9.0, 0.1),
            day(at_tomorrow(12, 0), 12.6, 0.45),
            day(at_tomorrow(12, 0) + 86_400, 20.0, 0.9),
        ];

        let summary = extract_daily(&days, &now());

        assert_eq!(summary.avg_temperature_c, 13);
        assert_eq!(summary.rain_probability_pct, 45);
        assert_eq!(summary.description, "pluie modérée");
        assert_eq!(summary.icon, "🌦️");
    }

    #[test]
    fn missing_day_gives_zero_summary() {
        let summary = extract_daily(&[day(0, 30.0, 1.0)], &now());

        assert_eq!(summary, DailySummary::default());
        assert_eq!(summary.avg_temperature_c, 0);
        assert_eq!(summary.rain_probability_pct, 0);
        assert_eq!(summary.description, "");
        assert_eq!(summary.icon, "");
    }
}
