use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::{
    error::Result,
    forecast::fetch_location_forecast,
    model::{Coordinates, HourlyCondition, RouteForecast, TimeWindow, round_half_up},
    provider::ForecastProvider,
};

/// Combines the hours forecast at both ends of a leg into a single verdict.
///
/// Each endpoint contributes its *peak* rain probability and the two peaks are
/// averaged: a leg is as risky as its worst hour, not its mean one.
pub fn aggregate_route(
    departure_hours: Vec<HourlyCondition>,
    arrival_hours: Vec<HourlyCondition>,
) -> RouteForecast {
    let peak = |hours: &[HourlyCondition]| {
        hours.iter().map(|h| i32::from(h.rain_probability_pct)).max().unwrap_or(0)
    };
    let dep_max = peak(&departure_hours);
    let arr_max = peak(&arrival_hours);
    let worst_case_rain_pct = round_half_up(f64::from(dep_max + arr_max) / 2.0) as u8;

    let all = || departure_hours.iter().chain(arrival_hours.iter());
    let count = all().count();

    let has_snow = all().any(|h| h.snow_mm > 0.0);
    let has_ice = all().any(|h| h.ice_present);

    let avg_temperature_c = if count == 0 {
        0
    } else {
        let sum: i64 = all().map(|h| i64::from(h.temperature_c)).sum();
        round_half_up(sum as f64 / count as f64)
    };

    // First hour wins on ties.
    let worst = all().fold(None::<&HourlyCondition>, |best, h| match best {
        Some(b) if h.rain_probability_pct <= b.rain_probability_pct => Some(b),
        _ => Some(h),
    });
    let (description, icon) = worst
        .map(|h| (h.description.clone(), h.icon.clone()))
        .unwrap_or_default();

    debug!(
        dep_max,
        arr_max,
        worst_case_rain_pct,
        avg_temperature_c,
        %description,
        has_snow,
        has_ice,
        "Route forecast"
    );

    RouteForecast {
        departure_hours,
        arrival_hours,
        worst_case_rain_pct,
        avg_temperature_c,
        description,
        icon,
        has_snow,
        has_ice,
    }
}

/// Fetches both endpoints of a leg concurrently and aggregates them.
pub async fn fetch_route_forecast<Tz: TimeZone>(
    provider: &dyn ForecastProvider,
    departure: Coordinates,
    arrival: Coordinates,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<RouteForecast> {
    let (departure_hours, arrival_hours) = tokio::try_join!(
        fetch_location_forecast(provider, departure, window, now),
        fetch_location_forecast(provider, arrival, window, now),
    )?;

    Ok(aggregate_route(departure_hours, arrival_hours))
}
