//! One scheduled invocation: fetch everything, then post both messages.

use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::{
    config::Config,
    daily::fetch_daily_summary,
    error::Result,
    model::{DailySummary, RouteForecast},
    notify::{
        DetailedMessage, DiscordWebhook, RouteInfo, VerdictMessage, build_detailed_message,
        build_verdict_message,
    },
    provider::ForecastProvider,
    route::fetch_route_forecast,
};

/// Everything fetched for tomorrow, ready to be formatted.
#[derive(Debug, Clone)]
pub struct Forecasts {
    pub outbound: RouteForecast,
    pub inbound: RouteForecast,
    pub daily: DailySummary,
}

/// The two webhook payloads of one run.
#[derive(Debug, Clone)]
pub struct Notifications {
    pub detailed: DetailedMessage,
    pub verdict: VerdictMessage,
}

impl Forecasts {
    /// Labels both legs for presentation.
    pub fn route_infos(&self, config: &Config) -> (RouteInfo, RouteInfo) {
        let outbound = RouteInfo {
            label: "🏠→🏢 Aller".to_string(),
            departure_label: "Domicile".to_string(),
            arrival_label: "Travail".to_string(),
            forecast: self.outbound.clone(),
            window: config.outbound,
        };
        let inbound = RouteInfo {
            label: "🏢→🏠 Retour".to_string(),
            departure_label: "Travail".to_string(),
            arrival_label: "Domicile".to_string(),
            forecast: self.inbound.clone(),
            window: config.inbound,
        };
        (outbound, inbound)
    }

    pub fn notifications(&self, config: &Config) -> Notifications {
        let (outbound, inbound) = self.route_infos(config);

        Notifications {
            detailed: build_detailed_message(&outbound, &inbound),
            verdict: build_verdict_message(
                &self.outbound,
                &self.inbound,
                config.rain_threshold,
                &self.daily,
            ),
        }
    }
}

/// Fetches both legs and the daily summary concurrently. The first failure aborts.
pub async fn gather_forecasts<Tz: TimeZone>(
    config: &Config,
    provider: &dyn ForecastProvider,
    now: &DateTime<Tz>,
) -> Result<Forecasts> {
    info!("Fetching forecasts...");

    let (outbound, inbound, daily) = tokio::try_join!(
        fetch_route_forecast(provider, config.home, config.work, config.outbound, now),
        fetch_route_forecast(provider, config.work, config.home, config.inbound, now),
        fetch_daily_summary(provider, config.home, now),
    )?;

    Ok(Forecasts { outbound, inbound, daily })
}

/// Builds both payloads without sending anything.
pub async fn preview<Tz: TimeZone>(
    config: &Config,
    provider: &dyn ForecastProvider,
    now: &DateTime<Tz>,
) -> Result<Notifications> {
    let forecasts = gather_forecasts(config, provider, now).await?;
    Ok(forecasts.notifications(config))
}

pub async fn run<Tz: TimeZone>(
    config: &Config,
    provider: &dyn ForecastProvider,
    webhook: &DiscordWebhook,
    now: &DateTime<Tz>,
) -> Result<()> {
    let notifications = preview(config, provider, now).await?;

    info!("Sending Discord notifications...");
    webhook
        .send(&notifications.detailed, &notifications.verdict)
        .await?;

    info!("Done!");
    Ok(())
}
