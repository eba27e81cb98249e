//! Discord webhook payloads and delivery.
//!
//! Two messages go out per run: a detailed embed with the hour-by-hour
//! breakdown (no ping), then a short verdict that mentions `@everyone`.

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Error, MessageKind, Result},
    model::{DailySummary, HourlyCondition, RouteForecast, TimeWindow},
};

const EMBED_TITLE: &str = "🌦️ Prévisions trajet de demain";
const EMBED_COLOR: u32 = 0x5865f2;

pub const RAIN_ALERT: &str = "☔ Alerte pluie pour demain !";
pub const NO_RAIN: &str = "☀️ Pas de pluie prévue demain !";
const SNOW_WARNING: &str = "❄️ Neige prévue sur le trajet !";
const ICE_WARNING: &str = "🧊 Risque de verglas !";

/// A commute leg together with the labels used to present it.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub label: String,
    pub departure_label: String,
    pub arrival_label: String,
    pub forecast: RouteForecast,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedMessage {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictMessage {
    pub content: String,
}

fn format_hour_line(h: &HourlyCondition) -> String {
    let mut line = format!(
        "  {:02}h — {} {} | {}% | {:.1}mm",
        h.hour, h.icon, h.description, h.rain_probability_pct, h.rain_mm
    );
    if h.snow_mm > 0.0 {
        line.push_str(&format!(" | ❄️ {:.1}mm", h.snow_mm));
    }
    if h.ice_present {
        line.push_str(" | 🧊 verglas");
    }
    line.push_str(&format!(" | {}°C", h.temperature_c));
    line
}

fn format_endpoint(label: &str, hours: &[HourlyCondition]) -> String {
    let lines: Vec<String> = hours.iter().map(format_hour_line).collect();
    format!("  📍 {label}\n{}", lines.join("\n"))
}

fn format_route(route: &RouteInfo) -> String {
    let forecast = &route.forecast;
    let header = format!(
        "{} ({}–{}) — moy. {}%",
        route.label, route.window.from, route.window.to, forecast.worst_case_rain_pct
    );

    let mut sections = Vec::new();
    if !forecast.departure_hours.is_empty() {
        sections.push(format_endpoint(&route.departure_label, &forecast.departure_hours));
    }
    if !forecast.arrival_hours.is_empty() {
        sections.push(format_endpoint(&route.arrival_label, &forecast.arrival_hours));
    }

    if sections.is_empty() {
        format!("{header}\n  Aucune donnée disponible")
    } else {
        format!("{header}\n{}", sections.join("\n"))
    }
}

pub fn build_detailed_message(outbound: &RouteInfo, inbound: &RouteInfo) -> DetailedMessage {
    let description = [format_route(outbound), String::new(), format_route(inbound)].join("\n");

    DetailedMessage {
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            description,
            color: EMBED_COLOR,
        }],
    }
}

fn leg_line(label: &str, route: &RouteForecast, rainy: bool) -> String {
    format!(
        "{} {label} : {} {} | {}% | {}°C",
        if rainy { "❌" } else { "✅" },
        route.icon,
        route.description,
        route.worst_case_rain_pct,
        route.avg_temperature_c
    )
}

/// A leg counts as rainy when its worst-case probability reaches `threshold`.
pub fn build_verdict_message(
    outbound: &RouteForecast,
    inbound: &RouteForecast,
    threshold: u8,
    daily: &DailySummary,
) -> VerdictMessage {
    let morning_rain = outbound.worst_case_rain_pct >= threshold;
    let evening_rain = inbound.worst_case_rain_pct >= threshold;

    let title = if morning_rain || evening_rain { RAIN_ALERT } else { NO_RAIN };

    let mut lines = vec![
        title.to_string(),
        format!(
            "📅 Journée : {} {} | {}% | {}°C",
            daily.icon, daily.description, daily.rain_probability_pct, daily.avg_temperature_c
        ),
        leg_line("Matin", outbound, morning_rain),
        leg_line("Soir", inbound, evening_rain),
    ];

    if outbound.has_snow || inbound.has_snow {
        lines.push(SNOW_WARNING.to_string());
    }
    if outbound.has_ice || inbound.has_ice {
        lines.push(ICE_WARNING.to_string());
    }

    VerdictMessage {
        content: format!("@everyone\n{}", lines.join("\n")),
    }
}

#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: String,
    http: Client,
}

impl DiscordWebhook {
    pub fn new(url: String) -> Self {
        Self { url, http: Client::new() }
    }

    async fn post<T: Serialize>(&self, kind: MessageKind, payload: &T) -> Result<()> {
        let json = serde_json::to_string(payload)?;
        debug!(message = %kind, payload = %json, "Sending webhook message");

        let res = self.http.post(&self.url).json(payload).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::Delivery {
                message: kind,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Posts the detailed message, then the verdict. Stops at the first failure.
    pub async fn send(&self, detailed: &DetailedMessage, verdict: &VerdictMessage) -> Result<()> {
        self.post(MessageKind::Detailed, detailed).await?;
        self.post(MessageKind::Verdict, verdict).await
    }
}
