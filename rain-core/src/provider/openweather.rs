use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{Error, Result},
    model::{Coordinates, DailyStep, ForecastStep},
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const ONE_CALL_PATH: &str = "/data/3.0/onecall";
const EXCLUDE_FOR_HOURLY: &str = "current,minutely,daily,alerts";
const EXCLUDE_FOR_DAILY: &str = "current,minutely,hourly,alerts";

/// OpenWeather One Call 3.0 client, metric units, French descriptions.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Points the client at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn one_call<T: DeserializeOwned>(&self, at: Coordinates, exclude: &str) -> Result<T> {
        let url = format!("{}{ONE_CALL_PATH}", self.base_url);

        debug!(lat = at.lat, lon = at.lon, exclude, "Fetching weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", at.lat.to_string()),
                ("lon", at.lon.to_string()),
                ("exclude", exclude.to_string()),
                ("units", "metric".to_string()),
                ("lang", "fr".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwAccumulation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<OwWeather>,
    rain: Option<OwAccumulation>,
    snow: Option<OwAccumulation>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDailyTemp,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    #[serde(default)]
    hourly: Vec<OwHourly>,
    #[serde(default)]
    daily: Vec<OwDaily>,
}

impl From<OwHourly> for ForecastStep {
    fn from(h: OwHourly) -> Self {
        let primary = h.weather.into_iter().next();

        ForecastStep {
            dt: h.dt,
            temp: h.temp,
            pop: h.pop,
            rain_1h: h.rain.and_then(|r| r.one_hour),
            snow_1h: h.snow.and_then(|s| s.one_hour),
            weather_id: primary.as_ref().and_then(|w| w.id),
            description: primary.as_ref().map(|w| w.description.clone()).unwrap_or_default(),
            icon: primary.map(|w| w.icon).unwrap_or_default(),
        }
    }
}

impl From<OwDaily> for DailyStep {
    fn from(d: OwDaily) -> Self {
        let primary = d.weather.into_iter().next();

        DailyStep {
            dt: d.dt,
            temp_day: d.temp.day,
            pop: d.pop,
            description: primary.as_ref().map(|w| w.description.clone()).unwrap_or_default(),
            icon: primary.map(|w| w.icon).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn hourly(&self, at: Coordinates) -> Result<Vec<ForecastStep>> {
        let parsed: OwOneCallResponse = self.one_call(at, EXCLUDE_FOR_HOURLY).await?;
        Ok(parsed.hourly.into_iter().map(ForecastStep::from).collect())
    }

    async fn daily(&self, at: Coordinates) -> Result<Vec<DailyStep>> {
        let parsed: OwOneCallResponse = self.one_call(at, EXCLUDE_FOR_DAILY).await?;
        Ok(parsed.daily.into_iter().map(DailyStep::from).collect())
    }
}
