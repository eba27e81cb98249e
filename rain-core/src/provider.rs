use crate::{
    error::Result,
    model::{Coordinates, DailyStep, ForecastStep},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of raw forecast time series.
///
/// Implementations only fetch and decode; filtering to "tomorrow" and
/// normalization happen in [`crate::forecast`] and [`crate::daily`].
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Hourly timesteps covering at least the next 24 to 48 hours, in chronological order.
    async fn hourly(&self, at: Coordinates) -> Result<Vec<ForecastStep>>;

    /// Daily entries, in chronological order.
    async fn daily(&self, at: Coordinates) -> Result<Vec<DailyStep>>;
}
