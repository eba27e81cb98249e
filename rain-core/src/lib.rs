//! Core library for the `will-it-rain` notifier.
//!
//! This crate defines:
//! - Configuration loading & validation
//! - Abstraction over forecast providers (OpenWeather One Call)
//! - Forecast extraction, route aggregation and the daily summary
//! - Discord webhook payloads and delivery
//!
//! It is used by the `will-it-rain` binary, but can also be driven from other
//! schedulers (a serverless handler, a test harness).

pub mod config;
pub mod daily;
pub mod error;
pub mod forecast;
pub mod glyph;
pub mod model;
pub mod notify;
pub mod provider;
pub mod route;
pub mod run;

pub use config::{Config, Verbosity};
pub use error::{ConfigError, Error, MessageKind, Result};
pub use model::{DailySummary, HourlyCondition, RouteForecast, TimeOfDay, TimeWindow};
pub use notify::DiscordWebhook;
pub use provider::{ForecastProvider, OpenWeatherProvider};
pub use route::aggregate_route;
