use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Invalid or missing settings. Always raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {name}")]
    Missing { name: &'static str },

    #[error("Setting {name} must be a number, got: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("Setting {name} must be in HH:MM format, got: {value}")]
    InvalidTime { name: &'static str, value: String },

    #[error("Setting RAIN_THRESHOLD must be a whole percentage between 0 and 100, got: {value}")]
    InvalidThreshold { value: String },

    #[error("Failed to read config file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which of the two outbound webhook messages a delivery concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Detailed,
    Verdict,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Detailed => "detailed",
            MessageKind::Verdict => "verdict",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("OWM API error {status}: {}", truncate_body(.body))]
    Provider { status: u16, body: String },

    #[error("Discord webhook failed ({message}): {status} {}", truncate_body(.body))]
    Delivery {
        message: MessageKind,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Keeps error messages readable when a server answers with a full HTML page.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
