//! Environment-driven server configuration.

use std::fmt;

const DEFAULT_PORT: u16 = 8000;

/// Deployment stage; selects which upstream API endpoint the server
/// advertises to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Mainnet,
    Testnet,
}

impl Stage {
    fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "MAINNET" => Some(Stage::Mainnet),
            "TESTNET" => Some(Stage::Testnet),
            _ => None,
        }
    }

    pub fn api_base_url(&self) -> &'static str {
        match self {
            Stage::Mainnet => "https://api.nasa.gov/planetary/apod",
            Stage::Testnet => "https://api-testnet.nasa.gov/planetary/apod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Mainnet => "MAINNET",
            Stage::Testnet => "TESTNET",
        })
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub stage: Stage,
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults on
    /// missing or malformed values.
    pub fn from_env() -> Self {
        let stage = match std::env::var("STAGE") {
            Ok(raw) => Stage::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(stage = %raw, "unrecognized STAGE, defaulting to MAINNET");
                Stage::Mainnet
            }),
            Err(_) => Stage::Mainnet,
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "invalid PORT, defaulting to {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self { stage, port }
    }
}
