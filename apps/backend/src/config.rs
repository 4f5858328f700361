//! Environment configuration

use anyhow::Context;
use question_core::Capabilities;

/// Server configuration read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub capabilities: Capabilities,
}

impl Config {
    /// Read `HOST`, `PORT` and `GAP_TEXT_AUTHORING`
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", value))?,
            Err(_) => 3000,
        };
        let gap_text_authoring = parse_flag(std::env::var("GAP_TEXT_AUTHORING").ok().as_deref());

        Ok(Self {
            host,
            port,
            capabilities: Capabilities { gap_text_authoring },
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unset means enabled.
fn parse_flag(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "0" | "false" | "no" | "off"),
        None => true,
    }
}
