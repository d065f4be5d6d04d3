//! Server configuration from environment variables

use pagekit_core::{AssembleOptions, HighlightStyle};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3002;
const DEFAULT_MAX_BODY_MB: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on a request body, base64 overhead included
    pub max_body_bytes: usize,
    /// Used when a highlight request names no color or opacity
    pub highlight: HighlightStyle,
    pub assemble: AssembleOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_MB * 1024 * 1024,
            highlight: HighlightStyle::default(),
            assemble: AssembleOptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_body_mb = parsed(&lookup, "PAGEKIT_MAX_BODY_MB").unwrap_or(DEFAULT_MAX_BODY_MB);

        let mut highlight = defaults.highlight;
        if let Some(color) = lookup("PAGEKIT_HIGHLIGHT_COLOR") {
            if pagekit_core::style::parse_hex_color(&color).is_some() {
                highlight.color = color;
            } else {
                tracing::warn!(color, "ignoring invalid PAGEKIT_HIGHLIGHT_COLOR");
            }
        }
        if let Some(opacity) = parsed(&lookup, "PAGEKIT_HIGHLIGHT_OPACITY") {
            highlight.opacity = opacity;
        }

        Self {
            host: parsed(&lookup, "PAGEKIT_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            max_body_bytes: max_body_mb.saturating_mul(1024 * 1024),
            highlight,
            assemble: AssembleOptions {
                min_extent: parsed(&lookup, "PAGEKIT_MIN_HIGHLIGHT_PT")
                    .unwrap_or(defaults.assemble.min_extent),
            },
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = raw, "ignoring unparseable setting");
            None
        }
    }
}
