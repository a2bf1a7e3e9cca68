//! Process configuration
//!
//! Built once at startup and handed to whoever needs it, no ambient
//! environment reads at call sites.

use std::net::SocketAddr;

use anyhow::Result;

use crate::utils::env_var_or_else;

/// Address to listen on when `ADDRESS` is not set
const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the server listens on
    pub address: SocketAddr,

    /// Base URL short URLs are derived from, without trailing slash
    base_url: String,
}

impl Config {
    /// Build the configuration from the environment
    ///
    /// - `ADDRESS` — listen address, with an optional `PORT` override
    /// - `BASE_URL` — public base for short URLs, defaults to a localhost
    ///   address on the listen port
    ///
    /// # Errors
    ///
    /// Will return `Err` when `ADDRESS` or `PORT` do not parse
    pub fn from_env() -> Result<Self> {
        let mut address =
            env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

        // optional override of just the port
        if let Ok(port) = std::env::var("PORT") {
            // only check non-empty strings
            if !port.is_empty() {
                let port = port.parse::<u16>()?;

                address.set_port(port);
            }
        }

        let base_url = env_var_or_else("BASE_URL", || {
            format!("http://localhost:{}", address.port())
        });

        Ok(Self {
            address,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a configuration with a fixed base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            address: DEFAULT_ADDRESS.parse().expect("Valid default address"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Derive the full short URL for a code
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{code}", self.base_url)
    }
}
