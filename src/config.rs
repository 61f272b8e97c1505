//! Server configuration from environment variables (a `.env` file is honoured).
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `DRAW_SEED` | unset: draws are seeded from OS entropy |
//! | `PIX_KEY` | `jlteambt@gmail.com` |
//! | `PIX_RECEIVER_NAME` | `ASSESP` |
//! | `PIX_RECEIVER_CITY` | `Santos` |

use crate::logic::{PixSettings, MAX_PIX_KEY_LEN};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Fixed seed for reproducible draws (staging/demo only).
    pub draw_seed: Option<u64>,
    pub pix: PixSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT".to_string(),
                reason: format!("'{p}' is not a port number"),
            })?,
            None => default_port(),
        };
        let draw_seed = lookup("DRAW_SEED")
            .map(|s| {
                s.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "DRAW_SEED".to_string(),
                    reason: format!("'{s}' is not an unsigned integer"),
                })
            })
            .transpose()?;

        let pix_key = text("PIX_KEY", "jlteambt@gmail.com");
        if pix_key.len() > MAX_PIX_KEY_LEN {
            return Err(ConfigError::Invalid {
                var: "PIX_KEY".to_string(),
                reason: format!("longer than {MAX_PIX_KEY_LEN} characters"),
            });
        }

        Ok(Self {
            host: text("HOST", &default_host()),
            port,
            draw_seed,
            pix: PixSettings {
                key: pix_key,
                receiver_name: text("PIX_RECEIVER_NAME", "ASSESP"),
                receiver_city: text("PIX_RECEIVER_CITY", "Santos"),
            },
        })
    }
}
