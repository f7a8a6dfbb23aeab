use std::time::Duration;

/// Default probe deadline (5 seconds).
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LINK_CHECK_TIMEOUT_MS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
    #[error("LINK_CHECK_USER_AGENT must not be empty")]
    EmptyUserAgent,
    #[error("LINK_CHECK_PROXY_FROM_ENV must be true or false, got {0:?}")]
    InvalidProxyFlag(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub probe_timeout: Duration,
    pub user_agent: String,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` when probing.
    pub proxy_from_env: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            user_agent: default_user_agent(),
            proxy_from_env: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `LINK_CHECK_TIMEOUT_MS` (optional, default 5000) — probe deadline in milliseconds
    /// - `LINK_CHECK_USER_AGENT` (optional) — `User-Agent` header sent with each probe
    /// - `LINK_CHECK_PROXY_FROM_ENV` (optional, default true) — use proxy environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let probe_timeout_ms = match lookup("LINK_CHECK_TIMEOUT_MS") {
            Some(val) => match val.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(ConfigError::InvalidTimeout(val)),
            },
            None => DEFAULT_PROBE_TIMEOUT_MS,
        };

        let user_agent = match lookup("LINK_CHECK_USER_AGENT") {
            Some(val) if val.trim().is_empty() => return Err(ConfigError::EmptyUserAgent),
            Some(val) => val,
            None => default_user_agent(),
        };

        let proxy_from_env = match lookup("LINK_CHECK_PROXY_FROM_ENV") {
            Some(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::InvalidProxyFlag(val)),
            },
            None => true,
        };

        Ok(Self {
            probe_timeout: Duration::from_millis(probe_timeout_ms),
            user_agent,
            proxy_from_env,
        })
    }
}

fn default_user_agent() -> String {
    format!("link-checker/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert!(config.user_agent.starts_with("link-checker/"));
        assert!(config.proxy_from_env);
    }

    #[test]
    fn timeout_override() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "LINK_CHECK_TIMEOUT_MS").then(|| "250".to_string())
        })
        .unwrap();
        assert_eq!(config.probe_timeout, Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_and_garbage_timeouts() {
        for bad in ["0", "-1", "soon", ""] {
            let result = ServerConfig::from_lookup(|key| {
                (key == "LINK_CHECK_TIMEOUT_MS").then(|| bad.to_string())
            });
            assert!(
                matches!(result, Err(ConfigError::InvalidTimeout(_))),
                "timeout {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_blank_user_agent() {
        let result = ServerConfig::from_lookup(|key| {
            (key == "LINK_CHECK_USER_AGENT").then(|| "  ".to_string())
        });
        assert!(matches!(result, Err(ConfigError::EmptyUserAgent)));
    }

    #[test]
    fn proxy_flag_parsing() {
        let off = ServerConfig::from_lookup(|key| {
            (key == "LINK_CHECK_PROXY_FROM_ENV").then(|| "False".to_string())
        })
        .unwrap();
        assert!(!off.proxy_from_env);

        let bad = ServerConfig::from_lookup(|key| {
            (key == "LINK_CHECK_PROXY_FROM_ENV").then(|| "maybe".to_string())
        });
        assert!(matches!(bad, Err(ConfigError::InvalidProxyFlag(_))));
    }
}
