use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub pts: PtsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    #[serde(default = "default_client_timeout_secs")]
    pub client_request_timeout_secs: u64,
    #[serde(default = "default_client_timeout_secs")]
    pub client_disconnect_timeout_secs: u64,
}

/// Operator directory (PTS) client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtsConfig {
    pub url: String,
    /// Applies to the HTTP client and to each lookup made by the service.
    #[serde(default = "default_pts_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on lookups in flight while enriching a list.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

fn default_keep_alive_secs() -> u64 {
    60
}

fn default_client_timeout_secs() -> u64 {
    10
}

fn default_pts_timeout_secs() -> u64 {
    5
}

fn default_max_concurrent_lookups() -> usize {
    4
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment.
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_only()?,
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str).map_err(|e| format!("failed to parse config file: {e}").into())
    }

    fn from_env_only() -> Result<Self, Box<dyn std::error::Error>> {
        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        let pts_url =
            get_env("PTS_URL").ok_or("no PTS_URL env variable set and no config.toml found")?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
                keep_alive_secs: get_env_parse("TIMEOUT_IDLE", default_keep_alive_secs()),
                client_request_timeout_secs: get_env_parse(
                    "TIMEOUT_READ",
                    default_client_timeout_secs(),
                ),
                client_disconnect_timeout_secs: get_env_parse(
                    "TIMEOUT_WRITE",
                    default_client_timeout_secs(),
                ),
            },
            pts: PtsConfig {
                url: pts_url,
                timeout_secs: get_env_parse("TIMEOUT_CLIENT", default_pts_timeout_secs()),
                max_concurrent_lookups: get_env_parse(
                    "PTS_MAX_CONCURRENT_LOOKUPS",
                    default_max_concurrent_lookups(),
                ),
            },
        })
    }

    /// Environment variables win over file values, even when the file exists.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Some(v) = lookup("TIMEOUT_IDLE")
            && let Ok(n) = v.parse()
        {
            self.server.keep_alive_secs = n;
        }
        if let Some(v) = lookup("TIMEOUT_READ")
            && let Ok(n) = v.parse()
        {
            self.server.client_request_timeout_secs = n;
        }
        if let Some(v) = lookup("TIMEOUT_WRITE")
            && let Ok(n) = v.parse()
        {
            self.server.client_disconnect_timeout_secs = n;
        }
        if let Some(v) = lookup("PTS_URL") {
            self.pts.url = v;
        }
        if let Some(v) = lookup("TIMEOUT_CLIENT")
            && let Ok(n) = v.parse()
        {
            self.pts.timeout_secs = n;
        }
        if let Some(v) = lookup("PTS_MAX_CONCURRENT_LOOKUPS")
            && let Ok(n) = v.parse()
        {
            self.pts.max_concurrent_lookups = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 9000

        [pts]
        url = "https://pts.example/lookup"
    "#;

    #[test]
    fn test_parse_with_defaults() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.keep_alive_secs, 60);
        assert_eq!(config.server.client_request_timeout_secs, 10);
        assert_eq!(config.pts.url, "https://pts.example/lookup");
        assert_eq!(config.pts.timeout_secs, 5);
        assert_eq!(config.pts.max_concurrent_lookups, 4);
    }

    #[test]
    fn test_parse_missing_section() {
        assert!(Config::parse("[server]\nhost = \"0.0.0.0\"\nport = 80\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::parse(SAMPLE).unwrap();
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "8081"),
            ("TIMEOUT_CLIENT", "2"),
            ("PTS_MAX_CONCURRENT_LOOKUPS", "16"),
            ("TIMEOUT_IDLE", "not-a-number"),
            ("PTS_URL", "http://localhost:3000/lookup"),
        ]);
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.pts.timeout_secs, 2);
        assert_eq!(config.pts.max_concurrent_lookups, 16);
        assert_eq!(config.server.keep_alive_secs, 60);
        assert_eq!(config.pts.url, "http://localhost:3000/lookup");
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
