use crate::fetch::{Interval, OutputSize};

pub mod loader;
pub mod validator;

pub use loader::{load_config, DEFAULT_CONFIG_FILE};

pub const ALPHA_VANTAGE_ENDPOINT: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";
pub const DEFAULT_USER_AGENT: &str = "intraday-dash/0.1";

/// Where and how intraday series are requested.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub user_agent: String,
}

/// Form defaults used when the dashboard starts.
#[derive(Debug, Clone, Copy)]
pub struct DashboardDefaults {
    pub interval: Interval,
    pub output_size: OutputSize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub defaults: DashboardDefaults,
}

impl Config {
    pub fn builtin() -> Self {
        Config {
            provider: ProviderConfig {
                endpoint: ALPHA_VANTAGE_ENDPOINT.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            defaults: DashboardDefaults {
                interval: Interval::FiveMin,
                output_size: OutputSize::Compact,
            },
        }
    }
}

impl ProviderConfig {
    /// Read the API key at call time. A missing key yields an empty string and
    /// the provider's rejection surfaces through the response parser.
    pub fn api_key(&self) -> String {
        match std::env::var(&self.api_key_env) {
            Ok(key) => key,
            Err(_) => {
                log::debug!("{} is not set; sending an empty API key", self.api_key_env);
                String::new()
            }
        }
    }
}
