use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_SIZE: &str = "M";
pub const DEFAULT_RENDER_DEADLINE_SECS: u64 = 10;
pub const DEFAULT_API_BASE: &str = "https://api.sendgrid.com";
const DEFAULT_USER_AGENT: &str = "RestockSentry/1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub product: ProductConfig,
    pub email: EmailConfig,
    pub checker: CheckerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub url: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Verified sender address; the alert is also delivered to it.
    pub sender: String,
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Upper bound on the wait for client-side rendering of the size buttons.
    pub render_deadline_secs: u64,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    /// When set, a diagnostic screenshot of the rendered page is written here.
    pub screenshot_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    // Takes the environment source explicitly so tests can inject a
    // variable map instead of mutating the process environment.
    pub(crate) fn from_source(source: Environment) -> Result<Self, ConfigError> {
        let vars = Config::builder().add_source(source).build()?;

        let config = AppConfig {
            product: ProductConfig {
                url: require(&vars, "product_url", "PRODUCT_URL")?,
                size: optional(&vars, "desired_size").unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            },
            email: EmailConfig {
                sender: require(&vars, "verified_sender_email", "VERIFIED_SENDER_EMAIL")?,
                api_key: require(&vars, "sendgrid_api_key", "SENDGRID_API_KEY")?,
                api_base: optional(&vars, "sendgrid_api_base")
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            },
            checker: CheckerConfig {
                render_deadline_secs: parse_deadline(optional(&vars, "render_deadline_secs"))?,
                user_agent: optional(&vars, "user_agent")
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                chrome_path: optional(&vars, "chrome_path"),
                screenshot_path: optional(&vars, "screenshot_path").map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.product.url).is_err() {
            return Err(ConfigError::Message("PRODUCT_URL is not a valid URL".into()));
        }

        if self.product.size.trim().is_empty() {
            return Err(ConfigError::Message("DESIRED_SIZE must not be blank".into()));
        }

        if !self.email.sender.contains('@') {
            return Err(ConfigError::Message(
                "VERIFIED_SENDER_EMAIL does not look like an email address".into(),
            ));
        }

        if self.email.api_key.trim().is_empty() {
            return Err(ConfigError::Message("SENDGRID_API_KEY must not be blank".into()));
        }

        if Url::parse(&self.email.api_base).is_err() {
            return Err(ConfigError::Message(
                "SENDGRID_API_BASE is not a valid URL".into(),
            ));
        }

        if self.checker.render_deadline_secs == 0 {
            return Err(ConfigError::Message(
                "RENDER_DEADLINE_SECS must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn require(vars: &Config, key: &str, var: &str) -> Result<String, ConfigError> {
    vars.get_string(key).map_err(|_| {
        ConfigError::Message(format!("required environment variable {} is not set", var))
    })
}

fn optional(vars: &Config, key: &str) -> Option<String> {
    vars.get_string(key).ok().filter(|value| !value.is_empty())
}

fn parse_deadline(raw: Option<String>) -> Result<u64, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| {
            ConfigError::Message(format!(
                "RENDER_DEADLINE_SECS must be a whole number of seconds, got '{}'",
                value
            ))
        }),
        None => Ok(DEFAULT_RENDER_DEADLINE_SECS),
    }
}
