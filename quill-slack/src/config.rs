use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "quill-slack.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub slack: SlackConfig,
    pub quotes: QuotesConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub environment: Environment,
    pub body_limit: usize,
    pub connection_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SlackConfig {
    /// Shared secret Slack sends with every slash command.
    pub verification_token: SecretString,
    /// Incoming webhook used to post quotes into a channel.
    pub webhook_url: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct QuotesConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
                environment: Environment::Production,
                body_limit: quill_hyper::DEFAULT_BODY_LIMIT,
                connection_timeout_secs: 30,
            },
            slack: SlackConfig {
                verification_token: SecretString::from(""),
                webhook_url: None,
            },
            quotes: QuotesConfig {
                base_url: "https://quotes.rest".to_owned(),
                api_key: None,
                timeout_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_owned(),
                format: LogFormat::Compact,
            },
        }
    }
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Validation(format!(
                "unsupported environment `{other}` (expected development|production)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then `QUILL_*` environment
    /// variables, and validate the result.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match resolve_config_path(options.config_path.as_deref()) {
            Some(path) => config.apply_patch(read_patch(&path)?),
            None if options.require_file => {
                let expected =
                    options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                return Err(ConfigError::MissingConfigFile(expected));
            }
            None => {}
        }

        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn quotes_timeout(&self) -> Duration {
        Duration::from_secs(self.quotes.timeout_secs)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.server.connection_timeout_secs)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(environment) = server.environment {
                self.server.environment = environment;
            }
            if let Some(body_limit) = server.body_limit {
                self.server.body_limit = body_limit;
            }
            if let Some(connection_timeout_secs) = server.connection_timeout_secs {
                self.server.connection_timeout_secs = connection_timeout_secs;
            }
        }

        if let Some(slack) = patch.slack {
            if let Some(token) = slack.verification_token {
                self.slack.verification_token = SecretString::from(token);
            }
            if let Some(webhook_url) = slack.webhook_url {
                self.slack.webhook_url = Some(SecretString::from(webhook_url));
            }
        }

        if let Some(quotes) = patch.quotes {
            if let Some(base_url) = quotes.base_url {
                self.quotes.base_url = base_url;
            }
            if let Some(api_key) = quotes.api_key {
                self.quotes.api_key = Some(SecretString::from(api_key));
            }
            if let Some(timeout_secs) = quotes.timeout_secs {
                self.quotes.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read("QUILL_BIND_ADDRESS") {
            self.server.bind_address = parse("QUILL_BIND_ADDRESS", &value)?;
        }
        if let Some(value) = read("QUILL_ENVIRONMENT") {
            self.server.environment = value.parse()?;
        }
        if let Some(value) = read("QUILL_BODY_LIMIT") {
            self.server.body_limit = parse("QUILL_BODY_LIMIT", &value)?;
        }
        if let Some(value) = read("QUILL_CONNECTION_TIMEOUT_SECS") {
            self.server.connection_timeout_secs = parse("QUILL_CONNECTION_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read("QUILL_SLACK_TOKEN") {
            self.slack.verification_token = SecretString::from(value);
        }
        if let Some(value) = read("QUILL_SLACK_WEBHOOK_URL") {
            self.slack.webhook_url = Some(SecretString::from(value));
        }

        if let Some(value) = read("QUILL_QUOTES_BASE_URL") {
            self.quotes.base_url = value;
        }
        if let Some(value) = read("QUILL_QUOTES_API_KEY") {
            self.quotes.api_key = Some(SecretString::from(value));
        }
        if let Some(value) = read("QUILL_QUOTES_TIMEOUT_SECS") {
            self.quotes.timeout_secs = parse("QUILL_QUOTES_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read("QUILL_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read("QUILL_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slack.verification_token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Validation(
                "slack.verification_token must be set (QUILL_SLACK_TOKEN)".to_owned(),
            ));
        }
        let base_url = &self.quotes.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "quotes.base_url must be an http(s) url, got `{}`",
                self.quotes.base_url
            )));
        }
        if self.quotes.timeout_secs == 0 {
            return Err(ConfigError::Validation("quotes.timeout_secs must be > 0".to_owned()));
        }
        if self.server.connection_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "server.connection_timeout_secs must be > 0".to_owned(),
            ));
        }
        if self.server.body_limit == 0 {
            return Err(ConfigError::Validation("server.body_limit must be > 0".to_owned()));
        }
        Ok(())
    }
}

/// Human readable summary with secrets redacted.
impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn secret(value: Option<&SecretString>) -> &'static str {
            match value {
                Some(value) if !value.expose_secret().is_empty() => "[redacted]",
                _ => "<unset>",
            }
        }

        writeln!(f, "server.bind_address = {}", self.server.bind_address)?;
        writeln!(f, "server.environment = {:?}", self.server.environment)?;
        writeln!(f, "server.body_limit = {}", self.server.body_limit)?;
        writeln!(f, "server.connection_timeout_secs = {}", self.server.connection_timeout_secs)?;
        writeln!(f, "slack.verification_token = {}", secret(Some(&self.slack.verification_token)))?;
        writeln!(f, "slack.webhook_url = {}", secret(self.slack.webhook_url.as_ref()))?;
        writeln!(f, "quotes.base_url = {}", self.quotes.base_url)?;
        writeln!(f, "quotes.api_key = {}", secret(self.quotes.api_key.as_ref()))?;
        writeln!(f, "quotes.timeout_secs = {}", self.quotes.timeout_secs)?;
        writeln!(f, "logging.level = {}", self.logging.level)?;
        write!(f, "logging.format = {:?}", self.logging.format)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    slack: Option<SlackPatch>,
    quotes: Option<QuotesPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerPatch {
    bind_address: Option<SocketAddr>,
    environment: Option<Environment>,
    body_limit: Option<usize>,
    connection_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SlackPatch {
    verification_token: Option<String>,
    webhook_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuotesPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
