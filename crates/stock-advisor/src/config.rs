//! Configuration for the stock advisor

use crate::error::{Result, StockError};
use crate::web::session::DEFAULT_IDLE_TIMEOUT;
use agent_utils::{LogFormat, env_or, env_parse, env_required};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LLM_API_BASE: &str = agent_llm::providers::openai::GROQ_API_BASE;
pub const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_CATALOG_PATH: &str = "static/stock_symbols.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Minimum secret length accepted for signing session cookies
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// Runtime configuration, usually read from the environment
#[derive(Clone)]
pub struct AdvisorConfig {
    pub alpha_vantage_api_key: String,
    /// Outbound Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,
    pub serper_api_key: String,
    pub llm_api_key: String,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    /// Signs the session cookie
    pub secret_key: String,
    /// `(username, password)` pairs accepted at login
    pub users: Vec<(String, String)>,
    pub catalog_path: PathBuf,
    /// When set, `/home` redirects anonymous visitors to the login page
    pub require_login: bool,
    /// Logged-in sessions unused for this long are dropped
    pub session_idle_timeout: Duration,
    /// Timeout for market data, news and article requests
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("alpha_vantage_rate_limit", &self.alpha_vantage_rate_limit)
            .field("llm_api_base", &self.llm_api_base)
            .field("llm_model", &self.llm_model)
            .field("users", &self.users.iter().map(|(u, _)| u).collect::<Vec<_>>())
            .field("catalog_path", &self.catalog_path)
            .field("require_login", &self.require_login)
            .field("session_idle_timeout", &self.session_idle_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AdvisorConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Read the configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::builder()
            .alpha_vantage_api_key(env_required("ALPHA_VANTAGE_API_KEY")?)
            .alpha_vantage_rate_limit(env_parse("ALPHA_VANTAGE_RATE_LIMIT", 5)?)
            .serper_api_key(env_required("SERPER_API_KEY")?)
            .llm_api_key(env_required("GROQ_API_KEY")?)
            .llm_api_base(env_or("LLM_API_BASE", DEFAULT_LLM_API_BASE))
            .llm_model(env_or("LLM_MODEL", DEFAULT_LLM_MODEL))
            .secret_key(env_required("SECRET_KEY")?)
            .users(parse_users(&env_required("STOCK_ADVISOR_USERS")?)?)
            .catalog_path(env_or("STOCK_SYMBOLS_CSV", DEFAULT_CATALOG_PATH))
            .require_login(env_parse("REQUIRE_LOGIN", true)?)
            .session_idle_timeout(Duration::from_secs(env_parse(
                "SESSION_IDLE_TIMEOUT_SECS",
                DEFAULT_IDLE_TIMEOUT.as_secs(),
            )?))
            .request_timeout(Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 30)?))
            .bind_addr(env_parse("BIND_ADDR", default_bind_addr())?)
            .log_format(env_parse("LOG_FORMAT", LogFormat::Pretty)?)
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("alpha_vantage_api_key", &self.alpha_vantage_api_key),
            ("serper_api_key", &self.serper_api_key),
            ("llm_api_key", &self.llm_api_key),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(StockError::Config(format!("{name} must not be empty")));
        }

        if self.secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(StockError::Config(format!(
                "secret_key must be at least {MIN_SECRET_KEY_LEN} bytes"
            )));
        }

        if self.users.is_empty() {
            return Err(StockError::Config(
                "at least one user must be configured".to_string(),
            ));
        }

        if self.session_idle_timeout.is_zero() {
            return Err(StockError::Config(
                "session_idle_timeout must be greater than 0".to_string(),
            ));
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(StockError::Config(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

/// Parse `user:password[,user:password]`
pub fn parse_users(raw: &str) -> Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((user, password)) if !user.trim().is_empty() && !password.is_empty() => {
                Ok((user.trim().to_string(), password.to_string()))
            }
            _ => Err(StockError::Config(format!(
                "malformed user entry '{entry}', expected user:password"
            ))),
        })
        .collect()
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    serper_api_key: Option<String>,
    llm_api_key: Option<String>,
    llm_api_base: Option<String>,
    llm_model: Option<String>,
    llm_timeout: Option<Duration>,
    secret_key: Option<String>,
    users: Vec<(String, String)>,
    catalog_path: Option<PathBuf>,
    require_login: Option<bool>,
    session_idle_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    bind_addr: Option<SocketAddr>,
    log_format: Option<LogFormat>,
}

impl AdvisorConfigBuilder {
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    pub fn serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.serper_api_key = Some(key.into());
        self
    }

    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    pub fn llm_api_base(mut self, base: impl Into<String>) -> Self {
        self.llm_api_base = Some(base.into());
        self
    }

    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }

    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    pub fn secret_key(mut self, secret: impl Into<String>) -> Self {
        self.secret_key = Some(secret.into());
        self
    }

    pub fn users(mut self, users: Vec<(String, String)>) -> Self {
        self.users = users;
        self
    }

    /// Add one login
    pub fn user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.push((username.into(), password.into()));
        self
    }

    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn require_login(mut self, required: bool) -> Self {
        self.require_login = Some(required);
        self
    }

    pub fn session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.session_idle_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let config = AdvisorConfig {
            alpha_vantage_api_key: self.alpha_vantage_api_key.unwrap_or_default(),
            alpha_vantage_rate_limit: self.alpha_vantage_rate_limit.unwrap_or(5),
            serper_api_key: self.serper_api_key.unwrap_or_default(),
            llm_api_key: self.llm_api_key.unwrap_or_default(),
            llm_api_base: self
                .llm_api_base
                .unwrap_or_else(|| DEFAULT_LLM_API_BASE.to_string()),
            llm_model: self
                .llm_model
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout: self.llm_timeout.unwrap_or(Duration::from_secs(120)),
            secret_key: self.secret_key.unwrap_or_default(),
            users: self.users,
            catalog_path: self
                .catalog_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            require_login: self.require_login.unwrap_or(true),
            session_idle_timeout: self.session_idle_timeout.unwrap_or(DEFAULT_IDLE_TIMEOUT),
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
            bind_addr: self.bind_addr.unwrap_or_else(default_bind_addr),
            log_format: self.log_format.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
