//! Client configuration: environments, identifying metadata and settings loading.

use crate::error::{ClientError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// SDK name sent with every request.
pub const SDK_NAME: &str = "planhub-client-rust";

/// SDK version sent with every request.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A named Planhub deployment, or a literal URL override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Staging,
    Sandbox,
    Local,
    /// Any selector that is not a known name is used as the base URL itself.
    Custom(String),
}

impl Environment {
    /// Resolve a selector. Known names match case-insensitively; anything else
    /// becomes [`Environment::Custom`].
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" => Environment::Staging,
            "sandbox" => Environment::Sandbox,
            "local" => Environment::Local,
            _ => Environment::Custom(selector.trim().to_string()),
        }
    }

    /// Base URL for this environment.
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Production => "https://api.planhub.io",
            Environment::Staging => "https://api.staging.planhub.io",
            Environment::Sandbox => "https://sandbox.api.planhub.io",
            Environment::Local => "http://localhost:5000",
            Environment::Custom(url) => url,
        }
    }
}

impl From<&str> for Environment {
    fn from(selector: &str) -> Self {
        Environment::parse(selector)
    }
}

impl From<String> for Environment {
    fn from(selector: String) -> Self {
        Environment::parse(&selector)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Sandbox => "sandbox",
            Environment::Local => "local",
            Environment::Custom(url) => url,
        };
        f.write_str(name)
    }
}

/// Configuration for a [`PlanhubClient`](crate::PlanhubClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.planhub.io")
    pub base_url: String,
    /// Free-text name of the calling application, used for attribution
    pub application_name: String,
    /// Host name of the calling machine
    pub machine_name: String,
    /// Bearer token (if authenticated)
    pub access_token: Option<String>,
    sdk_name: &'static str,
    sdk_version: &'static str,
}

impl ClientConfig {
    /// Create a config for an environment name or literal URL.
    pub fn new(environment: impl Into<Environment>, application_name: impl Into<String>) -> Self {
        Self {
            base_url: environment.into().base_url().to_string(),
            application_name: application_name.into(),
            machine_name: local_machine_name(),
            sdk_name: SDK_NAME,
            sdk_version: SDK_VERSION,
            access_token: None,
        }
    }

    /// Attach an existing bearer token.
    pub fn with_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Override the machine name reported to the server.
    pub fn with_machine_name(mut self, machine_name: impl Into<String>) -> Self {
        self.machine_name = machine_name.into();
        self
    }

    /// SDK name reported to the server. Always [`SDK_NAME`].
    pub fn sdk_name(&self) -> &str {
        self.sdk_name
    }

    /// SDK version reported to the server. Always [`SDK_VERSION`].
    pub fn sdk_version(&self) -> &str {
        self.sdk_version
    }

    /// Build a config from loaded settings.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let config = Self::new(settings.environment.as_str(), settings.application_name.clone());
        match settings.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => config.with_token(token),
            None => config,
        }
    }
}

// Hand-written so the token never reaches logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("application_name", &self.application_name)
            .field("machine_name", &self.machine_name)
            .field("sdk_name", &self.sdk_name)
            .field("sdk_version", &self.sdk_version)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Host name of this machine, or `"unknown"` when it cannot be read.
pub fn local_machine_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Settings loaded from `planhub.toml` and `PLANHUB_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_application_name")]
    pub application_name: String,

    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            application_name: default_application_name(),
            token: None,
        }
    }
}

impl ClientSettings {
    /// Load settings from `planhub.toml` in the working directory (if present)
    /// and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("planhub.toml"))
    }

    /// Load settings from the given file (if present) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(path, ::config::Environment::with_prefix("PLANHUB"))
    }

    fn build(path: &Path, env: ::config::Environment) -> Result<Self> {
        let mut settings = ::config::Config::builder();

        // Load from config file if it exists
        if path.exists() {
            settings = settings.add_source(::config::File::from(path));
        }

        // Override with environment variables (prefixed with PLANHUB_)
        settings = settings.add_source(env);

        let config = settings
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ClientError::Config(e.to_string()))
    }
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_application_name() -> String {
    "planhub-client".to_string()
}
