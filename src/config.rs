use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::credentials::ServiceAccountKey;

/// Main tracker configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TrackerConfig {
    /// Gemini endpoint settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Spreadsheet settings
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Form server settings
    #[serde(default)]
    pub server: ServerConfig,

    // Secrets, usually kept in secrets.toml
    /// Gemini API key; when absent the form asks for it
    pub gemini_api_key: Option<String>,
    /// Service account credential; when absent the local credentials file is used
    pub gcp_service_account: Option<ServiceAccountKey>,
}

/// Configuration for the Gemini text-generation endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL for the API (for proxies and tests)
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Temperature for generation, sent only when set
    pub temperature: Option<f32>,
    /// Maximum output tokens, sent only when set
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_gemini_base_url(),
            temperature: None,
            max_tokens: None,
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the Google Sheets log
#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet URL (or bare spreadsheet id)
    #[serde(default = "default_spreadsheet_url")]
    pub spreadsheet_url: String,
    /// A1 range rows are appended after; a bare cell targets the first sheet
    #[serde(default = "default_range")]
    pub range: String,
    /// Base URL for the Sheets API
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
    /// Local service account file used when no secret is configured
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
    /// OAuth scopes requested for the service account
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_url: default_spreadsheet_url(),
            range: default_range(),
            api_base: default_sheets_api_base(),
            credentials_file: default_credentials_file(),
            scopes: default_scopes(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the form server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_spreadsheet_url() -> String {
    "https://docs.google.com/spreadsheets/d/1Oo-ZlGXV2gioSCmp_x8s_cqJDDKR4shXjWzJqacZYxA/edit?usp=sharing"
        .to_string()
}

fn default_range() -> String {
    "A1".to_string()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_credentials_file() -> String {
    "service_account.json".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://spreadsheets.google.com/feeds".to_string(),
        "https://www.googleapis.com/auth/drive".to_string(),
    ]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl TrackerConfig {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with CALTRACK__ prefix
    /// 2. secrets.toml file in current directory
    /// 3. config.toml file in current directory
    /// 4. Default values
    ///
    /// Environment variable format: CALTRACK__GEMINI__MODEL, CALTRACK__GEMINI_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// The configured Gemini key, ignoring blank values
    pub fn configured_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Load configuration from files and environment variables
///
/// See [`TrackerConfig::load`] for the source priority.
pub fn load_config() -> Result<TrackerConfig, ConfigError> {
    let settings = Config::builder()
        // Optional files (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(File::with_name("secrets").required(false))
        // Use double underscore for nested: CALTRACK__SHEETS__SPREADSHEET_URL
        .add_source(
            Environment::with_prefix("CALTRACK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
