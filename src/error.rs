use thiserror::Error;

/// Errors that can occur while looking up and logging a food entry
#[derive(Error, Debug)]
pub enum TrackerError {
    /// No Gemini API key was configured or entered
    #[error("Please enter your Gemini API key.")]
    MissingApiKey,

    /// The food description was empty
    #[error("Please enter what you ate.")]
    MissingFood,

    /// Failed to reach the Gemini endpoint
    #[error("Gemini API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Gemini answered with a non-success status
    #[error("Gemini API error ({status}): {body}")]
    ApiStatus { status: u16, body: String },

    /// The Gemini envelope did not carry the expected text part
    #[error("Error parsing Gemini response: {0}")]
    Envelope(String),

    /// The model text was not valid JSON
    #[error("Error parsing nutrition JSON: {0}")]
    MalformedJson(String),

    /// The JSON parsed but matched no known shape, or produced no records
    #[error("Unknown nutrition format")]
    UnknownFormat,

    /// Failed to append to the spreadsheet
    #[error("Failed to log to Google Sheets: {0}")]
    Store(String),

    /// Service account credentials could not be loaded
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Token exchange or assertion signing failed
    #[error("Authorization error: {0}")]
    Auth(String),

    /// The spreadsheet URL has no recognizable id
    #[error("Invalid spreadsheet URL: {0}")]
    InvalidSpreadsheetUrl(String),

    /// The form server could not bind or serve
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<jsonwebtoken::errors::Error> for TrackerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TrackerError::Auth(err.to_string())
    }
}
