pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod normalize;
pub mod providers;
pub mod row_logger;
pub mod server;
pub mod sheets;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use model::{LogRow, NutritionRecord};
pub use normalize::{normalize, Normalization, Shape};
pub use providers::{GeminiProvider, NutritionProvider};
pub use row_logger::{RowSink, RowStore};
pub use sheets::SheetsStore;

use log::{error, info};

/// What happened to one submission
#[derive(Debug)]
pub enum SubmissionStatus {
    /// The submission was refused before anything was sent
    Rejected(TrackerError),
    /// Rows were appended for the answer (records, or a single fallback row)
    Logged { rows: usize },
    /// The lookup failed; `logged` tells whether its diagnostic row was appended
    LookupFailed { error: TrackerError, logged: bool },
    /// The spreadsheet could not be opened or an append failed
    StoreFailed(TrackerError),
}

/// Result of one submission, ready to show to the user
#[derive(Debug)]
pub struct Submission {
    /// The raw model answer, or the lookup error message
    pub nutrition: Option<String>,
    pub status: SubmissionStatus,
}

/// Look up `food`, normalize the answer and log it, in that order.
///
/// Never fails: every problem is reported through [`SubmissionStatus`].
pub async fn track_food(
    provider: &dyn NutritionProvider,
    store: &dyn RowStore,
    food: &str,
    api_key: &str,
    timestamp: &str,
) -> Submission {
    let food = food.trim();
    if api_key.trim().is_empty() {
        return rejected(TrackerError::MissingApiKey);
    }
    if food.is_empty() {
        return rejected(TrackerError::MissingFood);
    }

    info!("Fetching nutritional information for {:?}", food);
    let lookup = provider.lookup(food, api_key).await;

    info!("Logging to Google Sheets");
    let sink = match store.open().await {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to open spreadsheet: {}", e);
            let nutrition = Some(match &lookup {
                Ok(raw) => raw.clone(),
                Err(lookup_error) => lookup_error.to_string(),
            });
            return Submission {
                nutrition,
                status: SubmissionStatus::StoreFailed(e),
            };
        }
    };

    match lookup {
        Ok(raw) => {
            let normalization = normalize(&raw, food);
            let status = match row_logger::log_normalization(
                sink.as_ref(),
                food,
                &raw,
                &normalization,
                timestamp,
            )
            .await
            {
                Ok(rows) => SubmissionStatus::Logged { rows },
                Err(e) => {
                    error!("Failed to log to Google Sheets: {}", e);
                    SubmissionStatus::StoreFailed(e)
                }
            };
            Submission {
                nutrition: Some(raw),
                status,
            }
        }
        Err(lookup_error) => {
            error!("Nutrition lookup failed: {}", lookup_error);
            let logged =
                match row_logger::log_lookup_failure(sink.as_ref(), food, &lookup_error, timestamp)
                    .await
                {
                    Ok(_) => true,
                    Err(e) => {
                        error!("Failed to log lookup failure: {}", e);
                        false
                    }
                };
            Submission {
                nutrition: Some(lookup_error.to_string()),
                status: SubmissionStatus::LookupFailed {
                    error: lookup_error,
                    logged,
                },
            }
        }
    }
}

fn rejected(error: TrackerError) -> Submission {
    Submission {
        nutrition: None,
        status: SubmissionStatus::Rejected(error),
    }
}
