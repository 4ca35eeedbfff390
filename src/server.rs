//! The single-page form: a food description (and, when none is configured,
//! a Gemini key) in, the raw answer and a status line out.

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Form, Router,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::info;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::TrackerError;
use crate::model::timestamp_now;
use crate::providers::NutritionProvider;
use crate::row_logger::RowStore;
use crate::{track_food, Submission, SubmissionStatus};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn NutritionProvider>,
    pub store: Arc<dyn RowStore>,
    /// Key from the secrets; when set the form does not ask for one
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FoodForm {
    #[serde(default)]
    pub food: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_food))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

pub async fn serve(app: Router, config: &ServerConfig) -> Result<(), TrackerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            TrackerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

    info!("Calorie Tracker listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn show_form(State(state): State<AppState>) -> Html<String> {
    Html(render_page(state.api_key.is_some(), "", None, None))
}

async fn submit_food(State(state): State<AppState>, Form(form): Form<FoodForm>) -> Html<String> {
    let api_key = state.api_key.as_deref().unwrap_or(&form.api_key);
    let submission = track_food(
        state.provider.as_ref(),
        state.store.as_ref(),
        &form.food,
        api_key,
        &timestamp_now(),
    )
    .await;

    let (tone, message) = status_message(&submission);
    Html(render_page(
        state.api_key.is_some(),
        &form.food,
        submission.nutrition.as_deref(),
        Some((tone, message)),
    ))
}

fn status_message(submission: &Submission) -> (Tone, String) {
    match &submission.status {
        SubmissionStatus::Rejected(e) => (Tone::Error, e.to_string()),
        SubmissionStatus::Logged { rows: 1 } => (Tone::Success, "Entry logged!".to_string()),
        SubmissionStatus::Logged { rows } => {
            (Tone::Success, format!("Entry logged! ({} rows)", rows))
        }
        SubmissionStatus::LookupFailed { logged: true, .. } => (
            Tone::Warning,
            "Nutrition lookup failed; the error was logged.".to_string(),
        ),
        SubmissionStatus::LookupFailed { error, logged: false } => (
            Tone::Error,
            format!("Nutrition lookup failed and could not be logged: {}", error),
        ),
        SubmissionStatus::StoreFailed(e @ TrackerError::Store(_)) => (Tone::Error, e.to_string()),
        SubmissionStatus::StoreFailed(e) => {
            (Tone::Error, format!("Failed to log to Google Sheets: {}", e))
        }
    }
}

fn render_page(
    key_configured: bool,
    food: &str,
    nutrition: Option<&str>,
    status: Option<(Tone, String)>,
) -> String {
    let key_input = if key_configured {
        String::new()
    } else {
        r#"<label>Enter Gemini API Key <input type="password" name="api_key"></label>"#
            .to_string()
    };

    let nutrition = nutrition
        .map(|text| format!("<h2>Nutritional Info:</h2><pre>{}</pre>", encode_text(text)))
        .unwrap_or_default();

    let status = status
        .map(|(tone, message)| {
            format!(r#"<p class="{}">{}</p>"#, tone.class(), encode_text(&message))
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Calorie Tracker</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
label {{ display: block; margin-bottom: 1rem; }}
input {{ width: 100%; }}
pre {{ background: #f4f4f4; padding: 1rem; white-space: pre-wrap; }}
.success {{ color: #1b7f3b; }}
.warning {{ color: #a06000; }}
.error {{ color: #b00020; }}
</style>
</head>
<body>
<h1>Calorie Tracker</h1>
<form method="post" action="/">
{key_input}
<label>What did you eat? <input type="text" name="food" value="{food}"></label>
<button type="submit">Log Food</button>
</form>
{status}
{nutrition}
</body>
</html>
"#,
        food = encode_double_quoted_attribute(food),
    )
}
