use crate::config::GeminiConfig;
use crate::error::TrackerError;
use crate::providers::{build_nutrition_prompt, NutritionProvider};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(GeminiProvider {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, food: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "parts": [{
                    "text": build_nutrition_prompt(food)
                }]
            }]
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = self.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }
}

#[async_trait]
impl NutritionProvider for GeminiProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn lookup(&self, food: &str, api_key: &str) -> Result<String, TrackerError> {
        if api_key.trim().is_empty() {
            return Err(TrackerError::MissingApiKey);
        }
        if food.trim().is_empty() {
            return Err(TrackerError::MissingFood);
        }

        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        info!("Requesting nutrition from {} for {:?}", self.model, food);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.trim())])
            .json(&self.request_body(food))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TrackerError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response_body: Value = serde_json::from_str(&body)
            .map_err(|e| TrackerError::Envelope(format!("response is not JSON: {}", e)))?;
        debug!("Google Gemini response: {:?}", response_body);

        // Check for API error response
        if let Some(error) = response_body.get("error") {
            let error_code = error["code"].as_i64().unwrap_or(0);
            let error_message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(TrackerError::Envelope(format!(
                "Google Gemini API error ({}): {}",
                error_code, error_message
            )));
        }

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                TrackerError::Envelope(format!(
                    "missing candidates[0].content.parts[0].text in {}",
                    response_body
                ))
            })?
            .to_string();

        Ok(text)
    }
}
