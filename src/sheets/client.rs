use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use serde_json::json;
use std::time::Duration;

use super::{fetch_access_token, spreadsheet_id};
use crate::config::SheetsConfig;
use crate::credentials::CredentialProvider;
use crate::error::TrackerError;
use crate::model::LogRow;
use crate::row_logger::{RowSink, RowStore};

/// Opens the configured spreadsheet, authorizing with a service account
pub struct SheetsStore {
    client: Client,
    config: SheetsConfig,
    credentials: Box<dyn CredentialProvider>,
}

impl SheetsStore {
    pub fn new(
        config: SheetsConfig,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| TrackerError::Store(e.to_string()))?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }
}

#[async_trait]
impl RowStore for SheetsStore {
    async fn open(&self) -> Result<Box<dyn RowSink>, TrackerError> {
        let spreadsheet_id = spreadsheet_id(&self.config.spreadsheet_url)?;
        let key = self.credentials.service_account()?;
        info!(
            "Authorizing {} with {} credentials",
            key.client_email,
            self.credentials.source()
        );
        let token = fetch_access_token(&self.client, &key, &self.config.scopes).await?;

        let append_url = append_url(&self.config.api_base, &spreadsheet_id, &self.config.range)?;
        Ok(Box::new(Worksheet {
            client: self.client.clone(),
            append_url,
            access_token: token.access_token,
        }))
    }
}

/// One spreadsheet range, with an access token valid for this submission
pub struct Worksheet {
    client: Client,
    append_url: Url,
    access_token: String,
}

#[async_trait]
impl RowSink for Worksheet {
    async fn append_row(&self, row: &LogRow) -> Result<(), TrackerError> {
        debug!("Appending row for {:?}", row.item());

        let response = self
            .client
            .post(self.append_url.clone())
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [row.values()] }))
            .send()
            .await
            .map_err(|e| TrackerError::Store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Store(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}

fn append_url(api_base: &str, spreadsheet_id: &str, range: &str) -> Result<Url, TrackerError> {
    let invalid = |reason: String| TrackerError::Store(format!("bad Sheets API base: {}", reason));

    let range_segment = format!("{}:append", range);
    let mut url = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid(api_base.to_string()))?
        .pop_if_empty()
        .extend([
            "v4",
            "spreadsheets",
            spreadsheet_id,
            "values",
            range_segment.as_str(),
        ]);
    Ok(url)
}
