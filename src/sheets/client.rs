use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SyncError};

use super::auth::ServiceAccount;

pub(crate) const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

/// Summary returned by a values update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    #[serde(default)]
    pub updated_range: String,
    #[serde(default)]
    pub updated_rows: usize,
    #[serde(default)]
    pub updated_columns: usize,
    #[serde(default)]
    pub updated_cells: usize,
}

/// Google Sheets values API client used by the publish stage.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    credentials: ServiceAccount,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built or
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, credentials: ServiceAccount) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jirasheets/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| SyncError::Config(format!("Invalid Sheets API URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SyncError::Config("Sheets API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        Ok(url)
    }

    /// Overwrites `range` of a spreadsheet with `values`.
    ///
    /// Values are sent as `USER_ENTERED`, so formula cells such as
    /// `=HYPERLINK(...)` are evaluated by the sheet.
    ///
    /// # Arguments
    ///
    /// * `spreadsheet_id` - Destination spreadsheet identifier
    /// * `range` - A1 range (e.g., "Specifications!A1:S42")
    /// * `values` - Row-major cell block, header row first
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails, the request cannot be sent,
    /// or the API answers with a non-success status.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[Vec<String>],
    ) -> Result<UpdateSummary> {
        let access_token = self.credentials.access_token(&self.client).await?;
        let url = self.values_url(spreadsheet_id, range)?;

        let body = ValueRange {
            range,
            major_dimension: "ROWS",
            values,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SyncError::Api {
                service: "Google Sheets",
                status: status.as_u16(),
                message,
            });
        }

        let summary: UpdateSummary = response.json().await?;
        info!(
            "Updated {} cells in {}",
            summary.updated_cells, summary.updated_range
        );
        Ok(summary)
    }
}
