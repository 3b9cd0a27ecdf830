//! Table adapter client for the automation sidecar.
//!
//! The sidecar drives the browser and reports what the page shows. Matching
//! waiting-list names against table names and reading displayed stacks
//! happen here, so every sidecar build gets the same rules.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use tablehost_domain::{Money, SessionUrl, TableName};

use crate::infrastructure::ports::{
    AdapterError, AdmitOutcome, CreatedSession, SessionConfig, SessionHandle, TableAdapter,
};

/// Default sidecar base URL.
pub const DEFAULT_TABLE_ADAPTER_URL: &str = "http://localhost:9515";

/// HTTP client for the automation sidecar.
#[derive(Clone)]
pub struct HttpTableAdapter {
    client: Client,
    base_url: String,
}

impl HttpTableAdapter {
    pub fn new(base_url: &str) -> Self {
        // Transport ceiling only; per-step budgets are applied by TimedTableAdapter
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn list_players(
        &self,
        session: &SessionHandle,
        listing: &str,
    ) -> Result<Vec<ListedPlayer>, AdapterError> {
        let response = self
            .client
            .get(self.url(&format!("/sessions/{}/{}", session, listing)))
            .send()
            .await
            .map_err(AdapterError::automation)?;
        read_json(response).await
    }

    async fn find_player(
        &self,
        session: &SessionHandle,
        listing: &str,
        table_name: &TableName,
    ) -> Result<Option<ListedPlayer>, AdapterError> {
        let players = self.list_players(session, listing).await?;
        Ok(players
            .into_iter()
            .find(|player| table_name.matches(&player.display_name)))
    }
}

impl Default for HttpTableAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_ADAPTER_URL)
    }
}

#[async_trait]
impl TableAdapter for HttpTableAdapter {
    async fn create_session(&self, config: &SessionConfig) -> Result<CreatedSession, AdapterError> {
        let response = self
            .client
            .post(self.url("/sessions"))
            .json(config)
            .send()
            .await
            .map_err(AdapterError::automation)?;
        let created: CreatedBody = read_json(response).await?;

        let url = SessionUrl::new(created.url)
            .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
        tracing::info!(handle = %created.handle, session_url = %url, "Sidecar created session");

        Ok(CreatedSession {
            handle: SessionHandle::new(created.handle),
            url,
        })
    }

    async fn admit_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
        expected_stack: Money,
    ) -> Result<AdmitOutcome, AdapterError> {
        let Some(entry) = self.find_player(session, "waitlist", table_name).await? else {
            tracing::debug!(%session, table_name = %table_name, "No waiting-list entry matched");
            return Ok(AdmitOutcome::NotFound);
        };

        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/approve", session)))
            .json(&PlayerAction {
                display_name: &entry.display_name,
                expected_stack: Some(expected_stack),
            })
            .send()
            .await
            .map_err(AdapterError::automation)?;
        let approved: StackBody = read_json(response).await?;

        let actual_stack = Money::parse_displayed(&approved.stack).ok_or_else(|| {
            AdapterError::InvalidResponse(format!(
                "unreadable stack after approval: {:?}",
                approved.stack
            ))
        })?;
        Ok(AdmitOutcome::Approved { actual_stack })
    }

    async fn remove_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
    ) -> Result<Money, AdapterError> {
        let seat = self
            .find_player(session, "seats", table_name)
            .await?
            .ok_or_else(|| AdapterError::NotFound(format!("no seat for {}", table_name)))?;

        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/remove", session)))
            .json(&PlayerAction {
                display_name: &seat.display_name,
                expected_stack: None,
            })
            .send()
            .await
            .map_err(AdapterError::automation)?;
        let removed: StackBody = read_json(response).await?;

        Ok(Money::parse_displayed(&removed.stack).unwrap_or_else(|| {
            tracing::warn!(
                table_name = %table_name,
                stack = %removed.stack,
                "Unreadable stack on removal, recording zero buyout"
            );
            Money::ZERO
        }))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AdapterError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status {
            StatusCode::NOT_FOUND => AdapterError::NotFound(body),
            _ => AdapterError::Automation(format!("sidecar returned {}: {}", status, body)),
        });
    }
    response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))
}

// =============================================================================
// Sidecar wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreatedBody {
    handle: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListedPlayer {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct StackBody {
    stack: String,
}

#[derive(Debug, Serialize)]
struct PlayerAction<'a> {
    display_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_stack: Option<Money>,
}
