//! REST client for the matching API, built on [`reqwest`].

use alumni_core::matching::resolve_reject_reason;
use alumni_core::matching::view::MatchView;
use alumni_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// HTTP client for one matching API deployment, acting as one user.
pub struct MatchingClient {
    client: reqwest::Client,
    /// Base URL including the version prefix, e.g. `http://host:3000/api/v1`.
    base_url: String,
    token: String,
}

/// Errors from the matching client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an error status or `success: false`.
    #[error("Matching API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The `{success, message, data}` envelope every endpoint returns.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

impl MatchingClient {
    /// Create a client sending `token` as the bearer credential.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// `GET /matching/my-requests`: pending matches addressed to the caller.
    pub async fn my_requests(&self) -> Result<Vec<MatchView>, ClientError> {
        let response = self
            .client
            .get(self.url("/matching/my-requests"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// `PUT /matching/{id}/accept`. Returns the server's message.
    pub async fn accept(&self, id: DbId) -> Result<String, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/matching/{id}/accept")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let message = Self::parse_message(response).await?;
        tracing::debug!(match_id = id, "Match accepted");
        Ok(message)
    }

    /// `PUT /matching/{id}/reject` with `{ "reason": ... }`.
    ///
    /// A missing or blank reason is sent as `"No reason provided"`.
    pub async fn reject(&self, id: DbId, reason: Option<&str>) -> Result<String, ClientError> {
        let body = serde_json::json!({ "reason": resolve_reject_reason(reason) });
        let response = self
            .client
            .put(self.url(&format!("/matching/{id}/reject")))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let message = Self::parse_message(response).await?;
        tracing::debug!(match_id = id, "Match rejected");
        Ok(message)
    }

    /// `GET /matching/{program_id}/my-mentees`: accepted matches with the
    /// mentee snapshot embedded.
    pub async fn my_mentees(&self, program_id: DbId) -> Result<Vec<MatchView>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/matching/{program_id}/my-mentees")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_data(response).await
    }

    /// Accept, then re-fetch the pending list.
    pub async fn accept_and_refresh(&self, id: DbId) -> Result<Vec<MatchView>, ClientError> {
        self.accept(id).await?;
        self.my_requests().await
    }

    /// Reject, then re-fetch the pending list.
    pub async fn reject_and_refresh(
        &self,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Vec<MatchView>, ClientError> {
        self.reject(id, reason).await?;
        self.my_requests().await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode the envelope, turning error statuses and `success: false`
    /// into [`ClientError::Api`].
    async fn parse_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, ClientError> {
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Ok(envelope) => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
            }),
            Err(_) if !status.is_success() => Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            }),
            Err(e) => Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("Unexpected response body: {e}"),
            }),
        }
    }

    async fn parse_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        let envelope = Self::parse_envelope::<T>(response).await?;
        envelope.data.ok_or_else(|| ClientError::Api {
            status,
            message: "Response envelope has no data".to_string(),
        })
    }

    async fn parse_message(response: reqwest::Response) -> Result<String, ClientError> {
        let envelope = Self::parse_envelope::<serde_json::Value>(response).await?;
        Ok(envelope.message)
    }
}

/// Best-effort message from an error body that is not a full envelope.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
