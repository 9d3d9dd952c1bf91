use chrono::Utc;
use serde::Serialize;

/// Request body for the remote registration endpoint.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    address: &'a str,
    timestamp: i64,
    #[serde(rename = "txHash", skip_serializing_if = "Option::is_none")]
    tx_hash: Option<&'a str>,
}

/// Client for `POST {base_url}/api/whitelist`.
///
/// Registration is a non-critical side effect of connecting: callers log
/// failures and move on, never block or roll back a connect on them.
#[derive(Clone)]
pub struct WhitelistApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl WhitelistApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn register(
        &self,
        address: &str,
        tx_hash: Option<&str>,
    ) -> Result<(), reqwest::Error> {
        let body = RegisterRequest {
            address,
            timestamp: Utc::now().timestamp_millis(),
            tx_hash,
        };

        self.client
            .post(format!("{}/api/whitelist", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        log::debug!("Whitelist backend accepted {}", address);
        Ok(())
    }
}
