//! Transport shared by the provider clients: one bounded, cancellable round trip.
//!
//! Request construction and response interpretation stay with each client.

use std::time::Duration;

use reqwest::StatusCode;
use showfinder_core::ProviderError;
use tokio_util::sync::CancellationToken;

/// Status and raw body of a completed HTTP exchange.
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Result<serde_json::Value, ProviderError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ProviderError::network(
                Some(self.status.as_u16()),
                format!("invalid response body: {e}"),
            )
        })
    }
}

/// Send `request` and read the whole body, giving up after `timeout` or as
/// soon as `cancel` fires.
pub(crate) async fn execute(
    request: reqwest::RequestBuilder,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<RawResponse, ProviderError> {
    let exchange = async {
        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::network(e.status().map(|s| s.as_u16()), e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::network(Some(status.as_u16()), e.to_string()))?;
        Ok::<_, ProviderError>(RawResponse { status, body })
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderError::Cancelled),
        res = tokio::time::timeout(timeout, exchange) => match res {
            Ok(res) => res,
            Err(_) => Err(ProviderError::network(
                None,
                format!("request timed out after {timeout:?}"),
            )),
        },
    }
}
