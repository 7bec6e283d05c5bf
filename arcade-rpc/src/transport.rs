use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use arcade_types::ErrorBody;

use crate::error::RpcError;

/// One JSON-over-HTTP channel to a single backend service. Methods are
/// addressed as `POST <base>/rpc/<method>` with a JSON parameter object.
/// The inner client pools connections, so constructing this once at
/// startup satisfies the establish-once contract.
pub struct RpcTransport {
    client: Client,
    base_url: String,
    service: &'static str,
    timeout: Duration,
}

impl RpcTransport {
    pub fn new(service: &'static str, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            service,
            timeout,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    /// One round trip, no retries. A failed call is the caller's problem.
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, RpcError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.method_url(method);
        tracing::debug!("rpc {} -> {}", self.service, url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(params)
            .send()
            .await
            .map_err(|e| self.classify_send_error(method, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let message = read_error_message(response, status).await;
            return Err(RpcError::NotFound {
                service: self.service,
                message,
            });
        }
        if !status.is_success() {
            let message = read_error_message(response, status).await;
            tracing::warn!("rpc {} {} failed: {}", self.service, method, message);
            return Err(RpcError::Backend {
                service: self.service,
                message,
            });
        }

        response.json::<R>().await.map_err(|e| {
            tracing::warn!("rpc {} {} reply did not decode: {:?}", self.service, method, e);
            RpcError::Protocol {
                service: self.service,
                message: e.to_string(),
            }
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/rpc/{}", self.base_url, method)
    }

    fn classify_send_error(&self, method: &str, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            tracing::warn!(
                "rpc {} {} timed out after {:?}",
                self.service,
                method,
                self.timeout
            );
            RpcError::Timeout {
                service: self.service,
            }
        } else {
            tracing::warn!("rpc {} {} transport failure: {:?}", self.service, method, err);
            RpcError::Unavailable {
                service: self.service,
                message: err.to_string(),
            }
        }
    }
}

async fn read_error_message(response: reqwest::Response, status: StatusCode) -> String {
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("backend returned status {}", status),
    }
}
