//! HTTP boundary for form submission.

use reqwest::Client;
use thiserror::Error;

use crate::submit::ServerReply;

/// A request that never produced a usable reply: connection refused, timeout,
/// or a body that would not parse as the reply contract.
#[derive(Debug, Error)]
#[error("request failed: {reason}")]
pub struct TransportError {
    reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A completed request: the HTTP success flag plus the parsed JSON body.
/// The body is parsed regardless of status, since field errors ride on
/// non-2xx responses.
#[derive(Debug)]
pub struct TransportReply {
    pub success: bool,
    pub body: ServerReply,
}

pub trait Transport {
    fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<TransportReply, TransportError>> + Send;
}

/// [`Transport`] over reqwest, posting form-encoded bodies to
/// `base_url` + endpoint.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Wraps an existing client, e.g. one with a cookie store so the login
    /// session carries over to later requests.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Transport for HttpTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<TransportReply, TransportError> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .form(fields)
            .send()
            .await?;

        let success = response.status().is_success();
        let body = response.json::<ServerReply>().await?;

        Ok(TransportReply { success, body })
    }
}
