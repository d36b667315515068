//! HTTP transport seam.
//!
//! `RestClient` never talks to reqwest directly; it hands a fully built
//! URL and query to a `Transport`. `HttpTransport` is the production
//! implementation. Tests substitute scripted doubles.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use tracing::warn;

use super::ApiError;

pub trait Transport {
    /// Issue one request and decode the JSON body of a 2xx response.
    ///
    /// Non-2xx statuses must be reported as `ApiError::Status`.
    fn send(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        (**self).send(method, url, query)
    }
}

/// Run `attempt` again straight away while it fails to connect, at most
/// `max_retries` extra times. Any other outcome is returned as-is.
fn retry_on_connect<R, F>(
    url: &str,
    max_retries: u32,
    mut attempt: F,
) -> Result<R, reqwest::Error>
where
    F: FnMut() -> Result<R, reqwest::Error>,
{
    let mut retries = 0;
    loop {
        match attempt() {
            Err(e) if e.is_connect() && retries < max_retries => {
                retries += 1;
                warn!(url = url, retry = retries, error = %e, "Connection failed, retrying");
            }
            result => return result,
        }
    }
}

/// Blocking reqwest transport with connection-level retries.
///
/// Only failures to establish a connection are retried. Timeouts and
/// HTTP error statuses fail the call immediately.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_retries: u32,
}

impl HttpTransport {
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_retries,
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        let response = retry_on_connect(url, self.max_retries, || {
            self.client.request(method.clone(), url).query(query).send()
        })?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
