//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. The default
//! implementation uses a blocking `ureq` agent with status-as-error disabled,
//! so 4xx/5xx responses come back as data for `ProductClient` to classify.
//! Anything that prevents a response from being obtained (refused
//! connection, DNS failure, elapsed timeout, aborted body) becomes
//! `ApiError::Network`.

use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport on a shared `ureq` agent.
///
/// The request's `timeout` is applied as ureq's global timeout, covering
/// resolution, connect, send and the full body read.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let timeout = Some(request.timeout);
        let url = request.url.as_str();

        let result = match request.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = if request.method == HttpMethod::Get {
                    self.agent.get(url)
                } else {
                    self.agent.delete(url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.config().timeout_global(timeout).build().call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(url)
                } else {
                    self.agent.put(url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                let builder = builder.config().timeout_global(timeout).build();
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(network_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response.body_mut().read_to_vec().map_err(network_error)?;
        let body = String::from_utf8(bytes)
            .map_err(|e| ApiError::Decode(format!("response body is not UTF-8: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn network_error(err: ureq::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
