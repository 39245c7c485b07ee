//! Stateless request builder and response parser for the `/Productos` API.
//!
//! # Design
//! `ProductClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever executes the round trip in between (the
//! `InventoryService` transport or an FFI host) never interprets statuses or
//! bodies itself.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Product;

/// Collection path, case-sensitive on the server.
pub const COLLECTION: &str = "Productos";

/// Characters escaped when an id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductClient {
    config: ClientConfig,
}

impl ProductClient {
    pub fn new(config: ClientConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config: ClientConfig { base_url, ..config },
        }
    }

    /// Client for `base_url` with default timeouts.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        format!("{}/{COLLECTION}", self.config.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        let segment = utf8_percent_encode(id, PATH_SEGMENT);
        format!("{}/{COLLECTION}/{segment}", self.config.base_url)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: HttpRequest::json_headers(),
            body,
            timeout: self.config.request_timeout,
        }
    }

    pub fn build_list_products(&self) -> HttpRequest {
        HttpRequest {
            timeout: self.config.list_timeout,
            ..self.request(HttpMethod::Get, self.collection_url(), None)
        }
    }

    pub fn build_get_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id), None)
    }

    pub fn build_create_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        let body = encode_body(product)?;
        Ok(self.request(HttpMethod::Post, self.collection_url(), Some(body)))
    }

    pub fn build_update_product(&self, id: &str, product: &Product) -> Result<HttpRequest, ApiError> {
        let body = encode_body(product)?;
        Ok(self.request(HttpMethod::Put, self.item_url(id), Some(body)))
    }

    pub fn build_delete_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id), None)
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        match response.status {
            200 => {}
            404 => return Err(ApiError::EndpointNotFound),
            _ => return Err(api_error(response)),
        }
        match parse_json(&response.body)? {
            Value::Array(items) => items.iter().map(decode_product).collect(),
            other => Err(ApiError::UnexpectedFormat(format!(
                "expected a JSON array of products, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        match response.status {
            200 => decode_product(&parse_json(&response.body)?),
            404 => Err(ApiError::NotFound),
            _ => Err(api_error(response)),
        }
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        match response.status {
            200 | 201 => decode_product(&parse_json(&response.body)?),
            _ => Err(api_error(response)),
        }
    }

    /// Parse an update response.
    ///
    /// A 204, or a 200 with no body, carries no record: the result is the
    /// submitted `product` with `id` attached, assuming the server stored
    /// exactly what was sent.
    pub fn parse_update_product(
        &self,
        id: &str,
        product: &Product,
        response: HttpResponse,
    ) -> Result<Product, ApiError> {
        match response.status {
            204 => Ok(product.clone().with_id(id)),
            200 if response.is_empty() => Ok(product.clone().with_id(id)),
            200 => decode_product(&parse_json(&response.body)?),
            _ => Err(api_error(response)),
        }
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        match response.status {
            200 | 204 => Ok(()),
            _ => Err(api_error(response)),
        }
    }
}

fn encode_body(product: &Product) -> Result<String, ApiError> {
    Ok(product.to_json()?.to_string())
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    Ok(serde_json::from_str(body)?)
}

fn decode_product(value: &Value) -> Result<Product, ApiError> {
    if !value.is_object() {
        return Err(ApiError::UnexpectedFormat(format!(
            "expected a product object, got {}",
            json_kind(value)
        )));
    }
    Ok(Product::from_json(value))
}

fn api_error(response: HttpResponse) -> ApiError {
    ApiError::Api {
        status: response.status,
        body: response.body,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
