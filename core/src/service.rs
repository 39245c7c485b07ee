//! The five catalog operations as single blocking calls.
//!
//! `InventoryService` pairs a `ProductClient` with a `Transport`: build the
//! request, execute it once, parse the response. There is no retry and no
//! shared mutable state, so one service can be used from several threads at
//! the same time.

use tracing::{debug, instrument, warn};

use crate::client::ProductClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::Product;

/// Catalog API client performing real round trips.
#[derive(Debug, Clone)]
pub struct InventoryService<T = UreqTransport> {
    client: ProductClient,
    transport: T,
}

impl InventoryService<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> InventoryService<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ProductClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    /// All products in the catalog.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.send(self.client.build_list_products())?;
        let products = logged(self.client.parse_list_products(response))?;
        debug!(count = products.len(), "listed products");
        Ok(products)
    }

    #[instrument(skip(self))]
    pub fn get_by_id(&self, id: &str) -> Result<Product, ApiError> {
        let response = self.send(self.client.build_get_product(id))?;
        logged(self.client.parse_get_product(response))
    }

    /// Create `product` and return the record as stored by the server,
    /// including its assigned id and registration date.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub fn create(&self, product: &Product) -> Result<Product, ApiError> {
        let request = logged(self.client.build_create_product(product))?;
        let response = self.send(request)?;
        let created = logged(self.client.parse_create_product(response))?;
        debug!(id = created.id(), "created product");
        Ok(created)
    }

    /// Replace the product at `id` with the fields of `product`.
    ///
    /// When the server answers 204 without a body the returned value is
    /// `product` with `id` attached; no follow-up fetch is made.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub fn update(&self, id: &str, product: &Product) -> Result<Product, ApiError> {
        let request = logged(self.client.build_update_product(id, product))?;
        let response = self.send(request)?;
        if response.is_empty() {
            debug!(status = response.status, "update returned no body, using submitted fields");
        }
        logged(self.client.parse_update_product(id, product, response))
    }

    #[instrument(skip(self))]
    pub fn delete_by_id(&self, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_product(id))?;
        logged(self.client.parse_delete_product(response))
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = logged(self.transport.execute(&request))?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}

fn logged<V>(result: Result<V, ApiError>) -> Result<V, ApiError> {
    if let Err(err) = &result {
        warn!(error = %err, status = err.status(), "catalog request failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it receives.
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<HttpResponse, ApiError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses.lock().unwrap().remove(0)
        }
    }

    impl Transport for &ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            (**self).execute(request)
        }
    }

    fn service(transport: &ScriptedTransport) -> InventoryService<&ScriptedTransport> {
        InventoryService::with_transport(ClientConfig::new("http://catalog.test/api"), transport)
    }

    #[test]
    fn list_decodes_each_element() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            200,
            r#"[{"id":1,"nombre":"Taza","precio":4.5,"existencia":3}]"#,
        ))]);
        let products = service(&transport).list().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id(), Some("1"));

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://catalog.test/api/Productos");
    }

    #[test]
    fn network_failure_is_passed_through() {
        let transport =
            ScriptedTransport::new(vec![Err(ApiError::Network("connection refused".into()))]);
        let err = service(&transport).list().unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn update_with_no_content_makes_a_single_request() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(204, ""))]);
        let input = Product::new("Taza azul", 5.0, 2);
        let updated = service(&transport).update("12", &input).unwrap();

        assert_eq!(updated, input.with_id("12"));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].url, "http://catalog.test/api/Productos/12");
    }

    #[test]
    fn create_returns_server_record() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(
            201,
            r#"{"id":40,"nombre":"Taza","precio":4.5,"existencia":3,"fechaRegistro":"2025-10-29T23:45:19.749Z"}"#,
        ))]);
        let created = service(&transport)
            .create(&Product::new("Taza", 4.5, 3))
            .unwrap();
        assert_eq!(created.id(), Some("40"));
        assert_eq!(created.registered_at(), Some("2025-10-29T23:45:19.749Z"));
    }

    #[test]
    fn delete_reports_server_errors() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(204, "")),
            Ok(HttpResponse::new(500, "db down")),
        ]);
        let svc = service(&transport);
        assert!(svc.delete_by_id("1").is_ok());
        let err = svc.delete_by_id("1").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn get_by_id_missing_product() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(404, ""))]);
        let err = service(&transport).get_by_id("99").unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }
}
