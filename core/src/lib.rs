//! API client core for the inventory catalog service.
//!
//! # Overview
//! `ProductClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `InventoryService` runs those
//! exchanges through a `Transport` (blocking `ureq` by default) and exposes
//! the five catalog operations: list, get, create, update and delete.
//!
//! # Design
//! - `ProductClient` and `InventoryService` are stateless apart from their
//!   `ClientConfig`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit and the FFI crate can hand the exchange to a native host.
//! - `Product` decodes permissively: malformed upstream records degrade to
//!   defaults instead of failing.
//! - Every failure is one `ApiError` variant; transport and JSON library
//!   errors never leak.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::ProductClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::InventoryService;
pub use transport::{Transport, UreqTransport};
pub use types::{format_registered_at, Product, INVALID_DATE, NO_DATE};
pub use validation::{validate, ProductForm, ValidationError};
