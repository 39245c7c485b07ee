//! C-ABI wrapper around `inventory-core`.
//!
//! # Overview
//! Exposes the product catalog API through `extern "C"` functions so a
//! native mobile host (Swift, Kotlin/JNI, Dart FFI) can build requests and
//! parse responses while executing the HTTP exchange with its own stack.
//! The date formatter and the form validator are exported too, so the host
//! renders and validates exactly as the core does.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiProductResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `inventory_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use inventory_core::http::HttpResponse;
use inventory_core::validation::ProductForm;
use inventory_core::{ApiError, ClientConfig, Product, ProductClient};

use types::*;

/// Read a borrowed C string, treating null and invalid UTF-8 as empty.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string valid for the call.
unsafe fn read_str<'a>(s: *const c_char) -> &'a str {
    unsafe { try_read_str(s) }.unwrap_or("")
}

/// Read a borrowed C string. `None` for null or invalid UTF-8.
///
/// # Safety
/// Same as [`read_str`].
unsafe fn try_read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url` with default timeouts
/// (15 s for list, 10 s otherwise).
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs.
/// The caller must free the returned pointer with `inventory_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_client_new(base_url: *const c_char) -> *mut FfiInventoryClient {
    inventory_client_new_with_timeouts(base_url, 0, 0)
}

/// Create a new client with explicit timeouts in milliseconds. A timeout of
/// zero keeps the default for that operation.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_client_new_with_timeouts(
    base_url: *const c_char,
    list_timeout_ms: u32,
    request_timeout_ms: u32,
) -> *mut FfiInventoryClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { try_read_str(base_url) }) else {
            return std::ptr::null_mut();
        };
        let mut config = ClientConfig::new(url);
        if list_timeout_ms > 0 {
            config = config.with_list_timeout(std::time::Duration::from_millis(list_timeout_ms.into()));
        }
        if request_timeout_ms > 0 {
            config =
                config.with_request_timeout(std::time::Duration::from_millis(request_timeout_ms.into()));
        }
        let client = ProductClient::new(config);
        Box::into_raw(Box::new(FfiInventoryClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `inventory_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_client_free(client: *mut FfiInventoryClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for listing all products.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `inventory_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_build_list_products(
    client: *const FfiInventoryClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_products())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for fetching a single product by id.
///
/// Returns null if `client` or `id` is null.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_build_get_product(
    client: *const FfiInventoryClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let id = unsafe { read_str(id) };
        FfiHttpRequest::from_core(client.inner.build_get_product(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for creating a product.
///
/// Returns null if `client` or `name` is null, or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_build_create_product(
    client: *const FfiInventoryClient,
    name: *const c_char,
    price: f64,
    stock: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let product = Product::new(unsafe { read_str(name) }, price, stock);
        match client.inner.build_create_product(&product) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request replacing the product at `id`.
///
/// Returns null if `client`, `id` or `name` is null, or if serialization
/// fails.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_build_update_product(
    client: *const FfiInventoryClient,
    id: *const c_char,
    name: *const c_char,
    price: f64,
    stock: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let id = unsafe { read_str(id) };
        let product = Product::new(unsafe { read_str(name) }, price, stock);
        match client.inner.build_update_product(id, &product) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build an HTTP request for deleting a product by id.
///
/// Returns null if `client` or `id` is null.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_build_delete_product(
    client: *const FfiInventoryClient,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || id.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let id = unsafe { read_str(id) };
        FfiHttpRequest::from_core(client.inner.build_delete_product(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// empty; a body that is not UTF-8 is a `Decode` error, as in the core
/// transport.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, ApiError> {
    if resp.body.is_null() {
        return Ok(HttpResponse::new(resp.status, ""));
    }
    let body = unsafe { CStr::from_ptr(resp.body) }
        .to_str()
        .map_err(|e| ApiError::Decode(format!("response body is not UTF-8: {e}")))?;
    Ok(HttpResponse::new(resp.status, body))
}

/// Shared null checks and panic guard for the `inventory_parse_*` family.
fn parse_with<F>(
    op: &str,
    client: *const FfiInventoryClient,
    response: *const FfiHttpResponse,
    parse: F,
) -> *mut FfiProductResult
where
    F: FnOnce(&ProductClient, HttpResponse) -> *mut FfiProductResult,
{
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiProductResult::null_arg("client");
        }
        if response.is_null() {
            return FfiProductResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match ffi_response_to_core(resp) {
            Ok(resp) => parse(&client.inner, resp),
            Err(e) => FfiProductResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiProductResult::panic(&format!("panic in {op}")))
}

/// Parse an HTTP response from a list-products request.
///
/// Returns a result with `data_tag = ProductList` on success. A 404 yields
/// `EndpointNotFound`.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_parse_list_products(
    client: *const FfiInventoryClient,
    response: *const FfiHttpResponse,
) -> *mut FfiProductResult {
    parse_with("inventory_parse_list_products", client, response, |c, resp| {
        match c.parse_list_products(resp) {
            Ok(products) => FfiProductResult::ok_product_list(products),
            Err(e) => FfiProductResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from a get-product request.
///
/// Returns a result with `data_tag = Product` on success.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_parse_get_product(
    client: *const FfiInventoryClient,
    response: *const FfiHttpResponse,
) -> *mut FfiProductResult {
    parse_with("inventory_parse_get_product", client, response, |c, resp| {
        match c.parse_get_product(resp) {
            Ok(product) => FfiProductResult::ok_product(product),
            Err(e) => FfiProductResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from a create-product request.
///
/// Returns a result with `data_tag = Product` on success (status 200/201).
#[unsafe(no_mangle)]
pub extern "C" fn inventory_parse_create_product(
    client: *const FfiInventoryClient,
    response: *const FfiHttpResponse,
) -> *mut FfiProductResult {
    parse_with("inventory_parse_create_product", client, response, |c, resp| {
        match c.parse_create_product(resp) {
            Ok(product) => FfiProductResult::ok_product(product),
            Err(e) => FfiProductResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from an update-product request.
///
/// `id`, `name`, `price` and `stock` must be the values the request was
/// built with: on a 204 the result is assembled from them.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_parse_update_product(
    client: *const FfiInventoryClient,
    id: *const c_char,
    name: *const c_char,
    price: f64,
    stock: i64,
    response: *const FfiHttpResponse,
) -> *mut FfiProductResult {
    if id.is_null() {
        return FfiProductResult::null_arg("id");
    }
    if name.is_null() {
        return FfiProductResult::null_arg("name");
    }
    parse_with("inventory_parse_update_product", client, response, |c, resp| {
        let id = unsafe { read_str(id) };
        let product = Product::new(unsafe { read_str(name) }, price, stock);
        match c.parse_update_product(id, &product, resp) {
            Ok(product) => FfiProductResult::ok_product(product),
            Err(e) => FfiProductResult::from_error(e),
        }
    })
}

/// Parse an HTTP response from a delete-product request.
///
/// Returns a result with `data_tag = None` on success (status 200/204).
#[unsafe(no_mangle)]
pub extern "C" fn inventory_parse_delete_product(
    client: *const FfiInventoryClient,
    response: *const FfiHttpResponse,
) -> *mut FfiProductResult {
    parse_with("inventory_parse_delete_product", client, response, |c, resp| {
        match c.parse_delete_product(resp) {
            Ok(()) => FfiProductResult::ok_empty(),
            Err(e) => FfiProductResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Model helpers
// ---------------------------------------------------------------------------

/// Render an ISO-8601 timestamp as `day/month/year`. Null yields the
/// "no date" placeholder, garbage the "invalid date" placeholder.
///
/// Never returns null except on an internal panic. Free with
/// `inventory_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_format_registered_at(timestamp: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let raw = if timestamp.is_null() {
            None
        } else {
            Some(unsafe { read_str(timestamp) })
        };
        c_string(inventory_core::format_registered_at(raw))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Validate raw form text. On success the result carries the parsed
/// product (`data_tag = Product`, no id); on failure `error_code` is
/// `Validation` and `error_message` says which field is wrong.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_validate_form(
    name: *const c_char,
    price: *const c_char,
    stock: *const c_char,
) -> *mut FfiProductResult {
    catch_unwind(|| {
        let form = ProductForm {
            name: unsafe { read_str(name) }.to_string(),
            price: unsafe { read_str(price) }.to_string(),
            stock: unsafe { read_str(stock) }.to_string(),
        };
        match form.parse() {
            Ok(product) => FfiProductResult::ok_product(product),
            Err(e) => FfiProductResult::from_validation(e),
        }
    })
    .unwrap_or_else(|_| FfiProductResult::panic("panic in inventory_validate_form"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `inventory_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    });
}

/// Free an `FfiProductResult` returned by any `inventory_parse_*` or
/// `inventory_validate_form` call. Safe to call with null. Uses `data_tag`
/// to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_free_result(result: *mut FfiProductResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Product => {
                let product = unsafe { Box::from_raw(result.data as *mut FfiProduct) };
                unsafe { free_ffi_product_fields(&product) };
            }
            FfiDataTag::ProductList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiProductList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for item in items.iter() {
                        unsafe { free_ffi_product_fields(item) };
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn inventory_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
