//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.
//!
//! Strings handed to C are built with [`c_string`], which drops interior NUL
//! bytes instead of failing, so a hostile server body cannot abort a parse.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use inventory_core::error::ApiError;
use inventory_core::http::HttpMethod;
use inventory_core::validation::ValidationError;
use inventory_core::Product;

/// Opaque handle to a `ProductClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiInventoryClient {
    pub(crate) inner: inventory_core::ProductClient,
}

/// Convert to an owned C string, stripping interior NUL bytes.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `inventory_build_*` functions. The host executes the request,
/// aborting it after `timeout_ms`, and passes the response back through
/// `inventory_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub timeout_ms: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: inventory_core::HttpRequest) -> *mut Self {
        let url = c_string(req.url);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };
        let timeout_ms = u32::try_from(req.timeout.as_millis()).unwrap_or(u32::MAX);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            timeout_ms,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host constructs this on the stack after executing a request, then
/// passes a pointer to an `inventory_parse_*` function. The FFI layer reads
/// but does not free these fields. A null `body` is read as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiProductResult`. One per `ApiError` variant,
/// plus codes for the FFI layer itself and for form validation.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Decode = 2,
    UnexpectedFormat = 3,
    EndpointNotFound = 4,
    NotFound = 5,
    Api = 6,
    Serialization = 7,
    Validation = 8,
    Panic = 9,
    NullArg = 10,
}

/// Tag that tells `inventory_free_result` what `FfiProductResult::data`
/// points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Product = 1,
    ProductList = 2,
}

/// A single product exposed to C. `id` and `registered_at` may be null.
/// `formatted_date` is always set.
#[repr(C)]
pub struct FfiProduct {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub price: f64,
    pub stock: i64,
    pub registered_at: *mut c_char,
    pub formatted_date: *mut c_char,
}

impl FfiProduct {
    fn from_core(product: Product) -> Self {
        let formatted_date = c_string(product.formatted_registered_at());
        FfiProduct {
            id: product.id().map_or(std::ptr::null_mut(), |id| c_string(id)),
            registered_at: product
                .registered_at()
                .map_or(std::ptr::null_mut(), |at| c_string(at)),
            formatted_date,
            price: product.price,
            stock: product.stock,
            name: c_string(product.name),
        }
    }
}

/// A list of products exposed to C.
#[repr(C)]
pub struct FfiProductList {
    pub items: *mut FfiProduct,
    pub len: u32,
}

/// Result envelope for all parse and validation operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is set when a response was
/// received, and `data` is null.
#[repr(C)]
pub struct FfiProductResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiProductResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        FfiProductResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }
        .boxed()
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        FfiProductResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build a success result carrying a single `FfiProduct`.
    pub(crate) fn ok_product(product: Product) -> *mut Self {
        let ffi_product = Box::new(FfiProduct::from_core(product));
        Self::ok(FfiDataTag::Product, Box::into_raw(ffi_product) as *mut c_void)
    }

    /// Build a success result carrying a `FfiProductList`.
    pub(crate) fn ok_product_list(products: Vec<Product>) -> *mut Self {
        let len = products.len() as u32;
        let items = if products.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_products: Box<[FfiProduct]> =
                products.into_iter().map(FfiProduct::from_core).collect();
            Box::into_raw(ffi_products) as *mut FfiProduct
        };
        let ffi_list = Box::new(FfiProductList { items, len });
        Self::ok(FfiDataTag::ProductList, Box::into_raw(ffi_list) as *mut c_void)
    }

    /// Build a success result with no data payload (e.g. delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Decode(_) => FfiErrorCode::Decode,
            ApiError::UnexpectedFormat(_) => FfiErrorCode::UnexpectedFormat,
            ApiError::EndpointNotFound => FfiErrorCode::EndpointNotFound,
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::Api { .. } => FfiErrorCode::Api,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
        };
        Self::error(code, err.status().unwrap_or(0), err.to_string())
    }

    /// Build an error result from a rejected form.
    pub(crate) fn from_validation(err: ValidationError) -> *mut Self {
        Self::error(FfiErrorCode::Validation, 0, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}

// ---------------------------------------------------------------------------
// Release helpers
// ---------------------------------------------------------------------------

/// Free a C string produced by [`c_string`]. Null is ignored.
///
/// # Safety
/// `s` must be null or come from `CString::into_raw` and not be freed twice.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free the C-string fields of an `FfiProduct` (but not the struct itself).
///
/// # Safety
/// All pointer fields must be null or owned by this library.
pub(crate) unsafe fn free_ffi_product_fields(product: &FfiProduct) {
    unsafe {
        free_c_string(product.id);
        free_c_string(product.name);
        free_c_string(product.registered_at);
        free_c_string(product.formatted_date);
    }
}
