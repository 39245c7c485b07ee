use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockOptions, Producto};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::ACCEPT, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_productos_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/Productos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let productos: Vec<Producto> = body_json(resp).await;
    assert!(productos.is_empty());
}

#[tokio::test]
async fn collection_path_is_case_sensitive() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/productos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unprefixed_path_is_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/Productos"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_producto_returns_201_with_id_and_fecha() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/Productos",
            r#"{"nombre":"Taza","precio":4.5,"existencia":10}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let producto: Producto = body_json(resp).await;
    assert_eq!(producto.id, 1);
    assert_eq!(producto.nombre, "Taza");
    assert_eq!(producto.precio, 4.5);
    assert_eq!(producto.existencia, 10);
    assert!(!producto.fecha_registro.is_empty());
}

#[tokio::test]
async fn create_producto_missing_nombre_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/Productos", r#"{"precio":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_producto_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/Productos/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_producto_non_numeric_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/Productos/abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_producto_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/Productos/1",
            r#"{"nombre":"Nada","precio":1,"existencia":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_producto_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/Productos/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/Productos",
            r#"{"nombre":"Silla","precio":89.9,"existencia":4}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Producto = body_json(resp).await;
    let id = created.id;

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/Productos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let productos: Vec<Producto> = body_json(resp).await;
    assert_eq!(productos, vec![created.clone()]);

    // update: 204 with no body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/Productos/{id}"),
            r#"{"nombre":"Silla gamer","precio":120.0,"existencia":2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get reflects the update, fecha unchanged
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/Productos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Producto = body_json(resp).await;
    assert_eq!(fetched.nombre, "Silla gamer");
    assert_eq!(fetched.existencia, 2);
    assert_eq!(fetched.fecha_registro, created.fecha_registro);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/Productos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/Productos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn echo_updates_returns_record() {
    use tower::Service;

    let mut app = app_with(MockOptions { echo_updates: true }).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/Productos",
            r#"{"nombre":"Mesa","precio":300,"existencia":1}"#,
        ))
        .await
        .unwrap();
    let created: Producto = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/Productos/{}", created.id),
            r#"{"nombre":"Mesa plegable","precio":280,"existencia":1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Producto = body_json(resp).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.nombre, "Mesa plegable");
    assert_eq!(updated.precio, 280.0);
}
