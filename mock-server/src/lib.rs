use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Path prefix the API is mounted under.
pub const API_PREFIX: &str = "/api";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    pub precio: f64,
    pub existencia: i64,
    #[serde(rename = "fechaRegistro")]
    pub fecha_registro: String,
}

#[derive(Deserialize)]
pub struct ProductoInput {
    pub nombre: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub existencia: i64,
}

/// Switches for server behaviors that differ between real deployments.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockOptions {
    /// Answer PUT with 200 and the stored record instead of 204.
    pub echo_updates: bool,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    productos: BTreeMap<i64, Producto>,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Store>>,
    options: MockOptions,
}

pub fn app() -> Router {
    app_with(MockOptions::default())
}

pub fn app_with(options: MockOptions) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        options,
    };
    let api = Router::new()
        .route("/Productos", get(list_productos).post(create_producto))
        .route(
            "/Productos/{id}",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
        .with_state(state);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockOptions::default()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn list_productos(State(state): State<AppState>) -> Json<Vec<Producto>> {
    let store = state.db.read().await;
    Json(store.productos.values().cloned().collect())
}

async fn create_producto(
    State(state): State<AppState>,
    Json(input): Json<ProductoInput>,
) -> (StatusCode, Json<Producto>) {
    let mut store = state.db.write().await;
    store.next_id += 1;
    let producto = Producto {
        id: store.next_id,
        nombre: input.nombre,
        precio: input.precio,
        existencia: input.existencia,
        fecha_registro: now(),
    };
    store.productos.insert(producto.id, producto.clone());
    info!(id = producto.id, nombre = %producto.nombre, "created producto");
    (StatusCode::CREATED, Json(producto))
}

async fn get_producto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Producto>, StatusCode> {
    let store = state.db.read().await;
    store.productos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_producto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProductoInput>,
) -> Result<Response, StatusCode> {
    let mut store = state.db.write().await;
    let producto = store.productos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    producto.nombre = input.nombre;
    producto.precio = input.precio;
    producto.existencia = input.existencia;
    info!(id, "updated producto");
    if state.options.echo_updates {
        Ok(Json(producto.clone()).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn delete_producto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    let removed = store.productos.remove(&id);
    if removed.is_some() {
        info!(id, "deleted producto");
    }
    removed.map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
