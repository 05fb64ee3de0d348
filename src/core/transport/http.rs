//! HTTP transport implementation.
//!
//! Routes every catalog endpoint to the [`GatewayServer`] and renders its
//! envelopes and errors as JSON. Any response is pretty-printed when the
//! request carries a `pretty` query parameter.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, RawQuery, Request, State, rejection::PathRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::{GatewayError, GatewayServer};
use crate::domains::envelope::Message;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the router for `server`.
    pub fn router(&self, server: GatewayServer) -> Router {
        let mut app = Router::new()
            .route("/", get(root_handler))
            .route("/ping", get(ping_handler))
            .route("/home", get(home_handler))
            .route("/search", get(search_handler))
            .route("/album", get(missing_album_handler))
            .route("/album/", get(missing_album_handler))
            .route("/album/{id}", get(album_handler))
            .route("/song", get(missing_song_handler))
            .route("/song/", get(missing_song_handler))
            .route("/song/{id}", get(song_handler))
            .fallback(not_found_handler)
            .with_state(server)
            .layer(middleware::from_fn(pretty_json))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: GatewayServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - {}", self.config.description());
        info!("  → GET /            GET /ping");
        info!("  → GET /home        GET /search?q=");
        info!("  → GET /album/{{id}}  GET /song/{{id}}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        }
        (status, Json(Message::new(self.to_string()))).into_response()
    }
}

/// Raw `Cookie` header(s) of the request, joined as one header value.
///
/// Values are passed through as bytes, so non-ASCII cookies survive.
fn cookies(headers: &HeaderMap) -> Option<HeaderValue> {
    let mut values = headers.get_all(header::COOKIE).iter();
    let first = values.next()?;

    let mut joined = first.as_bytes().to_vec();
    let mut merged = false;
    for value in values {
        joined.extend_from_slice(b"; ");
        joined.extend_from_slice(value.as_bytes());
        merged = true;
    }

    if merged {
        HeaderValue::from_bytes(&joined).ok()
    } else {
        Some(first.clone())
    }
}

/// First `q` parameter of the query string. Repeated keys are allowed.
fn search_query(query: Option<&str>) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query?)
        .ok()?
        .into_iter()
        .find_map(|(key, value)| (key == "q").then_some(value))
}

/// Map a path extraction failure to the JSON error shape.
fn path_id(id: Result<Path<String>, PathRejection>) -> Result<String, GatewayError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))
}

async fn root_handler() -> Json<Message> {
    Json(Message::new("Hello World"))
}

async fn ping_handler(State(server): State<GatewayServer>) -> impl IntoResponse {
    Json(server.ping())
}

async fn home_handler(
    State(server): State<GatewayServer>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    Ok(Json(server.home(cookies(&headers)).await?))
}

async fn search_handler(
    State(server): State<GatewayServer>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, GatewayError> {
    let q = search_query(query.as_deref());
    Ok(Json(server.search(cookies(&headers), q.as_deref()).await?))
}

async fn album_handler(
    State(server): State<GatewayServer>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = path_id(id)?;
    Ok(Json(server.album(cookies(&headers), &id).await?))
}

async fn song_handler(
    State(server): State<GatewayServer>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = path_id(id)?;
    Ok(Json(server.song(cookies(&headers), &id).await?))
}

async fn missing_album_handler() -> GatewayError {
    GatewayError::MissingId("album")
}

async fn missing_song_handler() -> GatewayError {
    GatewayError::MissingId("song")
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(Message::new("Not Found")))
}

/// Re-render JSON responses with indentation when `?pretty` is present.
async fn pretty_json(request: Request, next: Next) -> Response {
    let pretty = wants_pretty(request.uri().query());
    let response = next.run(request).await;

    if !pretty || !is_json(response.headers()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Failed to buffer response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let rendered = serde_json::from_slice::<serde_json::Value>(&bytes)
        .and_then(|value| serde_json::to_vec_pretty(&value))
        .map(Bytes::from)
        .unwrap_or(bytes);

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(rendered))
}

fn wants_pretty(query: Option<&str>) -> bool {
    let Some(query) = query else {
        return false;
    };
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.iter().any(|(key, _)| key == "pretty"))
        .unwrap_or(false)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
