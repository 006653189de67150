use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Json};
use packhub::manifest::render::html_tag;
use packhub::manifest::{AssetDescriptor, BundleRef, Extensions, RequestScope, render_bundle};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tokio::task::spawn_blocking;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
    configs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BundleQuery {
    /// Whitespace-separated extension filter, e.g. `.js .css`.
    ext: Option<String>,
}

impl BundleQuery {
    fn extensions(&self) -> Option<Extensions> {
        self.ext.as_deref().map(str::trim).filter(|raw| !raw.is_empty()).map(Extensions::parse)
    }
}

/// Installs a fresh [`RequestScope`] into the request extensions.
pub(crate) async fn request_scope(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(Arc::new(state.request_scope()));
    next.run(request).await
}

pub(crate) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
        configs: state.registry.names().map(str::to_owned).collect(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

/// `GET /webpack/{reference}`: asset descriptors as JSON.
pub(crate) async fn bundle(
    Extension(scope): Extension<Arc<RequestScope>>,
    Path(reference): Path<String>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<Vec<AssetDescriptor>>, ApiError> {
    let reference = BundleRef::parse(&reference);
    let extensions = query.extensions();

    let assets = spawn_blocking(move || {
        scope.webpack(&reference.config)?.get_bundle(&reference.bundle, extensions.as_ref())
    })
    .await??;

    Ok(Json(assets))
}

/// `GET /webpack/{reference}/tags`: `<script>`/`<link>` tags for the bundle.
pub(crate) async fn bundle_tags(
    Extension(scope): Extension<Arc<RequestScope>>,
    Path(reference): Path<String>,
    Query(query): Query<BundleQuery>,
) -> Result<Html<String>, ApiError> {
    let reference = BundleRef::parse(&reference);
    let extensions = query.extensions();

    let html = spawn_blocking(move || {
        render_bundle(&scope, &reference, extensions.as_ref(), html_tag)
    })
    .await??;

    Ok(Html(html))
}
