use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::http::header;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) fn init(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/webpack/{reference}", get(handlers::bundle))
        .route("/webpack/{reference}/tags", get(handlers::bundle_tags));

    for mount in state.mounts.local() {
        let route = mount.route();
        let serve = ServeDir::new(&mount.dir);
        info!(%route, dir = %mount.dir.display(), max_age = ?mount.cache_max_age, "Mounting static view");

        router = match mount.cache_control() {
            Some(value) => router.nest_service(
                &route,
                SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, value).layer(serve),
            ),
            None => router.nest_service(&route, serve),
        };
    }

    router
        .layer(from_fn_with_state(state.clone(), handlers::request_scope))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
