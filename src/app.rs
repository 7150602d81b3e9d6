use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, chat};

/// Assemble the full router. Routes are listed in exactly one of the two
/// groups below; the route policy only decides which group the chat
/// endpoint and the user listing land in.
pub fn build_app(state: AppState) -> Router {
    let policy = state.config.routes.clone();

    let mut public = Router::new()
        .route("/user/signup", post(auth::handlers::signup))
        .route("/user/login", post(auth::handlers::login))
        .route("/user/logout", post(auth::handlers::logout));

    let mut protected =
        Router::new().route("/user/auth-status", get(auth::handlers::auth_status));

    if policy.public_user_listing {
        public = public.route("/user", get(auth::handlers::list_users));
    } else {
        protected = protected.route("/user", get(auth::handlers::list_users));
    }

    if policy.public_chat {
        public = public.route("/chats", post(chat::handlers::generate));
    } else {
        protected = protected.route("/chats", post(chat::handlers::generate));
    }

    let protected = protected.route_layer(from_fn_with_state(
        state.clone(),
        auth::middleware::require_session,
    ));

    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(public)
                .merge(protected)
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state.clone())
        .layer(CookieManagerLayer::new())
        .layer(cors_layer(&state.config.cors_allowed_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Allowlisted origins with credentials. The browser only sends the
/// session cookie cross-origin when the exact origin is echoed back, so a
/// wildcard is not an option here.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("PORT").unwrap_or_else(|_| "5000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
