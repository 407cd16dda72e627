pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::state::AppState;

/// Full application: routes plus global middleware
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut app = router(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(config) {
        app = app.layer(cors);
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

/// Routes only. Protected routes are wrapped in the JWT layer here, once.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, system};

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{donation, order, receiver, shop, task};

    Router::new()
        // Owner-scoped
        .route("/task/", post(task::create))
        .route("/tasks/", get(task::list))
        .route("/donate/", post(donation::create))
        .route("/donations/", get(donation::list))
        // Visible to every authenticated user
        .route("/shop/donate/", post(shop::create))
        .route("/shop/donations/", get(shop::list))
        .route("/admin/receiver/", post(receiver::create))
        .route("/admin/receivers/", get(receiver::list))
        // Orders
        .route("/orders/", post(order::place))
        .route("/orders/:id/", get(order::status))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.environment == Environment::Development {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
