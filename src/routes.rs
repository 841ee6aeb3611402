use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router with global middleware
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Public
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
        .merge(users_public_routes())
        // Protected
        .merge(users_protected_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config))
                .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes)),
        )
        .with_state(state)
}

fn users_public_routes() -> Router<AppState> {
    use public::users;

    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/verify/:token", get(users::verify_email))
        .route(users::VERIFICATION_SUCCESS_PATH, get(users::verification_success))
        .route(users::VERIFICATION_FAILED_PATH, get(users::verification_failed))
        .route("/users/password-reset", post(users::password_reset))
        .route(users::PASSWORD_RESET_DONE_PATH, get(users::password_reset_done))
        .route(users::PASSWORD_RESET_FAILED_PATH, get(users::password_reset_failed))
        .route("/users/login", post(users::login))
}

fn users_protected_routes(state: AppState) -> Router<AppState> {
    use protected::users;

    Router::new()
        .route(
            "/users/profile",
            get(users::profile_get)
                .put(users::profile_update)
                .patch(users::profile_update),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        // No allowed origins: browsers reject every cross-origin request
        return CorsLayer::new();
    }
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
