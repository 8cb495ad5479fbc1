// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, community, interaction, profile},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, account, posts, comments, users).
/// * Protects every write behind the bearer-token middleware.
/// * Applies global middleware (Trace, CORS) and injects the shared state.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", post(auth::verify))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .layer(require_auth.clone()),
        );

    let account_routes = Router::new()
        .route(
            "/",
            get(profile::get_account).put(profile::update_account),
        )
        .layer(require_auth.clone());

    let post_routes = Router::new()
        .route("/", get(community::list_posts))
        .route("/count", get(community::count_posts))
        .route("/{id}", get(community::get_post))
        .route("/{id}/comments", get(interaction::list_post_comments))
        // Protected post routes
        .merge(
            Router::new()
                .route("/", post(community::create_post))
                .route("/{id}/comments", post(interaction::create_post_comment))
                .layer(require_auth.clone()),
        );

    let comment_routes = Router::new()
        .route("/count", get(interaction::count_comments))
        .route("/{id}", get(interaction::get_comment))
        .route("/{id}/replies", get(interaction::list_replies))
        .merge(
            Router::new()
                .route("/{id}/replies", post(interaction::create_reply))
                .layer(require_auth),
        );

    let user_routes = Router::new()
        .route("/{username}/posts", get(profile::list_user_posts))
        .route("/{username}/comments", get(profile::list_user_comments));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/account", account_routes)
        .nest("/api/posts", post_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/users", user_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
