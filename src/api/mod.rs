// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthenticatedUser,
    models::{
        CapstoneProject, ForgotPasswordRequest, Links, MessageResponse, ProfileCreate,
        ProfilePublic, ProfileResponse, ProfileUpdate, TokenResponse, UserAuth,
    },
    state::AppState,
};

pub mod auth;
pub mod docs;
pub mod health;
pub mod profile;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password));

    let own_profile = post(profile::create_profile)
        .put(profile::update_profile)
        .delete(profile::delete_profile);

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/profile/", own_profile.clone())
        // Same handlers without the trailing slash.
        .route("/profile", own_profile)
        .route("/profile/me/current", get(profile::get_my_profile))
        .route("/profile/{username}", get(profile::get_public_profile));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/redoc", get(docs::redoc))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url(docs::OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors_layer(cors_origins)),
        )
}

/// CORS for the configured frontends. Credentials are allowed, so origins
/// and headers are listed or mirrored rather than wildcarded.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
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
        .allow_headers(AllowHeaders::mirror_request())
}

/// Registers the `bearer` scheme referenced by the protected profile routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "StudentLink API", description = "Backend for the StudentLink link-in-bio app"),
    paths(
        health::root,
        health::health,
        auth::signup,
        auth::login,
        auth::logout,
        auth::forgot_password,
        profile::get_public_profile,
        profile::get_my_profile,
        profile::create_profile,
        profile::update_profile,
        profile::delete_profile
    ),
    components(
        schemas(
            AuthenticatedUser,
            CapstoneProject,
            ForgotPasswordRequest,
            Links,
            MessageResponse,
            ProfileCreate,
            ProfilePublic,
            ProfileResponse,
            ProfileUpdate,
            TokenResponse,
            UserAuth,
            health::HealthResponse,
            health::WelcomeResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and service banner"),
        (name = "Authentication", description = "Supabase sign-up, login and password reset"),
        (name = "Profile", description = "Student profile pages")
    )
)]
struct ApiDoc;
