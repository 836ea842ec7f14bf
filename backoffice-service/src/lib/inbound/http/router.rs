use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::customers;
use super::handlers::google_login::google_login;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::one_time_code;
use super::handlers::password_reset;
use super::handlers::products;
use super::handlers::register::register;
use super::handlers::session;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::service::AuthService;
use crate::domain::customer::service::CustomerService;
use crate::domain::product::service::ProductService;
use crate::outbound::repositories::PostgresPasswordResetRepository;
use crate::outbound::repositories::PostgresProductRepository;
use crate::outbound::repositories::PostgresTokenBlacklistRepository;
use crate::outbound::repositories::PostgresUserRepository;
use crate::outbound::repositories::PostgresVerificationCodeRepository;

pub type BackofficeAuthService = AuthService<
    PostgresUserRepository,
    PostgresVerificationCodeRepository,
    PostgresPasswordResetRepository,
    PostgresTokenBlacklistRepository,
>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<BackofficeAuthService>,
    pub customer_service: Arc<CustomerService<PostgresUserRepository>>,
    pub product_service: Arc<ProductService<PostgresProductRepository>>,
    pub pool: PgPool,
}

pub fn create_router(
    auth_service: Arc<BackofficeAuthService>,
    customer_service: Arc<CustomerService<PostgresUserRepository>>,
    product_service: Arc<ProductService<PostgresProductRepository>>,
    pool: PgPool,
) -> Router {
    let state = AppState {
        auth_service,
        customer_service,
        product_service,
        pool,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/auth/google", post(google_login))
        .route(
            "/api/auth/email/request-code",
            post(one_time_code::request_email_code),
        )
        .route(
            "/api/auth/sms/request-code",
            post(one_time_code::request_sms_code),
        )
        .route("/api/auth/verify-code", post(one_time_code::verify_code))
        .route(
            "/api/auth/forgot-password",
            post(password_reset::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(password_reset::reset_password),
        );

    let protected_routes = Router::new()
        .route("/api/verify", get(session::verify_session))
        .route("/api/auth/logout", post(session::logout))
        .route("/api/customers", get(customers::list_customers))
        .route(
            "/api/customers/stats/summary",
            get(customers::customer_stats),
        )
        .route("/api/customers/:customer_id", get(customers::get_customer))
        .route(
            "/api/customers/:customer_id",
            put(customers::update_customer),
        )
        .route(
            "/api/customers/:customer_id",
            delete(customers::delete_customer),
        )
        .route("/api/products", get(products::list_products))
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/stats/inventory",
            get(products::inventory_stats),
        )
        .route("/api/products/:product_id", get(products::get_product))
        .route("/api/products/:product_id", put(products::update_product))
        .route(
            "/api/products/:product_id",
            delete(products::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
