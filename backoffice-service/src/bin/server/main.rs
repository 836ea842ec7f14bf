use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use backoffice_service::config::Config;
use backoffice_service::domain::auth::service::AuthService;
use backoffice_service::domain::auth::service::AuthSettings;
use backoffice_service::domain::customer::service::CustomerService;
use backoffice_service::domain::product::service::ProductService;
use backoffice_service::inbound::http::router::create_router;
use backoffice_service::outbound::google::GoogleTokeninfoVerifier;
use backoffice_service::outbound::notify::email::SmtpMailSender;
use backoffice_service::outbound::notify::sms::TwilioSmsSender;
use backoffice_service::outbound::repositories::PostgresPasswordResetRepository;
use backoffice_service::outbound::repositories::PostgresProductRepository;
use backoffice_service::outbound::repositories::PostgresTokenBlacklistRepository;
use backoffice_service::outbound::repositories::PostgresUserRepository;
use backoffice_service::outbound::repositories::PostgresVerificationCodeRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "backoffice-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        smtp_host = %config.smtp.host,
        google_configured = config.google.client_id.is_some(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 10,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let code_repository = Arc::new(PostgresVerificationCodeRepository::new(pg_pool.clone()));
    let reset_repository = Arc::new(PostgresPasswordResetRepository::new(pg_pool.clone()));
    let blacklist_repository = Arc::new(PostgresTokenBlacklistRepository::new(pg_pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pg_pool.clone()));

    let mailer = Arc::new(SmtpMailSender::new(&config.smtp)?);
    let sms = Arc::new(TwilioSmsSender::new(&config.twilio, http_client.clone()));
    let google = Arc::new(GoogleTokeninfoVerifier::new(
        config.google.client_id.clone(),
        http_client,
    ));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        code_repository,
        reset_repository,
        blacklist_repository,
        authenticator,
        mailer,
        sms,
        google,
        AuthSettings {
            token_ttl_hours: config.jwt.expiration_hours,
            code_ttl_minutes: config.auth.code_ttl_minutes,
            reset_ttl_minutes: config.auth.reset_ttl_minutes,
        },
    ));
    let customer_service = Arc::new(CustomerService::new(Arc::clone(&user_repository)));
    let product_service = Arc::new(ProductService::new(product_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, customer_service, product_service, pg_pool);
    axum::serve(http_listener, application).await?;

    Ok(())
}
