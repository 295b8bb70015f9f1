use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, web, App, HttpServer};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use spendwise::auth::AuthSettings;
use spendwise::category::service::CategoryService;
use spendwise::config::Config;
use spendwise::openapi::ApiDoc;
use spendwise::store::{MemoryStore, PgStore, Store};
use spendwise::{configure_api, configure_auth};

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

async fn build_store(config: &Config) -> std::io::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(startup_error)?;
            store.migrate().await.map_err(startup_error)?;
            info!("Using PostgreSQL store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store, data will not persist");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {e}");
        startup_error(e)
    })?;

    let store = build_store(&config).await?;
    CategoryService::seed_defaults(store.as_ref())
        .await
        .map_err(startup_error)?;

    let store: web::Data<dyn Store> = web::Data::from(store);
    let auth_settings = web::Data::new(AuthSettings::new(
        config.jwt_secret.clone(),
        config.jwt_ttl_hours,
    ));
    let allowed_origins = config.allowed_origins.clone();

    // Configure rate limiting for auth endpoints
    let auth_governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
        .ok_or_else(|| startup_error("Failed to create rate limiter config"))?;

    info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();

        // Configure CORS
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|allowed| allowed == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Shared state
            .app_data(store.clone())
            .app_data(auth_settings.clone())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .configure(configure_api)
            // Auth endpoints with rate limiting (must be last to avoid catching all routes)
            .service(
                web::scope("")
                    .wrap(Governor::new(&auth_governor_config))
                    .configure(configure_auth),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
