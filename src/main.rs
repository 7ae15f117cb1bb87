mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{mongo_store::MongoStore, MongoDB, Store};
use crate::services::{LogMailer, Mailer, SmtpMailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Goals Service...");
    log::info!("📊 Database: {}", config.database_name);

    // Initialize MongoDB connection
    let db = MongoDB::new(
        &config.database_url,
        &config.database_name,
        config.one_time_token_ttl_minutes,
    )
    .await
    .map_err(|e| {
        log::error!("❌ Failed to connect to MongoDB: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn Store> = Arc::new(MongoStore::new(db));

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::new(smtp).map_err(|e| {
                log::error!("❌ Invalid SMTP configuration: {}", e);
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
            })?;
            log::info!("📧 SMTP relay: {}:{}", smtp.host, smtp.port);
            Arc::new(mailer)
        }
        None => {
            log::warn!("⚠️  EMAIL_USER/EMAIL_PASS not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let store_data = web::Data::from(store);
    let mailer_data = web::Data::from(mailer);
    let config_data = web::Data::new(config.clone());

    let bind = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", bind.0, bind.1);
    log::info!("📚 Swagger UI available at: {}/swagger-ui/", config.public_url);
    log::info!("📄 OpenAPI spec at: {}/api-docs/openapi.json", config.public_url);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(mailer_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(|cfg| api::configure(cfg, &config_data))
    })
    .bind(bind)?
    .run()
    .await
}
