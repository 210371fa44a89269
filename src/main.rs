use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use linkvault::api::jwt::JwtService;
use linkvault::api::routes;
use linkvault::config::AppConfig;
use linkvault::services::{AuthService, MappingService};
use linkvault::storage::StorageFactory;
use linkvault::system::cleaner::start_revocation_cleaner;
use linkvault::system::logging::init_logging;
use linkvault::utils::generate_secure_token;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    init_logging(&config.logging);

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    info!("Using storage backend: {}", storage.backend_name().await);

    let jwt_secret = if config.auth.jwt_secret.is_empty() {
        warn!("JWT secret not configured, generating a random one (tokens will not survive a restart)");
        generate_secure_token(32)
    } else {
        config.auth.jwt_secret.clone()
    };

    let auth_service = Arc::new(AuthService::new(
        storage.clone(),
        JwtService::new(&jwt_secret, config.token_validity()),
    ));
    let mapping_service = Arc::new(MappingService::new(
        storage.clone(),
        config.features.compat_alias_probe,
    ));

    start_revocation_cleaner(
        storage.clone(),
        Duration::from_secs(config.auth.cleaner_interval_seconds),
    );

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_config.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(mapping_service.clone()))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
