use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;
use std::time::Duration;

use subscription_api::{
    config::Config,
    external::PtsDirectory,
    handlers,
    services::{SubscriptionService, SubscriptionStore},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let directory = PtsDirectory::new(config.pts.clone()).map_err(|e| {
        log::error!("Failed to create operator directory client: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let subscription_service = SubscriptionService::new(
        SubscriptionStore::new(),
        Arc::new(directory),
        Duration::from_secs(config.pts.timeout_secs),
    )
    .with_max_concurrent_lookups(config.pts.max_concurrent_lookups);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(subscription_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/0.1").configure(handlers::subscription_config))
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive_secs))
    .client_request_timeout(Duration::from_secs(config.server.client_request_timeout_secs))
    .client_disconnect_timeout(Duration::from_secs(config.server.client_disconnect_timeout_secs))
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
