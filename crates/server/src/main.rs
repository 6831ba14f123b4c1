use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use deckgen_server::{configure, handlers, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // .env must be loaded before clap reads environment fallbacks
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let settings = web::Data::new(config.settings());

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!(
        "Uploads limited to {} bytes; downloads saved as {}",
        settings.max_upload_bytes,
        settings.download_name
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(settings.clone())
            .configure(configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
