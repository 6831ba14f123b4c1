//! Web form and upload endpoint for generating customer decks.

use actix_web::web;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod templates_structs;
pub mod upload;

pub use config::{Config, Settings};
pub use errors::AppError;

/// Path the form posts to.
pub const GENERATE_PATH: &str = "/api/generate";

/// File name announced in the generation response.
pub const ATTACHMENT_NAME: &str = "generated.pptx";

/// Register the application's routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::page::index))
        .route(GENERATE_PATH, web::post().to(handlers::generate::generate));
}
