use actix_web::HttpResponse;

pub mod generate;
pub mod page;

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Not Found")
}
