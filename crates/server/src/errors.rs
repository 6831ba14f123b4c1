use actix_multipart::MultipartError;
use actix_web::error::BlockingError;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// The only message a failed generation ever reports to the client.
pub const GENERATION_FAILED: &str = "Failed to process document";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Generation error: {0}")]
    Generation(#[from] deckgen_core::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Upload exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Worker pool error: {0}")]
    Blocking(#[from] BlockingError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        log::error!("{self}");
        HttpResponse::InternalServerError().json(ErrorBody {
            error: GENERATION_FAILED,
        })
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: askama::Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_every_generation_error_is_the_same_500() {
        let errors = [
            AppError::Generation(deckgen_core::Error::MissingField("customerName".to_string())),
            AppError::PayloadTooLarge(10),
            AppError::Generation(deckgen_core::Error::XmlError("bad".to_string())),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            let resp = err.error_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = to_bytes(resp.into_body()).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json, serde_json::json!({ "error": "Failed to process document" }));
        }
    }
}
