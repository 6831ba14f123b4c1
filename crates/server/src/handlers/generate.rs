use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use deckgen_pptx::{PptxWriter, PPTX_MIME};

use crate::config::Settings;
use crate::errors::AppError;
use crate::upload::read_generation_request;
use crate::ATTACHMENT_NAME;

/// POST /api/generate: build a one-slide deck from the submitted form.
///
/// The uploaded template is buffered and inspected but not copied into the
/// result; the deck is always built fresh. Every failure is reported as the
/// same 500 response.
pub async fn generate(
    req: HttpRequest,
    payload: web::Payload,
    settings: web::Data<Settings>,
) -> Result<HttpResponse, AppError> {
    // Built by hand so a missing or malformed Content-Type fails like any other input error.
    let multipart = Multipart::new(req.headers(), payload);
    let request = read_generation_request(multipart, settings.max_upload_bytes).await?;

    match request.template_format() {
        Some(format) => log::debug!("Template is {:?}, {} bytes", format, request.template.len()),
        None => log::debug!("Template format unknown, {} bytes", request.template.len()),
    }

    let has_image = request.image.is_some();
    let bytes = web::block(move || -> deckgen_core::Result<Vec<u8>> {
        let presentation = request.build_presentation()?;
        PptxWriter::new().to_bytes(&presentation)
    })
    .await??;

    log::info!(
        "Generated deck ({} bytes, image: {})",
        bytes.len(),
        if has_image { "yes" } else { "no" }
    );

    Ok(HttpResponse::Ok()
        .content_type(PPTX_MIME)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", ATTACHMENT_NAME),
        ))
        .body(bytes))
}
