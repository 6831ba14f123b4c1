use actix_web::{web, HttpResponse};

use crate::config::Settings;
use crate::errors::{render, AppError};
use crate::templates_structs::IndexTemplate;
use crate::GENERATE_PATH;

/// GET /: the upload form.
pub async fn index(settings: web::Data<Settings>) -> Result<HttpResponse, AppError> {
    let tmpl = IndexTemplate {
        endpoint: GENERATE_PATH,
        download_name: &settings.download_name,
    };
    render(tmpl)
}
