//! Reading the generation form out of a multipart body.

use actix_multipart::{Field, Multipart};
use deckgen_core::{Error, GenerationRequest, Upload};
use futures_util::TryStreamExt;

use crate::errors::AppError;

pub const TEMPLATE_FIELD: &str = "template";
pub const CUSTOMER_NAME_FIELD: &str = "customerName";
pub const IMAGE_FIELD: &str = "image";

/// Fields collected while walking the multipart stream. The first
/// occurrence of each field wins; unknown fields are drained and ignored.
#[derive(Debug, Default)]
struct FormFields {
    template: Option<Upload>,
    customer_name: Option<String>,
    image: Option<Upload>,
}

impl FormFields {
    fn into_request(self) -> Result<GenerationRequest, Error> {
        let template = self
            .template
            .ok_or_else(|| Error::MissingField(TEMPLATE_FIELD.to_string()))?;
        let customer_name = self
            .customer_name
            .ok_or_else(|| Error::MissingField(CUSTOMER_NAME_FIELD.to_string()))?;

        let request = GenerationRequest::new(template, customer_name);
        Ok(match self.image {
            Some(image) => request.with_image(image),
            None => request,
        })
    }
}

/// Buffer the whole form, refusing to hold more than `limit` bytes.
pub async fn read_generation_request(
    mut payload: Multipart,
    limit: usize,
) -> Result<GenerationRequest, AppError> {
    let mut fields = FormFields::default();
    let mut total = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let data = read_field(&mut field, &mut total, limit).await?;
        log::debug!("Received field '{}' ({} bytes)", name, data.len());

        match name.as_str() {
            TEMPLATE_FIELD if fields.template.is_none() => {
                fields.template = Some(to_upload(data, filename, content_type));
            }
            CUSTOMER_NAME_FIELD if fields.customer_name.is_none() => {
                let text = String::from_utf8(data).map_err(|_| {
                    Error::InvalidInput(format!("{} is not valid UTF-8", CUSTOMER_NAME_FIELD))
                })?;
                fields.customer_name = Some(text);
            }
            IMAGE_FIELD if fields.image.is_none() => {
                // An empty file input still submits a part with no name and no bytes.
                let unselected = data.is_empty() && filename.as_deref().unwrap_or_default().is_empty();
                if !unselected {
                    fields.image = Some(to_upload(data, filename, content_type));
                }
            }
            _ => {}
        }
    }

    Ok(fields.into_request()?)
}

async fn read_field(field: &mut Field, total: &mut usize, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        *total += chunk.len();
        if *total > limit {
            return Err(AppError::PayloadTooLarge(limit));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn to_upload(data: Vec<u8>, filename: Option<String>, content_type: Option<String>) -> Upload {
    let mut upload = Upload::new(data);
    upload.filename = filename;
    upload.content_type = content_type;
    upload
}
