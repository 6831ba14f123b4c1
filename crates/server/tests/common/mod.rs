//! Shared helpers for driving the server in tests.
//!
//! - `test_app!()` - the full route table with default or given settings
//! - `MultipartBody` - builds multipart/form-data request bodies by hand

#![allow(dead_code)]

use actix_web::test;

pub const BOUNDARY: &str = "----deckgen-test-boundary";

/// Smallest valid PNG signature plus a few bytes.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

pub const TEMPLATE_BYTES: &[u8] = b"PK\x03\x04 not really a deck";

/// Initialise the full application, optionally with custom `Settings`.
macro_rules! test_app {
    () => {
        test_app!(deckgen_server::Settings::default())
    };
    ($settings:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($settings))
                .configure(deckgen_server::configure)
                .default_service(actix_web::web::to(deckgen_server::handlers::not_found)),
        )
        .await
    };
}

/// Hand-rolled multipart/form-data body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Content-Type header value to send with this body.
    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A POST to the generation endpoint carrying `body`.
pub fn generate_request(body: MultipartBody) -> test::TestRequest {
    test::TestRequest::post()
        .uri(deckgen_server::GENERATE_PATH)
        .insert_header(("content-type", MultipartBody::content_type()))
        .set_payload(body.finish())
}
