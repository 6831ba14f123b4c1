//! Form page tests: the page renders, carries the configured endpoint and
//! download name, and its script only downloads after a successful response.

#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use deckgen_server::Settings;

async fn fetch_page(settings: Settings) -> String {
    let app = test_app!(settings);
    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_form_has_all_fields() {
    let html = fetch_page(Settings::default()).await;

    assert!(html.contains("PowerPoint Generator"));
    assert!(html.contains(r#"id="templateFile""#));
    assert!(html.contains(r#"id="customerName""#));
    assert!(html.contains(r#"id="image""#));
    assert!(html.contains("{CUSTOMER}"));
    assert!(html.contains("Template file is required"));
    assert!(html.contains("Customer name is required"));
    assert!(html.contains(r#"data-endpoint="/api/generate""#));
    assert!(html.contains(r#"data-download-name="generated-document.pdf""#));
}

#[actix_web::test]
async fn test_download_name_is_configurable_and_escaped() {
    let html = fetch_page(Settings {
        download_name: r#"deck"<x>.pptx"#.to_string(),
        ..Settings::default()
    })
    .await;

    assert!(html.contains("data-download-name=\"deck&#34;&#60;x&#62;.pptx\"")
        || html.contains("data-download-name=\"deck&quot;&lt;x&gt;.pptx\""));
    assert!(!html.contains(r#"deck"<x>"#));
}

#[actix_web::test]
async fn test_script_downloads_only_after_ok_and_revokes_url() {
    let html = fetch_page(Settings::default()).await;

    let ok_check = html.find("if (!response.ok)").expect("response check");
    let create = html.find("createObjectURL").expect("object URL creation");
    let click = html.find("link.click()").expect("download trigger");
    let revoke = html.find("revokeObjectURL").expect("object URL revocation");

    // The download helper is defined earlier but only invoked after the check.
    let save_call = html.find("saveBlob(await response.blob())").expect("save call");
    assert!(ok_check < save_call);
    assert!(create < click && click < revoke);

    assert!(html.contains("alert('Failed to generate document')"));
    assert!(html.contains("finally"));
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
