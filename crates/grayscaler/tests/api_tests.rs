//! Integration tests for the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use grayscaler::{create_router, AppState};
use grayscaler_core::Config;
use image::{DynamicImage, ImageFormat, Pixel, Rgb, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use tower::ServiceExt;

const BOUNDARY: &str = "grayscaler-test-boundary";

/// One multipart part: field name, optional filename, bytes.
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.static_dir = root.join("static");
    config.storage.upload_dir = root.join("static/uploads");
    config.storage.output_dir = root.join("static/output");
    config
}

fn test_router(root: &Path) -> axum::Router {
    let config = test_config(root);
    config.ensure_directories().unwrap();
    create_router(AppState::new(config))
}

fn png(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(10, 10, Rgb(color));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match filename {
            Some(filename) => {
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(router: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_process(router: &axum::Router, parts: &[Part<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/process")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn output_count(root: &Path) -> usize {
    std::fs::read_dir(root.join("static/output")).unwrap().count()
}

#[tokio::test]
async fn test_root_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let (status, json) = get_json(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("Welcome"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let (status, json) = get_json(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "API is running");
}

#[tokio::test]
async fn test_process_red_pair_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let red = png([255, 0, 0]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("red.png"), red.as_slice()),
            ("dest_image", Some("red.png"), red.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let source = json["source_result"].as_str().unwrap().to_string();
    let dest = json["dest_result"].as_str().unwrap().to_string();
    assert!(source.starts_with("/static/output/source_") && source.ends_with(".png"));
    assert!(dest.starts_with("/static/output/dest_") && dest.ends_with(".png"));
    assert_ne!(source, dest);

    let expected = Rgb([255u8, 0, 0]).to_luma().0[0];
    for url in [&source, &dest] {
        let request = Request::builder().uri(url.as_str()).body(Body::empty()).unwrap();
        let (status, bytes) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (10, 10));
        for pixel in decoded.pixels() {
            assert_eq!(pixel.0, [expected, expected, expected]);
        }
    }
}

#[tokio::test]
async fn test_repeated_pair_returns_cached_locations() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let a = png([12, 34, 56]);
    let b = png([200, 100, 50]);
    let parts: [Part<'_>; 2] = [
        ("source_image", Some("a.png"), a.as_slice()),
        ("dest_image", Some("b.jpg"), b.as_slice()),
    ];

    let (status, first) = post_process(&router, &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(output_count(dir.path()), 2);

    let (status, second) = post_process(&router, &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(output_count(dir.path()), 2);
}

#[tokio::test]
async fn test_swapped_roles_are_not_a_cache_hit() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let a = png([0, 0, 255]);
    let b = png([0, 255, 0]);

    let (_, forward) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), a.as_slice()),
            ("dest_image", Some("b.png"), b.as_slice()),
        ],
    )
    .await;
    let (status, swapped) = post_process(
        &router,
        &[
            ("source_image", Some("b.png"), b.as_slice()),
            ("dest_image", Some("a.png"), a.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(forward["source_result"], swapped["source_result"]);
    assert_ne!(forward["dest_result"], swapped["dest_result"]);
    assert_eq!(output_count(dir.path()), 4);
}

#[tokio::test]
async fn test_invalid_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let img = png([1, 1, 1]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("a.txt"), img.as_slice()),
            ("dest_image", Some("b.png"), img.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Invalid file format. Only PNG, JPG, JPEG allowed"
    );
    assert_eq!(output_count(dir.path()), 0);
}

#[tokio::test]
async fn test_missing_filename_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let img = png([1, 1, 1]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), img.as_slice()),
            ("dest_image", None, img.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file selected");
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let img = png([1, 1, 1]);

    let (status, json) = post_process(&router, &[("source_image", Some("a.png"), img.as_slice())]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file selected");
}

#[tokio::test]
async fn test_corrupt_image_is_a_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());
    let img = png([1, 1, 1]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), img.as_slice()),
            ("dest_image", Some("b.png"), &b"not really a png"[..]),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode image"));
    assert_eq!(output_count(dir.path()), 0);

    // Failure was not memoized: a corrected retry processes normally
    let (status, _) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), img.as_slice()),
            ("dest_image", Some("b.png"), img.as_slice()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_storage_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(&config.storage.static_dir).unwrap();
    std::fs::write(&config.storage.output_dir, b"blocker").unwrap();
    let router = create_router(AppState::new(config));
    let img = png([9, 9, 9]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), img.as_slice()),
            ("dest_image", Some("b.png"), img.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("output directory"));
}

#[tokio::test]
async fn test_non_multipart_body_gets_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(dir.path());

    let request = Request::builder()
        .method("POST")
        .uri("/process")
        .header("Content-Type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&router, request).await;

    assert!(status.is_client_error());
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.limits.max_upload_size_mb = 1;
    config.ensure_directories().unwrap();
    let router = create_router(AppState::new(config));
    let big = vec![0u8; 2 * 1024 * 1024];
    let img = png([1, 1, 1]);

    let (status, json) = post_process(
        &router,
        &[
            ("source_image", Some("a.png"), big.as_slice()),
            ("dest_image", Some("b.png"), img.as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].is_string());
    assert_eq!(output_count(dir.path()), 0);
}
