use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use image_cropper::config::AppConfig;
use image_cropper::{AppState, create_app};
use serde_json::Value;
use std::io::Cursor;
use tower::ServiceExt;

const BOUNDARY: &str = "---------------------------123456789012345678901234567";

fn test_state(dir: &std::path::Path) -> AppState {
    let config = AppConfig {
        output_dir: dir.join("processed_images"),
        archive_path: dir.join("cropped_images.zip"),
        ..AppConfig::default()
    };
    AppState::new(config)
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn file_part(buf: &mut Vec<u8>, filename: &str, data: &[u8]) {
    buf.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n");
}

fn text_part(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
             {value}\r\n"
        )
        .as_bytes(),
    );
}

fn finish(mut buf: Vec<u8>) -> Vec<u8> {
    buf.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    buf
}

async fn post_multipart(app: axum::Router, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("non-JSON body ({e}): {:?}", String::from_utf8_lossy(&bytes)));
    (status, json)
}

async fn get_archive(app: axum::Router) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/archive")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    if status == StatusCode::OK {
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/zip"
        );
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("cropped_images.zip"), "{disposition}");
    }
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_crop_and_zip_flow() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    let app = create_app(state);

    let mut body = Vec::new();
    file_part(&mut body, "wide.png", &png_bytes(100, 100));
    text_part(&mut body, "name", "wide");
    text_part(
        &mut body,
        "crop",
        r#"{"left":10,"top":10,"right":60,"bottom":60}"#,
    );
    file_part(&mut body, "tall.png", &png_bytes(50, 40));
    text_part(&mut body, "name", "tall");
    let (status, json) = post_multipart(app.clone(), "/api/export/archive", finish(body)).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["saved"], 2);
    assert_eq!(json["results"][0]["width"], 50);
    assert_eq!(json["results"][0]["height"], 50);
    assert_eq!(json["archive"]["filename"], "cropped_images.zip");
    assert_eq!(json["archive"]["files"], 2);
    assert!(json["warning"].is_null());

    // Download the bundle and inspect it
    let (status, bytes) = get_archive(app).await;
    assert_eq!(status, StatusCode::OK);

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["tall.jpg", "wide.jpg"]);

    // Entries decode back to the reported dimensions
    use std::io::Read;
    let mut entry_bytes = Vec::new();
    archive
        .by_name("wide.jpg")
        .unwrap()
        .read_to_end(&mut entry_bytes)
        .unwrap();
    let cropped = image::load_from_memory(&entry_bytes).unwrap();
    assert_eq!((cropped.width(), cropped.height()), (50, 50));
}

#[tokio::test]
async fn test_full_frame_crop_end_to_end() {
    // The spec scenario: 100x100 photo.png, default name, full-frame crop
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let mut body = Vec::new();
    file_part(&mut body, "photo.png", &png_bytes(100, 100));
    text_part(
        &mut body,
        "crop",
        r#"{"left":0,"top":0,"right":100,"bottom":100}"#,
    );
    let (status, json) = post_multipart(app, "/api/export/archive", finish(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["status"], "saved");
    assert_eq!(json["results"][0]["width"], 100);
    assert_eq!(json["results"][0]["height"], 100);

    let saved = dir.path().join("processed_images").join("photo.jpg");
    let reopened = image::open(&saved).unwrap();
    assert_eq!((reopened.width(), reopened.height()), (100, 100));
}

#[tokio::test]
async fn test_invalid_crop_is_a_visible_per_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let mut body = Vec::new();
    file_part(&mut body, "photo.png", &png_bytes(40, 40));
    text_part(
        &mut body,
        "crop",
        r#"{"left":30,"top":0,"right":10,"bottom":40}"#,
    );
    let (status, json) = post_multipart(app, "/api/export/archive", finish(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["status"], "failed");
    let error = json["results"][0]["error"].as_str().unwrap();
    assert!(error.contains("invalid crop region"), "{error}");
    assert_eq!(json["warning"], "no images processed");
}

#[tokio::test]
async fn test_all_failing_batch_skips_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let mut body = Vec::new();
    file_part(&mut body, "a.png", b"garbage");
    file_part(&mut body, "b.png", b"more garbage");
    let (status, json) = post_multipart(app.clone(), "/api/export/archive", finish(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["saved"], 0);
    assert_eq!(json["warning"], "no images processed");
    assert!(json["archive"].is_null());

    // Nothing was bundled, so there is nothing to download
    let (status, _) = get_archive(app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archive_is_rebuilt_fresh_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let mut body = Vec::new();
    file_part(&mut body, "first.png", &png_bytes(8, 8));
    text_part(&mut body, "name", "first");
    let (status, _) = post_multipart(app.clone(), "/api/export/archive", finish(body)).await;
    assert_eq!(status, StatusCode::OK);

    let mut body = Vec::new();
    file_part(&mut body, "second.png", &png_bytes(8, 8));
    text_part(&mut body, "name", "second");
    let (status, _) = post_multipart(app.clone(), "/api/export/archive", finish(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = get_archive(app).await;
    assert_eq!(status, StatusCode::OK);

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0).unwrap().name(), "second.jpg");
}
