use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use read_and_sign::lopdf::{dictionary, Document, Object, Stream};
use read_and_sign::{
    api, DocumentSigner, FixedClock, JsonFileStore, QuotaEnforcer, SigningService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestServer {
    pub dir: TempDir,
    pub router: Router,
}

impl TestServer {
    pub fn public_dir(&self) -> PathBuf {
        self.dir.path().join("public")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("signedDocuments")
    }

    pub fn activity_log(&self) -> PathBuf {
        self.dir.path().join("userLogs.json")
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
            .expect("output dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Router over a temp directory holding `public/sample.pdf`, with "today" fixed.
pub fn test_server(today: NaiveDate) -> TestServer {
    let dir = tempfile::tempdir().expect("temp dir");
    let public = dir.path().join("public");
    let output = dir.path().join("signedDocuments");
    std::fs::create_dir(&public).expect("public dir");
    std::fs::create_dir(&output).expect("output dir");
    std::fs::write(public.join("sample.pdf"), sample_pdf()).expect("sample pdf");

    let service = SigningService::new(
        QuotaEnforcer::new(JsonFileStore::new(dir.path().join("userLogs.json"))),
        DocumentSigner::new(public),
        output,
        FixedClock(today),
    );
    let router = api::build_router(Arc::new(service), 10 * 1024 * 1024);
    TestServer { dir, router }
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    (status, bytes.to_vec())
}

/// Payload as the signing form sends it.
pub fn save_payload(file_name: &str, full_name: &str, id: &str) -> serde_json::Value {
    serde_json::json!({
        "signature": format!("data:image/png;base64,{}", base64::encode(sample_png())),
        "fileName": file_name,
        "fullName": full_name,
        "id": id,
    })
}

/// One A4 page with its `MediaBox` on the page itself.
pub fn sample_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 m 100 100 l S".to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        "Contents" => Object::Reference(content_id),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save pdf");
    out
}

/// 3x2 black strokes on a transparent background, like a canvas export.
pub fn sample_png() -> Vec<u8> {
    let data: Vec<u8> = (0..6)
        .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [0, 0, 0, 0] })
        .collect();
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, 3, 2);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(&data).expect("png data");
    }
    out
}
