//! Integration tests for the layout-service client (mapa-client).
//!
//! Runs upload, submission and download against a mock service.

use std::sync::Arc;

use mapa_client::{
    ClientConfig, ClientError, ExportPayload, LayoutClient, LayoutForm, RetryPolicy,
    DEFAULT_USER_EMAIL,
};
use mapa_core::{Action, CoreError, EntityStore, ViewerState};
use mapa_renderer::CaptureArtifact;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drawing() -> serde_json::Value {
    json!({
        "entidades": [
            {"type": "LINE", "start": [0, 0, 0], "end": [100, 0, 0], "layer": "ESTRADAS", "color": [0, 0, 0], "length": 100.0},
            {"type": "TEXT", "position": [50, 10], "text": "3.5 ha", "layer": "AREAS", "color": "red"},
            {"type": "CIRCLE", "center": [20, 20], "radius": 5, "layer": "LOMBADAS", "color": [1, 0, 0]}
        ],
        "layers": ["AREAS", "ESTRADAS", "LOMBADAS"]
    })
}

fn client(server: &MockServer) -> LayoutClient {
    LayoutClient::new(ClientConfig {
        base_url: server.uri(),
        user_email: "agronomo@fazenda.com".into(),
        retry: RetryPolicy {
            first_delay: std::time::Duration::from_millis(1),
            ..RetryPolicy::default()
        },
        ..ClientConfig::default()
    })
    .expect("client")
}

fn state() -> ViewerState {
    let store = EntityStore::from_json(&drawing().to_string()).expect("drawing");
    ViewerState::default()
        .reduce(&Action::LoadEntities(Arc::new(store)))
        .reduce(&Action::ToggleLayer("LOMBADAS".into()))
        .reduce(&Action::ToggleTableLayer("ESTRADAS".into()))
}

fn payload(state: &ViewerState) -> ExportPayload {
    // ASCII bitmap bytes keep the multipart body matchable as text.
    let artifact = CaptureArtifact {
        svg: "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".into(),
        png: b"PNGDATA".to_vec(),
        width: 3,
        height: 3,
    };
    ExportPayload::assemble(
        state,
        "fazenda.dxf",
        artifact,
        LayoutForm::for_drawing("fazenda"),
    )
    .expect("payload")
}

// ==========================================================================
// Upload
// ==========================================================================

#[tokio::test]
async fn test_upload_parses_drawing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/upload"))
        .and(body_string_contains("filename=\"fazenda.dxf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(drawing()))
        .expect(1)
        .mount(&server)
        .await;

    let store = client(&server)
        .upload_drawing("fazenda.dxf", b"0\nSECTION\n".to_vec())
        .await
        .expect("upload");
    assert_eq!(store.len(), 3);
    assert!(store.layers().contains("LOMBADAS"));
}

#[tokio::test]
async fn test_upload_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/upload"))
        .and(body_string_contains("filename=\"talhoes.dxf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(drawing()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("talhoes.dxf");
    std::fs::write(&file, "0\nEOF\n").expect("write drawing");

    let store = client(&server)
        .upload_drawing_file(&file)
        .await
        .expect("upload");
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_upload_error_member_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "arquivo corrompido"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .upload_drawing("x.dxf", Vec::new())
        .await
        .expect_err("error document");
    assert!(matches!(
        err,
        ClientError::Core(CoreError::Drawing(ref m)) if m == "arquivo corrompido"
    ));
}

// ==========================================================================
// Submission and download
// ==========================================================================

#[tokio::test]
async fn test_export_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .and(header("x-user-email", "agronomo@fazenda.com"))
        .and(body_string_contains("name=\"nome_arquivo\""))
        .and(body_string_contains("fazenda.dxf"))
        .and(body_string_contains("name=\"remover_areas_talhoes\""))
        .and(body_string_contains("name=\"svg\"; filename=\"mapa.svg\""))
        .and(body_string_contains("name=\"mapa\"; filename=\"mapa.png\""))
        .and(body_string_contains(
            "name=\"entidades_visiveis\"; filename=\"entidades_visiveis.txt\"",
        ))
        .and(body_string_contains("\"length\":100.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pdf_url": format!("{}/storage/pdfs/fazenda_V0.1.pdf", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/pdfs/fazenda_V0.1.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 layout".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let state = state();
    let dir = tempfile::tempdir().expect("tempdir");
    let saved = client(&server)
        .export(payload(&state), dir.path())
        .await
        .expect("export");

    assert_eq!(saved, dir.path().join("fazenda_V0.1.pdf"));
    assert_eq!(std::fs::read(&saved).expect("read"), b"%PDF-1.4 layout");
}

#[tokio::test]
async fn test_hidden_layers_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pdf_url": "https://cdn.example.com/x.pdf"
        })))
        .mount(&server)
        .await;

    let state = state();
    let payload = payload(&state);
    assert!(!payload.visible_entities.contains("LOMBADAS"));
    assert_eq!(payload.visible_layers, vec!["AREAS", "ESTRADAS"]);

    let url = client(&server)
        .submit_layout(payload)
        .await
        .expect("submit");
    assert_eq!(url.as_str(), "https://cdn.example.com/x.pdf");
}

#[tokio::test]
async fn test_service_failure_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "falha ao gerar PDF"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = state();
    let before = state.clone();
    let dir = tempfile::tempdir().expect("tempdir");
    let err = client(&server)
        .export(payload(&state), dir.path())
        .await
        .expect_err("service failure");

    match err {
        ClientError::Service { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "falha ao gerar PDF");
        }
        other => panic!("expected service error, got {other:?}"),
    }
    assert_eq!(state, before);
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn test_error_member_on_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "sem entidades"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_layout(payload(&state()))
        .await
        .expect_err("error member");
    assert!(matches!(err, ClientError::Service { ref message, .. } if message == "sem entidades"));
}

#[tokio::test]
async fn test_raw_body_used_when_not_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_layout(payload(&state()))
        .await
        .expect_err("gateway");
    assert!(matches!(err, ClientError::Service { status: 502, ref message } if message == "Bad Gateway"));
}

#[tokio::test]
async fn test_download_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/layout.pdf"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/layout.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pdf".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let url = url::Url::parse(&format!("{}/files/layout.pdf", server.uri())).expect("url");
    let saved = client(&server)
        .download_artifact(&url, &dir.path().join("out"))
        .await
        .expect("download");
    assert_eq!(std::fs::read(saved).expect("read"), b"pdf");
}

#[tokio::test]
async fn test_default_identity_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dxf/gerar-layout"))
        .and(header("x-user-email", DEFAULT_USER_EMAIL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pdf_url": "https://cdn.example.com/a.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LayoutClient::new(ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    })
    .expect("client");
    client
        .submit_layout(payload(&state()))
        .await
        .expect("submit");
}
