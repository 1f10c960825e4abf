use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use pdfchat_ingest::fixtures::pdf_with_pages;

use crate::helpers::{error_message, multipart_request, BagOfWordsEmbedder, ContextEchoLlm, TestApp};

#[tokio::test]
async fn upload_pdf_succeeds_and_writes_index() {
    let app = TestApp::new();
    let pdf = pdf_with_pages(&["Rust is a systems programming language."]);

    let (status, json) = app.upload(&[("rust.pdf", &pdf)]).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json, serde_json::json!({ "message": "Files processed successfully" }));

    let index = app.state.index_store.load().await.unwrap();
    assert_eq!(index.embedding_model, "bag-of-words");
    assert!(!index.is_empty());
    assert!(index.entries[0].text.contains("systems programming"));
}

#[tokio::test]
async fn upload_with_no_files_is_400() {
    let app = TestApp::new();

    let (status, json) = app.send(multipart_request(&[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "No files provided");
    assert!(!app.state.index_store.exists().await);
}

#[tokio::test]
async fn non_multipart_body_is_400() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "No files provided");
}

#[tokio::test]
async fn only_non_pdf_files_is_400() {
    let app = TestApp::new();

    let (status, json) = app
        .upload(&[("notes.txt", b"plain text"), ("photo.png", b"\x89PNG")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "No files provided");
    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_pdf_files_are_skipped_alongside_pdfs() {
    let app = TestApp::new();
    let pdf = pdf_with_pages(&["Only this document is indexed."]);

    let (status, _) = app
        .upload(&[("readme.txt", b"ignored entirely"), ("DOC.PDF", &pdf)])
        .await;
    assert_eq!(status, StatusCode::OK);

    let index = app.state.index_store.load().await.unwrap();
    assert!(index.entries.iter().all(|e| !e.text.contains("ignored")));
    assert!(index.entries.iter().any(|e| e.text.contains("Only this document")));
}

#[tokio::test]
async fn plain_files_field_name_is_accepted() {
    let app = TestApp::new();
    let pdf = pdf_with_pages(&["Field names differ between clients."]);

    let (status, _) = app
        .send(multipart_request(&[("files", "a.pdf", &pdf), ("other", "b.pdf", &pdf)]))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn pdf_without_text_is_400() {
    let app = TestApp::new();
    let scan = pdf_with_pages(&["", ""]);

    let (status, json) = app.upload(&[("scan.pdf", &scan)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "No text extracted from PDF files");
    assert!(!app.state.index_store.exists().await);
}

#[tokio::test]
async fn unreadable_pdf_is_500_naming_the_file() {
    let app = TestApp::new();
    let good = pdf_with_pages(&["Fine."]);

    let (status, json) = app
        .upload(&[("good.pdf", &good), ("broken.pdf", b"this is not a pdf")])
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&json);
    assert!(message.starts_with("Error processing file"), "{message}");
    assert!(message.contains("broken.pdf"), "{message}");
    assert!(!app.state.index_store.exists().await);
}

#[tokio::test]
async fn embedding_failure_is_500() {
    let app = TestApp::with(BagOfWordsEmbedder::failing(), ContextEchoLlm::new());
    let pdf = pdf_with_pages(&["Some text to embed."]);

    let (status, json) = app.upload(&[("a.pdf", &pdf)]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json).contains("503 Service Unavailable"));
    assert!(!app.state.index_store.exists().await);
}

#[tokio::test]
async fn second_upload_replaces_index() {
    let app = TestApp::new();
    let first = pdf_with_pages(&["Bananas are yellow."]);
    let second = pdf_with_pages(&["Cherries are red."]);

    assert_eq!(app.upload(&[("first.pdf", &first)]).await.0, StatusCode::OK);
    assert_eq!(app.upload(&[("second.pdf", &second)]).await.0, StatusCode::OK);

    let index = app.state.index_store.load().await.unwrap();
    assert!(index.entries.iter().any(|e| e.text.contains("Cherries")));
    assert!(index.entries.iter().all(|e| !e.text.contains("Bananas")));
}

#[tokio::test]
async fn get_upload_is_405() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/upload")
        .body(Body::empty())
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_index_readiness() {
    let app = TestApp::new();
    let health = || {
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap()
    };

    let (status, json) = app.send(health()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["index_ready"], false);

    let pdf = pdf_with_pages(&["Now there is an index."]);
    app.upload(&[("a.pdf", &pdf)]).await;

    let (_, json) = app.send(health()).await;
    assert_eq!(json["index_ready"], true);
}

#[tokio::test]
async fn staged_files_are_removed_on_every_outcome() {
    let app = TestApp::new();
    let good = pdf_with_pages(&["Staged and then removed."]);
    let scan = pdf_with_pages(&[""]);

    let (status, _) = app
        .upload(&[("good.pdf", &good), ("broken.pdf", b"not a pdf")])
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.staged_dirs(), 0);

    let (status, _) = app.upload(&[("scan.pdf", &scan)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.staged_dirs(), 0);

    let (status, _) = app.upload(&[("good.pdf", &good)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.staged_dirs(), 0);
}
