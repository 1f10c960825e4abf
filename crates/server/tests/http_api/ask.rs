use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use pdfchat_ingest::fixtures::pdf_with_pages;
use pdfchat_storage::VectorIndex;

use crate::helpers::{ask_request, error_message, BagOfWordsEmbedder, ContextEchoLlm, TestApp};

#[tokio::test]
async fn ask_before_upload_is_500_index_missing() {
    let app = TestApp::new();

    let (status, json) = app.ask("Anything there?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json).contains("Index not found"), "{json}");
    assert!(app.llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_json_is_400() {
    let app = TestApp::new();

    let (status, json) = app.send(ask_request("{\"question\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "Invalid JSON");
}

#[tokio::test]
async fn missing_question_is_400() {
    let app = TestApp::new();

    for body in [r#"{}"#, r#"{"q": "hi"}"#, r#"{"question": ""}"#, r#"{"question": 7}"#] {
        let (status, json) = app.send(ask_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_message(&json), "No question provided", "{body}");
    }
}

#[tokio::test]
async fn body_is_json_whatever_the_content_type() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"nope": true}"#))
        .unwrap();

    let (status, json) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&json), "No question provided");
}

#[tokio::test]
async fn generation_failure_is_500() {
    let app = TestApp::with(BagOfWordsEmbedder::new(), ContextEchoLlm::failing());
    let pdf = pdf_with_pages(&["Context that will never be answered."]);
    assert_eq!(app.upload(&[("a.pdf", &pdf)]).await.0, StatusCode::OK);

    let (status, json) = app.ask("What happens?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&json);
    assert!(message.starts_with("Error generating response"), "{message}");
    assert!(message.contains("429"), "{message}");
    // single attempt
    assert_eq!(app.llm.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn corrupt_index_is_load_failure() {
    let app = TestApp::new();
    let path = app.state.index_store.path().to_path_buf();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"\x00\x01 not an index").unwrap();

    let (status, json) = app.ask("Is this readable?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&json).starts_with("Error loading index"), "{json}");
}

#[tokio::test]
async fn index_from_another_embedding_model_is_load_failure() {
    let app = TestApp::new();
    let foreign = VectorIndex::build(
        "some-other-model",
        crate::helpers::DIMS,
        vec!["text".into()],
        vec![vec![1.0; crate::helpers::DIMS]],
    )
    .unwrap();
    app.state.index_store.save(&foreign).await.unwrap();

    let (status, json) = app.ask("Will this work?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&json);
    assert!(message.starts_with("Error loading index"), "{message}");
    assert!(message.contains("some-other-model"), "{message}");
}

#[tokio::test]
async fn get_ask_is_405() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/ask")
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(request).await.0, StatusCode::METHOD_NOT_ALLOWED);
}
