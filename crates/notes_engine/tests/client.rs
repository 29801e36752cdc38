mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::{init_logging, SAMPLE_CONTENT};
use notes_engine::{
    Annotator, ClientSettings, ExplainRequest, ExplanationError, Exporter, FailureKind,
    GenerateRequest, NoteId, NotesApi, ProviderSelection, ReqwestNotesApi, TaskController,
    TaskError, TaskId, TaskStatus,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        poll_interval: Duration::from_millis(10),
        max_poll_attempts: 5,
        ..ClientSettings::default()
    }
}

fn api_for(server: &MockServer) -> Arc<ReqwestNotesApi> {
    Arc::new(ReqwestNotesApi::new(&settings_for(server)).unwrap())
}

fn selection(provider: &str, api_key: Option<&str>) -> ProviderSelection {
    ProviderSelection {
        provider: Some(provider.to_string()),
        api_key: api_key.map(str::to_string),
    }
}

#[tokio::test]
async fn create_task_posts_expected_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/generate"))
        .and(body_json(json!({
            "userId": 1,
            "url": "https://www.youtube.com/watch?v=abc",
            "mode": "PRO",
            "provider": "deepseek"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "t-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let task_id = api
        .create_task(&GenerateRequest {
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            mode: "PRO".to_string(),
            selection: selection("deepseek", None),
        })
        .await
        .unwrap();
    assert_eq!(task_id, TaskId("t-9".to_string()));
}

#[tokio::test]
async fn create_task_without_id_is_invalid_response() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_task(&GenerateRequest {
            url: "https://www.bilibili.com/video/BV1".to_string(),
            mode: "FLASH".to_string(),
            selection: ProviderSelection::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidResponse);
}

#[tokio::test]
async fn status_read_maps_labels_and_http_errors() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "PROCESSING",
            "statusMessage": "Transcribing audio"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/gone/status"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such task"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let snapshot = api.task_status(&TaskId("t-1".to_string())).await.unwrap();
    assert_eq!(snapshot.status, TaskStatus::Processing);
    assert_eq!(snapshot.status_message, "Transcribing audio");

    let err = api
        .task_status(&TaskId("gone".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.body.as_deref(), Some("no such task"));
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "t-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "PROCESSING",
            "statusMessage": "working"
        })))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "statusMessage": "done"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-1/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "content": SAMPLE_CONTENT
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let api = api_for(&server);
    let controller = TaskController::new(api, &settings);
    let sink = common::TestSink::default();

    let handle = controller
        .submit(&common::generate_request(
            "https://www.bilibili.com/video/BV1xx411c7mD",
        ))
        .await
        .unwrap();
    let note = controller.await_completion(&handle, &sink).await.unwrap();

    assert_eq!(note.id, NoteId("42".to_string()));
    assert_eq!(note.blocks.len(), 5);
    assert_eq!(sink.take().len(), 3);
}

#[tokio::test]
async fn completed_task_with_garbage_content_is_malformed() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-2/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "statusMessage": ""
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notes/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "taskId": "t-2" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t-2/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "content": "{\"notes\": \"nope\"}"
        })))
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let controller = TaskController::new(api_for(&server), &settings);
    let handle = controller
        .submit(&common::generate_request("https://youtube.com/watch?v=1"))
        .await
        .unwrap();
    let err = controller
        .await_completion(&handle, &common::TestSink::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::MalformedResult(_)), "{err:?}");
}

fn explain_request(term: &str) -> ExplainRequest {
    ExplainRequest {
        term: term.to_string(),
        context: "Intro\nHello".to_string(),
        short_explanation: Some("short".to_string()),
        selection: selection("openai", Some("sk-test")),
    }
}

#[tokio::test]
async fn explain_sends_context_and_returns_answer() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/explain"))
        .and(body_json(json!({
            "term": "RAG",
            "context": "Intro\nHello",
            "shortExplanation": "short",
            "provider": "openai",
            "apiKey": "sk-test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "**RAG** combines retrieval with generation."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let annotator = Annotator::new(api_for(&server));
    let explanation = annotator.lookup(&explain_request("RAG")).await.unwrap();
    assert_eq!(explanation.term, "RAG");
    assert_eq!(explanation.answer, "**RAG** combines retrieval with generation.");
}

#[tokio::test]
async fn explain_prefers_structured_error_message() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/explain"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "answer": "unknown provider" })),
        )
        .mount(&server)
        .await;

    let annotator = Annotator::new(api_for(&server));
    let err = annotator.lookup(&explain_request("RAG")).await.unwrap_err();
    assert_eq!(err, ExplanationError::Rejected("unknown provider".to_string()));
}

#[tokio::test]
async fn explain_falls_back_to_status_for_plain_bodies() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/explain"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let annotator = Annotator::new(api_for(&server));
    let err = annotator.lookup(&explain_request("RAG")).await.unwrap_err();
    assert_eq!(err, ExplanationError::Service { status: 503 });
}

#[tokio::test]
async fn export_passes_provider_headers_and_saves_by_heading() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/export/42"))
        .and(header("X-Provider", "openai"))
        .and(header("X-API-Key", "sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "---\nsource: https://b23.tv/x\n---\n\n## Intro: RAG?\n\nHello\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("exports");
    let exporter = Exporter::new(api_for(&server), out_dir.clone());
    let exported = exporter
        .export(&NoteId("42".to_string()), &selection("openai", Some("sk-test")))
        .await
        .unwrap();

    assert_eq!(exported.filename, "Intro RAG.md");
    let saved = fs::read_to_string(out_dir.join("Intro RAG.md")).unwrap();
    assert_eq!(saved, exported.content);
}

#[tokio::test]
async fn oversized_export_is_rejected() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/export/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_export_bytes: 16,
        ..settings_for(&server)
    };
    let api = ReqwestNotesApi::new(&settings).unwrap();
    let err = api
        .export_note(&NoteId("1".to_string()), &ProviderSelection::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }),
        "{err:?}"
    );
}
