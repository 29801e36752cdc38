#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use notes_engine::{
    ApiError, EngineEvent, ExplainRequest, FailureKind, GenerateRequest, NoteId, NotePayload,
    NotesApi, ProgressSink, ProviderSelection, TaskId, TaskSnapshot, TaskStatus,
};

pub const SAMPLE_CONTENT: &str = r#"{"notes":[{"type":"heading","content":"Intro"},{"type":"paragraph","content":"Hello"},{"type":"list_item","content":"A"},{"type":"list_item","content":"B"},{"type":"knowledge_point","content":{"term":"RAG","explanation":"retrieval augmented generation"}}]}"#;

pub fn init_logging() {
    notes_logging::initialize_for_tests();
}

pub fn snapshot(label: &str, message: &str) -> TaskSnapshot {
    TaskSnapshot {
        status: TaskStatus::from_label(label),
        status_message: message.to_string(),
    }
}

pub fn http_error(status: u16, body: Option<&str>) -> ApiError {
    ApiError {
        kind: FailureKind::HttpStatus(status),
        message: format!("status {status}"),
        body: body.map(str::to_string),
    }
}

pub fn sample_payload() -> NotePayload {
    NotePayload {
        id: Some(NoteId("42".to_string())),
        content: Some(SAMPLE_CONTENT.to_string()),
    }
}

pub fn generate_request(url: &str) -> GenerateRequest {
    GenerateRequest {
        url: url.to_string(),
        mode: "FLASH".to_string(),
        selection: ProviderSelection::default(),
    }
}

/// Scripted backend. Status reads pop from the queue; once it is empty
/// every read reports PROCESSING.
#[derive(Default)]
pub struct FakeApi {
    statuses: Mutex<VecDeque<Result<TaskSnapshot, ApiError>>>,
    result: Mutex<Option<Result<NotePayload, ApiError>>>,
    explain: Mutex<Option<Result<String, ApiError>>>,
    export: Mutex<Option<Result<String, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_status(&self, status: Result<TaskSnapshot, ApiError>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn set_result(&self, result: Result<NotePayload, ApiError>) {
        *self.result.lock().unwrap() = Some(result);
    }

    pub fn set_explain(&self, result: Result<String, ApiError>) {
        *self.explain.lock().unwrap() = Some(result);
    }

    pub fn set_export(&self, result: Result<String, ApiError>) {
        *self.export.lock().unwrap() = Some(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait::async_trait]
impl NotesApi for FakeApi {
    async fn create_task(&self, _request: &GenerateRequest) -> Result<TaskId, ApiError> {
        self.record("create");
        Ok(TaskId("task-1".to_string()))
    }

    async fn task_status(&self, _task_id: &TaskId) -> Result<TaskSnapshot, ApiError> {
        self.record("status");
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(snapshot("PROCESSING", "working")))
    }

    async fn task_result(&self, _task_id: &TaskId) -> Result<NotePayload, ApiError> {
        self.record("result");
        self.result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(sample_payload()))
    }

    async fn export_note(
        &self,
        _note_id: &NoteId,
        _selection: &ProviderSelection,
    ) -> Result<String, ApiError> {
        self.record("export");
        self.export
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok("## Exported\n\nbody\n".to_string()))
    }

    async fn explain(&self, request: &ExplainRequest) -> Result<String, ApiError> {
        self.record("explain");
        self.explain
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(format!("**{}** explained", request.term)))
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
