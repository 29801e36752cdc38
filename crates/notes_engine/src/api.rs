use crate::{
    ApiError, EngineEvent, ExplainRequest, GenerateRequest, NoteId, NotePayload,
    ProviderSelection, TaskId, TaskSnapshot,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The backend endpoints the popup talks to. Every call is a single
/// request; nothing here retries.
#[async_trait::async_trait]
pub trait NotesApi: Send + Sync {
    async fn create_task(&self, request: &GenerateRequest) -> Result<TaskId, ApiError>;

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot, ApiError>;

    async fn task_result(&self, task_id: &TaskId) -> Result<NotePayload, ApiError>;

    async fn export_note(
        &self,
        note_id: &NoteId,
        selection: &ProviderSelection,
    ) -> Result<String, ApiError>;

    /// Returns the raw `answer` markdown.
    async fn explain(&self, request: &ExplainRequest) -> Result<String, ApiError>;
}
