use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use notes_core::{Block, NoteContent};
use notes_logging::{notes_debug, notes_info, notes_warn};

use crate::api::{NotesApi, ProgressSink};
use crate::settings::ClientSettings;
use crate::source::SourcePolicy;
use crate::{
    ApiError, EngineEvent, FailureKind, GenerateRequest, Note, NotePayload, TaskError, TaskHandle,
    TaskProgress, TaskStatus,
};

/// Submit -> poll -> fetch, strictly in that order, one call at a time.
pub struct TaskController {
    api: Arc<dyn NotesApi>,
    policy: SourcePolicy,
    poll_interval: Duration,
    max_attempts: u32,
}

impl TaskController {
    pub fn new(api: Arc<dyn NotesApi>, settings: &ClientSettings) -> Self {
        Self {
            api,
            policy: SourcePolicy::new(settings.source_patterns.clone()),
            poll_interval: settings.poll_interval,
            max_attempts: settings.max_poll_attempts,
        }
    }

    /// Validates the page address locally, then creates the backend task.
    pub async fn submit(&self, request: &GenerateRequest) -> Result<TaskHandle, TaskError> {
        if !self.policy.is_supported(&request.url) {
            notes_warn!("Rejected unsupported source url={:?}", request.url);
            return Err(TaskError::UnsupportedSource {
                url: request.url.clone(),
            });
        }
        notes_info!("Submitting generation url={} mode={}", request.url, request.mode);
        let task_id = self
            .api
            .create_task(request)
            .await
            .map_err(|err| TaskError::Submission(err.to_string()))?;
        notes_info!("Task {} accepted", task_id);
        Ok(TaskHandle::new(task_id))
    }

    /// Polls until the task is terminal or the attempt budget runs out,
    /// then fetches the result exactly once.
    pub async fn await_completion(
        &self,
        handle: &TaskHandle,
        sink: &dyn ProgressSink,
    ) -> Result<Note, TaskError> {
        let task_id = handle.task_id();
        for attempt in 1..=self.max_attempts {
            let snapshot = self
                .api
                .task_status(task_id)
                .await
                .map_err(|err| TaskError::StatusQuery(err.to_string()))?;
            notes_debug!(
                "Task {} attempt {}/{} status={:?} message={:?}",
                task_id,
                attempt,
                self.max_attempts,
                snapshot.status,
                snapshot.status_message
            );
            sink.emit(EngineEvent::Progress(TaskProgress {
                task_id: task_id.clone(),
                attempt,
                max_attempts: self.max_attempts,
                status: snapshot.status.clone(),
                status_message: snapshot.status_message.clone(),
            }));

            match snapshot.status {
                TaskStatus::Completed => {
                    let payload = self
                        .api
                        .task_result(task_id)
                        .await
                        .map_err(map_result_error)?;
                    let note = parse_note(payload)?;
                    notes_info!(
                        "Task {} completed with {} blocks",
                        task_id,
                        note.blocks.len()
                    );
                    return Ok(note);
                }
                TaskStatus::Failed => {
                    notes_warn!("Task {} failed: {}", task_id, snapshot.status_message);
                    return Err(TaskError::TaskFailed(snapshot.status_message));
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
        notes_warn!(
            "Task {} still running after {} attempts",
            task_id,
            self.max_attempts
        );
        Err(TaskError::PollingTimeout {
            attempts: self.max_attempts,
        })
    }
}

fn map_result_error(err: ApiError) -> TaskError {
    match err.kind {
        FailureKind::InvalidResponse => TaskError::MalformedResult(err.message),
        _ => TaskError::ResultQuery(err.to_string()),
    }
}

/// Validates a result payload; nothing partial gets through.
pub fn parse_note(payload: NotePayload) -> Result<Note, TaskError> {
    let content = payload
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| TaskError::MalformedResult("note content is empty".to_string()))?;
    let id = payload
        .id
        .ok_or_else(|| TaskError::MalformedResult("note has no id".to_string()))?;
    let parsed: NoteContent = serde_json::from_str(&content)
        .map_err(|err| TaskError::MalformedResult(err.to_string()))?;
    notes_debug!("Note {} has {}", id, block_summary(&parsed.notes));
    Ok(Note {
        id,
        blocks: parsed.notes,
    })
}

/// Block counts by wire tag, e.g. `heading x1, list_item x2`.
fn block_summary(blocks: &[Block]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for block in blocks {
        *counts.entry(block.kind()).or_default() += 1;
    }
    if counts.is_empty() {
        return "no blocks".to_string();
    }
    counts
        .iter()
        .map(|(kind, count)| format!("{kind} x{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
