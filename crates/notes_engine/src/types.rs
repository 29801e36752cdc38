use std::fmt;

use notes_core::Block;

/// Backend-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque note identifier, used for export requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(pub String);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned by a successful submission. Only the lifecycle
/// controller creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    task_id: TaskId,
}

impl TaskHandle {
    pub(crate) fn new(task_id: TaskId) -> Self {
        Self { task_id }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any other label, including a differently cased known one; treated
    /// as in progress.
    Other(String),
}

impl TaskStatus {
    /// Labels match exactly.
    pub fn from_label(label: &str) -> Self {
        match label {
            "PENDING" => TaskStatus::Pending,
            "PROCESSING" => TaskStatus::Processing,
            "COMPLETED" => TaskStatus::Completed,
            "FAILED" => TaskStatus::Failed,
            _ => TaskStatus::Other(label.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One status read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub status_message: String,
}

/// Raw result payload before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotePayload {
    pub id: Option<NoteId>,
    pub content: Option<String>,
}

/// A finished generation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub blocks: Vec<Block>,
}

/// Provider choice and optional credential, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderSelection {
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub url: String,
    pub mode: String,
    pub selection: ProviderSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub term: String,
    pub context: String,
    pub short_explanation: Option<String>,
    pub selection: ProviderSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub term: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedNote {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProgress {
    pub task_id: TaskId,
    pub attempt: u32,
    pub max_attempts: u32,
    pub status: TaskStatus,
    pub status_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TaskSubmitted(TaskId),
    Progress(TaskProgress),
    TaskCompleted(Result<Note, TaskError>),
    Explained {
        term: String,
        result: Result<Explanation, ExplanationError>,
    },
    Exported(Result<ExportedNote, ExportError>),
}

/// Transport-level failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// Response body of a non-success reply, when one could be read.
    pub body: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    pub(crate) fn with_body(mut self, body: String) -> Self {
        if !body.trim().is_empty() {
            self.body = Some(body);
        }
        self
    }

    /// Body text if present, otherwise the short message.
    pub fn detail(&self) -> &str {
        self.body.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail())
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("this page is not supported: {url:?}")]
    UnsupportedSource { url: String },
    #[error("failed to create task: {0}")]
    Submission(String),
    #[error("failed to query task status: {0}")]
    StatusQuery(String),
    #[error("task processing failed: {0}")]
    TaskFailed(String),
    #[error("task did not finish after {attempts} status checks, try again later")]
    PollingTimeout { attempts: u32 },
    #[error("failed to fetch task result: {0}")]
    ResultQuery(String),
    #[error("task result is malformed: {0}")]
    MalformedResult(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplanationError {
    /// The service answered with its own error message.
    #[error("{0}")]
    Rejected(String),
    #[error("explanation service error (status {status})")]
    Service { status: u16 },
    #[error("explanation response is malformed: {0}")]
    MalformedResponse(String),
    #[error("explanation request failed: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("export failed: {0}")]
    Service(String),
    #[error("export is empty")]
    Empty,
    #[error("failed to save export: {0}")]
    Save(String),
}
