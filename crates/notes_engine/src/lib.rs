//! Notes engine: backend client, task lifecycle and effect execution.
mod annotation;
mod api;
mod client;
mod engine;
mod export;
mod filename;
mod lifecycle;
mod markup;
mod persist;
mod settings;
mod source;
mod types;

pub use annotation::Annotator;
pub use api::{ChannelProgressSink, NotesApi, ProgressSink};
pub use client::ReqwestNotesApi;
pub use engine::{EngineHandle, EngineStopped};
pub use export::Exporter;
pub use filename::{export_filename, DEFAULT_EXPORT_STEM};
pub use lifecycle::{parse_note, TaskController};
pub use markup::{render_markdown, PulldownMarkup};
pub use persist::{ExportStore, PersistError};
pub use settings::ClientSettings;
pub use source::{SourcePattern, SourcePolicy};
pub use types::{
    ApiError, EngineEvent, ExplainRequest, Explanation, ExplanationError, ExportError,
    ExportedNote, FailureKind, GenerateRequest, Note, NoteId, NotePayload, ProviderSelection,
    TaskError, TaskHandle, TaskId, TaskProgress, TaskSnapshot, TaskStatus,
};
