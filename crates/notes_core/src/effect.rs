use crate::state::GenerationMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the host for the address of the active page.
    ResolveActivePage,
    SubmitTask { request: TaskRequest },
    ExplainTerm { request: ExplainRequest },
    ExportNote {
        note_id: String,
        provider: Option<String>,
        api_key: Option<String>,
    },
    CopyText { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub url: String,
    pub mode: GenerationMode,
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub term: String,
    pub short_explanation: String,
    pub context: String,
    pub provider: Option<String>,
    pub api_key: Option<String>,
}
