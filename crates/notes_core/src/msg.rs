use crate::layout::ContainerBounds;
use crate::render::RenderedDocument;
use crate::state::GenerationMode;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User clicked Generate.
    GenerateClicked,
    /// Host answered the active page query.
    ActivePageResolved(Result<String, String>),
    /// Backend accepted the generation request.
    TaskSubmitted { task_id: String },
    /// One status read completed.
    TaskProgress {
        attempt: u32,
        max_attempts: u32,
        status_message: String,
    },
    /// Result fetched and rendered.
    NoteReady {
        note_id: String,
        document: RenderedDocument,
    },
    /// Any failure of the submit / poll / fetch pipeline.
    TaskFailed { message: String },
    /// User clicked a knowledge-point marker.
    MarkerActivated { marker_id: usize },
    /// Explanation lookup finished (successfully or not).
    ExplanationReceived {
        term: String,
        result: Result<Explanation, String>,
    },
    /// User closed the annotation panel.
    PanelClosed,
    DividerPressed,
    DividerMoved {
        pointer_y: f32,
        container: ContainerBounds,
    },
    DividerReleased,
    ExportClicked,
    /// Export finished; `Ok` carries the saved file name.
    ExportFinished(Result<String, String>),
    CopyNoteClicked,
    /// Copy the markdown of the explanation on display.
    CopyAnswerClicked,
    ModeSelected(GenerationMode),
    ProviderSelected(Option<String>),
    ApiKeyChanged(Option<String>),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// A long-form explanation, kept both as markdown source and rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub markdown: String,
    pub html: String,
}
