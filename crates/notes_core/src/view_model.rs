use crate::render::ViewNode;
use crate::state::{AnnotationBody, GenerationMode, TaskPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub phase: TaskPhase,
    pub status_text: String,
    pub generate_enabled: bool,
    pub mode: GenerationMode,
    pub provider: Option<String>,
    /// Rendered note, `None` until a task completes.
    pub document: Option<Vec<ViewNode>>,
    pub note_actions_visible: bool,
    pub exporting: bool,
    pub annotation: Option<AnnotationView>,
    pub layout: LayoutView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationView {
    pub title: String,
    pub body: AnnotationBody,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutView {
    pub document_percent: f32,
    pub annotation_percent: f32,
    pub dragging: bool,
}
