use crate::layout::{PanelLayout, SplitBounds};
use crate::msg::Explanation;
use crate::render::RenderedDocument;
use crate::view_model::{AnnotationView, AppViewModel, LayoutView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    Flash,
    Pro,
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Flash => "FLASH",
            GenerationMode::Pro => "PRO",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "FLASH" => Some(GenerationMode::Flash),
            "PRO" => Some(GenerationMode::Pro),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    pub mode: GenerationMode,
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskPhase {
    #[default]
    Idle,
    ResolvingPage,
    Submitting { url: String },
    Polling { task_id: String, attempt: u32 },
    Ready,
    Failed,
}

impl TaskPhase {
    /// A task is in flight; generate stays disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            TaskPhase::ResolvingPage | TaskPhase::Submitting { .. } | TaskPhase::Polling { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDocument {
    pub note_id: String,
    pub rendered: RenderedDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBody {
    Loading,
    Answer(Explanation),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationPanel {
    pub title: String,
    pub term: String,
    pub body: AnnotationBody,
}

/// Everything the popup knows, owned by the popup controller and threaded
/// through `update`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    options: GenerationOptions,
    phase: TaskPhase,
    status_text: String,
    document: Option<NoteDocument>,
    annotation: Option<AnnotationPanel>,
    layout: PanelLayout,
    exporting: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split_bounds(bounds: SplitBounds) -> Self {
        Self {
            layout: PanelLayout::new(bounds),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase.clone(),
            status_text: self.status_text.clone(),
            generate_enabled: !self.phase.is_busy(),
            mode: self.options.mode,
            provider: self.options.provider.clone(),
            document: self.document.as_ref().map(|doc| doc.rendered.nodes.clone()),
            note_actions_visible: self.document.is_some(),
            exporting: self.exporting,
            annotation: self.annotation.as_ref().map(|panel| AnnotationView {
                title: panel.title.clone(),
                body: panel.body.clone(),
            }),
            layout: LayoutView {
                document_percent: self.layout.document_percent(),
                annotation_percent: self.layout.annotation_percent(),
                dragging: self.layout.is_dragging(),
            },
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> &TaskPhase {
        &self.phase
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn document(&self) -> Option<&NoteDocument> {
        self.document.as_ref()
    }

    pub fn annotation(&self) -> Option<&AnnotationPanel> {
        self.annotation.as_ref()
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn options_mut(&mut self) -> &mut GenerationOptions {
        &mut self.options
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>) {
        self.status_text = text.into();
        self.mark_dirty();
    }

    pub(crate) fn set_phase(&mut self, phase: TaskPhase) {
        self.phase = phase;
        self.mark_dirty();
    }

    /// New generation: hide the previous result and everything hanging off it.
    pub(crate) fn begin_generation(&mut self) {
        self.phase = TaskPhase::ResolvingPage;
        self.document = None;
        self.annotation = None;
        self.layout.close();
        self.exporting = false;
        self.set_status("Resolving active page...");
    }

    pub(crate) fn fail_task(&mut self, message: &str) {
        self.phase = TaskPhase::Failed;
        self.set_status(format!("Error: {message}"));
    }

    pub(crate) fn set_document(&mut self, document: NoteDocument) {
        self.document = Some(document);
        self.mark_dirty();
    }

    pub(crate) fn open_annotation(&mut self, term: &str) {
        self.annotation = Some(AnnotationPanel {
            title: format!("Explaining: {term}"),
            term: term.to_string(),
            body: AnnotationBody::Loading,
        });
        self.layout.open();
        self.mark_dirty();
    }

    /// Overwrites whatever the panel shows. Returns false when the panel was
    /// closed in the meantime and the response has nowhere to go.
    pub(crate) fn apply_explanation(&mut self, term: String, body: AnnotationBody) -> bool {
        let Some(panel) = self.annotation.as_mut() else {
            return false;
        };
        panel.title = term.clone();
        panel.term = term;
        panel.body = body;
        self.mark_dirty();
        true
    }

    pub(crate) fn close_annotation(&mut self) {
        if self.annotation.take().is_some() || self.layout.is_open() {
            self.layout.close();
            self.mark_dirty();
        }
    }

    pub(crate) fn layout_mut(&mut self) -> &mut PanelLayout {
        &mut self.layout
    }

    pub(crate) fn set_exporting(&mut self, exporting: bool) {
        self.exporting = exporting;
        self.mark_dirty();
    }
}
