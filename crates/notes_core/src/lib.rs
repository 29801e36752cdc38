//! Notes core: block model, document renderer, panel layout and the popup's
//! pure state machine.
mod block;
mod effect;
mod layout;
mod msg;
mod render;
mod state;
mod update;
mod view_model;

pub use block::{Block, KnowledgePoint, NoteContent};
pub use effect::{Effect, ExplainRequest, TaskRequest};
pub use layout::{ContainerBounds, PanelLayout, PanelState, SplitBounds};
pub use msg::{Explanation, Msg};
pub use render::{render, InlineMarkup, Marker, RenderedDocument, ViewNode};
pub use state::{
    AnnotationBody, AnnotationPanel, AppState, GenerationMode, GenerationOptions, NoteDocument,
    TaskPhase,
};
pub use update::update;
pub use view_model::{AnnotationView, AppViewModel, LayoutView};
