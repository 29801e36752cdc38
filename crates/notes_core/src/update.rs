use notes_logging::{notes_debug, notes_info};

use crate::effect::{Effect, ExplainRequest, TaskRequest};
use crate::state::{AnnotationBody, AppState, NoteDocument, TaskPhase};
use crate::Msg;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::GenerateClicked => {
            // One task per popup: the button is disabled while busy.
            if state.phase().is_busy() {
                notes_debug!("GenerateClicked ignored in phase {:?}", state.phase());
                return (state, Vec::new());
            }
            state.begin_generation();
            vec![Effect::ResolveActivePage]
        }
        Msg::ActivePageResolved(result) => {
            if state.phase() != &TaskPhase::ResolvingPage {
                return (state, Vec::new());
            }
            match result {
                Ok(url) => {
                    let url = url.trim().to_string();
                    let options = state.options().clone();
                    state.set_phase(TaskPhase::Submitting { url: url.clone() });
                    state.set_status("Page found, creating task...");
                    vec![Effect::SubmitTask {
                        request: TaskRequest {
                            url,
                            mode: options.mode,
                            provider: options.provider,
                            api_key: options.api_key,
                        },
                    }]
                }
                Err(message) => {
                    state.fail_task(&message);
                    Vec::new()
                }
            }
        }
        Msg::TaskSubmitted { task_id } => {
            if matches!(state.phase(), TaskPhase::Submitting { .. }) {
                notes_info!("Task {} created", task_id);
                state.set_phase(TaskPhase::Polling {
                    task_id,
                    attempt: 0,
                });
                state.set_status("Task created, processing...");
            }
            Vec::new()
        }
        Msg::TaskProgress {
            attempt,
            max_attempts,
            status_message,
        } => {
            if let TaskPhase::Polling { task_id, .. } = state.phase() {
                let task_id = task_id.clone();
                state.set_phase(TaskPhase::Polling { task_id, attempt });
                state.set_status(format!(
                    "Processing ({attempt}/{max_attempts}): {status_message}"
                ));
            }
            Vec::new()
        }
        Msg::NoteReady { note_id, document } => {
            if state.phase().is_busy() {
                state.set_document(NoteDocument {
                    note_id,
                    rendered: document,
                });
                state.set_phase(TaskPhase::Ready);
                state.set_status("Note generated!");
            }
            Vec::new()
        }
        Msg::TaskFailed { message } => {
            if state.phase().is_busy() {
                state.fail_task(&message);
            }
            Vec::new()
        }
        Msg::MarkerActivated { marker_id } => activate_marker(&mut state, marker_id),
        Msg::ExplanationReceived { term, result } => {
            let body = match result {
                Ok(explanation) => AnnotationBody::Answer(explanation),
                Err(message) => AnnotationBody::Error(message),
            };
            if !state.apply_explanation(term, body) {
                notes_debug!("Explanation arrived after the panel closed; dropped");
            }
            Vec::new()
        }
        Msg::PanelClosed => {
            state.close_annotation();
            Vec::new()
        }
        Msg::DividerPressed => {
            if state.layout_mut().press() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DividerMoved {
            pointer_y,
            container,
        } => {
            if state.layout_mut().drag_to(pointer_y, container) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DividerReleased => {
            if state.layout_mut().release() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.is_exporting() {
                return (state, Vec::new());
            }
            match state.document().map(|doc| doc.note_id.clone()) {
                Some(note_id) => {
                    let options = state.options().clone();
                    state.set_exporting(true);
                    state.set_status("Exporting note...");
                    vec![Effect::ExportNote {
                        note_id,
                        provider: options.provider,
                        api_key: options.api_key,
                    }]
                }
                None => {
                    state.set_status("Error: no note to export, generate one first.");
                    Vec::new()
                }
            }
        }
        Msg::ExportFinished(result) => {
            state.set_exporting(false);
            match result {
                Ok(filename) => state.set_status(format!("Exported {filename}")),
                Err(message) => state.set_status(format!("Error: export failed: {message}")),
            }
            Vec::new()
        }
        Msg::CopyNoteClicked => match state.document() {
            Some(doc) => vec![Effect::CopyText {
                text: doc.rendered.canonical.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CopyAnswerClicked => match state.annotation().map(|panel| &panel.body) {
            Some(AnnotationBody::Answer(explanation)) => vec![Effect::CopyText {
                text: explanation.markdown.clone(),
            }],
            _ => Vec::new(),
        },
        Msg::ModeSelected(mode) => {
            state.options_mut().mode = mode;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ProviderSelected(provider) => {
            state.options_mut().provider = non_blank(provider);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ApiKeyChanged(api_key) => {
            state.options_mut().api_key = non_blank(api_key);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn activate_marker(state: &mut AppState, marker_id: usize) -> Vec<Effect> {
    let Some(doc) = state.document() else {
        return Vec::new();
    };
    let Some(marker) = doc.rendered.marker(marker_id) else {
        notes_debug!("No marker with id {}", marker_id);
        return Vec::new();
    };
    let options = state.options();
    let request = ExplainRequest {
        term: marker.term.clone(),
        short_explanation: marker.explanation.clone(),
        context: doc.rendered.visible_text().to_string(),
        provider: options.provider.clone(),
        api_key: options.api_key.clone(),
    };
    state.open_annotation(&request.term);
    vec![Effect::ExplainTerm { request }]
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
