use std::sync::Arc;

use notes_core::{Effect, Explanation, Msg};
use notes_engine::{
    render_markdown, EngineEvent, EngineHandle, ExplainRequest, GenerateRequest, NoteId,
    ProviderSelection, PulldownMarkup,
};
use notes_logging::{notes_info, notes_warn};

use super::host::Host;

/// Executes effects from `update` and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    host: Arc<dyn Host>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, host: Arc<dyn Host>) -> Self {
        Self { engine, host }
    }

    /// Host queries answer immediately; their messages are returned for
    /// dispatch. Backend work reports later through `drain_events`, or
    /// fails at once when the engine refuses it.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut immediate = Vec::new();
        for effect in effects {
            match effect {
                Effect::ResolveActivePage => {
                    immediate.push(Msg::ActivePageResolved(self.host.active_url()));
                }
                Effect::SubmitTask { request } => {
                    notes_info!(
                        "SubmitTask url={} mode={}",
                        request.url,
                        request.mode.as_str()
                    );
                    let sent = self.engine.generate(GenerateRequest {
                        url: request.url,
                        mode: request.mode.as_str().to_string(),
                        selection: ProviderSelection {
                            provider: request.provider,
                            api_key: request.api_key,
                        },
                    });
                    if let Err(err) = sent {
                        immediate.push(Msg::TaskFailed {
                            message: err.to_string(),
                        });
                    }
                }
                Effect::ExplainTerm { request } => {
                    let term = request.term.clone();
                    let sent = self.engine.explain(ExplainRequest {
                        term: request.term,
                        context: request.context,
                        short_explanation: Some(request.short_explanation)
                            .filter(|text| !text.trim().is_empty()),
                        selection: ProviderSelection {
                            provider: request.provider,
                            api_key: request.api_key,
                        },
                    });
                    if let Err(err) = sent {
                        immediate.push(Msg::ExplanationReceived {
                            term,
                            result: Err(err.to_string()),
                        });
                    }
                }
                Effect::ExportNote {
                    note_id,
                    provider,
                    api_key,
                } => {
                    let sent = self
                        .engine
                        .export(NoteId(note_id), ProviderSelection { provider, api_key });
                    if let Err(err) = sent {
                        immediate.push(Msg::ExportFinished(Err(err.to_string())));
                    }
                }
                Effect::CopyText { text } => {
                    if let Err(err) = self.host.copy_text(&text) {
                        notes_warn!("Copy failed: {}", err);
                    }
                }
            }
        }
        immediate
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    pub fn drain_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TaskSubmitted(task_id) => Msg::TaskSubmitted { task_id: task_id.0 },
        EngineEvent::Progress(progress) => Msg::TaskProgress {
            attempt: progress.attempt,
            max_attempts: progress.max_attempts,
            status_message: progress.status_message,
        },
        EngineEvent::TaskCompleted(Ok(note)) => Msg::NoteReady {
            note_id: note.id.0,
            document: notes_core::render(&note.blocks, &PulldownMarkup),
        },
        EngineEvent::TaskCompleted(Err(err)) => {
            notes_warn!("Generation failed: {}", err);
            Msg::TaskFailed {
                message: err.to_string(),
            }
        }
        EngineEvent::Explained { term, result } => Msg::ExplanationReceived {
            term,
            result: result
                .map(|explanation| Explanation {
                    html: render_markdown(&explanation.answer),
                    markdown: explanation.answer,
                })
                .map_err(|err| err.to_string()),
        },
        EngineEvent::Exported(result) => Msg::ExportFinished(
            result
                .map(|export| export.filename)
                .map_err(|err| err.to_string()),
        ),
    }
}
