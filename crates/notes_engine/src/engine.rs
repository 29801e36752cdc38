use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use notes_logging::{notes_debug, notes_error, notes_info, notes_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::annotation::Annotator;
use crate::api::{ChannelProgressSink, NotesApi, ProgressSink};
use crate::client::ReqwestNotesApi;
use crate::export::Exporter;
use crate::lifecycle::TaskController;
use crate::settings::ClientSettings;
use crate::{ApiError, EngineEvent, ExplainRequest, GenerateRequest, NoteId, ProviderSelection};

enum EngineCommand {
    Generate(GenerateRequest),
    Explain(ExplainRequest),
    Export {
        note_id: NoteId,
        selection: ProviderSelection,
    },
}

/// The engine no longer accepts commands: it was shut down, or its worker
/// thread has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("engine is not running")]
pub struct EngineStopped;

struct Services {
    tasks: TaskController,
    annotator: Annotator,
    exporter: Exporter,
}

/// Runs backend work on a background tokio runtime. Dropping the handle
/// abandons whatever is still in flight; late results are never delivered.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, export_dir: PathBuf) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestNotesApi::new(&settings)?);
        Ok(Self::with_api(api, &settings, export_dir))
    }

    pub fn with_api(api: Arc<dyn NotesApi>, settings: &ClientSettings, export_dir: PathBuf) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let services = Arc::new(Services {
            tasks: TaskController::new(api.clone(), settings),
            annotator: Annotator::new(api.clone()),
            exporter: Exporter::new(api, export_dir),
        });

        let worker_cancel = cancel.clone();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    notes_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let services = services.clone();
                let event_tx = event_tx.clone();
                let cancel = worker_cancel.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            notes_debug!("Engine command abandoned");
                        }
                        _ = handle_command(&services, command, event_tx) => {}
                    }
                });
            }
            notes_info!("Engine command channel closed");
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn generate(&self, request: GenerateRequest) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Generate(request))
    }

    pub fn explain(&self, request: ExplainRequest) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Explain(request))
    }

    pub fn export(
        &self,
        note_id: NoteId,
        selection: ProviderSelection,
    ) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Export { note_id, selection })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Abandons pending work. Every later command is refused with
    /// `EngineStopped`.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            notes_info!("Engine shutting down");
        }
        self.cancel.cancel();
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        if self.cancel.is_cancelled() {
            notes_debug!("Engine is shut down; command refused");
            return Err(EngineStopped);
        }
        self.cmd_tx.send(command).map_err(|_| {
            notes_warn!("Engine worker is gone; command refused");
            EngineStopped
        })
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    services: &Services,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate(request) => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = match services.tasks.submit(&request).await {
                Ok(handle) => {
                    sink.emit(EngineEvent::TaskSubmitted(handle.task_id().clone()));
                    services.tasks.await_completion(&handle, &sink).await
                }
                Err(err) => Err(err),
            };
            let _ = event_tx.send(EngineEvent::TaskCompleted(result));
        }
        EngineCommand::Explain(request) => {
            let result = services.annotator.lookup(&request).await;
            let _ = event_tx.send(EngineEvent::Explained {
                term: request.term,
                result,
            });
        }
        EngineCommand::Export { note_id, selection } => {
            let result = services.exporter.export(&note_id, &selection).await;
            let _ = event_tx.send(EngineEvent::Exported(result));
        }
    }
}
