use std::path::PathBuf;
use std::sync::Arc;

use notes_logging::{notes_info, notes_warn};

use crate::api::NotesApi;
use crate::filename::export_filename;
use crate::persist::ExportStore;
use crate::{ExportError, ExportedNote, NoteId, ProviderSelection};

/// Downloads the backend's finished markdown for a note and stores it.
pub struct Exporter {
    api: Arc<dyn NotesApi>,
    store: ExportStore,
}

impl Exporter {
    pub fn new(api: Arc<dyn NotesApi>, export_dir: PathBuf) -> Self {
        Self {
            api,
            store: ExportStore::new(export_dir),
        }
    }

    pub async fn fetch(
        &self,
        note_id: &NoteId,
        selection: &ProviderSelection,
    ) -> Result<ExportedNote, ExportError> {
        let content = self
            .api
            .export_note(note_id, selection)
            .await
            .map_err(|err| ExportError::Service(err.to_string()))?;
        if content.trim().is_empty() {
            return Err(ExportError::Empty);
        }
        Ok(ExportedNote {
            filename: export_filename(&content),
            content,
        })
    }

    pub fn save(&self, export: &ExportedNote) -> Result<PathBuf, ExportError> {
        self.store
            .save(&export.filename, &export.content)
            .map_err(|err| ExportError::Save(err.to_string()))
    }

    /// Fetch then save; the document on screen is never touched.
    pub async fn export(
        &self,
        note_id: &NoteId,
        selection: &ProviderSelection,
    ) -> Result<ExportedNote, ExportError> {
        let result = match self.fetch(note_id, selection).await {
            Ok(export) => self.save(&export).map(|path| {
                notes_info!("Exported note {} to {:?}", note_id, path);
                export
            }),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            notes_warn!("Export of note {} failed: {}", note_id, err);
        }
        result
    }
}
