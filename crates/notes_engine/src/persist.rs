use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("export directory {path:?} is unusable: {reason}")]
    ExportDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory that exported notes are saved into. Writes go through a
/// hidden temp file in the same directory and are renamed into place, so
/// readers only ever see complete files.
#[derive(Debug, Clone)]
pub struct ExportStore {
    dir: PathBuf,
}

impl ExportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Saves `markdown` as `filename`, replacing an earlier export of the
    /// same name.
    pub fn save(&self, filename: &str, markdown: &str) -> Result<PathBuf, PersistError> {
        self.prepare()?;

        let mut staged = tempfile::Builder::new()
            .prefix(".export-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        staged.write_all(markdown.as_bytes())?;
        staged.as_file_mut().sync_all()?;

        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }

    /// Creates the directory on first use.
    pub fn prepare(&self) -> Result<(), PersistError> {
        let unusable = |reason: String| PersistError::ExportDir {
            path: self.dir.clone(),
            reason,
        };
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(unusable("not a directory".to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|err| unusable(err.to_string()))
            }
            Err(err) => Err(unusable(err.to_string())),
        }
    }
}
