use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scrape_core::Record;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("could not encode result: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// What gets written for one finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument<'a> {
    pub scraped_at: String,
    pub url_template: &'a str,
    pub records: &'a [Record],
}

/// Ensure the directory that will hold `path` exists; create it if missing.
pub fn ensure_parent_dir(path: &Path) -> Result<PathBuf, PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if dir.exists() {
        let meta = fs::metadata(&dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(&dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(dir)
}

/// Atomically writes result documents by writing a temp file then renaming.
pub struct ResultWriter {
    target: PathBuf,
}

impl ResultWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write(&self, document: &ResultDocument<'_>) -> Result<PathBuf, PersistError> {
        let dir = ensure_parent_dir(&self.target)?;
        let content = serde_json::to_string_pretty(document)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if self.target.exists() {
            fs::remove_file(&self.target)?;
        }
        tmp.persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target.clone())
    }
}
