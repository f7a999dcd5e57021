use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::survey::{SURVEY_HEADER, SurveyError, SurveyRow};

/// Append-only CSV of survey responses.
#[derive(Debug)]
pub struct SurveyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SurveyStore {
    /// Creates the file with the fixed header when it does not exist yet.
    pub fn open(path: &Path) -> Result<Self, SurveyError> {
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| SurveyError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(SURVEY_HEADER)?;
            writer.flush().map_err(|source| SurveyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), "created survey file with header");
        }
        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &SurveyRow) -> Result<(), SurveyError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SurveyError::Io {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&row.fields)?;
        writer.flush().map_err(|source| SurveyError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
