use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;
use vasc_core::models::exam::Exam;
use vasc_core::models::report::PreliminaryReport;
use vasc_core::models::segment::CalculatedFields;
use vasc_core::paths;

use crate::error::StorageError;
use crate::store::{apply_calculated_fields, BoxFuture, ExamStore};

/// Exams as JSON files under a data directory:
///
/// ```text
/// <root>/exams/{exam_id}.json
/// <root>/reports/{exam_id}/preliminary.json
/// ```
///
/// Writes go to a temp file that is renamed over the target, so readers never
/// see a partial document. Read-modify-write updates are serialized.
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn exam_path(&self, exam_id: Uuid) -> PathBuf {
        self.root.join(paths::exam(exam_id))
    }

    fn report_path(&self, exam_id: Uuid) -> PathBuf {
        self.root.join(paths::preliminary_report(exam_id))
    }

    /// All exam ids present on disk, sorted.
    pub async fn list_exam_ids(&self) -> Result<Vec<Uuid>, StorageError> {
        let dir = self.root.join(paths::EXAMS_PREFIX);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StorageError::Io { path: dir, source }),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(id) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| Uuid::parse_str(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Atomic write: tmp + rename.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(value)?;
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &json).await.map_err(io_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(io_err)?;

    tracing::debug!(path = %path.display(), "document written");
    Ok(())
}

impl ExamStore for FileStore {
    fn load_exam(&self, exam_id: Uuid) -> BoxFuture<'_, Result<Exam, StorageError>> {
        Box::pin(async move {
            read_json(&self.exam_path(exam_id))
                .await?
                .ok_or(StorageError::ExamNotFound(exam_id))
        })
    }

    fn save_exam<'a>(&'a self, exam: &'a Exam) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            write_json(&self.exam_path(exam.id), exam).await
        })
    }

    fn save_calculated_fields<'a>(
        &'a self,
        exam_id: Uuid,
        measurement_id: Uuid,
        fields: &'a CalculatedFields,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            let path = self.exam_path(exam_id);
            let mut exam: Exam = read_json(&path)
                .await?
                .ok_or(StorageError::ExamNotFound(exam_id))?;
            apply_calculated_fields(&mut exam, measurement_id, fields)?;
            write_json(&path, &exam).await
        })
    }

    fn load_preliminary_report(
        &self,
        exam_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PreliminaryReport>, StorageError>> {
        Box::pin(async move { read_json(&self.report_path(exam_id)).await })
    }

    fn save_preliminary_report<'a>(
        &'a self,
        report: &'a PreliminaryReport,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            write_json(&self.report_path(report.exam_id), report).await
        })
    }
}
