use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{AnalysisRecord, RecordPatch, StatusLog};

/// Outcome of the uniqueness race at submission time.
#[derive(Debug, Clone)]
pub enum BeginOutcome {
    /// The atomic insert succeeded: this caller owns the run and is the only
    /// one allowed to checkpoint and finalize the record.
    Owner { record_id: String },
    /// The key already existed. The record may be a partial, in-progress
    /// snapshot; an unset field means "not yet available", never confirmed
    /// absence.
    Reader { record: AnalysisRecord },
}

/// Deduplicating persistence keyed by audio URL.
///
/// `begin_or_attach` is the only concurrency primitive in the system: the
/// insert-if-absent must be atomic so that exactly one submitter of a given
/// URL becomes the owner. Checkpoints and finalization are owner-only, which
/// is enforced by keying them on the record id handed out at insert.
#[allow(async_fn_in_trait)]
pub trait AnalysisStore {
    async fn begin_or_attach(&self, audio_url: &str) -> PipelineResult<BeginOutcome>;

    /// Apply a partial update to an in-progress record.
    async fn checkpoint(&self, record_id: &str, patch: RecordPatch) -> PipelineResult<()>;

    /// Write the terminal status together with the complete field set.
    async fn finalize(
        &self,
        record_id: &str,
        log: StatusLog,
        patch: RecordPatch,
    ) -> PipelineResult<()>;

    async fn find(&self, audio_url: &str) -> PipelineResult<Option<AnalysisRecord>>;
}

/// In-memory store for tests and single-process experiments.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    records: HashMap<String, AnalysisRecord>,
    /// record_id -> audio_url, for owner-only writes
    owners: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_record<T>(
        &self,
        record_id: &str,
        f: impl FnOnce(&mut AnalysisRecord) -> T,
    ) -> PipelineResult<T> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let url = inner
            .owners
            .get(record_id)
            .cloned()
            .ok_or_else(|| PipelineError::Storage(format!("unknown record id {record_id}")))?;
        let record = inner
            .records
            .get_mut(&url)
            .ok_or_else(|| PipelineError::Storage(format!("record missing for {url}")))?;
        Ok(f(record))
    }
}

impl AnalysisStore for MemoryStore {
    async fn begin_or_attach(&self, audio_url: &str) -> PipelineResult<BeginOutcome> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");

        if let Some(existing) = inner.records.get(audio_url) {
            return Ok(BeginOutcome::Reader {
                record: existing.clone(),
            });
        }

        let record = AnalysisRecord::pending(audio_url);
        let record_id = record.record_id.clone();
        inner.owners.insert(record_id.clone(), audio_url.to_string());
        inner.records.insert(audio_url.to_string(), record);
        debug!(%audio_url, %record_id, "inserted pending record");

        Ok(BeginOutcome::Owner { record_id })
    }

    async fn checkpoint(&self, record_id: &str, patch: RecordPatch) -> PipelineResult<()> {
        self.with_record(record_id, |record| patch.apply_to(record))
    }

    async fn finalize(
        &self,
        record_id: &str,
        log: StatusLog,
        patch: RecordPatch,
    ) -> PipelineResult<()> {
        self.with_record(record_id, |record| {
            patch.apply_to(record);
            record.logs = log;
        })
    }

    async fn find(&self, audio_url: &str) -> PipelineResult<Option<AnalysisRecord>> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.records.get(audio_url).cloned())
    }
}

/// File-backed store: one JSON document per audio URL.
///
/// The uniqueness constraint rides on `File::create_new` (O_EXCL), which the
/// filesystem guarantees to be atomic, so the owner/reader race behaves the
/// same across processes sharing a directory. Only the inserting process
/// holds the record id, so there is never a concurrent writer for one file;
/// updates land via rename so concurrent readers never observe a
/// half-written document.
pub struct FileStore {
    dir: PathBuf,
    owners: Mutex<HashMap<String, PathBuf>>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> PipelineResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| PipelineError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            owners: Mutex::new(HashMap::new()),
        })
    }

    fn record_path(&self, audio_url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record_key(audio_url)))
    }

    fn read_record(path: &Path) -> PipelineResult<AnalysisRecord> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Storage(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| PipelineError::Storage(format!("corrupt record {}: {e}", path.display())))
    }

    fn write_record(path: &Path, record: &AnalysisRecord) -> PipelineResult<()> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        // Readers attached over the same directory must never observe a
        // truncated document, so the update lands via rename.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| PipelineError::Storage(format!("cannot write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| PipelineError::Storage(format!("cannot replace {}: {e}", path.display())))
    }

    fn owned_path(&self, record_id: &str) -> PipelineResult<PathBuf> {
        self.owners
            .lock()
            .expect("store mutex poisoned")
            .get(record_id)
            .cloned()
            .ok_or_else(|| PipelineError::Storage(format!("unknown record id {record_id}")))
    }
}

/// Filename-safe key for an arbitrary URL. A fixed-width digest keeps the
/// name within filesystem limits no matter how long the signed link is; a
/// short sanitized tail of the URL keeps the directory browsable.
fn record_key(audio_url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    audio_url.hash(&mut hasher);

    let sanitized: String = audio_url
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let tail = &sanitized[sanitized.len().saturating_sub(16)..];

    format!("{:016x}-{tail}", hasher.finish())
}

impl AnalysisStore for FileStore {
    async fn begin_or_attach(&self, audio_url: &str) -> PipelineResult<BeginOutcome> {
        let path = self.record_path(audio_url);
        let record = AnalysisRecord::pending(audio_url);

        match std::fs::File::create_new(&path) {
            Ok(file) => {
                serde_json::to_writer_pretty(file, &record)
                    .map_err(|e| PipelineError::Storage(e.to_string()))?;
                let record_id = record.record_id;
                self.owners
                    .lock()
                    .expect("store mutex poisoned")
                    .insert(record_id.clone(), path);
                debug!(%audio_url, %record_id, "inserted pending record");
                Ok(BeginOutcome::Owner { record_id })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(BeginOutcome::Reader {
                record: Self::read_record(&path)?,
            }),
            Err(e) => Err(PipelineError::Storage(format!(
                "cannot create {}: {e}",
                path.display()
            ))),
        }
    }

    async fn checkpoint(&self, record_id: &str, patch: RecordPatch) -> PipelineResult<()> {
        let path = self.owned_path(record_id)?;
        let mut record = Self::read_record(&path)?;
        patch.apply_to(&mut record);
        Self::write_record(&path, &record)
    }

    async fn finalize(
        &self,
        record_id: &str,
        log: StatusLog,
        patch: RecordPatch,
    ) -> PipelineResult<()> {
        let path = self.owned_path(record_id)?;
        let mut record = Self::read_record(&path)?;
        patch.apply_to(&mut record);
        record.logs = log;
        Self::write_record(&path, &record)
    }

    async fn find(&self, audio_url: &str) -> PipelineResult<Option<AnalysisRecord>> {
        let path = self.record_path(audio_url);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunStatus, Transcript};

    const URL: &str = "https://example.com/call.mp3";

    #[tokio::test]
    async fn test_memory_second_begin_becomes_reader() {
        let store = MemoryStore::new();

        let first = store.begin_or_attach(URL).await.unwrap();
        assert!(matches!(first, BeginOutcome::Owner { .. }));

        let second = store.begin_or_attach(URL).await.unwrap();
        match second {
            BeginOutcome::Reader { record } => {
                assert_eq!(record.logs.status, RunStatus::Pending);
                assert!(record.transcript.is_none());
            }
            BeginOutcome::Owner { .. } => panic!("second caller must not own the record"),
        }
    }

    #[tokio::test]
    async fn test_memory_checkpoint_visible_to_reader() {
        let store = MemoryStore::new();
        let BeginOutcome::Owner { record_id } = store.begin_or_attach(URL).await.unwrap() else {
            panic!("expected owner");
        };

        store
            .checkpoint(
                &record_id,
                RecordPatch {
                    transcript: Some(Transcript::raw("partial")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let BeginOutcome::Reader { record } = store.begin_or_attach(URL).await.unwrap() else {
            panic!("expected reader");
        };
        assert_eq!(record.transcript, Some(Transcript::raw("partial")));
        assert!(record.summary.is_none());
        assert_eq!(record.logs.status, RunStatus::Pending);
    }

    #[tokio::test]
    async fn test_memory_checkpoint_requires_known_id() {
        let store = MemoryStore::new();
        let err = store
            .checkpoint("not-a-record", RecordPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage(_)));
    }

    #[tokio::test]
    async fn test_file_store_dedups_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let first_store = FileStore::open(dir.path()).unwrap();
        let BeginOutcome::Owner { record_id } = first_store.begin_or_attach(URL).await.unwrap()
        else {
            panic!("expected owner");
        };
        first_store
            .finalize(&record_id, StatusLog::success(), RecordPatch::default())
            .await
            .unwrap();

        // A separate instance over the same directory sees the existing key.
        let second_store = FileStore::open(dir.path()).unwrap();
        let BeginOutcome::Reader { record } = second_store.begin_or_attach(URL).await.unwrap()
        else {
            panic!("expected reader");
        };
        assert_eq!(record.logs.status, RunStatus::Success);
        assert_eq!(record.audio_url, URL);
    }

    #[tokio::test]
    async fn test_file_store_rejects_foreign_record_id() {
        let dir = tempfile::tempdir().unwrap();

        let owner_store = FileStore::open(dir.path()).unwrap();
        let BeginOutcome::Owner { record_id } = owner_store.begin_or_attach(URL).await.unwrap()
        else {
            panic!("expected owner");
        };

        // Another instance never received the id, so it cannot progress the record.
        let reader_store = FileStore::open(dir.path()).unwrap();
        let err = reader_store
            .checkpoint(&record_id, RecordPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage(_)));
    }

    #[tokio::test]
    async fn test_file_store_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.find(URL).await.unwrap().is_none());

        store.begin_or_attach(URL).await.unwrap();
        let found = store.find(URL).await.unwrap().unwrap();
        assert_eq!(found.audio_url, URL);
    }

    #[tokio::test]
    async fn test_file_store_accepts_long_signed_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let url = format!(
            "https://cdn.example.com/recordings/{}.mp3?X-Amz-Signature={}",
            "a".repeat(120),
            "b".repeat(120)
        );

        let BeginOutcome::Owner { .. } = store.begin_or_attach(&url).await.unwrap() else {
            panic!("expected owner");
        };
        let found = store.find(&url).await.unwrap().unwrap();
        assert_eq!(found.audio_url, url);
    }

    #[tokio::test]
    async fn test_checkpoint_leaves_single_parsable_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let BeginOutcome::Owner { record_id } = store.begin_or_attach(URL).await.unwrap() else {
            panic!("expected owner");
        };

        store
            .checkpoint(
                &record_id,
                RecordPatch {
                    transcript: Some(Transcript::raw("partial")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The replace-via-rename leaves no temp file behind and the record
        // stays readable throughout.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path().extension().is_some_and(|e| e == "json"));

        let found = store.find(URL).await.unwrap().unwrap();
        assert_eq!(found.transcript, Some(Transcript::raw("partial")));
    }

    #[test]
    fn test_record_key_is_bounded_and_distinct() {
        let long = format!("https://example.com/{}.mp3", "x".repeat(300));
        assert!(record_key(&long).len() <= 64);

        assert_ne!(
            record_key("https://example.com/a.mp3"),
            record_key("https://example.com/b.mp3")
        );
    }
}
