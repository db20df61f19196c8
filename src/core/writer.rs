//! Background writer that persists cart snapshots in submission order.
//!
//! Every snapshot carries a version. The writer drains whatever is queued,
//! writes only the newest snapshot and never writes a version that is not
//! greater than the last one it stored, so an older cart can never overwrite
//! a newer one.

use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, StorefrontError};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistStatus {
    /// Version of the newest snapshot that reached the store.
    pub written_version: u64,
    pub failed_attempts: u64,
    pub last_error: Option<String>,
}

impl PersistStatus {
    pub fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }
}

enum WriteCommand {
    Snapshot { version: u64, payload: String },
    Flush(oneshot::Sender<PersistStatus>),
}

pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
    status: watch::Receiver<PersistStatus>,
}

impl SnapshotWriter {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn<S: KeyValueStore>(store: Arc<S>, key: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PersistStatus::default());

        tokio::spawn(run_writer(store, key, rx, status_tx));

        Self {
            tx,
            status: status_rx,
        }
    }

    pub fn submit(&self, version: u64, payload: String) -> Result<()> {
        self.tx
            .send(WriteCommand::Snapshot { version, payload })
            .map_err(|_| StorefrontError::WriterClosed)
    }

    /// Resolves once every snapshot submitted before this call was attempted.
    pub async fn flush(&self) -> Result<PersistStatus> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriteCommand::Flush(ack))
            .map_err(|_| StorefrontError::WriterClosed)?;
        done.await.map_err(|_| StorefrontError::WriterClosed)
    }

    pub fn status(&self) -> PersistStatus {
        self.status.borrow().clone()
    }
}

async fn run_writer<S: KeyValueStore>(
    store: Arc<S>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
    status_tx: watch::Sender<PersistStatus>,
) {
    let mut status = PersistStatus::default();

    while let Some(command) = rx.recv().await {
        let mut pending: Option<(u64, String)> = None;
        let mut acks = Vec::new();

        let mut next = Some(command);
        while let Some(command) = next.take() {
            match command {
                WriteCommand::Snapshot { version, payload } => {
                    if pending.as_ref().map_or(true, |(v, _)| version > *v) {
                        pending = Some((version, payload));
                    }
                }
                WriteCommand::Flush(ack) => acks.push(ack),
            }
            next = rx.try_recv().ok();
        }

        if let Some((version, payload)) = pending {
            write_snapshot(store.as_ref(), &key, version, &payload, &mut status).await;
            status_tx.send_replace(status.clone());
        }

        for ack in acks {
            let _ = ack.send(status.clone());
        }
    }

    tracing::debug!("Snapshot writer for '{}' stopped", key);
}

async fn write_snapshot<S: KeyValueStore>(
    store: &S,
    key: &str,
    version: u64,
    payload: &str,
    status: &mut PersistStatus,
) {
    if version <= status.written_version {
        tracing::debug!(
            "Skipping stale cart snapshot v{} (v{} already stored)",
            version,
            status.written_version
        );
        return;
    }

    match store.set(key, payload).await {
        Ok(()) => {
            tracing::debug!("Stored cart snapshot v{} ({} bytes)", version, payload.len());
            status.written_version = version;
            status.last_error = None;
        }
        Err(e) => {
            tracing::warn!("Error saving cart to storage (snapshot v{}): {}", version, e);
            status.failed_attempts += 1;
            status.last_error = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<Vec<String>>,
        fail: bool,
    }

    impl KeyValueStore for RecordingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.writes.lock().await.last().cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail {
                return Err(StorefrontError::StorageWrite {
                    key: key.to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.writes.lock().await.push(value.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_flush_reports_newest_version() {
        let store = Arc::new(RecordingStore::default());
        let writer = SnapshotWriter::spawn(store.clone(), "cart".to_string());

        writer.submit(1, "[1]".to_string()).unwrap();
        writer.submit(2, "[1,2]".to_string()).unwrap();
        let status = writer.flush().await.unwrap();

        assert_eq!(status.written_version, 2);
        assert_eq!(status.failed_attempts, 0);
        assert_eq!(store.writes.lock().await.last().unwrap(), "[1,2]");
    }

    #[tokio::test]
    async fn test_stale_version_is_never_written() {
        let store = Arc::new(RecordingStore::default());
        let writer = SnapshotWriter::spawn(store.clone(), "cart".to_string());

        writer.submit(5, "new".to_string()).unwrap();
        writer.flush().await.unwrap();
        writer.submit(3, "old".to_string()).unwrap();
        let status = writer.flush().await.unwrap();

        assert_eq!(status.written_version, 5);
        let writes = store.writes.lock().await;
        assert_eq!(writes.as_slice(), ["new".to_string()]);
    }

    #[tokio::test]
    async fn test_failures_are_counted_once_per_attempt() {
        let store = Arc::new(RecordingStore {
            writes: Mutex::new(Vec::new()),
            fail: true,
        });
        let writer = SnapshotWriter::spawn(store, "cart".to_string());

        writer.submit(1, "[]".to_string()).unwrap();
        let first = writer.flush().await.unwrap();
        writer.submit(2, "[]".to_string()).unwrap();
        let second = writer.flush().await.unwrap();

        assert_eq!(first.failed_attempts, 1);
        assert_eq!(second.failed_attempts, 2);
        assert_eq!(second.written_version, 0);
        assert!(!second.is_healthy());
        assert_eq!(writer.status(), second);
    }

    #[tokio::test]
    async fn test_flush_without_snapshots() {
        let store = Arc::new(RecordingStore::default());
        let writer = SnapshotWriter::spawn(store.clone(), "cart".to_string());

        let status = writer.flush().await.unwrap();
        assert_eq!(status, PersistStatus::default());
        assert!(store.writes.lock().await.is_empty());
    }
}
