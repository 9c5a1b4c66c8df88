use crate::core::leveling::{Ledger, LedgerStore, StoreError};
use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// JSON-file ledger store. One file per community:
/// `<dir>/_<community_id>.json` holding `{ member_id: { xp, level } }`.
///
/// Every save writes a temp file next to the target and renames it over the
/// old one, so a crash mid-write leaves the previous ledger intact and readers
/// never see a half-written file.
pub struct JsonLedgerStore {
    dir: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn ledger_path(&self, community_id: u64) -> PathBuf {
        self.dir.join(format!("_{}.json", community_id))
    }
}

fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl LedgerStore for JsonLedgerStore {
    async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError> {
        match tokio::fs::read(self.ledger_path(community_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(ledger)?;
        let dir = self.dir.clone();
        let path = self.ledger_path(community_id);

        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &bytes))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
        tracing::debug!(community_id, members = ledger.len(), "Ledger saved");
        Ok(())
    }
}
