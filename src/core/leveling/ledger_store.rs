use super::ledger_models::Ledger;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(String),
}

/// Durable storage for per-community ledgers.
///
/// A store only has to make each `save` all-or-nothing: readers must see
/// either the previous ledger or the new one, never a mix. Serializing the
/// read-modify-write cycle is the leveling service's job, not the store's.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load a community's ledger. `None` when nothing was ever stored for it.
    async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError>;

    /// Replace the community's stored ledger with `ledger`.
    async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError>;

    /// Persist `ledger` after only `member_id`'s record changed.
    ///
    /// Whole-file backends just rewrite the ledger; row-based backends can
    /// override this to touch a single row.
    async fn save_member(
        &self,
        community_id: u64,
        ledger: &Ledger,
        _member_id: u64,
    ) -> Result<(), StoreError> {
        self.save(community_id, ledger).await
    }
}

/// Backend picked at startup from configuration.
pub type SharedLedgerStore = Arc<dyn LedgerStore>;

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError> {
        (**self).load(community_id).await
    }

    async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError> {
        (**self).save(community_id, ledger).await
    }

    async fn save_member(
        &self,
        community_id: u64,
        ledger: &Ledger,
        member_id: u64,
    ) -> Result<(), StoreError> {
        (**self).save_member(community_id, ledger, member_id).await
    }
}
