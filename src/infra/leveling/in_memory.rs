// In-memory implementation of LedgerStore.
//
// Nothing survives a restart, so the bot itself never uses this; it backs the
// service and dispatch tests where we care about the locking and level logic
// rather than the disk.

use crate::core::leveling::{Ledger, LedgerStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

/// Maps community_id -> ledger.
pub struct InMemoryLedgerStore {
    ledgers: DashMap<u64, Ledger>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            ledgers: DashMap::new(),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError> {
        Ok(self
            .ledgers
            .get(&community_id)
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError> {
        self.ledgers.insert(community_id, ledger.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leveling::XpRecord;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryLedgerStore::new();

        // Unknown community has no ledger at all
        assert!(store.load(456).await.unwrap().is_none());

        let mut ledger = Ledger::new();
        ledger.insert(123, XpRecord { xp: 100, level: 1 });
        store.save(456, &ledger).await.unwrap();

        let loaded = store.load(456).await.unwrap().unwrap();
        assert_eq!(loaded.get(123), Some(&XpRecord { xp: 100, level: 1 }));

        // Other communities stay isolated
        assert!(store.load(789).await.unwrap().is_none());
    }
}
