// This is the leveling service - all business logic for XP and levels.
// Like the rest of `core`, it has NO Discord-specific code: it works with
// plain u64 IDs so the dispatch engine (or a test) can drive it directly.
//
// The one hazard here is the read-modify-write on a community's ledger. A
// burst of messages in one guild means several awards for the same ledger
// in flight at once, so every award takes that community's mutex for the
// whole load -> modify -> save cycle. Different communities have different
// mutexes and never wait on each other.

use super::ledger_models::{LeaderboardEntry, LevelUpEvent, MemberStanding, XpAward};
use super::ledger_store::{LedgerStore, StoreError};
use super::progression::{message_xp, Progression};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum LevelingError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid member or community ID")]
    InvalidId,

    #[error("Level base must be a positive integer")]
    InvalidLevelBase,
}

/// The main service for leveling operations.
///
/// Generic over the storage backend so tests can run against the in-memory
/// store while the bot runs against JSON files or SQLite.
pub struct LevelingService<S: LedgerStore> {
    store: S,
    progression: Progression,
    /// One lock per community, created on first award.
    locks: DashMap<u64, Arc<Mutex<()>>>,
}

impl<S: LedgerStore> LevelingService<S> {
    pub fn new(store: S, progression: Progression) -> Self {
        Self {
            store,
            progression,
            locks: DashMap::new(),
        }
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    fn validate_ids(community_id: u64, member_id: u64) -> Result<(), LevelingError> {
        if community_id == 0 || member_id == 0 {
            Err(LevelingError::InvalidId)
        } else {
            Ok(())
        }
    }

    fn community_lock(&self, community_id: u64) -> Arc<Mutex<()>> {
        self.locks
            .entry(community_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Award the XP a chat message is worth (length times factor, capped).
    pub async fn award_message_xp(
        &self,
        community_id: u64,
        member_id: u64,
        content: &str,
        xp_factor: u64,
    ) -> Result<XpAward, LevelingError> {
        let amount = message_xp(content.chars().count(), xp_factor);
        self.award_xp(community_id, member_id, amount).await
    }

    /// Add `amount` XP to a member and persist the community's ledger.
    ///
    /// **Returns:**
    /// - `Ok(award)` with `award.level_up` set when the stored level went up
    /// - `Err(LevelingError::Storage)` when the ledger could not be read or
    ///   written; nothing is committed in that case
    pub async fn award_xp(
        &self,
        community_id: u64,
        member_id: u64,
        amount: u64,
    ) -> Result<XpAward, LevelingError> {
        Self::validate_ids(community_id, member_id)?;

        let lock = self.community_lock(community_id);
        let _guard = lock.lock().await;

        let mut ledger = self.store.load(community_id).await?.unwrap_or_default();
        let record = ledger.record_mut(member_id);

        let old_level = record.level;
        record.xp = record.xp.saturating_add(amount);
        record.level = self.progression.level_for_xp(record.xp);
        let (total_xp, new_level) = (record.xp, record.level);

        self.store.save_member(community_id, &ledger, member_id).await?;

        // Stored levels written under an older level base can sit above the
        // recomputed one; that is a correction, not a level-up.
        let level_up = (new_level > old_level).then(|| LevelUpEvent {
            community_id,
            member_id,
            old_level,
            new_level,
            total_xp,
        });

        Ok(XpAward {
            amount,
            total_xp,
            level: new_level,
            level_up,
        })
    }

    /// A member's XP and level, or `None` when they have no record yet.
    pub async fn member_standing(
        &self,
        community_id: u64,
        member_id: u64,
    ) -> Result<Option<MemberStanding>, LevelingError> {
        Self::validate_ids(community_id, member_id)?;

        let Some(ledger) = self.store.load(community_id).await? else {
            return Ok(None);
        };

        Ok(ledger.get(member_id).map(|record| {
            let level = self.progression.level_for_xp(record.xp);
            MemberStanding {
                member_id,
                xp: record.xp,
                level,
                level_floor: self.progression.level_floor(level),
                next_level_xp: self.progression.next_level_threshold(level),
            }
        }))
    }

    /// Top `limit` members by XP. `None` when the community has no ledger or
    /// the ledger holds no records yet.
    pub async fn leaderboard(
        &self,
        community_id: u64,
        limit: usize,
    ) -> Result<Option<Vec<LeaderboardEntry>>, LevelingError> {
        if community_id == 0 {
            return Err(LevelingError::InvalidId);
        }

        let Some(ledger) = self.store.load(community_id).await? else {
            return Ok(None);
        };
        if ledger.is_empty() {
            return Ok(None);
        }

        let entries = ledger
            .top(limit)
            .into_iter()
            .enumerate()
            .map(|(i, (member_id, record))| LeaderboardEntry {
                rank: i + 1,
                member_id,
                xp: record.xp,
                level: self.progression.level_for_xp(record.xp),
            })
            .collect();

        Ok(Some(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leveling::{Ledger, XpRecord};
    use crate::infra::leveling::InMemoryLedgerStore;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn make_service(level_base: u64) -> LevelingService<Arc<InMemoryLedgerStore>> {
        LevelingService::new(
            Arc::new(InMemoryLedgerStore::new()),
            Progression::new(level_base).unwrap(),
        )
    }

    #[tokio::test]
    async fn first_long_message_reaches_level_one() {
        let service = make_service(20);
        let content = "x".repeat(50);

        let award = service.award_message_xp(1, 7, &content, 1).await.unwrap();

        assert_eq!(award.amount, 25);
        assert_eq!(award.total_xp, 25);
        assert_eq!(award.level, 1);
        assert_eq!(
            award.level_up,
            Some(LevelUpEvent {
                community_id: 1,
                member_id: 7,
                old_level: 0,
                new_level: 1,
                total_xp: 25,
            })
        );
    }

    #[tokio::test]
    async fn level_ups_follow_level_changes_not_message_count() {
        let service = make_service(20);
        let content = "x".repeat(50);

        let mut reached = Vec::new();
        for _ in 0..4 {
            let award = service.award_message_xp(1, 7, &content, 1).await.unwrap();
            if let Some(level_up) = award.level_up {
                reached.push(level_up.new_level);
            }
        }

        assert_eq!(reached, vec![1, 2, 3, 5]);
        let standing = service.member_standing(1, 7).await.unwrap().unwrap();
        assert_eq!(standing.xp, 100);
        assert_eq!(standing.level, 5);
        assert_eq!(standing.next_level_xp, 120);
    }

    #[tokio::test]
    async fn small_awards_do_not_level_up() {
        let service = make_service(100);

        let award = service.award_xp(1, 7, 10).await.unwrap();
        assert!(award.level_up.is_none());
        assert_eq!(award.level, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_awards_lose_nothing_and_announce_once() {
        let service = Arc::new(make_service(10));

        let mut handles = Vec::new();
        for i in 0..200u64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let member = 1 + (i % 4);
                service.award_xp(9, member, 1).await.unwrap()
            }));
        }

        let mut level_ups = 0;
        for handle in handles {
            if handle.await.unwrap().level_up.is_some() {
                level_ups += 1;
            }
        }

        for member in 1..=4 {
            let standing = service.member_standing(9, member).await.unwrap().unwrap();
            assert_eq!(standing.xp, 50);
            assert_eq!(standing.level, 5);
        }
        // 4 members x 5 boundaries each
        assert_eq!(level_ups, 20);
    }

    #[tokio::test]
    async fn stale_stored_level_is_corrected_without_announcement() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let mut ledger = Ledger::new();
        ledger.insert(7, XpRecord { xp: 5, level: 1 });
        store.save(1, &ledger).await.unwrap();

        let service = LevelingService::new(Arc::clone(&store), Progression::new(20).unwrap());
        let award = service.award_xp(1, 7, 3).await.unwrap();

        assert!(award.level_up.is_none());
        let stored = store.load(1).await.unwrap().unwrap();
        assert_eq!(stored.get(7), Some(&XpRecord { xp: 8, level: 0 }));
    }

    #[tokio::test]
    async fn leaderboard_is_none_without_ledger() {
        let service = make_service(20);
        assert_eq!(service.leaderboard(1, 10).await.unwrap(), None);
        assert_eq!(service.member_standing(1, 7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn leaderboard_ranks_top_ten() {
        let service = make_service(20);
        for member in 1..=12u64 {
            service.award_xp(3, member, member * 10).await.unwrap();
        }

        let board = service.leaderboard(3, 10).await.unwrap().unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].member_id, 12);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].level, 6);
        assert_eq!(board[9].member_id, 3);
    }

    #[tokio::test]
    async fn invalid_ids_are_rejected() {
        let service = make_service(20);
        assert!(matches!(
            service.award_xp(0, 1, 5).await,
            Err(LevelingError::InvalidId)
        ));
        assert!(matches!(
            service.award_xp(1, 0, 5).await,
            Err(LevelingError::InvalidId)
        ));
    }

    struct BrokenStore;

    #[async_trait]
    impl LedgerStore for BrokenStore {
        async fn load(&self, _: u64) -> Result<Option<Ledger>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _: u64, _: &Ledger) -> Result<(), StoreError> {
            Err(StoreError::Database("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn persistence_failures_are_reported() {
        let service = LevelingService::new(BrokenStore, Progression::new(20).unwrap());

        let err = service.award_xp(1, 7, 25).await.unwrap_err();
        assert!(matches!(err, LevelingError::Storage(_)));
        assert!(err.to_string().contains("disk full"));
    }

    /// Holds every save for community 1 until `release` fires.
    struct GatedStore {
        inner: InMemoryLedgerStore,
        parked: Notify,
        release: Notify,
    }

    #[async_trait]
    impl LedgerStore for GatedStore {
        async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError> {
            self.inner.load(community_id).await
        }

        async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError> {
            if community_id == 1 {
                self.parked.notify_one();
                self.release.notified().await;
            }
            self.inner.save(community_id, ledger).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stalled_community_does_not_block_another() {
        let store = Arc::new(GatedStore {
            inner: InMemoryLedgerStore::new(),
            parked: Notify::new(),
            release: Notify::new(),
        });
        let service = Arc::new(LevelingService::new(
            Arc::clone(&store),
            Progression::new(20).unwrap(),
        ));

        let stalled = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.award_xp(1, 7, 5).await })
        };
        // Community 1 now holds its lock inside save
        store.parked.notified().await;

        let other = tokio::time::timeout(Duration::from_secs(5), service.award_xp(2, 7, 5)).await;
        let award = other.expect("community 2 waited on community 1").unwrap();
        assert_eq!(award.total_xp, 5);
        assert!(!stalled.is_finished());

        store.release.notify_one();
        assert_eq!(stalled.await.unwrap().unwrap().total_xp, 5);
    }
}
