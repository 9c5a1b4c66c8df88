// Domain models for the XP ledger.
//
// A ledger belongs to exactly one community (guild) and maps member IDs to
// their XP record. The on-disk shape is a plain JSON object:
//
//     { "<member_id>": { "xp": 125, "level": 1 }, ... }
//
// Member order matters: it is the insertion order of the first award and is
// used to break leaderboard ties, so the ledger keeps its entries in a Vec
// and only uses the HashMap as an index.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// XP state of one member inside one community.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRecord {
    pub xp: u64,
    pub level: u64,
}

/// All XP records of a single community, in first-award order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<(u64, XpRecord)>,
    index: HashMap<u64, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based first-award position of a member.
    pub fn position(&self, member_id: u64) -> Option<usize> {
        self.index.get(&member_id).copied()
    }

    pub fn get(&self, member_id: u64) -> Option<&XpRecord> {
        self.index.get(&member_id).map(|&i| &self.entries[i].1)
    }

    /// Fetch a member's record, appending a zeroed one if the member is new.
    pub fn record_mut(&mut self, member_id: u64) -> &mut XpRecord {
        let position = match self.index.get(&member_id) {
            Some(&i) => i,
            None => {
                self.entries.push((member_id, XpRecord::default()));
                let i = self.entries.len() - 1;
                self.index.insert(member_id, i);
                i
            }
        };
        &mut self.entries[position].1
    }

    /// Insert or replace a record. Replacing keeps the existing position.
    pub fn insert(&mut self, member_id: u64, record: XpRecord) {
        *self.record_mut(member_id) = record;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &XpRecord)> {
        self.entries.iter().map(|(id, record)| (*id, record))
    }

    /// Highest XP first. The sort is stable, so equal XP keeps insertion order.
    pub fn top(&self, limit: usize) -> Vec<(u64, XpRecord)> {
        let mut ranked: Vec<(u64, XpRecord)> = self.entries.clone();
        ranked.sort_by(|a, b| b.1.xp.cmp(&a.1.xp));
        ranked.truncate(limit);
        ranked
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (member_id, record) in &self.entries {
            map.serialize_entry(member_id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LedgerVisitor;

        impl<'de> Visitor<'de> for LedgerVisitor {
            type Value = Ledger;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of member IDs to XP records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Ledger, A::Error> {
                let mut ledger = Ledger::new();
                while let Some((member_id, record)) = access.next_entry::<u64, XpRecord>()? {
                    ledger.insert(member_id, record);
                }
                Ok(ledger)
            }
        }

        deserializer.deserialize_map(LedgerVisitor)
    }
}

/// Returned when an award moves a member to a higher level.
/// The dispatch layer turns this into exactly one announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpEvent {
    pub community_id: u64,
    pub member_id: u64,
    pub old_level: u64,
    pub new_level: u64,
    pub total_xp: u64,
}

/// Outcome of a committed XP award.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAward {
    pub amount: u64,
    pub total_xp: u64,
    pub level: u64,
    pub level_up: Option<LevelUpEvent>,
}

/// Read-only view of one member, used by the level card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberStanding {
    pub member_id: u64,
    pub xp: u64,
    pub level: u64,
    pub level_floor: u64,
    pub next_level_xp: u64,
}

/// One leaderboard row. `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub member_id: u64,
    pub xp: u64,
    pub level: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_members_start_at_zero() {
        let mut ledger = Ledger::new();
        let record = ledger.record_mut(42);
        assert_eq!(*record, XpRecord { xp: 0, level: 0 });
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn serializes_to_member_keyed_object() {
        let mut ledger = Ledger::new();
        ledger.insert(2, XpRecord { xp: 40, level: 2 });
        ledger.insert(1, XpRecord { xp: 5, level: 0 });

        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(
            json,
            r#"{"2":{"xp":40,"level":2},"1":{"xp":5,"level":0}}"#
        );
    }

    #[test]
    fn reads_existing_ledger_files_in_file_order() {
        let raw = r#"{
            "300": { "xp": 10, "level": 1 },
            "100": { "xp": 99, "level": 1 },
            "200": { "xp": 10, "level": 1 }
        }"#;

        let ledger: Ledger = serde_json::from_str(raw).unwrap();
        let ids: Vec<u64> = ledger.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![300, 100, 200]);
        assert_eq!(ledger.get(100).map(|r| r.xp), Some(99));
    }

    #[test]
    fn top_breaks_ties_by_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.insert(1, XpRecord { xp: 50, level: 0 });
        ledger.insert(2, XpRecord { xp: 80, level: 0 });
        ledger.insert(3, XpRecord { xp: 50, level: 0 });
        ledger.insert(4, XpRecord { xp: 10, level: 0 });

        let ids: Vec<u64> = ledger.top(3).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn reinserting_keeps_position() {
        let mut ledger = Ledger::new();
        ledger.insert(1, XpRecord { xp: 1, level: 0 });
        ledger.insert(2, XpRecord { xp: 2, level: 0 });
        ledger.insert(1, XpRecord { xp: 3, level: 0 });

        let ids: Vec<u64> = ledger.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(ledger.get(1).map(|r| r.xp), Some(3));
    }
}
