pub mod ledger_models;
pub mod ledger_store;
pub mod leveling_service;
pub mod progression;

pub use ledger_models::{Ledger, LevelUpEvent, XpAward, XpRecord};
pub use ledger_store::{LedgerStore, SharedLedgerStore, StoreError};
pub use leveling_service::{LevelingError, LevelingService};
pub use progression::Progression;
