// Implementations for the ledger store.

#[cfg(test)]
pub mod in_memory;
pub mod json_store;
pub mod sqlite_store;

// Re-export for convenience
#[cfg(test)]
pub use in_memory::InMemoryLedgerStore;
pub use json_store::JsonLedgerStore;
pub use sqlite_store::SqliteLedgerStore;
