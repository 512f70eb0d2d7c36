//! turn_store - Durable, indexed storage for conversation turns
//!
//! The store is pure data access: uniqueness and lookup by thread or
//! opaque id, no business rules. Every operation touches a single
//! document; there is no multi-turn transaction, so cascade deletes
//! iterate one turn at a time.

mod error;
mod file_store;
mod memory_store;
mod store;

pub use error::{Result, StoreError};
pub use file_store::FileTurnStore;
pub use memory_store::MemoryTurnStore;
pub use store::{TurnPatch, TurnStore};
