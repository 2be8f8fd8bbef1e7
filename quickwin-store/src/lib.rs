//! quickwin-store: validated task list with pluggable persistence.
//!
//! The store enforces the invariants the ranking core relies on (unique
//! increasing ids, priority 1..=5, positive durations) and persists the
//! full snapshot after every mutation.

pub mod error;
pub mod ids;
pub mod repo;
pub mod stats;
pub mod store;

pub use error::{Result, StoreError};
pub use ids::IdAllocator;
pub use repo::{JsonFileRepository, MemoryRepository, TaskRepository};
pub use stats::Statistics;
pub use store::{NewTask, TaskPatch, TaskStore};
