//! quickwin-core: ranking and budget selection for task lists.
//!
//! Everything here is a pure function of a task snapshot and an explicit
//! reference instant. Nothing is mutated, persisted or logged.

pub mod capacity;
pub mod clock;
pub mod query;
pub mod rank;
pub mod score;
pub mod task;
pub mod time;

pub use capacity::select_within_budget;
pub use clock::{Clock, FixedClock, SystemClock};
pub use query::{is_feasible, sort_by_deadline, total_duration};
pub use rank::{RankedTask, rank, rank_scored};
pub use score::{ScoreBreakdown, effort, priority_term, score, score_breakdown, urgency};
pub use task::{Task, TaskId};
