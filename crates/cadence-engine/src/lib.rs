//! # cadence-engine
//!
//! Recurring event expansion and group free-slot search.
//!
//! Event definitions (an anchor interval plus a repetition rule) are expanded on
//! demand into the concrete occurrences overlapping a query window. The
//! occurrences of a group of users can then be swept to find the earliest
//! interval of a requested length that is free for all of them.
//!
//! All timestamps are naive civil date-times in one shared calendar.
//!
//! ## Modules
//!
//! - [`definition`]: stored event definitions and repetition rules
//! - [`calendar`]: clamping month/year arithmetic
//! - [`selector`]: cheap over-approximate candidate filter
//! - [`expander`]: definition + window → lazy occurrence iterator
//! - [`aggregator`]: all occurrences for a set of users
//! - [`gap`]: earliest common free interval
//! - [`store`]: the storage seam and an in-memory store
//! - [`scheduler`]: validated caller-facing operations
//! - [`config`]: scheduler limits
//! - [`error`]: error types

pub mod aggregator;
pub mod calendar;
pub mod config;
pub mod definition;
pub mod error;
pub mod expander;
pub mod gap;
pub mod scheduler;
pub mod selector;
pub mod store;

pub use config::SchedulerConfig;
pub use definition::{EventDefinition, RepetitionRule, UserId};
pub use error::CadenceError;
pub use expander::{expand, expand_all, Occurrence, Occurrences};
pub use gap::{find_gap, Interval};
pub use scheduler::Scheduler;
pub use store::{EventStore, InMemoryStore};
