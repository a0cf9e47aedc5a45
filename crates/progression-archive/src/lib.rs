//! Event-archival rules for the Progression event log.
//!
//! Each persisted event is judged on its own by one or more
//! [`policy::ArchivalPolicy`] implementations, which return a
//! [`progression_core::action::Decision`]: keep it, deactivate it (and
//! possibly its stream), or move it to another stream. Decisions are pure;
//! the [`pipeline`] module applies them to an
//! [`EventStore`](progression_core::store::EventStore).

pub mod catalog;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod reference;
pub mod registry;
pub mod rules;

pub use engine::{ArchivalEngine, StreamListPaths};
pub use error::{Error, Result};
pub use pipeline::{RunSummary, run_archival};
