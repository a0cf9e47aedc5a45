//! Core types and trait definitions for the Progression event archival tools.
//!
//! This crate is deliberately free of database and CLI dependencies. It holds
//! the event record, the archival action types, the case-progression
//! aggregate and the `EventStore` abstraction that backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod action;
pub mod aggregate;
pub mod error;
pub mod event;
pub mod progression;
pub mod store;

pub use error::{Error, Result};
