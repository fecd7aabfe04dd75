//! Domain model for tasks, profiles and progression tables.
//!
//! # Invariants
//! - Every task is identified by a store-assigned `TaskId`.
//! - Derived values (level, rank, progress) are never part of the model state.

pub mod achievement;
pub mod icon;
pub mod profile;
pub mod rank;
pub mod task;
