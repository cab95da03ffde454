//! # tally-core
//!
//! Core types, ID allocation, and error types for Tally.
//!
//! This crate provides the foundational types shared across all Tally crates:
//! - The `Task` entity, its creation draft, and the `TaskSet` aggregate
//! - Status and priority enums
//! - The canonical `Progress` representation and its normalization rules
//! - Sequential ID allocation over active and trashed tasks
//! - Partial updates (`TaskPatch`)
//! - The remote document shape exchanged with the sync backend
//! - Dashboard filtering and summaries over active tasks
//! - Cross-cutting error types

pub mod document;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod progress;
pub mod query;
pub mod updates;
