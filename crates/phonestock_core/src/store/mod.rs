//! Store layer: target addressing, change notification and persistence.
//!
//! # Responsibility
//! - Resolve caller-supplied targets to collection or single-record scope.
//! - Own the observer registry for change notifications.
//! - Execute validated CRUD over the `phones` table.
//!
//! # Invariants
//! - Write paths validate field values before any SQL mutation.
//! - A change notification is emitted only when a mutation had an effect.

pub mod notify;
pub mod phone_store;
pub mod target;
