//! Domain model for the phone inventory.
//!
//! # Responsibility
//! - Define the persisted record shape and the closed supplier enumeration.
//! - Define the optional-field value map used by insert/update calls.
//!
//! # Invariants
//! - Every persisted record satisfies all field rules simultaneously.
//! - Record identity is an engine-assigned integer that is never reused.

pub mod phone;
pub mod values;
