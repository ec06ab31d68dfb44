//! Inventory use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep UI shells decoupled from target construction and SQL details.

pub mod inventory_service;
