//! Target addressing for store operations.
//!
//! # Responsibility
//! - Parse path-style addresses into a typed target exactly once, at the
//!   boundary.
//! - Render targets back to their canonical path form.
//!
//! # Invariants
//! - Only two shapes exist: the whole collection and one record by id.
//! - Record ids are positive; anything else is unroutable.

use crate::model::phone::PhoneId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Path segment addressing the whole collection.
pub const COLLECTION_PATH: &str = "phones";

/// Address for a store operation: the whole collection or one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Collection,
    Record(PhoneId),
}

/// Malformed address. A caller programming error, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnroutableTarget(pub String);

impl Display for UnroutableTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unroutable target: `{}`", self.0)
    }
}

impl Error for UnroutableTarget {}

impl Target {
    /// Parses `"phones"` or `"phones/{id}"` with a positive integer id.
    pub fn parse(input: &str) -> Result<Self, UnroutableTarget> {
        if input == COLLECTION_PATH {
            return Ok(Self::Collection);
        }

        let id_part = input
            .strip_prefix(COLLECTION_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| UnroutableTarget(input.to_string()))?;

        // Plain digits only: no sign, no further path segments.
        if id_part.is_empty() || !id_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UnroutableTarget(input.to_string()));
        }

        match id_part.parse::<PhoneId>() {
            Ok(id) if id >= 1 => Ok(Self::Record(id)),
            _ => Err(UnroutableTarget(input.to_string())),
        }
    }

    /// Returns whether an event for `other` is visible to a listener
    /// registered on `self`.
    ///
    /// The collection overlaps every target; two record targets overlap only
    /// when they name the same id.
    pub fn overlaps(self, other: Target) -> bool {
        match (self, other) {
            (Self::Collection, _) | (_, Self::Collection) => true,
            (Self::Record(a), Self::Record(b)) => a == b,
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => f.write_str(COLLECTION_PATH),
            Self::Record(id) => write!(f, "{COLLECTION_PATH}/{id}"),
        }
    }
}
