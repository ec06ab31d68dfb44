//! Phone record and supplier enumeration.
//!
//! # Responsibility
//! - Define the canonical inventory record for one phone model.
//! - Define the closed set of supplier codes and its membership predicate.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never mutated or reused.
//! - `supplier` is always a member of the closed enumeration.
//! - `price` and `quantity` are never negative once persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a persisted phone record.
///
/// Assigned by the storage engine with auto-increment semantics: monotonic
/// within one store file, never reused after deletion.
pub type PhoneId = i64;

/// Error for supplier codes outside the closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSupplierCode(pub i64);

impl Display for UnknownSupplierCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown supplier code: {}", self.0)
    }
}

impl Error for UnknownSupplierCode {}

/// Closed set of supplier codes for a phone's manufacturer/source.
///
/// Stored and serialized as the integer code; `Unknown` is the schema
/// default for rows that predate supplier capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Supplier {
    Unknown,
    Apple,
    Sony,
    Huawei,
    Samsung,
}

impl Supplier {
    /// Returns the wire/storage code for this supplier.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Apple => 1,
            Self::Sony => 2,
            Self::Huawei => 3,
            Self::Samsung => 4,
        }
    }

    /// Membership predicate for the closed enumeration.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Apple),
            2 => Some(Self::Sony),
            3 => Some(Self::Huawei),
            4 => Some(Self::Samsung),
            _ => None,
        }
    }
}

impl From<Supplier> for i64 {
    fn from(value: Supplier) -> Self {
        value.code()
    }
}

impl TryFrom<i64> for Supplier {
    type Error = UnknownSupplierCode;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(UnknownSupplierCode(value))
    }
}

/// One fully-validated inventory row.
///
/// Instances only come out of the store, so holding a `Phone` implies every
/// field rule held at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Engine-assigned primary key.
    pub id: PhoneId,
    /// Phone model name. Never empty.
    pub name: String,
    /// Unit price in whole currency units. Never negative.
    pub price: i64,
    /// Supplier code from the closed enumeration.
    pub supplier: Supplier,
    /// Supplier contact number. Never empty.
    pub supplier_number: String,
    /// Units in stock. Never negative.
    pub quantity: i64,
}
