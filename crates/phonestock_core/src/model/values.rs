//! Optional-field value map for insert/update calls.
//!
//! # Responsibility
//! - Carry caller-supplied field values as an explicit optional subset.
//! - Enforce per-field rules before any write reaches storage.
//!
//! # Invariants
//! - Insert validation requires every field present and valid.
//! - Update validation checks only the fields that are present.
//! - The first violated rule is reported, in the fixed field precedence
//!   name, supplier, supplier_number, price, quantity.

use crate::model::phone::Supplier;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column identifier for a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Supplier,
    SupplierNumber,
    Price,
    Quantity,
}

impl Field {
    /// Returns the column identifier this field maps to.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Supplier => "supplier",
            Self::SupplierNumber => "supplier_number",
            Self::Price => "price",
            Self::Quantity => "quantity",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First violated field rule for an insert or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value for `{}`: {}", self.field, self.reason)
    }
}

impl Error for ValidationError {}

/// Fully-validated field set borrowed from a [`PhoneValues`].
///
/// Produced by [`PhoneValues::validate_insert`]; existence of a value of
/// this type means every field was present and every rule held.
#[derive(Debug, Clone, Copy)]
pub struct ValidPhone<'v> {
    pub name: &'v str,
    pub price: i64,
    pub supplier: Supplier,
    pub supplier_number: &'v str,
    pub quantity: i64,
}

/// Caller-supplied field subset for one insert or update call.
///
/// Absent fields are left untouched by update and rejected by insert. The
/// supplier is carried as a raw code until validation so that out-of-range
/// input surfaces as a [`ValidationError`] instead of being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneValues {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub supplier_code: Option<i64>,
    pub supplier_number: Option<String>,
    pub quantity: Option<i64>,
}

impl PhoneValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_supplier(mut self, supplier: Supplier) -> Self {
        self.supplier_code = Some(supplier.code());
        self
    }

    pub fn with_supplier_code(mut self, code: i64) -> Self {
        self.supplier_code = Some(code);
        self
    }

    pub fn with_supplier_number(mut self, number: impl Into<String>) -> Self {
        self.supplier_number = Some(number.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Returns whether no field is present at all.
    ///
    /// An empty value map short-circuits update to an affected count of 0.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.supplier_code.is_none()
            && self.supplier_number.is_none()
            && self.quantity.is_none()
    }

    /// Validates the complete field set for record creation.
    ///
    /// Every field must be present and valid; a missing field is reported
    /// against its own precedence slot with a `required` reason.
    pub fn validate_insert(&self) -> Result<ValidPhone<'_>, ValidationError> {
        let name = match self.name.as_deref() {
            Some(name) => valid_name(name)?,
            None => return Err(required(Field::Name)),
        };
        let supplier = match self.supplier_code {
            Some(code) => valid_supplier(code)?,
            None => return Err(required(Field::Supplier)),
        };
        let supplier_number = match self.supplier_number.as_deref() {
            Some(number) => valid_supplier_number(number)?,
            None => return Err(required(Field::SupplierNumber)),
        };
        let price = match self.price {
            Some(price) => valid_price(price)?,
            None => return Err(required(Field::Price)),
        };
        let quantity = match self.quantity {
            Some(quantity) => valid_quantity(quantity)?,
            None => return Err(required(Field::Quantity)),
        };

        Ok(ValidPhone {
            name,
            price,
            supplier,
            supplier_number,
            quantity,
        })
    }

    /// Validates only the fields present, for a partial update.
    pub fn validate_update(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            valid_name(name)?;
        }
        if let Some(code) = self.supplier_code {
            valid_supplier(code)?;
        }
        if let Some(number) = self.supplier_number.as_deref() {
            valid_supplier_number(number)?;
        }
        if let Some(price) = self.price {
            valid_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            valid_quantity(quantity)?;
        }
        Ok(())
    }
}

fn required(field: Field) -> ValidationError {
    ValidationError::new(field, "value is required")
}

fn valid_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(Field::Name, "value must not be empty"));
    }
    Ok(name)
}

fn valid_supplier(code: i64) -> Result<Supplier, ValidationError> {
    Supplier::from_code(code).ok_or_else(|| {
        ValidationError::new(
            Field::Supplier,
            format!("code {code} is not a recognized supplier"),
        )
    })
}

fn valid_supplier_number(number: &str) -> Result<&str, ValidationError> {
    if number.trim().is_empty() {
        return Err(ValidationError::new(
            Field::SupplierNumber,
            "value must not be empty",
        ));
    }
    Ok(number)
}

fn valid_price(price: i64) -> Result<i64, ValidationError> {
    if price < 0 {
        return Err(ValidationError::new(
            Field::Price,
            "value must not be negative",
        ));
    }
    Ok(price)
}

fn valid_quantity(quantity: i64) -> Result<i64, ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::new(
            Field::Quantity,
            "value must not be negative",
        ));
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::{Field, PhoneValues};
    use crate::model::phone::Supplier;

    fn complete() -> PhoneValues {
        PhoneValues::new()
            .with_name("Xperia XZ2")
            .with_price(500)
            .with_supplier(Supplier::Sony)
            .with_supplier_number("079123456")
            .with_quantity(50)
    }

    #[test]
    fn complete_values_pass_insert_validation() {
        let values = complete();
        let valid = values.validate_insert().expect("complete set should pass");
        assert_eq!(valid.name, "Xperia XZ2");
        assert_eq!(valid.supplier, Supplier::Sony);
        assert_eq!(valid.quantity, 50);
    }

    #[test]
    fn insert_requires_every_field() {
        let mut values = complete();
        values.price = None;
        let err = values.validate_insert().expect_err("missing price");
        assert_eq!(err.field, Field::Price);
        assert!(err.reason.contains("required"));
    }

    #[test]
    fn first_violation_wins_in_precedence_order() {
        // Both the name and the quantity are invalid; name is reported.
        let values = complete().with_name("   ").with_quantity(-3);
        let err = values.validate_insert().expect_err("two violations");
        assert_eq!(err.field, Field::Name);

        // With the name fixed, the quantity violation surfaces.
        let values = complete().with_quantity(-3);
        let err = values.validate_insert().expect_err("quantity violation");
        assert_eq!(err.field, Field::Quantity);
    }

    #[test]
    fn update_checks_only_present_fields() {
        let values = PhoneValues::new().with_quantity(5);
        values.validate_update().expect("single valid field");

        let values = PhoneValues::new().with_supplier_code(99);
        let err = values.validate_update().expect_err("bad supplier code");
        assert_eq!(err.field, Field::Supplier);
    }

    #[test]
    fn empty_values_are_empty_and_pass_update_validation() {
        let values = PhoneValues::new();
        assert!(values.is_empty());
        values.validate_update().expect("nothing to validate");
    }

    #[test]
    fn boundary_zero_is_valid_for_price_and_quantity() {
        let values = complete().with_price(0).with_quantity(0);
        values.validate_insert().expect("zero is within bounds");

        let err = complete()
            .with_price(-1)
            .validate_insert()
            .expect_err("negative price");
        assert_eq!(err.field, Field::Price);
    }
}
