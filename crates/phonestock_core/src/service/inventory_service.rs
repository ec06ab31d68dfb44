//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for embedding shells.
//! - Implement stock movements (sales, deliveries) through the validated
//!   update path.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Stock can never go below zero; an oversold decrement fails before any
//!   write.

use crate::model::phone::{Phone, PhoneId, Supplier};
use crate::model::values::{Field, PhoneValues, ValidationError};
use crate::store::notify::{ChangeListener, SubscriptionId};
use crate::store::phone_store::{PhoneListQuery, PhoneStore, StoreError, StoreResult};
use crate::store::target::Target;
use log::info;

/// Use-case service wrapper over a phone store implementation.
pub struct InventoryService<S: PhoneStore> {
    store: S,
}

impl<S: PhoneStore> InventoryService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a new phone record from a complete field set.
    pub fn insert_phone(&self, values: &PhoneValues) -> StoreResult<PhoneId> {
        self.store.insert(values)
    }

    /// Inserts one hard-coded sample record. For demos and debugging.
    pub fn insert_sample(&self) -> StoreResult<PhoneId> {
        let values = PhoneValues::new()
            .with_name("Xperia XZ2")
            .with_price(500)
            .with_supplier(Supplier::Sony)
            .with_supplier_number("079123456")
            .with_quantity(50);
        self.store.insert(&values)
    }

    /// Applies a partial field set to one record by id.
    pub fn update_phone(&self, id: PhoneId, values: &PhoneValues) -> StoreResult<usize> {
        self.store.update(&Target::Record(id), values)
    }

    /// Gets one record by id.
    pub fn get_phone(&self, id: PhoneId) -> StoreResult<Phone> {
        self.store.get(id)
    }

    /// Lists all records matching the query options.
    pub fn list_phones(&self, query: &PhoneListQuery) -> StoreResult<Vec<Phone>> {
        self.store.list(&Target::Collection, query)
    }

    /// Removes one record by id. Returns the number of rows removed (0 or 1).
    pub fn delete_phone(&self, id: PhoneId) -> StoreResult<usize> {
        self.store.delete(&Target::Record(id))
    }

    /// Removes every record in the collection.
    pub fn delete_all(&self) -> StoreResult<usize> {
        let removed = self.store.delete(&Target::Collection)?;
        info!("event=delete_all module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Records the sale of one unit, returning the remaining quantity.
    ///
    /// Runs through the normal update path, so selling at zero stock fails
    /// with a quantity validation error and writes nothing.
    pub fn sell_one(&self, id: PhoneId) -> StoreResult<i64> {
        let phone = self.store.get(id)?;
        let remaining = phone.quantity - 1;

        let changed = self.store.update(
            &Target::Record(id),
            &PhoneValues::new().with_quantity(remaining),
        )?;
        if changed == 0 {
            // Deleted between the read and the write.
            return Err(StoreError::NotFound(id));
        }
        Ok(remaining)
    }

    /// Records a stock delivery of `count` units, returning the new quantity.
    pub fn receive_delivery(&self, id: PhoneId, count: i64) -> StoreResult<i64> {
        if count <= 0 {
            return Err(StoreError::Validation(ValidationError::new(
                Field::Quantity,
                "delivery count must be positive",
            )));
        }

        let phone = self.store.get(id)?;
        let stocked = phone.quantity + count;

        let changed = self.store.update(
            &Target::Record(id),
            &PhoneValues::new().with_quantity(stocked),
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(stocked)
    }

    /// Resolves a path-style address and lists the records it covers.
    ///
    /// Accepts `"phones"` or `"phones/{id}"`; anything else is unroutable.
    pub fn list_at(&self, address: &str, query: &PhoneListQuery) -> StoreResult<Vec<Phone>> {
        let target = Target::parse(address)?;
        self.store.list(&target, query)
    }

    /// Resolves a path-style address and applies a partial update to it.
    pub fn update_at(&self, address: &str, values: &PhoneValues) -> StoreResult<usize> {
        let target = Target::parse(address)?;
        self.store.update(&target, values)
    }

    /// Resolves a path-style address and removes every record it covers.
    pub fn delete_at(&self, address: &str) -> StoreResult<usize> {
        let target = Target::parse(address)?;
        self.store.delete(&target)
    }

    /// Registers a change listener through the underlying store.
    pub fn subscribe(&self, target: Target, listener: ChangeListener) -> SubscriptionId {
        self.store.subscribe(target, listener)
    }

    /// Removes a change listener.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
