//! Store layer for the Phonestock inventory tracker.
//! This crate is the single source of truth for record validation, target
//! addressing and change notification; UI shells call in through
//! [`PhoneStore`] or [`InventoryService`].

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::phone::{Phone, PhoneId, Supplier, UnknownSupplierCode};
pub use model::values::{Field, PhoneValues, ValidationError};
pub use service::inventory_service::InventoryService;
pub use store::notify::{ChangeListener, ChangeNotifier, SubscriptionId};
pub use store::phone_store::{
    PhoneListQuery, PhoneStore, SortField, SortOrder, SqlitePhoneStore, StoreError, StoreResult,
};
pub use store::target::{Target, UnroutableTarget};
