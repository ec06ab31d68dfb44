//! Phone store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide target-addressed CRUD over the `phones` table.
//! - Gate every write behind field validation.
//! - Emit change notifications for mutations that had an effect.
//!
//! # Invariants
//! - Write paths validate values before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Storage-engine failures are logged before being surfaced.

use crate::db::DbError;
use crate::model::phone::{Phone, PhoneId, Supplier};
use crate::model::values::{PhoneValues, ValidationError};
use crate::store::notify::{ChangeListener, ChangeNotifier, SubscriptionId};
use crate::store::target::{Target, UnroutableTarget};
use log::error;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PHONE_SELECT_SQL: &str = "SELECT
    _id,
    name,
    price,
    supplier,
    supplier_number,
    quantity
FROM phones";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error taxonomy.
///
/// `Validation` and `NotFound` are recoverable caller conditions;
/// `Unroutable` and `InvalidQuery` are caller programming errors; `Db` is an
/// engine failure left to the caller's retry policy; `InvalidData` means a
/// persisted row no longer satisfies the record invariants.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound(PhoneId),
    Unroutable(UnroutableTarget),
    InvalidQuery(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "phone not found: {id}"),
            Self::Unroutable(err) => write!(f, "{err}"),
            Self::InvalidQuery(message) => write!(f, "invalid list query: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted phone data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unroutable(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidQuery(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<UnroutableTarget> for StoreError {
    fn from(value: UnroutableTarget) -> Self {
        Self::Unroutable(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort key for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Price,
    Quantity,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
        }
    }
}

/// Requested read order. The default (absent) order is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

/// Structured filter and ordering options for listing phones.
///
/// `supplier` carries a raw code so that out-of-range filter input surfaces
/// as `InvalidQuery` at call time. `name_contains` is a case-insensitive
/// substring match on the model name.
#[derive(Debug, Clone, Default)]
pub struct PhoneListQuery {
    pub supplier: Option<i64>,
    pub name_contains: Option<String>,
    pub order: Option<SortOrder>,
}

/// Store interface for phone inventory CRUD and change subscriptions.
pub trait PhoneStore {
    /// Lists records in target scope. A record target yields zero or one row.
    fn list(&self, target: &Target, query: &PhoneListQuery) -> StoreResult<Vec<Phone>>;
    /// Fetches exactly one record, or `NotFound`.
    fn get(&self, id: PhoneId) -> StoreResult<Phone>;
    /// Validates the complete field set, persists it and returns the new id.
    fn insert(&self, values: &PhoneValues) -> StoreResult<PhoneId>;
    /// Applies a partial field set to every record in target scope.
    fn update(&self, target: &Target, values: &PhoneValues) -> StoreResult<usize>;
    /// Removes every record in target scope; removing nothing is not an error.
    fn delete(&self, target: &Target) -> StoreResult<usize>;
    /// Registers a change listener for targets overlapping `target`.
    fn subscribe(&self, target: Target, listener: ChangeListener) -> SubscriptionId;
    /// Removes a change listener. Returns whether it was still registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// SQLite-backed phone store owning the change-notification registry.
pub struct SqlitePhoneStore<'conn> {
    conn: &'conn Connection,
    notifier: ChangeNotifier,
}

impl<'conn> SqlitePhoneStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            notifier: ChangeNotifier::new(),
        }
    }
}

impl PhoneStore for SqlitePhoneStore<'_> {
    fn list(&self, target: &Target, query: &PhoneListQuery) -> StoreResult<Vec<Phone>> {
        let mut clauses: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Target::Record(id) = target {
            clauses.push("_id = ?");
            bind_values.push(Value::Integer(*id));
        }

        if let Some(code) = query.supplier {
            if Supplier::from_code(code).is_none() {
                return Err(StoreError::InvalidQuery(format!(
                    "supplier filter code {code} is not a recognized supplier"
                )));
            }
            clauses.push("supplier = ?");
            bind_values.push(Value::Integer(code));
        }

        if let Some(pattern) = query.name_contains.as_deref() {
            if pattern.trim().is_empty() {
                return Err(StoreError::InvalidQuery(
                    "name filter must not be empty".to_string(),
                ));
            }
            clauses.push("name LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(format!("%{}%", escape_like(pattern))));
        }

        let mut sql = String::from(PHONE_SELECT_SQL);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(" ORDER BY ");
        match query.order {
            None => sql.push_str("_id ASC"),
            Some(order) => {
                sql.push_str(order.field.column());
                sql.push_str(if order.descending { " DESC" } else { " ASC" });
                if order.field != SortField::Id {
                    sql.push_str(", _id ASC");
                }
            }
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut phones = Vec::new();

        while let Some(row) = rows.next()? {
            phones.push(parse_phone_row(row)?);
        }

        Ok(phones)
    }

    fn get(&self, id: PhoneId) -> StoreResult<Phone> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHONE_SELECT_SQL} WHERE _id = ?1"))?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => parse_phone_row(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn insert(&self, values: &PhoneValues) -> StoreResult<PhoneId> {
        let valid = values.validate_insert()?;

        let inserted = self.conn.execute(
            "INSERT INTO phones (name, price, supplier, supplier_number, quantity)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                valid.name,
                valid.price,
                valid.supplier.code(),
                valid.supplier_number,
                valid.quantity,
            ],
        );
        if let Err(err) = inserted {
            error!("event=phone_insert module=store status=error error={err}");
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        self.notifier.notify(&Target::Collection);
        Ok(id)
    }

    fn update(&self, target: &Target, values: &PhoneValues) -> StoreResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        values.validate_update()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = values.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }
        if let Some(price) = values.price {
            assignments.push("price = ?");
            bind_values.push(Value::Integer(price));
        }
        if let Some(code) = values.supplier_code {
            assignments.push("supplier = ?");
            bind_values.push(Value::Integer(code));
        }
        if let Some(number) = values.supplier_number.as_deref() {
            assignments.push("supplier_number = ?");
            bind_values.push(Value::Text(number.to_string()));
        }
        if let Some(quantity) = values.quantity {
            assignments.push("quantity = ?");
            bind_values.push(Value::Integer(quantity));
        }

        let mut sql = format!("UPDATE phones SET {}", assignments.join(", "));
        if let Target::Record(id) = target {
            sql.push_str(" WHERE _id = ?");
            bind_values.push(Value::Integer(*id));
        }

        let changed = match self.conn.execute(&sql, params_from_iter(bind_values)) {
            Ok(changed) => changed,
            Err(err) => {
                error!("event=phone_update module=store status=error target={target} error={err}");
                return Err(err.into());
            }
        };

        if changed > 0 {
            self.notifier.notify(target);
        }
        Ok(changed)
    }

    fn delete(&self, target: &Target) -> StoreResult<usize> {
        let mut sql = String::from("DELETE FROM phones");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Target::Record(id) = target {
            sql.push_str(" WHERE _id = ?");
            bind_values.push(Value::Integer(*id));
        }

        let removed = match self.conn.execute(&sql, params_from_iter(bind_values)) {
            Ok(removed) => removed,
            Err(err) => {
                error!("event=phone_delete module=store status=error target={target} error={err}");
                return Err(err.into());
            }
        };

        if removed > 0 {
            self.notifier.notify(target);
        }
        Ok(removed)
    }

    fn subscribe(&self, target: Target, listener: ChangeListener) -> SubscriptionId {
        self.notifier.subscribe(target, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

fn parse_phone_row(row: &Row<'_>) -> StoreResult<Phone> {
    let supplier_code: i64 = row.get("supplier")?;
    let supplier = Supplier::from_code(supplier_code).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid supplier code `{supplier_code}` in phones.supplier"
        ))
    })?;

    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(StoreError::InvalidData(
            "empty value in phones.name".to_string(),
        ));
    }

    let price: i64 = row.get("price")?;
    if price < 0 {
        return Err(StoreError::InvalidData(format!(
            "negative value `{price}` in phones.price"
        )));
    }

    let quantity: i64 = row.get("quantity")?;
    if quantity < 0 {
        return Err(StoreError::InvalidData(format!(
            "negative value `{quantity}` in phones.quantity"
        )));
    }

    Ok(Phone {
        id: row.get("_id")?,
        name,
        price,
        supplier,
        supplier_number: row.get("supplier_number")?,
        quantity,
    })
}

fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
