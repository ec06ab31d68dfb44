use phonestock_core::db::open_db_in_memory;
use phonestock_core::{
    ChangeListener, PhoneStore, PhoneValues, SqlitePhoneStore, Supplier, Target,
};
use std::sync::{Arc, Mutex};

#[test]
fn effective_update_reaches_record_and_collection_listeners_once() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);
    let id = store.insert(&xperia()).unwrap();

    let (record_events, record_listener) = recording_listener();
    let (collection_events, collection_listener) = recording_listener();
    store.subscribe(Target::Record(id), record_listener);
    store.subscribe(Target::Collection, collection_listener);

    store
        .update(&Target::Record(id), &PhoneValues::new().with_quantity(5))
        .unwrap();

    assert_eq!(events(&record_events), vec![Target::Record(id)]);
    assert_eq!(events(&collection_events), vec![Target::Record(id)]);
}

#[test]
fn empty_update_emits_no_event() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);
    let id = store.insert(&xperia()).unwrap();

    let (record_events, record_listener) = recording_listener();
    let (collection_events, collection_listener) = recording_listener();
    store.subscribe(Target::Record(id), record_listener);
    store.subscribe(Target::Collection, collection_listener);

    store
        .update(&Target::Record(id), &PhoneValues::new())
        .unwrap();

    assert!(events(&record_events).is_empty());
    assert!(events(&collection_events).is_empty());
}

#[test]
fn ineffective_update_emits_no_event() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);

    let (collection_events, collection_listener) = recording_listener();
    store.subscribe(Target::Collection, collection_listener);

    store
        .update(&Target::Record(9999), &PhoneValues::new().with_quantity(1))
        .unwrap();
    assert!(events(&collection_events).is_empty());
}

#[test]
fn insert_notifies_the_collection_target() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);

    let (collection_events, collection_listener) = recording_listener();
    store.subscribe(Target::Collection, collection_listener);

    store.insert(&xperia()).unwrap();
    assert_eq!(events(&collection_events), vec![Target::Collection]);
}

#[test]
fn failed_insert_emits_no_event() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);

    let (collection_events, collection_listener) = recording_listener();
    store.subscribe(Target::Collection, collection_listener);

    store.insert(&xperia().with_supplier_code(99)).unwrap_err();
    assert!(events(&collection_events).is_empty());
}

#[test]
fn delete_notifies_only_when_rows_were_removed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);
    let id = store.insert(&xperia()).unwrap();

    let (record_events, record_listener) = recording_listener();
    store.subscribe(Target::Record(id), record_listener);

    store.delete(&Target::Record(9999)).unwrap();
    assert!(events(&record_events).is_empty());

    store.delete(&Target::Record(id)).unwrap();
    assert_eq!(events(&record_events), vec![Target::Record(id)]);
}

#[test]
fn collection_wide_delete_reaches_record_listeners() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);
    let id = store.insert(&xperia()).unwrap();

    let (record_events, record_listener) = recording_listener();
    store.subscribe(Target::Record(id), record_listener);

    store.delete(&Target::Collection).unwrap();
    assert_eq!(events(&record_events), vec![Target::Collection]);
}

#[test]
fn unsubscribed_listeners_receive_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);

    let (collection_events, collection_listener) = recording_listener();
    let subscription = store.subscribe(Target::Collection, collection_listener);
    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));

    store.insert(&xperia()).unwrap();
    assert!(events(&collection_events).is_empty());
}

#[test]
fn listeners_for_other_records_stay_silent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePhoneStore::new(&conn);
    let first = store.insert(&xperia()).unwrap();
    let second = store.insert(&xperia().with_name("Galaxy S9")).unwrap();

    let (other_events, other_listener) = recording_listener();
    store.subscribe(Target::Record(second), other_listener);

    store
        .update(&Target::Record(first), &PhoneValues::new().with_quantity(1))
        .unwrap();
    assert!(events(&other_events).is_empty());
}

fn xperia() -> PhoneValues {
    PhoneValues::new()
        .with_name("Xperia XZ2")
        .with_price(500)
        .with_supplier(Supplier::Sony)
        .with_supplier_number("079123456")
        .with_quantity(50)
}

fn recording_listener() -> (Arc<Mutex<Vec<Target>>>, ChangeListener) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let listener: ChangeListener = Arc::new(move |event: &Target| {
        sink.lock().unwrap().push(*event);
    });
    (received, listener)
}

fn events(received: &Arc<Mutex<Vec<Target>>>) -> Vec<Target> {
    received.lock().unwrap().clone()
}
