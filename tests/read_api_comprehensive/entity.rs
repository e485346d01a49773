//! Entity resolution through datasources

use crate::common::*;

#[test]
fn e1_latest_snapshot_resolves_c() {
    let f = scenario_e1();
    assert_eq!(f.at(2, 3).entity("e").unwrap(), DocumentState::Live(named("C")));
}

#[test]
fn e1_earliest_snapshot_resolves_a() {
    let f = scenario_e1();
    assert_eq!(f.at(1, 1).entity("e").unwrap(), DocumentState::Live(named("A")));
}

#[test]
fn correction_replaces_value_for_same_valid_time() {
    let f = scenario_e1();
    assert_eq!(f.at(1, 2).entity("e").unwrap(), DocumentState::Live(named("B")));
    assert_eq!(f.at(1, 3).entity("e").unwrap(), DocumentState::Live(named("B")));
}

#[test]
fn unknown_entity_is_not_found() {
    let f = scenario_e1();
    let err = f.at(2, 3).entity("nobody").unwrap_err();
    assert!(matches!(err, VellumError::EntityNotFound { .. }));
}

#[test]
fn tombstone_is_not_absence() {
    let f = scenario_e1();
    f.delete("e", 5, 5);
    let ds = f.at(5, 5);
    assert_eq!(ds.entity("e").unwrap(), DocumentState::Tombstone);
    assert!(ds.entity_tx("e").unwrap().content_hash.is_tombstone());
    // Before the delete took effect in valid time
    assert_eq!(f.at(4, 5).entity("e").unwrap(), DocumentState::Live(named("C")));
}

#[test]
fn entity_tx_reports_resolved_revision() {
    let f = scenario_e1();
    let tx = f.at(2, 3).entity_tx("e").unwrap();
    assert_eq!(tx.valid_time, ts(2));
    assert_eq!(tx.transaction_time, ts(3));
    assert_eq!(tx.transaction_id, TxId::new(3));
    assert_eq!(tx.content_hash, named("C").content_hash());
}

#[test]
fn id_forms_coerce_to_the_same_entity() {
    let f = Fixture::new();
    f.store
        .transact_at(ts(1), vec![WriteOp::put(42i64, named("int")).valid_at(ts(1))])
        .unwrap();
    let ds = f.at(1, 1);
    assert_eq!(ds.entity(42i64).unwrap(), DocumentState::Live(named("int")));
    assert_eq!(ds.entity(vellum::EntityId::from(42i64)).unwrap(), DocumentState::Live(named("int")));
    assert!(ds.entity("42").unwrap_err().is_not_found());
}

#[test]
fn structured_ids_are_content_addressed() {
    let f = Fixture::new();
    let key = Value::Array(vec![Value::from("order"), Value::from(7i64)]);
    let eid = vellum::EntityId::coerce(key.clone()).unwrap();
    f.store
        .transact_at(ts(1), vec![WriteOp::put(eid, named("order-7")).valid_at(ts(1))])
        .unwrap();
    assert_eq!(f.at(1, 1).entity(key).unwrap(), DocumentState::Live(named("order-7")));
}

#[test]
fn bind_before_epoch_is_invalid_time_range() {
    let f = Fixture::with_config(StoreConfig::default().with_epoch(ts(100)));
    let err = f.db.open_datasource(Some(ts(10)), Some(ts(200))).unwrap_err();
    assert!(matches!(err, VellumError::InvalidTimeRange { .. }));
}

#[test]
fn basis_hides_transactions_applied_after_open() {
    let f = scenario_e1();
    let ds = f.at(5, 5);
    f.put("e", named("late"), 4, 4);
    assert_eq!(ds.entity("e").unwrap(), DocumentState::Live(named("C")));
    assert_eq!(f.at(5, 5).entity("e").unwrap(), DocumentState::Live(named("late")));
}
