//! Deprecated method family delegates to canonical methods

#![allow(deprecated)]

use crate::common::*;
use vellum::QueryDescriptor;

#[test]
fn legacy_history_is_collapsed_with_documents() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let asc = ds.history_ascending("e").unwrap();
    assert_eq!(times(&asc), vec![(1, 2), (2, 3)]);
    assert_eq!(names(&asc), vec!["B", "C"]);

    let desc = ds.history_descending("e").unwrap();
    assert_eq!(names(&desc), vec!["C", "B"]);
}

#[test]
fn legacy_snapshot_forms_use_own_snapshot() {
    let f = scenario_e1();
    let old = f.at(1, 1);
    let ds = f.at(2, 3);
    let foreign = old.new_snapshot();

    assert_eq!(ds.entity_with(&foreign, "e").unwrap(), DocumentState::Live(named("C")));
    let lazy = ds.history_ascending_with(&foreign, "e").unwrap().collect_all().unwrap();
    assert_eq!(names(&lazy), vec!["B", "C"]);
    let lazy = ds.history_descending_with(&foreign, "e").unwrap().collect_all().unwrap();
    assert_eq!(names(&lazy), vec!["C", "B"]);
}

#[test]
fn legacy_open_and_query_forms() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let handle = ds.new_snapshot();
    assert_eq!(names(&ds.open_history_ascending("e").unwrap().collect_all().unwrap()), vec!["B", "C"]);
    assert_eq!(names(&ds.open_history_descending("e").unwrap().collect_all().unwrap()), vec!["C", "B"]);

    let q = QueryDescriptor::select(["name"]);
    assert_eq!(ds.q(&q).unwrap(), vec![vec![Value::from("C")]]);
    assert_eq!(ds.q_with(&handle, &q).unwrap().collect_all().unwrap(), ds.query(&q).unwrap());
}

#[test]
fn legacy_forms_fail_like_canonical_forms() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let handle = ds.new_snapshot();
    assert!(ds.history_ascending("nobody").unwrap().is_empty());
    assert!(ds.entity_with(&handle, "nobody").unwrap_err().is_not_found());
    assert!(matches!(ds.entity_with(&handle, false), Err(VellumError::MalformedEntityId { .. })));
    assert!(matches!(ds.q(&QueryDescriptor::default()), Err(VellumError::InvalidQuery { .. })));
}
