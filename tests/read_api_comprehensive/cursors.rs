//! Cursor lifecycle through datasources

use crate::common::*;
use vellum::QueryDescriptor;

#[test]
fn close_is_idempotent_and_fails_later_pulls() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let cursor = ds.open_entity_history("e", &HistoryOptions::new()).unwrap();
    cursor.close().unwrap();
    cursor.close().unwrap();
    assert!(cursor.is_closed());
    assert!(matches!(cursor.try_next(), Err(VellumError::CursorClosed)));
}

#[test]
fn exhaustion_yields_none_once() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let cursor = ds.open_entity_history("e", &HistoryOptions::new()).unwrap();
    assert!(cursor.try_next().unwrap().is_some());
    assert!(cursor.try_next().unwrap().is_some());
    assert!(cursor.try_next().unwrap().is_none());
    assert!(matches!(cursor.try_next(), Err(VellumError::CursorClosed)));
}

#[test]
fn cursor_iterates_as_results() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let cursor = ds
        .open_entity_history("e", &HistoryOptions::new().with_corrections(true))
        .unwrap();
    let entries: Result<Vec<_>, _> = cursor.collect();
    assert_eq!(times(&entries.unwrap()), vec![(1, 1), (1, 2), (2, 3)]);
}

#[test]
fn views_are_released_on_every_exit_path() {
    let f = scenario_e1();
    {
        let ds = f.at(2, 3);
        let _early = ds.open_entity_history("e", &HistoryOptions::new()).unwrap();
        let drained = ds.open_query(&QueryDescriptor::select(["name"])).unwrap();
        drained.collect_all().unwrap();
        assert_eq!(f.store.active_views(), 1);
    }
    assert_eq!(f.store.active_views(), 0);

    let failing = || -> Result<(), VellumError> {
        let ds = f.at(2, 3);
        let _cursor = ds.open_entity_history("e", &HistoryOptions::new())?;
        ds.entity("missing")?;
        Ok(())
    };
    assert!(failing().unwrap_err().is_not_found());
    assert_eq!(f.store.active_views(), 0);
}

#[test]
fn cursor_metrics_are_counted() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    ds.open_entity_history("e", &HistoryOptions::new()).unwrap();
    ds.entity_history("e", &HistoryOptions::new()).unwrap();
    let m = f.db.metrics();
    assert_eq!(m.history_traversals, 2);
    assert_eq!(m.cursors_opened, 1);
}
