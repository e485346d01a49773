//! History traversal through datasources

use crate::common::*;
use vellum::TimeRange;

#[test]
fn e1_collapsed_ascending() {
    let f = scenario_e1();
    let h = f.at(2, 3).entity_history("e", &HistoryOptions::new().with_docs(true)).unwrap();
    assert_eq!(times(&h), vec![(1, 2), (2, 3)]);
    assert_eq!(names(&h), vec!["B", "C"]);
}

#[test]
fn e1_full_ascending() {
    let f = scenario_e1();
    let opts = HistoryOptions::new().with_docs(true).with_corrections(true);
    let h = f.at(2, 3).entity_history("e", &opts).unwrap();
    assert_eq!(times(&h), vec![(1, 1), (1, 2), (2, 3)]);
    assert_eq!(names(&h), vec!["A", "B", "C"]);
    let ids: Vec<u64> = h.iter().map(|e| e.transaction_id.as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn e1_descending_mirrors_ascending() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let h = ds
        .entity_history("e", &HistoryOptions::new().descending().with_corrections(true))
        .unwrap();
    assert_eq!(times(&h), vec![(2, 3), (1, 2), (1, 1)]);
    let h = ds.entity_history("e", &HistoryOptions::new().descending()).unwrap();
    assert_eq!(times(&h), vec![(2, 3), (1, 2)]);
}

#[test]
fn e1_earliest_snapshot_has_one_entry() {
    let f = scenario_e1();
    let ds = f.at(1, 1);
    for opts in [
        HistoryOptions::new(),
        HistoryOptions::new().with_corrections(true),
        HistoryOptions::new().descending().with_corrections(true),
    ] {
        assert_eq!(times(&ds.entity_history("e", &opts).unwrap()), vec![(1, 1)]);
    }
}

#[test]
fn unknown_entity_history_is_empty() {
    let f = scenario_e1();
    assert!(f.at(2, 3).entity_history("ghost", &HistoryOptions::new()).unwrap().is_empty());
}

#[test]
fn documents_only_when_requested() {
    let f = scenario_e1();
    let h = f.at(2, 3).entity_history("e", &HistoryOptions::new().with_corrections(true)).unwrap();
    assert!(h.iter().all(|e| e.document.is_none()));
    assert_eq!(f.store.stats().document_requests, 0);
    assert_eq!(f.store.stats().documents_fetched, 0);
}

#[test]
fn range_filters_clamp_to_snapshot() {
    let f = scenario_e1();
    let ds = f.at(1, 2);
    let opts = HistoryOptions::new()
        .with_corrections(true)
        .valid_time_range(TimeRange::all())
        .transaction_time_range(TimeRange::starting_at(ts(0)));
    assert_eq!(times(&ds.entity_history("e", &opts).unwrap()), vec![(1, 1), (1, 2)]);

    let opts = HistoryOptions::new()
        .with_corrections(true)
        .valid_time_range(TimeRange::between(ts(2), ts(10)));
    assert!(f.at(2, 3).entity_history("e", &opts).unwrap().len() == 1);
}

#[test]
fn lazy_history_hydrates_per_batch() {
    let f = Fixture::new();
    for i in 0..10u64 {
        f.put("e", named(&format!("v{}", i)), i, i + 1);
    }
    let ds = f.at(100, 100);
    let cursor = ds
        .open_entity_history("e", &HistoryOptions::new().with_docs(true))
        .unwrap();
    assert_eq!(f.store.stats().document_requests, 0);
    let first = cursor.try_next().unwrap().unwrap();
    assert_eq!(first.valid_time, ts(0));
    cursor.close().unwrap();
    // Default batch size covers all ten entries in one request
    assert_eq!(f.store.stats().document_requests, 1);
}
