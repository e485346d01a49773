//! Table-scan queries through datasources

use crate::common::*;
use vellum::{QueryDescriptor, ID_COLUMN};

fn team() -> Fixture {
    let f = Fixture::new();
    let member = |name: &str, role: &str| Document::new().with("name", name).with("role", role);
    f.put("u1", member("Ada", "lead"), 1, 1);
    f.put("u2", member("Lin", "dev"), 1, 1);
    f.put("u3", member("Kim", "dev"), 1, 1);
    f.put("u2", member("Lin", "lead"), 5, 5);
    f.delete("u3", 6, 6);
    f
}

#[test]
fn query_reads_as_of_snapshot() {
    let f = team();
    let q = QueryDescriptor::select(["name"]).filter("role", "dev");
    assert_eq!(f.at(4, 4).query(&q).unwrap().len(), 2);
    assert_eq!(f.at(5, 5).query(&q).unwrap(), vec![vec![Value::from("Kim")]]);
    assert!(f.at(6, 6).query(&q).unwrap().is_empty());
}

#[test]
fn id_column_and_limit() {
    let f = team();
    let rows = f.at(6, 6).query(&QueryDescriptor::select([ID_COLUMN]).limit(1)).unwrap();
    assert_eq!(rows, vec![vec![Value::Reference("u1".into())]]);
}

#[test]
fn open_query_is_lazy() {
    let f = team();
    let ds = f.at(6, 6);
    let cursor = ds.open_query(&QueryDescriptor::select(["name", "role"])).unwrap();
    assert_eq!(f.store.stats().document_requests, 0);
    let first = cursor.try_next().unwrap().unwrap();
    assert_eq!(first, vec![Value::from("Ada"), Value::from("lead")]);
    assert_eq!(cursor.try_next().unwrap().unwrap(), vec![Value::from("Lin"), Value::from("lead")]);
    assert!(cursor.try_next().unwrap().is_none());
}
