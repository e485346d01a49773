//! Wire helpers at the datasource edge

use crate::common::*;
use std::sync::Arc;
use vellum::{Database, EntityId, MsgPackCodec, WireCodec};

#[test]
fn json_edge_round_trip() {
    let f = scenario_e1();
    let ds = f.at(2, 3);
    let id_bytes = f.db.codec().encode_entity_id(&EntityId::from("e")).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&id_bytes).unwrap();
    assert_eq!(json, serde_json::json!({"vellum/id": "e"}));

    let eid = ds.entity_from_wire(&id_bytes).unwrap();
    let doc_bytes = ds.encode_entity(eid).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&doc_bytes).unwrap();
    assert_eq!(json, serde_json::json!({"name": "C"}));
}

#[test]
fn msgpack_codec_can_be_injected() {
    let store = MemoryRevisionStore::new();
    store
        .transact_at(ts(1), vec![WriteOp::put(uuid::Uuid::nil(), named("nil")).valid_at(ts(1))])
        .unwrap();
    let db = Database::builder(Arc::new(store))
        .codec(Arc::new(MsgPackCodec))
        .build()
        .unwrap();
    let ds = db.open_datasource(Some(ts(1)), Some(ts(1))).unwrap();

    let bytes = MsgPackCodec.encode_entity_id(&EntityId::from(uuid::Uuid::nil())).unwrap();
    let eid = ds.entity_from_wire(&bytes).unwrap();
    assert_eq!(eid, EntityId::Uuid(uuid::Uuid::nil()));
    let state = MsgPackCodec.decode_document(&ds.encode_entity(eid).unwrap()).unwrap();
    assert_eq!(state, DocumentState::Live(named("nil")));
}

#[test]
fn tombstones_encode_distinctly() {
    let f = scenario_e1();
    f.delete("e", 9, 9);
    let bytes = f.at(9, 9).encode_entity("e").unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, serde_json::json!({"vellum/tombstone": true}));
}

#[test]
fn garbage_on_the_wire_is_a_codec_error() {
    let f = scenario_e1();
    let err = f.at(2, 3).entity_from_wire(b"\xff\x00").unwrap_err();
    assert!(matches!(err, VellumError::Codec(_)));
}
