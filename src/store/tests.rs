// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{
    load_graph, read_document, snapshot, write_document, EdgeRecord, ItemRecord, OutlineDocument,
    StoreError,
};
use crate::graph::Lineage;
use crate::model::{Item, ItemId, SortKey};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!(
            "anthologize-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn id(value: &str) -> ItemId {
    ItemId::new(value).expect("item id")
}

fn key(value: &str) -> SortKey {
    SortKey::new(value).expect("sort key")
}

fn item_record(value: &str) -> ItemRecord {
    ItemRecord {
        id: id(value),
        body: value.to_owned(),
    }
}

fn edge_record(from: &str, to: &str, sort: &str) -> EdgeRecord {
    EdgeRecord {
        from: id(from),
        to: id(to),
        sort_order: key(sort),
    }
}

/// root -> a (-> leaf), b
fn sample_document() -> OutlineDocument {
    OutlineDocument {
        owner_email: "someone@example.com".to_owned(),
        root_id: id("root"),
        items: vec![
            item_record("root"),
            item_record("i:a"),
            item_record("i:b"),
            item_record("i:leaf"),
        ],
        edges: vec![
            edge_record("root", "i:a", "m"),
            edge_record("root", "i:b", "s"),
            edge_record("i:a", "i:leaf", "m"),
        ],
    }
}

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("store")
}

#[test]
fn load_graph_rebuilds_the_outline() {
    let graph = load_graph(&sample_document()).expect("load");

    assert_eq!(graph.root_id(), &id("root"));
    let top: Vec<String> = Lineage::root()
        .children(&graph)
        .iter()
        .map(|child| child.node_id(&graph).to_string())
        .collect();
    assert_eq!(top, ["i:a", "i:b"]);
    assert_eq!(graph.item(&id("i:leaf")).map(Item::text), Some("i:leaf"));
}

#[test]
fn snapshot_round_trips_through_load() {
    let graph = load_graph(&sample_document()).expect("load");
    let doc = snapshot(&graph, "someone@example.com");
    let reloaded = load_graph(&doc).expect("reload");
    assert_eq!(graph, reloaded);
}

#[test]
fn load_graph_rejects_a_missing_root() {
    let mut doc = sample_document();
    doc.root_id = id("i:ghost");
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::MissingRoot { .. })
    ));
}

#[test]
fn load_graph_rejects_sentinel_sort_keys() {
    let mut doc = sample_document();
    doc.edges.push(EdgeRecord {
        from: id("i:b"),
        to: id("i:leaf"),
        sort_order: key("z"),
    });
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::SentinelSortKey { .. })
    ));
}

#[test]
fn load_graph_rejects_duplicate_sibling_keys() {
    let mut doc = sample_document();
    doc.edges.push(edge_record("root", "i:leaf", "m"));
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::DuplicateSortKey { .. })
    ));
}

#[test]
fn load_graph_rejects_unknown_endpoints() {
    let mut doc = sample_document();
    doc.edges.push(edge_record("i:b", "i:ghost", "m"));
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::UnknownEndpoint { .. })
    ));
}

#[test]
fn load_graph_rejects_stranded_items() {
    let mut doc = sample_document();
    doc.items.push(item_record("i:stranded"));
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::Unreachable { .. })
    ));
}

#[test]
fn load_graph_rejects_an_edge_into_the_root() {
    let mut doc = sample_document();
    doc.edges.push(edge_record("i:b", "root", "m"));
    assert!(matches!(
        load_graph(&doc),
        Err(StoreError::EdgeIntoRoot { .. })
    ));
}

#[rstest]
fn documents_round_trip_through_disk(tmp: TempDir) {
    let path = tmp.path().join("outline.json");
    let doc = sample_document();

    write_document(&path, &doc).expect("write");
    let loaded = read_document(&path).expect("read");
    assert_eq!(loaded, doc);
}

#[rstest]
fn write_document_replaces_the_previous_content(tmp: TempDir) {
    let path = tmp.path().join("outline.json");
    let mut doc = sample_document();

    write_document(&path, &doc).expect("write");
    doc.items.push(item_record("i:extra"));
    doc.edges.push(edge_record("i:b", "i:extra", "m"));
    write_document(&path, &doc).expect("rewrite");

    let loaded = read_document(&path).expect("read");
    assert_eq!(loaded.items.len(), 5);
    assert!(!tmp
        .path()
        .join("outline.json.tmp")
        .exists());
}

#[rstest]
fn read_document_reports_malformed_sort_keys(tmp: TempDir) {
    let path = tmp.path().join("outline.json");
    let raw = r#"{
        "owner_email": "someone@example.com",
        "root_id": "root",
        "items": [{ "id": "root" }, { "id": "i:a" }],
        "edges": [{ "from": "root", "to": "i:a", "sort_order": "M1" }]
    }"#;
    std::fs::write(&path, raw).expect("seed file");

    assert!(matches!(
        read_document(&path),
        Err(StoreError::InvalidSortKey { .. })
    ));
}

#[rstest]
fn read_document_reports_missing_files_with_their_path(tmp: TempDir) {
    let path = tmp.path().join("missing.json");
    let err = read_document(&path).expect_err("missing file");
    match err {
        StoreError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected io error, got {other}"),
    }
}

#[test]
fn an_edited_graph_snapshots_to_a_loadable_document() {
    let mut graph = load_graph(&sample_document()).expect("load");
    let root = Lineage::root();
    let children = root.children(&graph);
    let b = children.last().expect("b").clone();

    b.add_younger_sibling(&mut graph, Item::new(id("i:c"), "c"))
        .expect("insert");
    let doc = snapshot(&graph, "someone@example.com");
    let reloaded = load_graph(&doc).expect("reload");
    assert_eq!(graph, reloaded);
    assert_eq!(doc.edges.len(), 4);
}
