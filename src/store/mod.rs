// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence boundary for one owner's outline.
//!
//! A store document is the full load set: every item plus every position
//! record (edge with its sort key). Documents round-trip through JSON with
//! validation on the way in — malformed ids, boundary sort keys, duplicate
//! sibling keys, and detached or cyclic structure are load errors here, not
//! surprises inside the engine. File writes go through a temp file and
//! rename so a crashed write never leaves a half document behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::graph::{GraphError, ItemGraph};
use crate::model::{IdError, Item, ItemEdge, ItemId, SortKey, SortKeyError};

/// One item row of the load set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub body: String,
}

/// One position row of the load set: `to` is a child of `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: ItemId,
    pub to: ItemId,
    pub sort_order: SortKey,
}

/// Everything the engine needs to rebuild one owner's outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineDocument {
    pub owner_email: String,
    pub root_id: ItemId,
    pub items: Vec<ItemRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Builds the live graph from a document, validating structure as it goes.
pub fn load_graph(doc: &OutlineDocument) -> Result<ItemGraph, StoreError> {
    let root = doc
        .items
        .iter()
        .find(|record| record.id == doc.root_id)
        .ok_or_else(|| StoreError::MissingRoot {
            root_id: doc.root_id.clone(),
        })?;

    let mut graph = ItemGraph::new(Item::new(root.id.clone(), root.body.clone()));
    for record in &doc.items {
        if record.id != doc.root_id && graph.contains_item(&record.id) {
            return Err(StoreError::DuplicateItem {
                id: record.id.clone(),
            });
        }
        graph.insert_item(Item::new(record.id.clone(), record.body.clone()));
    }

    let mut seen_pairs = std::collections::BTreeSet::new();
    let mut seen_keys = std::collections::BTreeSet::new();
    for record in &doc.edges {
        if record.sort_order.is_sentinel() {
            return Err(StoreError::SentinelSortKey {
                from: record.from.clone(),
                to: record.to.clone(),
            });
        }
        if !seen_pairs.insert((record.from.clone(), record.to.clone())) {
            return Err(StoreError::DuplicateEdge {
                from: record.from.clone(),
                to: record.to.clone(),
            });
        }
        if !seen_keys.insert((record.from.clone(), record.sort_order.clone())) {
            return Err(StoreError::DuplicateSortKey {
                parent: record.from.clone(),
                sort_key: record.sort_order.clone(),
            });
        }
        if !graph.contains_item(&record.from) {
            return Err(StoreError::UnknownEndpoint {
                item_id: record.from.clone(),
            });
        }
        if !graph.contains_item(&record.to) {
            return Err(StoreError::UnknownEndpoint {
                item_id: record.to.clone(),
            });
        }
        let edge = ItemEdge::new(
            record.sort_order.clone(),
            record.from.clone(),
            record.to.clone(),
        );
        graph.install_edge(edge).map_err(|err| match err {
            GraphError::RootHasNoParent => StoreError::EdgeIntoRoot {
                from: record.from.clone(),
            },
            _ => StoreError::Cycle {
                item_id: record.to.clone(),
            },
        })?;
    }

    verify_rooted(&graph)?;
    Ok(graph)
}

/// Serializes the live graph back into a document with a stable record
/// order (items by id, edges by parent then key).
pub fn snapshot(graph: &ItemGraph, owner_email: impl Into<String>) -> OutlineDocument {
    let items: Vec<ItemRecord> = graph
        .items()
        .map(|item| ItemRecord {
            id: item.id().clone(),
            body: item.text().to_owned(),
        })
        .collect();

    let mut edges = Vec::new();
    for record in &items {
        for edge in graph.outbound_edges(&record.id) {
            edges.push(EdgeRecord {
                from: edge.from().clone(),
                to: edge.to().clone(),
                sort_order: edge.sort_key().clone(),
            });
        }
    }

    OutlineDocument {
        owner_email: owner_email.into(),
        root_id: graph.root_id().clone(),
        items,
        edges,
    }
}

/// Every item must be reachable from the root; anything else means the
/// document lost edges somewhere.
fn verify_rooted(graph: &ItemGraph) -> Result<(), StoreError> {
    let mut seen = std::collections::BTreeSet::new();
    let mut stack = vec![graph.root_id().clone()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        for edge in graph.outbound_edges(&current) {
            stack.push(edge.to().clone());
        }
    }

    match graph.items().find(|item| !seen.contains(item.id())) {
        Some(stranded) => Err(StoreError::Unreachable {
            item_id: stranded.id().clone(),
        }),
        None => Ok(()),
    }
}

pub fn read_document(path: &Path) -> Result<OutlineDocument, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: OutlineDocumentJson =
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    document_from_json(json)
}

pub fn write_document(path: &Path, doc: &OutlineDocument) -> Result<(), StoreError> {
    let json = document_to_json(doc);
    let raw = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, format!("{raw}\n").as_bytes())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(io_err)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutlineDocumentJson {
    owner_email: String,
    root_id: String,
    #[serde(default)]
    items: Vec<ItemRecordJson>,
    #[serde(default)]
    edges: Vec<EdgeRecordJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemRecordJson {
    id: String,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecordJson {
    from: String,
    to: String,
    sort_order: String,
}

fn parse_id(field: &'static str, value: &str) -> Result<ItemId, StoreError> {
    ItemId::new(value).map_err(|source| StoreError::InvalidId {
        field,
        value: value.to_owned(),
        source,
    })
}

fn parse_sort_key(field: &'static str, value: &str) -> Result<SortKey, StoreError> {
    SortKey::new(value).map_err(|source| StoreError::InvalidSortKey {
        field,
        value: value.to_owned(),
        source,
    })
}

fn document_from_json(json: OutlineDocumentJson) -> Result<OutlineDocument, StoreError> {
    let root_id = parse_id("root_id", &json.root_id)?;

    let items = json
        .items
        .into_iter()
        .map(|item| {
            Ok(ItemRecord {
                id: parse_id("items.id", &item.id)?,
                body: item.body,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let edges = json
        .edges
        .into_iter()
        .map(|edge| {
            Ok(EdgeRecord {
                from: parse_id("edges.from", &edge.from)?,
                to: parse_id("edges.to", &edge.to)?,
                sort_order: parse_sort_key("edges.sort_order", &edge.sort_order)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(OutlineDocument {
        owner_email: json.owner_email,
        root_id,
        items,
        edges,
    })
}

fn document_to_json(doc: &OutlineDocument) -> OutlineDocumentJson {
    OutlineDocumentJson {
        owner_email: doc.owner_email.clone(),
        root_id: doc.root_id.to_string(),
        items: doc
            .items
            .iter()
            .map(|item| ItemRecordJson {
                id: item.id.to_string(),
                body: item.body.clone(),
            })
            .collect(),
        edges: doc
            .edges
            .iter()
            .map(|edge| EdgeRecordJson {
                from: edge.from.to_string(),
                to: edge.to.to_string(),
                sort_order: edge.sort_order.to_string(),
            })
            .collect(),
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidSortKey {
        field: &'static str,
        value: String,
        source: SortKeyError,
    },
    MissingRoot {
        root_id: ItemId,
    },
    DuplicateItem {
        id: ItemId,
    },
    DuplicateEdge {
        from: ItemId,
        to: ItemId,
    },
    DuplicateSortKey {
        parent: ItemId,
        sort_key: SortKey,
    },
    SentinelSortKey {
        from: ItemId,
        to: ItemId,
    },
    EdgeIntoRoot {
        from: ItemId,
    },
    UnknownEndpoint {
        item_id: ItemId,
    },
    Cycle {
        item_id: ItemId,
    },
    Unreachable {
        item_id: ItemId,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id in {field} ({value:?}): {source}"),
            Self::InvalidSortKey {
                field,
                value,
                source,
            } => write!(f, "invalid sort key in {field} ({value:?}): {source}"),
            Self::MissingRoot { root_id } => {
                write!(f, "root item {root_id} is not in the document")
            }
            Self::DuplicateItem { id } => write!(f, "item {id} appears twice"),
            Self::DuplicateEdge { from, to } => {
                write!(f, "edge {from} -> {to} appears twice")
            }
            Self::DuplicateSortKey { parent, sort_key } => {
                write!(f, "two children of {parent} share the sort key {sort_key}")
            }
            Self::SentinelSortKey { from, to } => {
                write!(f, "edge {from} -> {to} carries a bare boundary sort key")
            }
            Self::EdgeIntoRoot { from } => {
                write!(f, "edge from {from} points at the root, which has no parent")
            }
            Self::UnknownEndpoint { item_id } => {
                write!(f, "edge endpoint {item_id} is not in the document")
            }
            Self::Cycle { item_id } => {
                write!(f, "edges through {item_id} close a cycle")
            }
            Self::Unreachable { item_id } => {
                write!(f, "item {item_id} is not reachable from the root")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests;
