// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The owned relation graph behind an outline.
//!
//! [`ItemGraph`] holds every item and every parent/child edge. A node may
//! carry incoming edges from several parents (the same entry shown at
//! several positions), so the structure is a rooted DAG rather than a strict
//! tree; reattachment rejects anything that would close a cycle. All reads
//! used for display are recomputed from the live edge set — position handles
//! ([`Lineage`]) never alias internal state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::model::{Item, ItemEdge, ItemId, SortKey};

pub mod lineage;

pub use lineage::Lineage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGraph {
    root_id: ItemId,
    items: BTreeMap<ItemId, Item>,
    children: BTreeMap<ItemId, Vec<ItemEdge>>,
}

impl ItemGraph {
    /// A graph containing only the given root. The root is the one node
    /// that never carries an incoming edge.
    pub fn new(root: Item) -> Self {
        let root_id = root.id().clone();
        let mut items = BTreeMap::new();
        items.insert(root_id.clone(), root);
        Self {
            root_id,
            items,
            children: BTreeMap::new(),
        }
    }

    pub fn root_id(&self) -> &ItemId {
        &self.root_id
    }

    pub fn item(&self, node_id: &ItemId) -> Option<&Item> {
        self.items.get(node_id)
    }

    pub fn item_mut(&mut self, node_id: &ItemId) -> Option<&mut Item> {
        self.items.get_mut(node_id)
    }

    pub fn contains_item(&self, node_id: &ItemId) -> bool {
        self.items.contains_key(node_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Inserts the item into the node store if its id is unseen; an existing
    /// item keeps its current text.
    pub fn insert_item(&mut self, item: Item) {
        self.items.entry(item.id().clone()).or_insert(item);
    }

    /// All child edges of `node_id`, ordered by sort key. Recomputed from
    /// the live edge set on every call, never cached.
    pub fn outbound_edges(&self, node_id: &ItemId) -> Vec<ItemEdge> {
        let mut edges = self.children.get(node_id).cloned().unwrap_or_default();
        edges.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        edges
    }

    /// All parent edges of `node_id`, in no particular order.
    pub fn inbound_edges(&self, node_id: &ItemId) -> Vec<ItemEdge> {
        self.children
            .values()
            .flatten()
            .filter(|edge| edge.to() == node_id)
            .cloned()
            .collect()
    }

    pub fn child_count(&self, node_id: &ItemId) -> usize {
        self.children.get(node_id).map_or(0, Vec::len)
    }

    /// The ordered child edges of `parent_id` together with the index of
    /// `node_id` among them (`None` when the node is not under that parent).
    ///
    /// Asking this about the root is a programming error: the root has no
    /// parent, so it has no position among siblings.
    pub fn sibling_position(
        &self,
        node_id: &ItemId,
        parent_id: &ItemId,
    ) -> Result<(Vec<ItemEdge>, Option<usize>), GraphError> {
        if node_id == &self.root_id {
            return Err(GraphError::RootHasNoParent);
        }
        let edges = self.outbound_edges(parent_id);
        let index = edges.iter().position(|edge| edge.to() == node_id);
        Ok((edges, index))
    }

    /// Places `item` as a child of `parent_id`, keyed strictly between the
    /// `after` and `before` edges (or the respective boundary when absent).
    /// The item is inserted into the node store if unseen; an already-known
    /// item simply gains another position (transclusion). An existing edge
    /// between the same pair is re-keyed rather than duplicated.
    pub fn place_child(
        &mut self,
        item: Item,
        parent_id: &ItemId,
        after: Option<&ItemEdge>,
        before: Option<&ItemEdge>,
    ) -> Result<ItemEdge, GraphError> {
        self.require_item(parent_id)?;
        let node_id = item.id().clone();
        self.items.entry(node_id.clone()).or_insert(item);
        self.link_child(node_id, parent_id, after, before)
    }

    /// [`ItemGraph::place_child`] for a node already in the store — the
    /// entry point for placing one entry at an additional position.
    pub fn place_child_id(
        &mut self,
        node_id: &ItemId,
        parent_id: &ItemId,
        after: Option<&ItemEdge>,
        before: Option<&ItemEdge>,
    ) -> Result<ItemEdge, GraphError> {
        self.require_item(node_id)?;
        self.require_item(parent_id)?;
        self.link_child(node_id.clone(), parent_id, after, before)
    }

    /// Places `item` after the current last child of `parent_id`.
    pub fn append_child(&mut self, item: Item, parent_id: &ItemId) -> Result<ItemEdge, GraphError> {
        let last = self.outbound_edges(parent_id).into_iter().last();
        self.place_child(item, parent_id, last.as_ref(), None)
    }

    fn link_child(
        &mut self,
        node_id: ItemId,
        parent_id: &ItemId,
        after: Option<&ItemEdge>,
        before: Option<&ItemEdge>,
    ) -> Result<ItemEdge, GraphError> {
        if node_id == self.root_id {
            return Err(GraphError::RootHasNoParent);
        }
        self.cycle_check(&node_id, parent_id)?;

        let sort_key = SortKey::between(
            after.map(ItemEdge::sort_key),
            before.map(ItemEdge::sort_key),
        );
        let edge = ItemEdge::new(sort_key, parent_id.clone(), node_id);
        self.upsert_edge(edge.clone());
        debug!(node = %edge.to(), parent = %edge.from(), key = %edge.sort_key(), "placed child");
        Ok(edge)
    }

    /// Reinstalls an edge with its stored key, for the persistence boundary.
    /// Both endpoints must already be in the node store; sibling-key
    /// uniqueness is the caller's concern.
    pub fn install_edge(&mut self, edge: ItemEdge) -> Result<(), GraphError> {
        self.require_item(edge.from())?;
        self.require_item(edge.to())?;
        if edge.to() == &self.root_id {
            return Err(GraphError::RootHasNoParent);
        }
        self.cycle_check(edge.to(), edge.from())?;
        self.upsert_edge(edge);
        Ok(())
    }

    /// Detaches `node_id` from every current parent and installs a single
    /// new incoming edge from `new_parent_id` at `sort_key`. Indent and
    /// unindent are both built from this one operation.
    pub fn change_parent(
        &mut self,
        node_id: &ItemId,
        new_parent_id: &ItemId,
        sort_key: SortKey,
    ) -> Result<ItemEdge, GraphError> {
        if node_id == &self.root_id {
            return Err(GraphError::CannotMoveRoot);
        }
        self.require_item(node_id)?;
        self.require_item(new_parent_id)?;
        self.cycle_check(node_id, new_parent_id)?;

        self.disown(node_id);
        let edge = ItemEdge::new(sort_key, new_parent_id.clone(), node_id.clone());
        self.upsert_edge(edge.clone());
        debug!(node = %node_id, parent = %new_parent_id, key = %edge.sort_key(), "changed parent");
        Ok(edge)
    }

    /// Swaps `node_id` with its older sibling under `parent_id` by re-keying
    /// its edge between the neighbors one slot up. Returns the re-keyed edge,
    /// or `None` when the node is already first (or not under that parent).
    pub fn move_up(
        &mut self,
        node_id: &ItemId,
        parent_id: &ItemId,
    ) -> Result<Option<ItemEdge>, GraphError> {
        let (siblings, index) = self.sibling_position(node_id, parent_id)?;
        let Some(index) = index else { return Ok(None) };
        if index == 0 {
            return Ok(None);
        }

        let after = index.checked_sub(2).and_then(|i| siblings.get(i));
        let before = siblings.get(index - 1);
        let sort_key = SortKey::between(
            after.map(ItemEdge::sort_key),
            before.map(ItemEdge::sort_key),
        );
        Ok(self.rekey_edge(parent_id, node_id, sort_key))
    }

    /// Mirror image of [`ItemGraph::move_up`].
    pub fn move_down(
        &mut self,
        node_id: &ItemId,
        parent_id: &ItemId,
    ) -> Result<Option<ItemEdge>, GraphError> {
        let (siblings, index) = self.sibling_position(node_id, parent_id)?;
        let Some(index) = index else { return Ok(None) };
        if index + 1 == siblings.len() {
            return Ok(None);
        }

        let after = siblings.get(index + 1);
        let before = siblings.get(index + 2);
        let sort_key = SortKey::between(
            after.map(ItemEdge::sort_key),
            before.map(ItemEdge::sort_key),
        );
        Ok(self.rekey_edge(parent_id, node_id, sort_key))
    }

    /// Removes `node_id` and cascades to every descendant whose incoming
    /// edges all originate inside the removed set. A descendant that is also
    /// placed somewhere outside the doomed subtree survives, along with its
    /// own children. Returns the removed ids.
    pub fn remove_and_prune_orphans(&mut self, node_id: &ItemId) -> Result<Vec<ItemId>, GraphError> {
        if node_id == &self.root_id {
            return Err(GraphError::CannotRemoveRoot);
        }
        self.require_item(node_id)?;

        let mut descendants = BTreeSet::new();
        let mut stack: Vec<&ItemId> = self
            .children
            .get(node_id)
            .into_iter()
            .flatten()
            .map(ItemEdge::to)
            .collect();
        while let Some(current) = stack.pop() {
            if current == &self.root_id || !descendants.insert(current.clone()) {
                continue;
            }
            if let Some(edges) = self.children.get(current) {
                stack.extend(edges.iter().map(ItemEdge::to));
            }
        }

        let mut doomed = BTreeSet::new();
        doomed.insert(node_id.clone());
        loop {
            let mut changed = false;
            for candidate in &descendants {
                if doomed.contains(candidate) {
                    continue;
                }
                let orphaned = self
                    .inbound_edges(candidate)
                    .iter()
                    .all(|edge| doomed.contains(edge.from()));
                if orphaned {
                    doomed.insert(candidate.clone());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        for id in &doomed {
            self.items.remove(id);
            self.children.remove(id);
        }
        for edges in self.children.values_mut() {
            edges.retain(|edge| !doomed.contains(edge.to()));
        }

        let removed: Vec<ItemId> = doomed.into_iter().collect();
        debug!(node = %node_id, removed = removed.len(), "removed node and pruned orphans");
        Ok(removed)
    }

    fn require_item(&self, node_id: &ItemId) -> Result<(), GraphError> {
        if self.items.contains_key(node_id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node_id: node_id.clone(),
            })
        }
    }

    /// Rejects an edge `parent_id -> node_id` that would close a cycle,
    /// i.e. when `parent_id` already sits inside `node_id`'s subtree.
    fn cycle_check(&self, node_id: &ItemId, parent_id: &ItemId) -> Result<(), GraphError> {
        if self.is_reachable(node_id, parent_id) {
            return Err(GraphError::WouldCycle {
                node_id: node_id.clone(),
                parent_id: parent_id.clone(),
            });
        }
        Ok(())
    }

    fn is_reachable(&self, from: &ItemId, to: &ItemId) -> bool {
        let mut stack = vec![from];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(edges) = self.children.get(current) {
                stack.extend(edges.iter().map(ItemEdge::to));
            }
        }
        false
    }

    fn upsert_edge(&mut self, edge: ItemEdge) {
        let edges = self.children.entry(edge.from().clone()).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.to() == edge.to()) {
            *existing = edge;
        } else {
            edges.push(edge);
        }
    }

    fn rekey_edge(
        &mut self,
        parent_id: &ItemId,
        node_id: &ItemId,
        sort_key: SortKey,
    ) -> Option<ItemEdge> {
        let edges = self.children.get_mut(parent_id)?;
        let edge = edges.iter_mut().find(|edge| edge.to() == node_id)?;
        edge.set_sort_key(sort_key);
        Some(edge.clone())
    }

    fn disown(&mut self, node_id: &ItemId) {
        for edges in self.children.values_mut() {
            edges.retain(|edge| edge.to() != node_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    UnknownNode { node_id: ItemId },
    RootHasNoParent,
    CannotMoveRoot,
    CannotAdoptRoot,
    CannotRemoveRoot,
    WouldCycle { node_id: ItemId, parent_id: ItemId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "node not found (id={node_id})"),
            Self::RootHasNoParent => f.write_str("the graph root has no parent or siblings"),
            Self::CannotMoveRoot => f.write_str("the graph root cannot be reparented"),
            Self::CannotAdoptRoot => f.write_str("cannot adopt the graph root"),
            Self::CannotRemoveRoot => f.write_str("the graph root cannot be removed"),
            Self::WouldCycle { node_id, parent_id } => {
                write!(f, "placing {node_id} under {parent_id} would create a cycle")
            }
        }
    }
}

impl std::error::Error for GraphError {}
