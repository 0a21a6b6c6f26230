// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use crate::model::{Item, ItemEdge, ItemId, SortKey};

use super::{GraphError, ItemGraph};

type Path = SmallVec<[ItemEdge; 4]>;

/// A materialized position in the outline: the edge path from the root down
/// to one specific edge instance.
///
/// Because an item can be placed at several positions, "where am I" cannot
/// be an item id. Two lineages are the same position iff their paths match
/// edge for edge; they may reference the same item while being different
/// positions. A lineage owns no graph state — every read takes `&ItemGraph`
/// and is recomputed on the spot, every mutation takes `&mut ItemGraph` and
/// returns the handle for the position it created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    path: Path,
}

impl Lineage {
    /// The position of the graph root (an empty path).
    pub fn root() -> Self {
        Self { path: Path::new() }
    }

    pub fn new(path: impl IntoIterator<Item = ItemEdge>) -> Self {
        let path: Path = path.into_iter().collect();
        debug_assert!(
            path.windows(2).all(|pair| pair[0].to() == pair[1].from()),
            "lineage path edges must chain parent to child"
        );
        Self { path }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &[ItemEdge] {
        &self.path
    }

    /// The edge this position stands on, or `None` at the root.
    pub fn edge(&self) -> Option<&ItemEdge> {
        self.path.last()
    }

    pub fn node_id<'a>(&'a self, graph: &'a ItemGraph) -> &'a ItemId {
        self.path.last().map_or_else(|| graph.root_id(), ItemEdge::to)
    }

    pub fn parent(&self) -> Option<Lineage> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            path: self.path[..self.path.len() - 1].iter().cloned().collect(),
        })
    }

    fn child_of(&self, edge: ItemEdge) -> Lineage {
        let mut path = self.path.clone();
        path.push(edge);
        Self { path }
    }

    pub fn children(&self, graph: &ItemGraph) -> Vec<Lineage> {
        graph
            .outbound_edges(self.node_id(graph))
            .into_iter()
            .map(|edge| self.child_of(edge))
            .collect()
    }

    pub fn has_children(&self, graph: &ItemGraph) -> bool {
        graph.child_count(self.node_id(graph)) > 0
    }

    /// Every position under this position's parent, in order; `None` at the
    /// root.
    pub fn siblings(&self, graph: &ItemGraph) -> Option<Vec<Lineage>> {
        let parent = self.parent()?;
        Some(parent.children(graph))
    }

    /// The (older, younger) positions next to this one; `None` at either
    /// end of the sibling list, `(None, None)` at the root.
    pub fn neighbors(&self, graph: &ItemGraph) -> (Option<Lineage>, Option<Lineage>) {
        let Some(parent) = self.parent() else {
            return (None, None);
        };
        let Ok((siblings, Some(index))) =
            graph.sibling_position(self.node_id(graph), parent.node_id(graph))
        else {
            return (None, None);
        };

        let older = index
            .checked_sub(1)
            .and_then(|i| siblings.get(i))
            .map(|edge| parent.child_of(edge.clone()));
        let younger = siblings
            .get(index + 1)
            .map(|edge| parent.child_of(edge.clone()));
        (older, younger)
    }

    /// Inserts `item` under this position's parent, directly before this
    /// position. Erroring on the root: it has no parent to insert under.
    pub fn add_older_sibling(
        &self,
        graph: &mut ItemGraph,
        item: Item,
    ) -> Result<Lineage, GraphError> {
        let Some(parent) = self.parent() else {
            return Err(GraphError::RootHasNoParent);
        };
        let (older, _) = self.neighbors(graph);
        let parent_id = parent.node_id(graph).clone();
        let edge = graph.place_child(
            item,
            &parent_id,
            older.as_ref().and_then(Lineage::edge),
            self.edge(),
        )?;
        Ok(parent.child_of(edge))
    }

    /// Inserts `item` under this position's parent, directly after this
    /// position.
    pub fn add_younger_sibling(
        &self,
        graph: &mut ItemGraph,
        item: Item,
    ) -> Result<Lineage, GraphError> {
        let Some(parent) = self.parent() else {
            return Err(GraphError::RootHasNoParent);
        };
        let (_, younger) = self.neighbors(graph);
        let parent_id = parent.node_id(graph).clone();
        let edge = graph.place_child(
            item,
            &parent_id,
            self.edge(),
            younger.as_ref().and_then(Lineage::edge),
        )?;
        Ok(parent.child_of(edge))
    }

    /// Inserts `item` before the current first child of this position's
    /// node (or unbounded when childless). Pressing enter on a node that
    /// already has children creates a new first child, not a trailing
    /// sibling.
    pub fn add_first_child(&self, graph: &mut ItemGraph, item: Item) -> Result<Lineage, GraphError> {
        let node_id = self.node_id(graph).clone();
        let first = graph.outbound_edges(&node_id).into_iter().next();
        let edge = graph.place_child(item, &node_id, None, first.as_ref())?;
        Ok(self.child_of(edge))
    }

    /// Inserts `item` after the current last child of this position's node.
    pub fn append_child(&self, graph: &mut ItemGraph, item: Item) -> Result<Lineage, GraphError> {
        let node_id = self.node_id(graph).clone();
        let edge = graph.append_child(item, &node_id)?;
        Ok(self.child_of(edge))
    }

    /// Reparents `other`'s node under this position's node at `sort_key`,
    /// detaching it from every previous parent. Returns the handle for the
    /// moved node at its new position.
    pub fn adopt(
        &self,
        graph: &mut ItemGraph,
        other: &Lineage,
        sort_key: SortKey,
    ) -> Result<Lineage, GraphError> {
        if other.is_root() {
            return Err(GraphError::CannotAdoptRoot);
        }
        let other_id = other.node_id(graph).clone();
        let self_id = self.node_id(graph).clone();
        let edge = graph.change_parent(&other_id, &self_id, sort_key)?;
        Ok(self.child_of(edge))
    }

    /// Removes this position's node from the graph, pruning every
    /// descendant it orphans. Returns the removed ids.
    pub fn kill(&self, graph: &mut ItemGraph) -> Result<Vec<ItemId>, GraphError> {
        let node_id = self.node_id(graph).clone();
        graph.remove_and_prune_orphans(&node_id)
    }
}
