// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The focus controller: which position is being edited, and the editing
//! gestures expressed over it.
//!
//! At most one position is focused at a time. Gestures that hit a boundary
//! (arrowing past either end, indenting a first child, unindenting at the
//! top level) are no-ops and return `None`; misusing the root is an error.

use tracing::debug;

use crate::graph::{GraphError, ItemGraph, Lineage};
use crate::model::{Item, ItemEdge, ItemId, SortKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    focus: Option<Lineage>,
}

impl ViewState {
    pub fn new() -> Self {
        Self { focus: None }
    }

    pub fn focus(&self) -> Option<&Lineage> {
        self.focus.as_ref()
    }

    pub fn is_in_focus(&self, lineage: &Lineage) -> bool {
        self.focus.as_ref() == Some(lineage)
    }

    pub fn set_focus(&mut self, lineage: Lineage) {
        debug!(depth = lineage.depth(), "set focus");
        self.focus = Some(lineage);
    }

    /// Clears focus, but only when `lineage` is still the focused position.
    /// A blur event for a previously focused position can arrive after a
    /// newer focus landed; such a stale blur is ignored.
    pub fn remove_focus(&mut self, lineage: &Lineage) {
        if self.focus.as_ref() == Some(lineage) {
            self.focus = None;
        }
    }

    /// Moves focus to the position visually above: the deepest last
    /// descendant of the older sibling, or the parent when there is none.
    /// No-op at the top of the outline or when nothing is focused.
    pub fn arrow_up(&mut self, graph: &ItemGraph) -> Option<&Lineage> {
        let current = self.focus.clone()?;
        let (older, _) = current.neighbors(graph);
        let target = match older {
            Some(older) => deepest_last_descendant(graph, older),
            None => current.parent()?,
        };
        self.focus = Some(target);
        self.focus.as_ref()
    }

    /// Moves focus to the position visually below: the first child, or the
    /// younger sibling of the nearest ancestor that has one. No-op at the
    /// bottom of the outline or when nothing is focused.
    pub fn arrow_down(&mut self, graph: &ItemGraph) -> Option<&Lineage> {
        let current = self.focus.clone()?;
        let target = if let Some(first) = current.children(graph).into_iter().next() {
            first
        } else {
            let mut cursor = current;
            loop {
                let (_, younger) = cursor.neighbors(graph);
                if let Some(younger) = younger {
                    break younger;
                }
                cursor = cursor.parent()?;
            }
        };
        self.focus = Some(target);
        self.focus.as_ref()
    }

    /// Creates `item` at the focused position and moves focus onto it.
    ///
    /// A focused position that has children (or is the root) receives the
    /// item as its new first child; a leaf receives it as an older or
    /// younger sibling per the flag. Returns `None` without touching the
    /// graph when nothing is focused.
    pub fn insert_at_current_position(
        &mut self,
        graph: &mut ItemGraph,
        item: Item,
        insert_as_older: bool,
    ) -> Result<Option<Lineage>, GraphError> {
        let Some(current) = self.focus.clone() else {
            debug!("nothing focused, refusing to insert a new item");
            return Ok(None);
        };

        let created = if current.is_root() || current.has_children(graph) {
            current.add_first_child(graph, item)?
        } else if insert_as_older {
            current.add_older_sibling(graph, item)?
        } else {
            current.add_younger_sibling(graph, item)?
        };
        self.focus = Some(created.clone());
        Ok(Some(created))
    }

    /// Moves the focused node under its older sibling, as that sibling's
    /// last child. A position without an older sibling cannot indent (it
    /// would end up two levels deeper); that case is a no-op.
    pub fn indent(&mut self, graph: &mut ItemGraph) -> Result<Option<Lineage>, GraphError> {
        let Some(current) = self.focus.clone() else {
            return Ok(None);
        };
        let (older, _) = current.neighbors(graph);
        let Some(older) = older else {
            debug!("indent without an older sibling is a no-op");
            return Ok(None);
        };

        let last_child = older.children(graph).into_iter().last();
        let sort_key = SortKey::between(
            last_child
                .as_ref()
                .and_then(Lineage::edge)
                .map(ItemEdge::sort_key),
            None,
        );
        let moved = older.adopt(graph, &current, sort_key)?;
        self.focus = Some(moved.clone());
        Ok(Some(moved))
    }

    /// Moves the focused node up to its grandparent, keyed directly after
    /// the parent it came out of. No-op at the root or at the top level.
    pub fn unindent(&mut self, graph: &mut ItemGraph) -> Result<Option<Lineage>, GraphError> {
        let Some(current) = self.focus.clone() else {
            return Ok(None);
        };
        let Some(parent) = current.parent() else {
            return Ok(None);
        };
        let Some(grandparent) = parent.parent() else {
            debug!("cannot unindent past the top level");
            return Ok(None);
        };

        let (_, parent_younger) = parent.neighbors(graph);
        let sort_key = SortKey::between(
            parent.edge().map(ItemEdge::sort_key),
            parent_younger
                .as_ref()
                .and_then(Lineage::edge)
                .map(ItemEdge::sort_key),
        );
        let moved = grandparent.adopt(graph, &current, sort_key)?;
        self.focus = Some(moved.clone());
        Ok(Some(moved))
    }

    /// Removes the position's node, pruning orphans. Focus is cleared when
    /// it pointed inside the removed subtree.
    pub fn kill(
        &mut self,
        graph: &mut ItemGraph,
        lineage: &Lineage,
    ) -> Result<Vec<ItemId>, GraphError> {
        let removed = lineage.kill(graph)?;
        let stale = self.focus.as_ref().is_some_and(|focus| {
            focus
                .path()
                .iter()
                .any(|edge| removed.contains(edge.to()))
        });
        if stale {
            self.focus = None;
        }
        Ok(removed)
    }

    /// The delete gesture: move focus to the position above, then remove
    /// the previously focused node. Returns the removed ids, or `None` when
    /// nothing was focused.
    pub fn remove_focused(
        &mut self,
        graph: &mut ItemGraph,
    ) -> Result<Option<Vec<ItemId>>, GraphError> {
        let Some(target) = self.focus.clone() else {
            return Ok(None);
        };
        self.arrow_up(graph);
        let removed = self.kill(graph, &target)?;
        Ok(Some(removed))
    }
}

fn deepest_last_descendant(graph: &ItemGraph, from: Lineage) -> Lineage {
    let mut cursor = from;
    loop {
        match cursor.children(graph).into_iter().last() {
            Some(last) => cursor = last,
            None => return cursor,
        }
    }
}
