// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The flat/array-backed outline variant and its action log.
//!
//! Instead of an edge graph, this representation keeps one globally sorted
//! list of [`Bullet`] records, each carrying its indent and sort key, next
//! to the shared item map. Mutations are [`Action`] values: run against
//! local state immediately, then appended to an append-only history whose
//! records a persistence layer can replay. There is no rollback.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{BulletKey, Item, ItemId, SortKey};

/// One visible row of the flat outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bullet {
    bullet_key: BulletKey,
    owner_email: Option<String>,
    item_id: ItemId,
    indent: u32,
    sort_order: SortKey,
}

impl Bullet {
    pub fn new(
        bullet_key: BulletKey,
        owner_email: Option<String>,
        item_id: ItemId,
        indent: u32,
        sort_order: SortKey,
    ) -> Self {
        Self {
            bullet_key,
            owner_email,
            item_id,
            indent,
            sort_order,
        }
    }

    pub fn bullet_key(&self) -> &BulletKey {
        &self.bullet_key
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn indent(&self) -> u32 {
        self.indent
    }

    pub fn sort_order(&self) -> &SortKey {
        &self.sort_order
    }
}

/// The flat outline: bullets in global sort order plus the item map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatOutline {
    bullets: Vec<Bullet>,
    items: BTreeMap<ItemId, Item>,
}

impl FlatOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.get(item_id)
    }

    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut Item> {
        self.items.get_mut(item_id)
    }

    /// Merges a loaded batch into the outline and restores global order.
    pub fn add_to_tree(&mut self, bullets: Vec<Bullet>, items: Vec<Item>) {
        for item in items {
            self.items.entry(item.id().clone()).or_insert(item);
        }
        self.bullets.extend(bullets);
        self.bullets
            .sort_by(|a, b| a.sort_order().cmp(b.sort_order()));
    }

    /// Drops the bullet; its item follows once nothing references it. The
    /// root row (indent zero) stays.
    pub fn remove_from_tree(&mut self, bullet_key: &BulletKey) {
        let Some(index) = self.position(bullet_key) else {
            return;
        };
        if self.bullets[index].indent() == 0 {
            return;
        }

        let removed = self.bullets.remove(index);
        let in_use = self
            .bullets
            .iter()
            .any(|bullet| bullet.item_id() == removed.item_id());
        if !in_use {
            self.items.remove(removed.item_id());
        }
    }

    pub fn position(&self, bullet_key: &BulletKey) -> Option<usize> {
        self.bullets
            .iter()
            .position(|bullet| bullet.bullet_key() == bullet_key)
    }
}

/// A replayable mutation of the flat outline.
///
/// `run` executes against local state and yields the result the caller
/// needs (typically the bullet to focus); `record` yields the transport-safe
/// description a persistence layer replays on its side.
pub trait Action {
    type Output;

    fn run(&self, outline: &mut FlatOutline) -> Self::Output;

    fn record(&self) -> ActionRecord;
}

/// Serialized form of an action, tagged with the action name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionRecord {
    AddItem { after: String, indent: u32 },
}

/// Inserts a blank item directly after an existing bullet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    owner_email: Option<String>,
    after: BulletKey,
    indent: u32,
    item_id: ItemId,
    bullet_key: BulletKey,
}

impl AddItem {
    /// The new row may sit at most one level deeper than its anchor.
    /// `item_id` and `bullet_key` come from the identifier collaborator so
    /// that replaying the action stays deterministic.
    pub fn new(
        owner_email: Option<String>,
        after: &Bullet,
        indent: u32,
        item_id: ItemId,
        bullet_key: BulletKey,
    ) -> Result<Self, ActionError> {
        if indent > after.indent() + 1 {
            return Err(ActionError::IndentTooDeep {
                indent,
                anchor_indent: after.indent(),
            });
        }
        Ok(Self {
            owner_email,
            after: after.bullet_key().clone(),
            indent,
            item_id,
            bullet_key,
        })
    }
}

impl Action for AddItem {
    type Output = Result<Bullet, ActionError>;

    fn run(&self, outline: &mut FlatOutline) -> Self::Output {
        let index = outline
            .position(&self.after)
            .ok_or_else(|| ActionError::UnknownAnchor {
                bullet_key: self.after.clone(),
            })?;
        let anchor = &outline.bullets[index];
        let adjacent = outline.bullets.get(index + 1);

        let sort_order = SortKey::between(
            Some(anchor.sort_order()),
            adjacent.map(Bullet::sort_order),
        );
        let bullet = Bullet::new(
            self.bullet_key.clone(),
            self.owner_email.clone(),
            self.item_id.clone(),
            self.indent,
            sort_order,
        );

        outline.add_to_tree(
            vec![bullet.clone()],
            vec![Item::blank(self.item_id.clone())],
        );
        Ok(bullet)
    }

    fn record(&self) -> ActionRecord {
        ActionRecord::AddItem {
            after: self.after.as_str().to_owned(),
            indent: self.indent,
        }
    }
}

/// Runs actions and keeps the append-only history for eventual server sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionManager {
    history: Vec<ActionRecord>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the action against local state, hands the result to the
    /// optimistic callback (focus moves, rerenders), and appends the
    /// action's record to history.
    pub fn perform<A: Action>(
        &mut self,
        outline: &mut FlatOutline,
        action: &A,
        on_applied: impl FnOnce(&A::Output),
    ) -> A::Output {
        let output = action.run(outline);
        on_applied(&output);
        self.history.push(action.record());
        debug!(history = self.history.len(), "performed action");
        output
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    IndentTooDeep { indent: u32, anchor_indent: u32 },
    UnknownAnchor { bullet_key: BulletKey },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndentTooDeep {
                indent,
                anchor_indent,
            } => write!(
                f,
                "cannot indent more than one level past the anchor (indent={indent}, anchor={anchor_indent})"
            ),
            Self::UnknownAnchor { bullet_key } => {
                write!(f, "anchor bullet not found (key={bullet_key})")
            }
        }
    }
}

impl std::error::Error for ActionError {}
