// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::ItemId;
use super::sort_key::SortKey;

/// "`to` is a child of `from` at position `sort_key`."
///
/// Siblings under one parent are ordered by comparing their edges' keys.
/// No two sibling edges may carry the same key; the graph relies on
/// [`SortKey::between`] to keep that true.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemEdge {
    sort_key: SortKey,
    from: ItemId,
    to: ItemId,
}

impl ItemEdge {
    pub fn new(sort_key: SortKey, from: ItemId, to: ItemId) -> Self {
        Self { sort_key, from, to }
    }

    pub fn sort_key(&self) -> &SortKey {
        &self.sort_key
    }

    pub fn from(&self) -> &ItemId {
        &self.from
    }

    pub fn to(&self) -> &ItemId {
        &self.to
    }

    pub(crate) fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
    }
}
