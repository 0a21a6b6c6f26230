// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::ItemId;

/// A single outline entry: an id plus its text payload.
///
/// An item carries no position of its own. Where it appears in the outline
/// is entirely a matter of the edges that reference it, which is what lets
/// one item appear at several positions at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    text: String,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// A freshly created entry before the user has typed anything.
    pub fn blank(id: ItemId) -> Self {
        Self::new(id, "")
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
