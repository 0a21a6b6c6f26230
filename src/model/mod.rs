// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Anthologize-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Anthologize and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core value types of the outline model.
//!
//! Items carry text, edges carry position. Everything here is a plain value;
//! ownership of the live structure sits with [`crate::graph::ItemGraph`].

pub mod edge;
pub mod ids;
pub mod item;
pub mod sort_key;

pub use edge::ItemEdge;
pub use ids::{BulletKey, Id, IdError, ItemId, SPEAKABLE_ALPHABET, SPEAKABLE_ID_LEN};
pub use item::Item;
pub use sort_key::{SortKey, SortKeyError};
