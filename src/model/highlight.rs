// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::card::Position;
use super::ids::CardId;

/// Ephemeral text selection: a span of text inside a card plus the screen
/// position it was selected at. At most one highlight is active at a time; it
/// is cleared on submit, close, or click-outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    text: String,
    card_id: CardId,
    position: Position,
}

impl Highlight {
    pub fn new(text: impl Into<String>, card_id: CardId, position: Position) -> Self {
        Self {
            text: text.into(),
            card_id,
            position,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn position(&self) -> Position {
        self.position
    }
}
