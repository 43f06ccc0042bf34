// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::card::Position;
use super::ids::{CardId, ConnectionId};

/// A directed edge between two cards, carrying the highlighted text that
/// prompted it.
///
/// Endpoints are not validated against the live card table: an edge may
/// reference a deleted card until the cascade on the other endpoint collects
/// it, and consumers are expected to skip dangling edges silently. Duplicate
/// edges over the same endpoints are permitted; every user action creates a
/// fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    connection_id: ConnectionId,
    source_card_id: CardId,
    target_card_id: CardId,
    highlighted_text: String,
    source_position: Position,
}

impl Connection {
    pub fn new(
        connection_id: ConnectionId,
        source_card_id: CardId,
        target_card_id: CardId,
        highlighted_text: impl Into<String>,
        source_position: Position,
    ) -> Self {
        Self {
            connection_id,
            source_card_id,
            target_card_id,
            highlighted_text: highlighted_text.into(),
            source_position,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn source_card_id(&self) -> &CardId {
        &self.source_card_id
    }

    pub fn target_card_id(&self) -> &CardId {
        &self.target_card_id
    }

    pub fn highlighted_text(&self) -> &str {
        &self.highlighted_text
    }

    pub fn source_position(&self) -> Position {
        self.source_position
    }
}

/// Input for `CanvasStore::add_connection`: an edge without identity.
#[derive(Debug, Clone)]
pub struct NewConnection {
    pub source_card_id: CardId,
    pub target_card_id: CardId,
    pub highlighted_text: String,
    pub source_position: Position,
}
