// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use time::OffsetDateTime;

use crate::model::{
    Card, CardId, CardPatch, Connection, ConnectionId, Highlight, NewCard, NewConnection,
};

use super::MutateOutcome;

/// Sole mutable source of truth for the open note's cards, connections,
/// selection, and active highlight.
#[derive(Debug, Default)]
pub struct CanvasStore {
    cards: Vec<Card>,
    connections: Vec<Connection>,
    selected_card: Option<CardId>,
    highlight: Option<Highlight>,
}

impl CanvasStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a freshly identified card and returns the full entity.
    ///
    /// The synchronous return is a hard contract, not a convenience: callers
    /// chain connections and backend updates against the returned id, so the
    /// card must already be resolvable in the table before any asynchronous
    /// work starts.
    pub fn add_card(&mut self, new_card: NewCard) -> Card {
        let now = OffsetDateTime::now_utc();
        let mut card = Card::new(CardId::generate(), new_card.content, new_card.position, now);
        if let Some(backend_id) = new_card.backend_id {
            card.assign_backend_id(backend_id);
        }
        card.set_map_id(new_card.map_id);
        card.set_connections(new_card.connections);
        self.cards.push(card.clone());
        card
    }

    /// Shallow-merges the patch into the matching card and refreshes
    /// `updated_at`. Unknown ids are a reported no-op.
    pub fn update_card(&mut self, card_id: &CardId, patch: CardPatch) -> MutateOutcome {
        let Some(card) = self.cards.iter_mut().find(|card| card.card_id() == card_id) else {
            return MutateOutcome::NotFound;
        };

        if let Some(backend_id) = patch.backend_id {
            card.assign_backend_id(backend_id);
        }
        if let Some(map_id) = patch.map_id {
            card.set_map_id(Some(map_id));
        }
        if let Some(position) = patch.position {
            card.set_position(position);
        }
        if let Some(content) = patch.content {
            card.set_content(content);
        }
        if let Some(connections) = patch.connections {
            card.set_connections(connections);
        }
        card.touch(OffsetDateTime::now_utc());
        MutateOutcome::Applied
    }

    /// Removes the card, cascades over every connection touching it, and
    /// clears the selection if it pointed at the deleted card.
    pub fn delete_card(&mut self, card_id: &CardId) -> MutateOutcome {
        let Some(index) = self.cards.iter().position(|card| card.card_id() == card_id) else {
            return MutateOutcome::NotFound;
        };

        self.cards.remove(index);
        self.connections.retain(|connection| {
            connection.source_card_id() != card_id && connection.target_card_id() != card_id
        });
        if self.selected_card.as_ref() == Some(card_id) {
            self.selected_card = None;
        }
        MutateOutcome::Applied
    }

    /// Appends a freshly identified connection. Duplicates are not collapsed;
    /// every call creates a new edge.
    pub fn add_connection(&mut self, new_connection: NewConnection) -> Connection {
        let connection = Connection::new(
            ConnectionId::generate(),
            new_connection.source_card_id,
            new_connection.target_card_id,
            new_connection.highlighted_text,
            new_connection.source_position,
        );
        self.connections.push(connection.clone());
        connection
    }

    pub fn select_card(&mut self, card_id: Option<CardId>) {
        self.selected_card = card_id;
    }

    pub fn selected_card(&self) -> Option<&CardId> {
        self.selected_card.as_ref()
    }

    pub fn set_highlight(&mut self, highlight: Option<Highlight>) {
        self.highlight = highlight;
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.card_id() == card_id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Clones the live graph, for parking into a note on switch.
    pub fn snapshot_graph(&self) -> (Vec<Card>, Vec<Connection>) {
        (self.cards.clone(), self.connections.clone())
    }

    /// Replaces the live graph wholesale. Selection and highlight are cleared;
    /// both are scoped to the note that was open when they were made.
    pub fn load_graph(&mut self, cards: Vec<Card>, connections: Vec<Connection>) {
        self.cards = cards;
        self.connections = connections;
        self.selected_card = None;
        self.highlight = None;
    }
}

#[cfg(test)]
mod tests;
