// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use time::OffsetDateTime;

use super::card::Card;
use super::connection::Connection;
use super::ids::{MapId, NoteId};

/// A saved graph of cards and connections, the persistence/grouping unit.
///
/// While a note is open, its live graph is served by the canvas store; the
/// `cards`/`connections` held here are the parked snapshot written back on
/// note switch (see `store::Workspace`).
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    note_id: NoteId,
    backend_id: Option<MapId>,
    title: String,
    cards: Vec<Card>,
    connections: Vec<Connection>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Note {
    pub fn new(note_id: NoteId, title: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            note_id,
            backend_id: None,
            title: title.into(),
            cards: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    pub fn backend_id(&self) -> Option<&MapId> {
        self.backend_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn set_backend_id(&mut self, backend_id: Option<MapId>) {
        self.backend_id = backend_id;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_cards(&mut self, cards: Vec<Card>) {
        self.cards = cards;
    }

    pub fn set_connections(&mut self, connections: Vec<Connection>) {
        self.connections = connections;
    }

    pub fn set_created_at(&mut self, created_at: OffsetDateTime) {
        self.created_at = created_at;
    }

    pub fn set_updated_at(&mut self, updated_at: OffsetDateTime) {
        self.updated_at = updated_at;
    }

    pub fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}
