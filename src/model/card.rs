// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use time::OffsetDateTime;

use super::ids::{BlockId, CardId, MapId, MessageId};

/// 2D canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversation turn. Messages are append-only within a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    message_id: MessageId,
    role: Role,
    content: String,
    timestamp: OffsetDateTime,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::new_at(role, content, OffsetDateTime::now_utc())
    }

    pub fn new_at(role: Role, content: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            message_id: MessageId::generate(),
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }
}

/// The kind of a card, derived from its content variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Conversation,
    Summary,
    DetailedNotes,
}

impl CardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Summary => "summary",
            Self::DetailedNotes => "detailed-notes",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContent {
    messages: Vec<Message>,
    is_generating_notes: bool,
}

impl ConversationContent {
    pub fn new(messages: Vec<Message>, is_generating_notes: bool) -> Self {
        Self {
            messages,
            is_generating_notes,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_generating_notes(&self) -> bool {
        self.is_generating_notes
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn set_generating_notes(&mut self, generating: bool) {
        self.is_generating_notes = generating;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryContent {
    markdown: String,
    detailed_markdown: String,
    original_conversation_id: CardId,
    is_expanded: bool,
}

impl SummaryContent {
    pub fn new(
        markdown: impl Into<String>,
        detailed_markdown: impl Into<String>,
        original_conversation_id: CardId,
        is_expanded: bool,
    ) -> Self {
        Self {
            markdown: markdown.into(),
            detailed_markdown: detailed_markdown.into(),
            original_conversation_id,
            is_expanded,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn detailed_markdown(&self) -> &str {
        &self.detailed_markdown
    }

    pub fn original_conversation_id(&self) -> &CardId {
        &self.original_conversation_id
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.is_expanded = expanded;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedNotesContent {
    markdown: String,
    original_conversation_id: CardId,
    is_visible: bool,
}

impl DetailedNotesContent {
    pub fn new(
        markdown: impl Into<String>,
        original_conversation_id: CardId,
        is_visible: bool,
    ) -> Self {
        Self {
            markdown: markdown.into(),
            original_conversation_id,
            is_visible,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn original_conversation_id(&self) -> &CardId {
        &self.original_conversation_id
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }
}

/// A card's payload. The variant *is* the card kind, so payload shape and kind
/// can never disagree; changing the kind means replacing the whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum CardContent {
    Conversation(ConversationContent),
    Summary(SummaryContent),
    DetailedNotes(DetailedNotesContent),
}

impl CardContent {
    pub fn kind(&self) -> CardKind {
        match self {
            Self::Conversation(_) => CardKind::Conversation,
            Self::Summary(_) => CardKind::Summary,
            Self::DetailedNotes(_) => CardKind::DetailedNotes,
        }
    }
}

/// A node in the note graph.
///
/// `connections` is informational (the ids of cards this one references); the
/// authoritative edge list lives in `Connection` entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    card_id: CardId,
    backend_id: Option<BlockId>,
    map_id: Option<MapId>,
    position: Position,
    content: CardContent,
    connections: Vec<CardId>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Card {
    pub fn new(card_id: CardId, content: CardContent, position: Position, now: OffsetDateTime) -> Self {
        Self {
            card_id,
            backend_id: None,
            map_id: None,
            position,
            content,
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn backend_id(&self) -> Option<&BlockId> {
        self.backend_id.as_ref()
    }

    pub fn map_id(&self) -> Option<&MapId> {
        self.map_id.as_ref()
    }

    pub fn kind(&self) -> CardKind {
        self.content.kind()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> &CardContent {
        &self.content
    }

    pub fn as_conversation(&self) -> Option<&ConversationContent> {
        match &self.content {
            CardContent::Conversation(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_summary(&self) -> Option<&SummaryContent> {
        match &self.content {
            CardContent::Summary(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_detailed_notes(&self) -> Option<&DetailedNotesContent> {
        match &self.content {
            CardContent::DetailedNotes(content) => Some(content),
            _ => None,
        }
    }

    pub fn connections(&self) -> &[CardId] {
        &self.connections
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// Assigns the backend block id. There is deliberately no way to clear it:
    /// once a card is backend-tracked it stays backend-tracked.
    pub fn assign_backend_id(&mut self, backend_id: BlockId) {
        self.backend_id = Some(backend_id);
    }

    pub fn set_map_id(&mut self, map_id: Option<MapId>) {
        self.map_id = map_id;
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Replaces the payload (and with it the card kind) atomically.
    pub fn set_content(&mut self, content: CardContent) {
        self.content = content;
    }

    pub fn set_connections(&mut self, connections: Vec<CardId>) {
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

/// Input for `CanvasStore::add_card`: a card without identity or timestamps.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub backend_id: Option<BlockId>,
    pub map_id: Option<MapId>,
    pub position: Position,
    pub content: CardContent,
    pub connections: Vec<CardId>,
}

/// Shallow per-field patch for `CanvasStore::update_card`.
///
/// Absent fields are left untouched; present fields replace the card's value
/// wholesale (no deep merge). `backend_id` can be (re)assigned but never
/// cleared.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub backend_id: Option<BlockId>,
    pub map_id: Option<MapId>,
    pub position: Option<Position>,
    pub content: Option<CardContent>,
    pub connections: Option<Vec<CardId>>,
}
