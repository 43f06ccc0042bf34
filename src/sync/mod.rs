// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One-way, idempotent reconciliation from the backend map representation
//! into the entity model, used when (re)hydrating a note.
//!
//! Block positions are derived deterministically from the block id, so a map
//! reload lands every card on the same coordinate without persisting layout;
//! `merge_note_data` then preserves any position the user has dragged a card
//! to locally.

use std::fmt;

use log::warn;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::model::{
    BlockId, Card, CardContent, CardId, Connection, ConnectionId, ConversationContent,
    DetailedNotesContent, IdError, MapId, Message, Note, NoteId, Position, Role, SummaryContent,
};
use crate::service::types::{BackendBlock, BackendMap, BackendMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}

pub fn parse_map_id(raw: &str) -> Result<MapId, SyncError> {
    MapId::new(raw).map_err(|source| SyncError::InvalidId {
        field: "mapId",
        value: raw.to_owned(),
        source,
    })
}

pub fn parse_block_id(raw: &str) -> Result<BlockId, SyncError> {
    BlockId::new(raw).map_err(|source| SyncError::InvalidId {
        field: "blockId",
        value: raw.to_owned(),
        source,
    })
}

/// Rebuilds a whole note from a backend map: one card per block, one
/// connection per parented block.
pub fn map_to_note(map: &BackendMap) -> Result<Note, SyncError> {
    let map_id = parse_map_id(&map.map_id)?;
    let note_id = NoteId::new(map.map_id.clone()).map_err(|source| SyncError::InvalidId {
        field: "mapId",
        value: map.map_id.clone(),
        source,
    })?;

    let created_at = map
        .created_at
        .as_deref()
        .map(parse_backend_timestamp)
        .unwrap_or_else(OffsetDateTime::now_utc);
    let updated_at = map
        .updated_at
        .as_deref()
        .map(parse_backend_timestamp)
        .unwrap_or_else(OffsetDateTime::now_utc);

    let mut cards = Vec::with_capacity(map.blocks.len());
    for block in &map.blocks {
        cards.push(block_to_card(block, &map_id)?);
    }
    let connections = extract_connections(&map.blocks)?;

    let mut note = Note::new(note_id, map.title.clone(), created_at);
    note.set_backend_id(Some(map_id));
    note.set_cards(cards);
    note.set_connections(connections);
    note.set_updated_at(updated_at);
    Ok(note)
}

/// Maps one block to a card. Finalized blocks become summary cards when they
/// have a parent and detailed-notes cards at the root; everything else is a
/// conversation card built from the block's message list.
pub fn block_to_card(block: &BackendBlock, map_id: &MapId) -> Result<Card, SyncError> {
    let card_id = CardId::new(block.block_id.clone()).map_err(|source| SyncError::InvalidId {
        field: "blockId",
        value: block.block_id.clone(),
        source,
    })?;
    let block_id = parse_block_id(&block.block_id)?;

    let content = if block.is_finalized {
        let summary = block.summary.clone().unwrap_or_default();
        let detailed = block.reformatted_content.clone().unwrap_or_default();
        if block.parent_block_id.is_some() {
            CardContent::Summary(SummaryContent::new(summary, detailed, card_id.clone(), false))
        } else {
            // Root notes show their full reformatted content directly.
            let markdown = if detailed.is_empty() { summary } else { detailed };
            CardContent::DetailedNotes(DetailedNotesContent::new(markdown, card_id.clone(), true))
        }
    } else {
        let messages = block
            .messages
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(backend_message_to_message)
            .collect();
        CardContent::Conversation(ConversationContent::new(messages, false))
    };

    let mut card = Card::new(
        card_id,
        content,
        calculate_card_position(block),
        parse_backend_timestamp(&block.created_at),
    );
    card.assign_backend_id(block_id);
    card.set_map_id(Some(map_id.clone()));
    card.set_updated_at(parse_backend_timestamp(&block.updated_at));
    Ok(card)
}

pub fn backend_message_to_message(message: &BackendMessage) -> Message {
    let role = match message.role.as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        other => {
            warn!("unknown message role {other:?}, treating as assistant");
            Role::Assistant
        }
    };
    Message::new_at(
        role,
        message.content.clone(),
        parse_backend_timestamp(&message.timestamp),
    )
}

/// Derives the edge list purely from parent links: one connection per block
/// that has a parent, none for roots.
pub fn extract_connections(blocks: &[BackendBlock]) -> Result<Vec<Connection>, SyncError> {
    let mut connections = Vec::new();
    for block in blocks {
        let Some(parent_block_id) = block.parent_block_id.as_deref() else {
            continue;
        };
        let connection_id = ConnectionId::new(format!("{parent_block_id}_{}", block.block_id))
            .map_err(|source| SyncError::InvalidId {
                field: "connectionId",
                value: format!("{parent_block_id}_{}", block.block_id),
                source,
            })?;
        let source_card_id =
            CardId::new(parent_block_id).map_err(|source| SyncError::InvalidId {
                field: "parentBlockId",
                value: parent_block_id.to_owned(),
                source,
            })?;
        let target_card_id =
            CardId::new(block.block_id.clone()).map_err(|source| SyncError::InvalidId {
                field: "blockId",
                value: block.block_id.clone(),
                source,
            })?;
        connections.push(Connection::new(
            connection_id,
            source_card_id,
            target_card_id,
            // Blocks do not carry the prompting highlight.
            "Connected from parent",
            Position::new(0.0, 0.0),
        ));
    }
    Ok(connections)
}

const POSITION_BASE: f64 = 200.0;
const POSITION_SPACING: f64 = 300.0;

/// Deterministic position for a block: a 32-bit string hash of the block id
/// mapped onto a 3-column grid. The same block always lands on the same
/// coordinate across reloads.
pub fn calculate_card_position(block: &BackendBlock) -> Position {
    let hash = hash_block_id(&block.block_id);
    let column = f64::from(hash % 3);
    let row = f64::from(hash / 3);
    Position::new(
        POSITION_BASE + column * POSITION_SPACING,
        POSITION_BASE + row * POSITION_SPACING,
    )
}

fn hash_block_id(raw: &str) -> u32 {
    let mut hash: i32 = 0;
    for ch in raw.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(ch as u32 as i32);
    }
    hash.unsigned_abs()
}

/// Recomputes the note from the backend while preserving each matched local
/// card's on-screen position (matched by backend id, else by id). A network
/// refresh must never move a card the user has arranged by hand.
pub fn merge_note_data(existing: &Note, map: &BackendMap) -> Result<Note, SyncError> {
    let incoming = map_to_note(map)?;

    let mut merged = existing.clone();
    merged.set_title(incoming.title().to_owned());
    if incoming.backend_id().is_some() {
        merged.set_backend_id(incoming.backend_id().cloned());
    }
    merged.set_cards(merge_cards(existing.cards(), incoming.cards()));
    merged.set_connections(incoming.connections().to_vec());
    merged.set_updated_at(incoming.updated_at());
    Ok(merged)
}

fn merge_cards(existing: &[Card], incoming: &[Card]) -> Vec<Card> {
    incoming
        .iter()
        .map(|backend_card| {
            let local = existing.iter().find(|card| {
                (backend_card.backend_id().is_some()
                    && card.backend_id() == backend_card.backend_id())
                    || card.card_id() == backend_card.card_id()
            });
            match local {
                Some(local) => {
                    let mut merged = backend_card.clone();
                    merged.set_position(local.position());
                    merged
                }
                None => backend_card.clone(),
            }
        })
        .collect()
}

pub(crate) fn parse_backend_timestamp(raw: &str) -> OffsetDateTime {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return parsed;
    }
    // Offset-less ISO timestamps (as produced by the backend) are read as UTC.
    if let Ok(parsed) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        return parsed.assume_utc();
    }
    warn!("unparseable backend timestamp {raw:?}, substituting now");
    OffsetDateTime::now_utc()
}
