// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Notes contain cards and connections; cards carry conversation, summary, or
//! detailed-notes payloads. A card's payload and its kind are one value (a sum
//! type), so the two can never disagree and a kind change is always an atomic
//! payload replacement.

pub mod card;
pub mod connection;
pub mod highlight;
pub mod ids;
pub mod note;

pub use card::{
    Card, CardContent, CardKind, CardPatch, ConversationContent, DetailedNotesContent, Message,
    NewCard, Position, Role, SummaryContent,
};
pub use connection::{Connection, NewConnection};
pub use highlight::Highlight;
pub use ids::{BlockId, CardId, ConnectionId, Id, IdError, MapId, MessageId, NoteId};
pub use note::Note;
