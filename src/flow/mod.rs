// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversation flows: the control layer between the stores and the AI
//! services.
//!
//! Every flow follows the same ordering: local mutation first, network call
//! second, reconciling mutation third. The card (and connection) a user
//! action creates is in the table before any request is issued, and a service
//! failure reconciles with a locally generated reply instead of propagating,
//! so no card is ever left stuck in a loading state.

mod fallback;

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use crate::model::{
    CardContent, CardId, CardPatch, ConversationContent, DetailedNotesContent, Highlight, MapId,
    Message, NewCard, NewConnection, Note, NoteId, Position, Role, SummaryContent,
};
use crate::service::types::MapSummary;
use crate::service::{AiServiceFactory, ServiceError};
use crate::store::Workspace;
use crate::sync::{self, SyncError};

#[derive(Debug)]
pub enum FlowError {
    EmptyQuery,
    NoActiveHighlight,
    UnknownCard { card_id: CardId },
    NotAConversation { card_id: CardId },
    Sync(SyncError),
    Service(ServiceError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuery => f.write_str("query must not be empty"),
            Self::NoActiveHighlight => f.write_str("no highlight is active"),
            Self::UnknownCard { card_id } => write!(f, "card not found (id={card_id})"),
            Self::NotAConversation { card_id } => {
                write!(f, "card is not a conversation (id={card_id})")
            }
            Self::Sync(source) => write!(f, "sync failed: {source}"),
            Self::Service(source) => write!(f, "service call failed: {source}"),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sync(source) => Some(source),
            Self::Service(source) => Some(source),
            _ => None,
        }
    }
}

impl From<SyncError> for FlowError {
    fn from(source: SyncError) -> Self {
        Self::Sync(source)
    }
}

const INITIAL_CARD_POSITION: Position = Position::new(200.0, 200.0);

/// Drives conversations against the workspace: submit a question, follow up
/// on a highlight, message an existing card, finalize a card into notes, and
/// hydrate notes from the backend.
pub struct ConversationFlow {
    workspace: Arc<Mutex<Workspace>>,
    factory: AiServiceFactory,
}

impl ConversationFlow {
    pub fn new(workspace: Arc<Mutex<Workspace>>, factory: AiServiceFactory) -> Self {
        Self { workspace, factory }
    }

    pub fn workspace(&self) -> &Arc<Mutex<Workspace>> {
        &self.workspace
    }

    pub fn factory(&self) -> &AiServiceFactory {
        &self.factory
    }

    /// Submits a fresh question: creates a note and its root conversation
    /// card (user message only) before any network call, then reconciles with
    /// the backend map/block, or with a local reply when the backend is
    /// missing or failing.
    pub async fn submit_query(&self, query: &str) -> Result<CardId, FlowError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FlowError::EmptyQuery);
        }

        let user_message = Message::new(Role::User, query);
        let (note_id, card_id) = {
            let mut workspace = self.workspace.lock().await;
            let note_id = workspace.create_note(provisional_title(query));
            let card = workspace.canvas_mut().add_card(NewCard {
                backend_id: None,
                map_id: None,
                position: INITIAL_CARD_POSITION,
                content: CardContent::Conversation(ConversationContent::new(
                    vec![user_message.clone()],
                    false,
                )),
                connections: Vec::new(),
            });
            (note_id, card.card_id().clone())
        };

        let provider = self.factory.resolve().await;
        let backend_result = match provider.create_map(query).await {
            Ok(map) => match provider.create_block(&map.map_id, query, None, None).await {
                Ok(block) => Some((map, block)),
                Err(err) => {
                    warn!("block creation failed, answering locally: {err}");
                    None
                }
            },
            Err(err) if err.is_unsupported() => {
                debug!("provider has no map support, answering locally");
                None
            }
            Err(err) => {
                warn!("map creation failed, answering locally: {err}");
                None
            }
        };

        let mut workspace = self.workspace.lock().await;
        match backend_result {
            Some((map, block)) => {
                let map_id = sync::parse_map_id(&map.map_id)?;
                let block_id = sync::parse_block_id(&block.block_id)?;
                workspace.navigation_mut().rename_note(&note_id, map.title);
                workspace
                    .navigation_mut()
                    .attach_backend_map(&note_id, map_id.clone());

                let reply = Message::new(Role::Assistant, block.response);
                workspace.canvas_mut().update_card(
                    &card_id,
                    CardPatch {
                        backend_id: Some(block_id),
                        map_id: Some(map_id),
                        content: Some(CardContent::Conversation(ConversationContent::new(
                            vec![user_message, reply],
                            false,
                        ))),
                        ..CardPatch::default()
                    },
                );
            }
            None => {
                let reply = Message::new(Role::Assistant, fallback::long_form_answer(query));
                workspace.canvas_mut().update_card(
                    &card_id,
                    CardPatch {
                        content: Some(CardContent::Conversation(ConversationContent::new(
                            vec![user_message, reply],
                            false,
                        ))),
                        ..CardPatch::default()
                    },
                );
            }
        }
        workspace.navigation_mut().update_note_timestamp(&note_id);

        Ok(card_id)
    }

    /// Submits a follow-up anchored to the active highlight: the child card
    /// and its connection exist (and the highlight is cleared) before the
    /// network call; the reply (backend or local) reconciles afterwards.
    pub async fn submit_highlight_followup(&self, query: &str) -> Result<CardId, FlowError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FlowError::EmptyQuery);
        }

        let user_message = Message::new(Role::User, query);
        let (child_id, source_backend, highlight) = {
            let mut workspace = self.workspace.lock().await;
            let Some(highlight) = workspace.canvas().highlight().cloned() else {
                return Err(FlowError::NoActiveHighlight);
            };

            let source_card = workspace.canvas().card(highlight.card_id()).cloned();
            let source_backend = source_card.as_ref().and_then(|card| {
                match (card.map_id(), card.backend_id()) {
                    (Some(map_id), Some(block_id)) => Some((map_id.clone(), block_id.clone())),
                    _ => None,
                }
            });

            let position = find_available_position(workspace.canvas(), highlight.position());
            let card = workspace.canvas_mut().add_card(NewCard {
                backend_id: None,
                map_id: source_card.and_then(|card| card.map_id().cloned()),
                position,
                content: CardContent::Conversation(ConversationContent::new(
                    vec![user_message.clone()],
                    false,
                )),
                connections: vec![highlight.card_id().clone()],
            });
            workspace.canvas_mut().add_connection(NewConnection {
                source_card_id: highlight.card_id().clone(),
                target_card_id: card.card_id().clone(),
                highlighted_text: highlight.text().to_owned(),
                source_position: highlight.position(),
            });
            workspace.canvas_mut().clear_highlight();

            if let Some(note_id) = workspace.navigation().current_note().cloned() {
                workspace.navigation_mut().update_note_timestamp(&note_id);
            }
            (card.card_id().clone(), source_backend, highlight)
        };

        let reconcile = match source_backend {
            Some((map_id, parent_block_id)) => {
                let provider = self.factory.resolve().await;
                match provider
                    .create_block(
                        map_id.as_str(),
                        query,
                        Some(parent_block_id.as_str()),
                        Some(highlight.text()),
                    )
                    .await
                {
                    Ok(block) => {
                        let block_id = sync::parse_block_id(&block.block_id)?;
                        Some((Some(block_id), block.response))
                    }
                    Err(err) => {
                        warn!("linked block creation failed, answering locally: {err}");
                        None
                    }
                }
            }
            None => None,
        };
        let (backend_id, reply_text) = reconcile
            .unwrap_or_else(|| (None, fallback::reply_for(query, Some(highlight.text()))));

        let reply = Message::new(Role::Assistant, reply_text);
        let mut workspace = self.workspace.lock().await;
        workspace.canvas_mut().update_card(
            &child_id,
            CardPatch {
                backend_id,
                content: Some(CardContent::Conversation(ConversationContent::new(
                    vec![user_message, reply],
                    false,
                ))),
                ..CardPatch::default()
            },
        );

        Ok(child_id)
    }

    /// Appends a message to an existing conversation card and reconciles with
    /// the provider's reply (or a local one on failure).
    pub async fn send_followup_message(
        &self,
        card_id: &CardId,
        message: &str,
    ) -> Result<(), FlowError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(FlowError::EmptyQuery);
        }

        let user_message = Message::new(Role::User, message);
        let (mut messages, backend_id) = {
            let mut workspace = self.workspace.lock().await;
            let Some(card) = workspace.canvas().card(card_id) else {
                return Err(FlowError::UnknownCard {
                    card_id: card_id.clone(),
                });
            };
            let Some(content) = card.as_conversation() else {
                return Err(FlowError::NotAConversation {
                    card_id: card_id.clone(),
                });
            };

            let mut messages = content.messages().to_vec();
            messages.push(user_message);
            let generating = content.is_generating_notes();
            let backend_id = card.backend_id().cloned();
            workspace.canvas_mut().update_card(
                card_id,
                CardPatch {
                    content: Some(CardContent::Conversation(ConversationContent::new(
                        messages.clone(),
                        generating,
                    ))),
                    ..CardPatch::default()
                },
            );
            (messages, backend_id)
        };

        // Backend-tracked cards go through the block message endpoint via the
        // probing accessor; untracked cards use the non-probing one, which is
        // all the legacy path ever needed.
        let reply_text = match &backend_id {
            Some(block_id) => {
                let provider = self.factory.resolve().await;
                provider.send_message(block_id.as_str(), message).await
            }
            None => {
                let provider = self.factory.resolve_sync();
                provider.send_message(card_id.as_str(), message).await
            }
        }
        .unwrap_or_else(|err| {
            warn!("message send failed, answering locally: {err}");
            fallback::reply_for(message, None)
        });

        messages.push(Message::new(Role::Assistant, reply_text));
        let mut workspace = self.workspace.lock().await;
        workspace.canvas_mut().update_card(
            card_id,
            CardPatch {
                content: Some(CardContent::Conversation(ConversationContent::new(
                    messages, false,
                ))),
                ..CardPatch::default()
            },
        );
        Ok(())
    }

    /// Converts a conversation card into its terminal notes form: root cards
    /// (no parents in `connections`) become detailed-notes cards, linked
    /// cards become summary cards. Backend-tracked cards finalize remotely;
    /// everything else (including failures) generates locally.
    pub async fn generate_notes(&self, card_id: &CardId) -> Result<(), FlowError> {
        let (messages, backend_id, is_root) = {
            let mut workspace = self.workspace.lock().await;
            let Some(card) = workspace.canvas().card(card_id) else {
                return Err(FlowError::UnknownCard {
                    card_id: card_id.clone(),
                });
            };
            let Some(content) = card.as_conversation() else {
                return Err(FlowError::NotAConversation {
                    card_id: card_id.clone(),
                });
            };
            if content.is_generating_notes() {
                // One generation at a time per card.
                return Ok(());
            }

            let messages = content.messages().to_vec();
            let backend_id = card.backend_id().cloned();
            let is_root = card.connections().is_empty();
            workspace.canvas_mut().update_card(
                card_id,
                CardPatch {
                    content: Some(CardContent::Conversation(ConversationContent::new(
                        messages.clone(),
                        true,
                    ))),
                    ..CardPatch::default()
                },
            );
            (messages, backend_id, is_root)
        };

        let generated = match &backend_id {
            Some(block_id) => {
                let provider = self.factory.resolve().await;
                match provider.finalize_block(block_id.as_str()).await {
                    Ok(finalized) => Some((finalized.summary, finalized.reformatted_content)),
                    Err(err) => {
                        warn!("block finalization failed, generating locally: {err}");
                        None
                    }
                }
            }
            None => {
                let provider = self.factory.resolve_sync();
                match provider.generate_notes(card_id.as_str(), &messages).await {
                    Ok(detailed) => {
                        let summary = fallback::summary_from_detailed(&detailed);
                        Some((summary, detailed))
                    }
                    Err(err) => {
                        warn!("note generation failed, generating locally: {err}");
                        None
                    }
                }
            }
        };
        let (summary, detailed) = generated.unwrap_or_else(|| {
            (
                fallback::mock_summary_markdown(),
                fallback::mock_detailed_markdown(&messages),
            )
        });

        let content = if is_root {
            CardContent::DetailedNotes(DetailedNotesContent::new(detailed, card_id.clone(), true))
        } else {
            CardContent::Summary(SummaryContent::new(summary, detailed, card_id.clone(), false))
        };

        let mut workspace = self.workspace.lock().await;
        workspace.canvas_mut().update_card(
            card_id,
            CardPatch {
                content: Some(content),
                ..CardPatch::default()
            },
        );
        if let Some(note_id) = workspace.navigation().current_note().cloned() {
            workspace.navigation_mut().update_note_timestamp(&note_id);
        }
        Ok(())
    }

    /// Lists the user's maps and seeds the note catalogue with metadata for
    /// any map not yet known locally. The mock provider has no maps, which
    /// reads as an empty list rather than an error.
    pub async fn load_user_maps(&self) -> Result<Vec<MapSummary>, FlowError> {
        let provider = self.factory.resolve().await;
        let response = match provider.get_user_maps().await {
            Ok(response) => response,
            Err(err) if err.is_unsupported() => return Ok(Vec::new()),
            Err(err) => return Err(FlowError::Service(err)),
        };

        let mut workspace = self.workspace.lock().await;
        for map in &response.maps {
            let map_id = sync::parse_map_id(&map.map_id)?;
            let known = workspace
                .navigation()
                .notes()
                .iter()
                .any(|note| note.backend_id() == Some(&map_id));
            if known {
                continue;
            }
            let note_id =
                NoteId::new(map.map_id.clone()).map_err(|source| SyncError::InvalidId {
                    field: "mapId",
                    value: map.map_id.clone(),
                    source,
                })?;
            let mut note = Note::new(
                note_id,
                map.title.clone(),
                sync::parse_backend_timestamp(&map.created_at),
            );
            note.set_backend_id(Some(map_id));
            workspace.navigation_mut().upsert_synced_note(note);
        }
        Ok(response.maps)
    }

    /// Fetches a map and hydrates it into the workspace: a known note is
    /// merged (preserving locally arranged card positions), an unknown one is
    /// built fresh. The hydrated note becomes current.
    pub async fn load_note(&self, map_id: &MapId) -> Result<NoteId, FlowError> {
        let provider = self.factory.resolve().await;
        let map = provider
            .get_map(map_id.as_str())
            .await
            .map_err(FlowError::Service)?;

        let mut workspace = self.workspace.lock().await;
        let existing = workspace
            .navigation()
            .notes()
            .iter()
            .find(|note| note.backend_id() == Some(map_id))
            .cloned();
        let note = match existing {
            Some(existing) => sync::merge_note_data(&existing, &map)?,
            None => sync::map_to_note(&map)?,
        };
        Ok(workspace.hydrate_note(note))
    }

    /// Places a highlight on a card, replacing any previous one.
    pub async fn highlight_text(
        &self,
        card_id: &CardId,
        text: &str,
        position: Position,
    ) -> Result<(), FlowError> {
        let mut workspace = self.workspace.lock().await;
        if workspace.canvas().card(card_id).is_none() {
            return Err(FlowError::UnknownCard {
                card_id: card_id.clone(),
            });
        }
        workspace
            .canvas_mut()
            .set_highlight(Some(Highlight::new(text, card_id.clone(), position)));
        Ok(())
    }
}

fn provisional_title(query: &str) -> String {
    let prefix: String = query.chars().take(30).collect();
    if query.chars().count() > 30 {
        format!("Discussion: {prefix}...")
    } else {
        format!("Discussion: {prefix}")
    }
}

const CARD_EXTENT: f64 = 768.0;
const PLACEMENT_MARGIN: f64 = 50.0;

/// Finds a free spot near the anchor: preferred offset first, then a spiral
/// probe, then right of everything as a last resort.
fn find_available_position(canvas: &crate::store::CanvasStore, anchor: Position) -> Position {
    let cards = canvas.cards();

    let preferred = Position::new((anchor.x + 200.0).max(50.0), (anchor.y + 50.0).max(50.0));
    if !overlaps_any(cards, preferred) {
        return preferred;
    }

    for attempt in 1..=20 {
        let angle = f64::from(attempt) * 0.8;
        let radius = 150.0 + f64::from(attempt) * 75.0;
        let candidate = Position::new(
            (anchor.x + angle.cos() * radius).max(50.0),
            (anchor.y + angle.sin() * radius).max(50.0),
        );
        if !overlaps_any(cards, candidate) {
            return candidate;
        }
    }

    let max_x = cards
        .iter()
        .map(|card| card.position().x)
        .fold(0.0_f64, f64::max);
    Position::new(max_x + CARD_EXTENT + PLACEMENT_MARGIN, anchor.y.max(50.0))
}

fn overlaps_any(cards: &[crate::model::Card], candidate: Position) -> bool {
    cards.iter().any(|card| {
        (card.position().x - candidate.x).abs() < CARD_EXTENT + PLACEMENT_MARGIN
            && (card.position().y - candidate.y).abs() < CARD_EXTENT + PLACEMENT_MARGIN
    })
}

#[cfg(test)]
mod tests;
