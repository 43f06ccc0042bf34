// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use crate::model::{
    BlockId, CardContent, CardPatch, ConversationContent, Highlight, Message, NewCard,
    NewConnection, Position, Role,
};
use crate::store::MutateOutcome;

use super::CanvasStore;

fn conversation_card(query: &str) -> NewCard {
    NewCard {
        backend_id: None,
        map_id: None,
        position: Position::new(200.0, 200.0),
        content: CardContent::Conversation(ConversationContent::new(
            vec![Message::new(Role::User, query)],
            false,
        )),
        connections: Vec::new(),
    }
}

#[test]
fn add_card_assigns_distinct_ids() {
    let mut store = CanvasStore::new();
    let mut ids = BTreeSet::new();
    for n in 0..32 {
        let card = store.add_card(conversation_card(&format!("question {n}")));
        ids.insert(card.card_id().clone());
    }
    assert_eq!(ids.len(), 32);
}

#[test]
fn add_card_returns_entity_resolvable_in_table() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("what is gravity?"));

    let looked_up = store.card(card.card_id()).expect("card in table");
    assert_eq!(looked_up, &card);
    assert_eq!(looked_up.created_at(), looked_up.updated_at());
}

#[test]
fn add_connection_assigns_distinct_ids() {
    let mut store = CanvasStore::new();
    let a = store.add_card(conversation_card("a"));
    let b = store.add_card(conversation_card("b"));

    let mut ids = BTreeSet::new();
    for _ in 0..8 {
        let connection = store.add_connection(NewConnection {
            source_card_id: a.card_id().clone(),
            target_card_id: b.card_id().clone(),
            highlighted_text: "gravity".to_owned(),
            source_position: Position::new(0.0, 0.0),
        });
        ids.insert(connection.connection_id().clone());
    }
    // Duplicate edges over the same endpoints are kept, each with its own id.
    assert_eq!(ids.len(), 8);
    assert_eq!(store.connections().len(), 8);
}

#[test]
fn delete_card_cascades_over_touching_connections() {
    let mut store = CanvasStore::new();
    let a = store.add_card(conversation_card("a"));
    let b = store.add_card(conversation_card("b"));
    store.add_connection(NewConnection {
        source_card_id: a.card_id().clone(),
        target_card_id: b.card_id().clone(),
        highlighted_text: "spans".to_owned(),
        source_position: Position::new(10.0, 20.0),
    });

    assert_eq!(store.delete_card(a.card_id()), MutateOutcome::Applied);

    assert!(store.card(a.card_id()).is_none());
    assert!(store.card(b.card_id()).is_some());
    assert!(store
        .connections()
        .iter()
        .all(|c| c.source_card_id() != a.card_id() && c.target_card_id() != a.card_id()));
    assert!(store.connections().is_empty());
}

#[test]
fn delete_card_clears_matching_selection() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));
    store.select_card(Some(card.card_id().clone()));

    store.delete_card(card.card_id());
    assert_eq!(store.selected_card(), None);
}

#[test]
fn update_card_refreshes_updated_at_monotonically() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));
    let mut previous = card.updated_at();

    for x in 0..5 {
        let outcome = store.update_card(
            card.card_id(),
            CardPatch {
                position: Some(Position::new(f64::from(x), 0.0)),
                ..CardPatch::default()
            },
        );
        assert_eq!(outcome, MutateOutcome::Applied);
        let updated_at = store.card(card.card_id()).expect("card").updated_at();
        assert!(updated_at >= previous);
        previous = updated_at;
    }
}

#[test]
fn update_card_is_shallow_last_write_wins() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));

    store.update_card(
        card.card_id(),
        CardPatch {
            position: Some(Position::new(1.0, 1.0)),
            ..CardPatch::default()
        },
    );
    store.update_card(
        card.card_id(),
        CardPatch {
            position: Some(Position::new(9.0, 9.0)),
            ..CardPatch::default()
        },
    );

    let card = store.card(card.card_id()).expect("card");
    assert_eq!(card.position(), Position::new(9.0, 9.0));
    // Fields absent from both patches are untouched.
    assert_eq!(card.kind().as_str(), "conversation");
}

#[test]
fn update_card_cannot_clear_backend_id() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));

    let block_id: BlockId = "b1".parse().expect("block id");
    store.update_card(
        card.card_id(),
        CardPatch {
            backend_id: Some(block_id.clone()),
            ..CardPatch::default()
        },
    );
    // A patch without backend_id leaves the assignment in place.
    store.update_card(
        card.card_id(),
        CardPatch {
            position: Some(Position::new(3.0, 3.0)),
            ..CardPatch::default()
        },
    );

    assert_eq!(
        store.card(card.card_id()).expect("card").backend_id(),
        Some(&block_id)
    );
}

#[test]
fn mutations_on_unknown_ids_are_reported_no_ops() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));
    let unknown = crate::model::CardId::generate();

    assert_eq!(
        store.update_card(&unknown, CardPatch::default()),
        MutateOutcome::NotFound
    );
    assert_eq!(store.delete_card(&unknown), MutateOutcome::NotFound);
    // The rest of the table is untouched.
    assert!(store.card(card.card_id()).is_some());
}

#[test]
fn highlight_is_single_slot() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));

    store.set_highlight(Some(Highlight::new(
        "first span",
        card.card_id().clone(),
        Position::new(1.0, 2.0),
    )));
    store.set_highlight(Some(Highlight::new(
        "second span",
        card.card_id().clone(),
        Position::new(3.0, 4.0),
    )));
    assert_eq!(store.highlight().expect("highlight").text(), "second span");

    store.clear_highlight();
    assert!(store.highlight().is_none());
}

#[test]
fn load_graph_replaces_tables_and_clears_ephemeral_state() {
    let mut store = CanvasStore::new();
    let card = store.add_card(conversation_card("a"));
    store.select_card(Some(card.card_id().clone()));
    store.set_highlight(Some(Highlight::new(
        "span",
        card.card_id().clone(),
        Position::new(0.0, 0.0),
    )));

    let (cards, connections) = store.snapshot_graph();
    store.load_graph(Vec::new(), Vec::new());
    assert!(store.cards().is_empty());
    assert!(store.selected_card().is_none());
    assert!(store.highlight().is_none());

    store.load_graph(cards, connections);
    assert_eq!(store.cards().len(), 1);
}
