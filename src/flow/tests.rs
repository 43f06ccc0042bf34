// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::model::{CardKind, Position, Role};
use crate::service::test_support::serve_responses;
use crate::service::AiServiceFactory;
use crate::store::Workspace;

use super::{provisional_title, ConversationFlow, FlowError};

fn mock_flow() -> ConversationFlow {
    let config = AppConfig {
        use_mock_ai: true,
        mock_delay_min: Duration::ZERO,
        mock_delay_max: Duration::ZERO,
        mock_error_rate: 0.0,
        ..AppConfig::default()
    };
    ConversationFlow::new(
        Arc::new(Mutex::new(Workspace::new())),
        AiServiceFactory::new(&config),
    )
}

fn backend_flow(base_url: String) -> ConversationFlow {
    let config = AppConfig {
        api_base_url: base_url,
        api_timeout: Duration::from_millis(2_000),
        api_retries: 0,
        use_mock_ai: false,
        mock_delay_min: Duration::ZERO,
        mock_delay_max: Duration::ZERO,
        mock_error_rate: 0.0,
        ..AppConfig::default()
    };
    ConversationFlow::new(
        Arc::new(Mutex::new(Workspace::new())),
        AiServiceFactory::new(&config),
    )
}

#[tokio::test]
async fn submit_query_reaches_answered_state_without_backend() {
    let flow = mock_flow();

    let card_id = flow.submit_query("What is gravity?").await.expect("card id");

    let workspace = flow.workspace().lock().await;
    let card = workspace.canvas().card(&card_id).expect("card");
    assert_eq!(card.kind(), CardKind::Conversation);
    assert_eq!(card.position(), Position::new(200.0, 200.0));
    assert!(card.backend_id().is_none());

    let content = card.as_conversation().expect("conversation");
    assert_eq!(content.messages().len(), 2);
    assert_eq!(content.messages()[0].role(), Role::User);
    assert_eq!(content.messages()[0].content(), "What is gravity?");
    assert_eq!(content.messages()[1].role(), Role::Assistant);
    assert!(!content.messages()[1].content().is_empty());

    let note_id = workspace.navigation().current_note().expect("current note");
    let note = workspace.navigation().note(note_id).expect("note");
    assert_eq!(note.title(), "Discussion: What is gravity?");
}

#[tokio::test]
async fn submit_query_rejects_blank_input() {
    let flow = mock_flow();
    let err = flow.submit_query("   ").await.expect_err("empty query");
    assert!(matches!(err, FlowError::EmptyQuery));
}

#[tokio::test]
async fn submit_query_happy_path_wires_backend_ids() {
    let stub = serve_responses(vec![
        (200, r#"{"maps":[]}"#.to_owned()),
        (200, r#"{"mapId":"m1","title":"Gravity"}"#.to_owned()),
        (
            200,
            r#"{"blockId":"b1","title":"What is gravity?","response":"Gravity is a fundamental interaction."}"#.to_owned(),
        ),
    ])
    .await;
    let flow = backend_flow(stub.base_url());

    let card_id = flow.submit_query("What is gravity?").await.expect("card id");

    // Health probe, map create, block create.
    assert_eq!(stub.hit_count(), 3);

    let workspace = flow.workspace().lock().await;
    let card = workspace.canvas().card(&card_id).expect("card");
    assert_eq!(card.backend_id().expect("backend id").as_str(), "b1");
    assert_eq!(card.map_id().expect("map id").as_str(), "m1");

    let content = card.as_conversation().expect("conversation");
    let user_messages: Vec<_> = content
        .messages()
        .iter()
        .filter(|message| message.role() == Role::User)
        .collect();
    assert_eq!(user_messages.len(), 1);
    assert_eq!(user_messages[0].content(), "What is gravity?");
    assert_eq!(
        content.messages().last().expect("reply").content(),
        "Gravity is a fundamental interaction."
    );

    let note_id = workspace.navigation().current_note().expect("current note");
    let note = workspace.navigation().note(note_id).expect("note");
    assert_eq!(note.title(), "Gravity");
    assert_eq!(note.backend_id().expect("map id").as_str(), "m1");
}

#[tokio::test]
async fn submit_query_falls_back_when_backend_rejects() {
    let stub = serve_responses(vec![
        (200, r#"{"maps":[]}"#.to_owned()),
        (500, String::new()),
    ])
    .await;
    let flow = backend_flow(stub.base_url());

    let card_id = flow.submit_query("What is gravity?").await.expect("card id");

    let workspace = flow.workspace().lock().await;
    let card = workspace.canvas().card(&card_id).expect("card");
    // The answer is local; the card never got backend-tracked but is terminal.
    assert!(card.backend_id().is_none());
    let content = card.as_conversation().expect("conversation");
    assert_eq!(content.messages().len(), 2);
    assert_eq!(content.messages()[1].role(), Role::Assistant);
}

#[tokio::test]
async fn highlight_followup_creates_linked_card_and_connection() {
    let flow = mock_flow();
    let root_id = flow.submit_query("What is gravity?").await.expect("root");

    flow.highlight_text(&root_id, "fundamental interaction", Position::new(40.0, 60.0))
        .await
        .expect("highlight");
    let child_id = flow
        .submit_highlight_followup("Tell me more about that")
        .await
        .expect("child");

    let workspace = flow.workspace().lock().await;
    let child = workspace.canvas().card(&child_id).expect("child card");
    assert_eq!(child.connections(), &[root_id.clone()]);

    let touching: Vec<_> = workspace
        .canvas()
        .connections()
        .iter()
        .filter(|connection| connection.target_card_id() == &child_id)
        .collect();
    assert_eq!(touching.len(), 1);
    assert_eq!(touching[0].source_card_id(), &root_id);
    assert_eq!(touching[0].highlighted_text(), "fundamental interaction");

    // The highlight is single-shot: consumed by the submit.
    assert!(workspace.canvas().highlight().is_none());

    let content = child.as_conversation().expect("conversation");
    assert_eq!(content.messages().len(), 2);
    // The local reply quotes the highlighted span.
    assert!(content.messages()[1]
        .content()
        .contains("fundamental interaction"));
}

#[tokio::test]
async fn highlight_followup_without_highlight_is_rejected() {
    let flow = mock_flow();
    flow.submit_query("What is gravity?").await.expect("root");

    let err = flow
        .submit_highlight_followup("follow up")
        .await
        .expect_err("no highlight");
    assert!(matches!(err, FlowError::NoActiveHighlight));
}

#[tokio::test]
async fn send_followup_message_appends_two_messages() {
    let flow = mock_flow();
    let card_id = flow.submit_query("What is gravity?").await.expect("card");

    flow.send_followup_message(&card_id, "Does it bend light?")
        .await
        .expect("followup");

    let workspace = flow.workspace().lock().await;
    let content = workspace
        .canvas()
        .card(&card_id)
        .expect("card")
        .as_conversation()
        .expect("conversation");
    assert_eq!(content.messages().len(), 4);
    assert_eq!(content.messages()[2].role(), Role::User);
    assert_eq!(content.messages()[2].content(), "Does it bend light?");
    assert_eq!(content.messages()[3].role(), Role::Assistant);
}

#[tokio::test]
async fn generate_notes_turns_root_card_into_detailed_notes() {
    let flow = mock_flow();
    let card_id = flow.submit_query("Explain physics to me").await.expect("card");

    flow.generate_notes(&card_id).await.expect("notes");

    let workspace = flow.workspace().lock().await;
    let card = workspace.canvas().card(&card_id).expect("card");
    assert_eq!(card.kind(), CardKind::DetailedNotes);
    let content = card.as_detailed_notes().expect("detailed notes");
    assert!(!content.markdown().is_empty());
    assert!(content.is_visible());
    assert_eq!(content.original_conversation_id(), &card_id);
}

#[tokio::test]
async fn generate_notes_turns_linked_card_into_summary() {
    let flow = mock_flow();
    let root_id = flow.submit_query("Explain physics to me").await.expect("root");
    flow.highlight_text(&root_id, "physics", Position::new(0.0, 0.0))
        .await
        .expect("highlight");
    let child_id = flow
        .submit_highlight_followup("Go deeper on physics")
        .await
        .expect("child");

    flow.generate_notes(&child_id).await.expect("notes");

    let workspace = flow.workspace().lock().await;
    let card = workspace.canvas().card(&child_id).expect("card");
    assert_eq!(card.kind(), CardKind::Summary);
    let content = card.as_summary().expect("summary");
    assert!(!content.markdown().is_empty());
    assert!(!content.detailed_markdown().is_empty());
    assert!(!content.is_expanded());
}

#[tokio::test]
async fn generate_notes_on_notes_card_is_rejected() {
    let flow = mock_flow();
    let card_id = flow.submit_query("Explain physics to me").await.expect("card");
    flow.generate_notes(&card_id).await.expect("notes");

    let err = flow
        .generate_notes(&card_id)
        .await
        .expect_err("already finalized");
    assert!(matches!(err, FlowError::NotAConversation { .. }));
}

#[tokio::test]
async fn load_user_maps_is_empty_on_mock() {
    let flow = mock_flow();
    let maps = flow.load_user_maps().await.expect("maps");
    assert!(maps.is_empty());
}

#[tokio::test]
async fn load_user_maps_seeds_note_catalogue() {
    let stub = serve_responses(vec![
        (200, r#"{"maps":[{"mapId":"m1","title":"Gravity","createdAt":"2026-01-01T00:00:00Z"}]}"#.to_owned()),
    ])
    .await;
    let flow = backend_flow(stub.base_url());

    let maps = flow.load_user_maps().await.expect("maps");
    assert_eq!(maps.len(), 1);

    let workspace = flow.workspace().lock().await;
    assert_eq!(workspace.navigation().notes().len(), 1);
    let note = &workspace.navigation().notes()[0];
    assert_eq!(note.title(), "Gravity");
    assert_eq!(note.backend_id().expect("map id").as_str(), "m1");
}

#[tokio::test]
async fn load_note_hydrates_workspace_from_map() {
    let map_body = r#"{
        "mapId": "m1",
        "title": "Gravity",
        "blocks": [
            {"blockId":"b1","title":"Root","isFinalized":false,
             "createdAt":"2026-01-01T00:00:00Z","updatedAt":"2026-01-01T00:00:00Z",
             "messages":[{"role":"user","content":"What is gravity?","timestamp":"2026-01-01T00:00:00Z"}]},
            {"blockId":"b2","title":"Child","parentBlockId":"b1","isFinalized":false,
             "createdAt":"2026-01-01T00:00:00Z","updatedAt":"2026-01-01T00:00:00Z"}
        ]
    }"#;
    let stub = serve_responses(vec![
        (200, r#"{"maps":[]}"#.to_owned()),
        (200, map_body.to_owned()),
    ])
    .await;
    let flow = backend_flow(stub.base_url());

    let map_id = "m1".parse().expect("map id");
    let note_id = flow.load_note(&map_id).await.expect("note id");

    let workspace = flow.workspace().lock().await;
    assert_eq!(workspace.navigation().current_note(), Some(&note_id));
    assert_eq!(workspace.canvas().cards().len(), 2);
    assert_eq!(workspace.canvas().connections().len(), 1);
}

#[test]
fn provisional_titles_are_truncated() {
    assert_eq!(provisional_title("short"), "Discussion: short");
    let long = "a".repeat(40);
    assert_eq!(
        provisional_title(&long),
        format!("Discussion: {}...", "a".repeat(30))
    );
}
