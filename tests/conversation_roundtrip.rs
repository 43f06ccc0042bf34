// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end conversation lifecycle against the public API, using the mock
//! provider: question -> highlighted follow-up -> note finalization -> note
//! switching. No card is ever left in a loading state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use mindcanvas::config::AppConfig;
use mindcanvas::flow::ConversationFlow;
use mindcanvas::model::{CardKind, Position, Role};
use mindcanvas::service::AiServiceFactory;
use mindcanvas::store::Workspace;

fn mock_flow() -> (Arc<Mutex<Workspace>>, ConversationFlow) {
    let config = AppConfig {
        use_mock_ai: true,
        mock_delay_min: Duration::from_millis(1),
        mock_delay_max: Duration::from_millis(5),
        mock_error_rate: 0.0,
        ..AppConfig::default()
    };
    let workspace = Arc::new(Mutex::new(Workspace::new()));
    let flow = ConversationFlow::new(workspace.clone(), AiServiceFactory::new(&config));
    (workspace, flow)
}

#[tokio::test]
async fn full_conversation_lifecycle_on_mock() {
    let (workspace, flow) = mock_flow();

    // Ask a question: note + answered root card.
    let root_id = flow
        .submit_query("How does gravity shape galaxies?")
        .await
        .expect("root card");

    // Highlight part of the answer and branch a linked conversation off it.
    flow.highlight_text(&root_id, "shape galaxies", Position::new(120.0, 80.0))
        .await
        .expect("highlight");
    let child_id = flow
        .submit_highlight_followup("What about dark matter?")
        .await
        .expect("child card");

    {
        let workspace = workspace.lock().await;
        let canvas = workspace.canvas();
        assert_eq!(canvas.cards().len(), 2);
        assert_eq!(canvas.connections().len(), 1);

        let connection = &canvas.connections()[0];
        assert_eq!(connection.source_card_id(), &root_id);
        assert_eq!(connection.target_card_id(), &child_id);
        assert_eq!(connection.highlighted_text(), "shape galaxies");

        // Every conversation is terminal: a user turn followed by a reply.
        for card in canvas.cards() {
            let content = card.as_conversation().expect("conversation");
            assert!(!content.is_generating_notes());
            assert_eq!(content.messages().len(), 2);
            assert_eq!(content.messages()[0].role(), Role::User);
            assert_eq!(content.messages()[1].role(), Role::Assistant);
        }
    }

    // Continue the child conversation, then finalize both cards.
    flow.send_followup_message(&child_id, "Is it measurable?")
        .await
        .expect("followup message");
    flow.generate_notes(&root_id).await.expect("root notes");
    flow.generate_notes(&child_id).await.expect("child notes");

    {
        let workspace = workspace.lock().await;
        let canvas = workspace.canvas();

        let root = canvas.card(&root_id).expect("root card");
        assert_eq!(root.kind(), CardKind::DetailedNotes);
        assert!(root.as_detailed_notes().expect("notes").is_visible());

        let child = canvas.card(&child_id).expect("child card");
        assert_eq!(child.kind(), CardKind::Summary);
        let summary = child.as_summary().expect("summary");
        assert!(!summary.markdown().is_empty());
        assert!(!summary.detailed_markdown().is_empty());

        // The connection survives finalization.
        assert_eq!(canvas.connections().len(), 1);
    }

    // Switching away and back preserves the whole graph.
    let (first_note, second_note) = {
        let mut workspace = workspace.lock().await;
        let first = workspace
            .navigation()
            .current_note()
            .expect("current note")
            .clone();
        let second = workspace.create_note("Scratch pad");
        (first, second)
    };
    {
        let mut workspace = workspace.lock().await;
        assert!(workspace.canvas().cards().is_empty());
        assert!(workspace.open_note(&first_note).is_applied());
        assert_eq!(workspace.canvas().cards().len(), 2);
        assert_eq!(workspace.canvas().connections().len(), 1);

        let second_note = workspace.navigation().note(&second_note).expect("note");
        assert!(second_note.cards().is_empty());
    }
}

#[tokio::test]
async fn deleting_the_source_card_leaves_no_dangling_reference_to_it() {
    let (workspace, flow) = mock_flow();

    let root_id = flow.submit_query("What is entropy?").await.expect("root");
    flow.highlight_text(&root_id, "entropy", Position::new(0.0, 0.0))
        .await
        .expect("highlight");
    let child_id = flow
        .submit_highlight_followup("Entropy in what sense?")
        .await
        .expect("child");

    let mut workspace = workspace.lock().await;
    assert!(workspace.canvas_mut().delete_card(&root_id).is_applied());

    let canvas = workspace.canvas();
    assert!(canvas.card(&root_id).is_none());
    assert!(canvas.card(&child_id).is_some());
    assert!(canvas.connections().is_empty());
}
