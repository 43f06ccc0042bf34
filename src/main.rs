// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindcanvas demo entrypoint.
//!
//! Drives a question (and optionally a highlighted follow-up) through the
//! full store/service/flow stack and prints the resulting graph as JSON
//! lines. Configuration comes from `MINDCANVAS_*` environment variables;
//! `--mock` forces the mock provider regardless of environment.

use std::error::Error;
use std::sync::Arc;

use tokio::sync::Mutex;

use mindcanvas::config::AppConfig;
use mindcanvas::flow::ConversationFlow;
use mindcanvas::model::{CardContent, Position, Role};
use mindcanvas::service::AiServiceFactory;
use mindcanvas::store::Workspace;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --question <text> [--highlight <text> --followup <text>] [--mock]\n\nAsks the question, optionally highlights a span of the answer and submits a\nfollow-up anchored to it, then prints the resulting card/connection graph as\nJSON lines. --mock forces the mock AI provider."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    question: Option<String>,
    highlight: Option<String>,
    followup: Option<String>,
    mock: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--question" => {
                if options.question.is_some() {
                    return Err(());
                }
                options.question = Some(args.next().ok_or(())?);
            }
            "--highlight" => {
                if options.highlight.is_some() {
                    return Err(());
                }
                options.highlight = Some(args.next().ok_or(())?);
            }
            "--followup" => {
                if options.followup.is_some() {
                    return Err(());
                }
                options.followup = Some(args.next().ok_or(())?);
            }
            "--mock" => {
                if options.mock {
                    return Err(());
                }
                options.mock = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.question.is_some() {
                    return Err(());
                }
                options.question = Some(arg);
            }
        }
    }

    if options.followup.is_some() != options.highlight.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindcanvas".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let Some(question) = options.question.clone() else {
            print_usage(&program);
            std::process::exit(2);
        };

        let mut config = AppConfig::from_env();
        if options.mock {
            config.use_mock_ai = true;
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async move {
            let workspace = Arc::new(Mutex::new(Workspace::new()));
            let factory = AiServiceFactory::new(&config);
            let flow = ConversationFlow::new(workspace.clone(), factory);

            let root_id = flow.submit_query(&question).await?;

            if let (Some(highlight), Some(followup)) = (options.highlight, options.followup) {
                let anchor = {
                    let workspace = workspace.lock().await;
                    workspace
                        .canvas()
                        .card(&root_id)
                        .map(|card| card.position())
                        .unwrap_or(Position::new(200.0, 200.0))
                };
                flow.highlight_text(&root_id, &highlight, anchor).await?;
                flow.submit_highlight_followup(&followup).await?;
            }

            let workspace = workspace.lock().await;
            for card in workspace.canvas().cards() {
                let messages = match card.content() {
                    CardContent::Conversation(content) => content
                        .messages()
                        .iter()
                        .map(|message| {
                            serde_json::json!({
                                "role": message.role().as_str(),
                                "content": message.content(),
                            })
                        })
                        .collect::<Vec<_>>(),
                    _ => Vec::new(),
                };
                println!(
                    "{}",
                    serde_json::json!({
                        "card": card.card_id().as_str(),
                        "kind": card.kind().as_str(),
                        "position": [card.position().x, card.position().y],
                        "backendId": card.backend_id().map(|id| id.as_str()),
                        "mapId": card.map_id().map(|id| id.as_str()),
                        "messages": messages,
                    })
                );
            }
            for connection in workspace.canvas().connections() {
                println!(
                    "{}",
                    serde_json::json!({
                        "connection": connection.connection_id().as_str(),
                        "source": connection.source_card_id().as_str(),
                        "target": connection.target_card_id().as_str(),
                        "highlightedText": connection.highlighted_text(),
                    })
                );
            }

            let user_count = workspace
                .canvas()
                .cards()
                .iter()
                .filter_map(|card| card.as_conversation())
                .flat_map(|content| content.messages())
                .filter(|message| message.role() == Role::User)
                .count();
            eprintln!(
                "mindcanvas: {} cards, {} connections, {} user messages",
                workspace.canvas().cards().len(),
                workspace.canvas().connections().len(),
                user_count
            );
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("mindcanvas: {err}");
        std::process::exit(1);
    }
}
