// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Locally generated replies used when a service call fails (or no backend is
//! wired up). Every conversation must reach a terminal answered state, so
//! flows substitute these instead of propagating the failure.

use rand::Rng;
use time::OffsetDateTime;

use crate::model::{Message, Role};

fn pick(pool: &[&str]) -> String {
    pool[rand::thread_rng().gen_range(0..pool.len())].to_owned()
}

fn current_date() -> String {
    let date = OffsetDateTime::now_utc().date();
    format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Long-form stand-in for the first answer of a fresh note.
pub(crate) fn long_form_answer(query: &str) -> String {
    let openers = [
        "That's a fascinating question",
        "Excellent question",
        "Great question",
    ];
    format!(
        "{} about \"{query}\"! Let me break this down comprehensively for you.\n\n\
         First, it's important to understand the foundational concepts that underpin this topic. \
         The subject you're asking about has multiple layers, each building upon the previous one, \
         and examining it from a theoretical perspective shows how various principles interconnect \
         to form a cohesive understanding.\n\n\
         From a practical standpoint, there are several key considerations to keep in mind. The \
         real-world applications of this concept extend far beyond what might initially be \
         apparent, and researchers who have studied these nuances report some genuinely \
         interesting patterns.\n\n\
         What makes this particularly intriguing is how it connects to broader themes in the \
         discipline. The implications stretch across multiple domains, influencing everything from \
         basic principles to advanced applications.\n\n\
         I'd be happy to dive deeper into any specific aspect that interests you most; there are \
         many threads here worth pulling on.",
        pick(&openers)
    )
}

/// Stand-in reply for a follow-up; quotes the highlighted span when there is
/// one.
pub(crate) fn reply_for(query: &str, highlighted_text: Option<&str>) -> String {
    let base = match highlighted_text {
        Some(highlighted) => {
            let templates = [
                format!(
                    "That's an interesting follow-up about \"{highlighted}\". Regarding your question \"{query}\", let me elaborate..."
                ),
                format!(
                    "Great question about \"{highlighted}\". When you ask \"{query}\", this connects to several important concepts..."
                ),
                format!(
                    "I see you want to explore \"{highlighted}\" further with \"{query}\". Here's a deeper dive..."
                ),
                format!(
                    "Thanks for highlighting \"{highlighted}\". Your question \"{query}\" is particularly relevant because..."
                ),
            ];
            templates[rand::thread_rng().gen_range(0..templates.len())].clone()
        }
        None => {
            let templates = [
                format!("That's an interesting question about \"{query}\". Let me break this down for you..."),
                format!("Great point! Regarding \"{query}\", here's what I think..."),
                format!("I understand you're asking about \"{query}\". Here's a comprehensive explanation..."),
                format!("Let me help you understand \"{query}\" better. The key concepts are..."),
            ];
            templates[rand::thread_rng().gen_range(0..templates.len())].clone()
        }
    };

    let additions = [
        "This aspect involves several layers of complexity that are worth understanding.",
        "There are some nuanced details here that can help clarify the broader picture.",
        "This connects to other concepts we've discussed and opens up new areas to explore.",
        "The implications of this extend beyond what we might initially consider.",
        "Understanding this piece helps build a more complete mental model of the topic.",
    ];
    format!("{base}\n\n{}", pick(&additions))
}

/// Stand-in summary markdown for a finalized card.
pub(crate) fn mock_summary_markdown() -> String {
    format!(
        "## Key Points\n\n\
         - Main discussion focused on core concepts and their applications\n\
         - Several important insights emerged from the conversation\n\
         - Key relationships between different ideas were explored\n\n\
         ## Quick Takeaways\n\n\
         **Primary Focus**: Core concepts and practical applications\n\
         **Key Insight**: Important relationships between ideas\n\
         **Next Steps**: Areas identified for deeper exploration\n\n\
         ---\n*Summary generated on {}*",
        current_date()
    )
}

/// Stand-in detailed markdown, woven from the assistant turns when there are
/// any.
pub(crate) fn mock_detailed_markdown(messages: &[Message]) -> String {
    let conversation_summary = messages
        .iter()
        .filter(|message| message.role() == Role::Assistant)
        .map(Message::content)
        .collect::<Vec<_>>()
        .join("\n\n");
    let core_concepts = if conversation_summary.is_empty() {
        "The conversation covered fundamental principles and their practical applications, with \
         particular emphasis on understanding the underlying mechanisms and their broader \
         implications."
            .to_owned()
    } else {
        conversation_summary
    };

    format!(
        "# Comprehensive Analysis\n\n\
         ## Executive Summary\n\n\
         This analysis explores the key concepts, methodologies, and insights that emerged from \
         the conversation. The discussion covered multiple interconnected topics that form a \
         complete picture of the subject matter.\n\n\
         ## Detailed Breakdown\n\n\
         ### Core Concepts Explored\n\n\
         {core_concepts}\n\n\
         ### Key Insights\n\n\
         1. **Foundational Understanding**\n\
            - Primary concepts were examined and related to each other\n\
            - Practical applications were identified and discussed\n\
         2. **Advanced Considerations**\n\
            - Interactions between components and their edge cases\n\
            - Potential challenges and mitigation strategies\n\
         3. **Practical Applications**\n\
            - Real-world implementation strategies\n\
            - Common pitfalls and how to avoid them\n\n\
         ## Areas for Further Investigation\n\n\
         - Advanced applications and complex scenarios\n\
         - Connections to related domains\n\
         - Open questions raised during the discussion\n\n\
         ---\n\n\
         *Detailed analysis completed on {}*",
        current_date()
    )
}

/// Extracts a summary from detailed markdown by lifting its first main
/// sections; falls back to the canned summary when there is too little
/// structure to lift.
pub(crate) fn summary_from_detailed(detailed_markdown: &str) -> String {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut in_section = false;
    let mut section_count = 0;

    for line in detailed_markdown.lines() {
        if line.starts_with("# ") || line.starts_with("## ") {
            section_count += 1;
            if section_count <= 3 {
                summary_lines.push(line);
                in_section = true;
            } else {
                break;
            }
        } else if in_section && !line.trim().is_empty() && summary_lines.len() < 15 {
            summary_lines.push(line);
        }
    }

    if summary_lines.len() < 5 {
        return mock_summary_markdown();
    }
    format!(
        "{}\n\n---\n*Summary generated on {}*",
        summary_lines.join("\n"),
        current_date()
    )
}
