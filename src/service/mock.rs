// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mock AI provider: categorized template responses with simulated latency
//! and a configurable random failure rate.

use std::sync::OnceLock;
use std::time::Duration;

use rand::Rng;
use regex::Regex;
use time::OffsetDateTime;
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::model::{Message, Role};

use super::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Greetings,
    Science,
    Technology,
    History,
    General,
}

fn category_patterns() -> &'static [(Category, Regex)] {
    static PATTERNS: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // Word-bounded so "ai" does not fire inside "maintain".
        [
            (Category::Greetings, r"(?i)\b(hello|hi|hey)\b"),
            (
                Category::Science,
                r"(?i)\b(science|physics|chemistry|biology|experiment|theory)\b",
            ),
            (
                Category::Technology,
                r"(?i)\b(technology|computer|software|programming|ai|digital)\b",
            ),
            (
                Category::History,
                r"(?i)\b(history|historical|past|ancient|war|civilization)\b",
            ),
        ]
        .into_iter()
        .map(|(category, pattern)| {
            (
                category,
                Regex::new(pattern).expect("hard-coded category pattern is valid"),
            )
        })
        .collect()
    })
}

fn categorize(message: &str) -> Category {
    category_patterns()
        .iter()
        .find(|(_, pattern)| pattern.is_match(message))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

const GREETING_RESPONSES: [&str; 3] = [
    "Hello! I'm here to help you learn and explore any topic you're interested in. What would you like to know about?",
    "Hi there! I'm ready to assist you with questions, explanations, or deep dives into any subject. What's on your mind?",
    "Welcome! I can help you understand complex topics, provide explanations, and guide your learning journey. What would you like to explore?",
];

const SCIENCE_RESPONSES: [&str; 3] = [
    "That's a fascinating scientific question! Let me break this down for you with clear explanations and examples.",
    "Science is full of amazing discoveries and principles. I'll help you understand the key concepts and their real-world applications.",
    "Great scientific inquiry! Understanding these concepts will give you insights into how our world works at a fundamental level.",
];

const TECHNOLOGY_RESPONSES: [&str; 3] = [
    "Technology is constantly evolving! Let me explain the current state and future possibilities in this area.",
    "That's an excellent technology question. I'll cover both the technical details and practical implications.",
    "Technology shapes our daily lives in countless ways. Let's explore how this particular aspect works and why it matters.",
];

const HISTORY_RESPONSES: [&str; 3] = [
    "History provides valuable context for understanding our present. Let me walk you through the key events and their significance.",
    "That's an important historical topic! Understanding the past helps us make sense of current events and future trends.",
    "History is full of fascinating stories and lessons. I'll help you understand the causes, events, and consequences.",
];

const GENERAL_RESPONSES: [&str; 3] = [
    "That's an interesting question! Let me provide you with a comprehensive explanation that covers the key aspects.",
    "I'd be happy to help you understand this topic better. Let me break it down into digestible parts.",
    "Great question! I'll give you a thorough explanation with examples to make it clear and engaging.",
];

fn responses_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greetings => &GREETING_RESPONSES,
        Category::Science => &SCIENCE_RESPONSES,
        Category::Technology => &TECHNOLOGY_RESPONSES,
        Category::History => &HISTORY_RESPONSES,
        Category::General => &GENERAL_RESPONSES,
    }
}

const SCIENCE_NOTES_TEMPLATE: &str = "# Scientific Concepts Overview\n\n## Key Principles\n- **Fundamental Laws**: Core scientific principles that govern natural phenomena\n- **Experimental Method**: How scientists test hypotheses and validate theories\n- **Real-world Applications**: Practical uses and implications in daily life\n\n## Important Details\n- Historical development of the field\n- Current research frontiers\n- Connections to other scientific disciplines\n\n## Further Exploration\n- Recommended experiments or observations\n- Related topics for deeper study\n- Current debates and open questions";

const TECHNOLOGY_NOTES_TEMPLATE: &str = "# Technology Deep Dive\n\n## Core Concepts\n- **Technical Architecture**: How the technology is structured and operates\n- **Key Components**: Essential parts and their functions\n- **Performance Characteristics**: Capabilities and limitations\n\n## Implementation Details\n- Development process and methodologies\n- Integration with existing systems\n- Security and privacy considerations\n\n## Future Outlook\n- Emerging trends and innovations\n- Potential challenges and solutions\n- Impact on society and industry";

const HISTORY_NOTES_TEMPLATE: &str = "# Historical Analysis\n\n## Timeline and Context\n- **Key Events**: Major occurrences and their chronological order\n- **Historical Context**: Social, political, and economic conditions\n- **Cause and Effect**: How events influenced each other\n\n## Important Figures\n- Influential people and their contributions\n- Different perspectives and viewpoints\n- Legacy and long-term impact\n\n## Lessons and Significance\n- What we can learn from these events\n- Connections to contemporary issues\n- Ongoing historical debates";

const GENERAL_NOTES_TEMPLATE: &str = "# Comprehensive Overview\n\n## Main Concepts\n- **Core Ideas**: Fundamental principles and definitions\n- **Key Components**: Important elements and their relationships\n- **Practical Applications**: Real-world uses and examples\n\n## Detailed Analysis\n- Different perspectives and approaches\n- Advantages and disadvantages\n- Common misconceptions and clarifications\n\n## Additional Resources\n- Recommended further reading\n- Related topics for exploration\n- Current developments and trends";

fn notes_template_for(text: &str) -> &'static str {
    match categorize(text) {
        Category::Science => SCIENCE_NOTES_TEMPLATE,
        Category::Technology => TECHNOLOGY_NOTES_TEMPLATE,
        Category::History => HISTORY_NOTES_TEMPLATE,
        Category::Greetings | Category::General => GENERAL_NOTES_TEMPLATE,
    }
}

fn truncated_preview(message: &str) -> String {
    let preview: String = message.chars().take(50).collect();
    if message.chars().count() > 50 {
        format!("{preview}...")
    } else {
        preview
    }
}

fn detailed_response(message: &str, category: Category) -> String {
    let pool = responses_for(category);
    let base = pool[rand::thread_rng().gen_range(0..pool.len())];
    format!(
        "{base}\n\nRegarding \"{}\", here are some key points to consider:\n\
         • This topic connects to several important concepts\n\
         • There are practical applications you might find interesting\n\
         • Understanding this can help with related questions you might have",
        truncated_preview(message)
    )
}

fn current_date() -> String {
    let date = OffsetDateTime::now_utc().date();
    format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Category-templated response generator with simulated latency and failures.
#[derive(Debug, Clone)]
pub struct MockAi {
    delay_min: Duration,
    delay_max: Duration,
    error_rate: f64,
}

impl MockAi {
    pub fn new(config: &AppConfig) -> Self {
        let (delay_min, delay_max) = if config.mock_delay_max >= config.mock_delay_min {
            (config.mock_delay_min, config.mock_delay_max)
        } else {
            (config.mock_delay_max, config.mock_delay_min)
        };
        Self {
            delay_min,
            delay_max,
            error_rate: config.mock_error_rate.clamp(0.0, 1.0),
        }
    }

    async fn simulate_latency(&self, scale: f64) {
        let span = self.delay_max.as_millis().saturating_sub(self.delay_min.as_millis()) as u64;
        let jitter = if span > 0 {
            rand::thread_rng().gen_range(0..=span)
        } else {
            0
        };
        let millis = (self.delay_min.as_millis() as u64 + jitter) as f64 * scale;
        if millis > 0.0 {
            sleep(Duration::from_millis(millis as u64)).await;
        }
    }

    fn simulate_failure(&self, rate: f64) -> bool {
        rate > 0.0 && rand::thread_rng().gen_bool(rate.clamp(0.0, 1.0))
    }

    /// Answers a message with a category-templated reply. The target id is
    /// accepted for interface parity with the backend and ignored.
    pub async fn send_message(
        &self,
        _target_id: &str,
        message: &str,
    ) -> Result<String, ServiceError> {
        self.simulate_latency(1.0).await;
        if self.simulate_failure(self.error_rate) {
            return Err(ServiceError::Network {
                message: "simulated network interruption".to_owned(),
            });
        }
        Ok(detailed_response(message, categorize(message)))
    }

    /// Legacy note generation: picks a template from the conversation text,
    /// appends the user questions as discussion points and a dated footer.
    /// Runs at 1.5x the configured latency and 0.6x the failure rate.
    pub async fn generate_notes(
        &self,
        _conversation_id: &str,
        messages: &[Message],
    ) -> Result<String, ServiceError> {
        self.simulate_latency(1.5).await;
        if self.simulate_failure(self.error_rate * 0.6) {
            return Err(ServiceError::Network {
                message: "simulated note generation failure".to_owned(),
            });
        }

        let conversation_text = messages
            .iter()
            .map(Message::content)
            .collect::<Vec<_>>()
            .join(" ");
        let mut notes = notes_template_for(&conversation_text).to_owned();

        let user_questions: Vec<&str> = messages
            .iter()
            .filter(|message| message.role() == Role::User)
            .map(Message::content)
            .collect();
        if !user_questions.is_empty() {
            notes.push_str("\n\n## Discussion Points\n");
            for (index, question) in user_questions.iter().enumerate() {
                notes.push_str(&format!("\n{}. {question}", index + 1));
            }
        }

        notes.push_str(&format!(
            "\n\n---\n*Generated from conversation on {}*",
            current_date()
        ));
        Ok(notes)
    }
}
