//! Prompt and message composition

use std::fmt::Write;

use crate::protocol::openai::OpenAiMessage;
use crate::types::{ConversationTurn, Role};

/// Fold retrieved snippets, trailing history, and the query into one prompt
///
/// Sections appear in that order; empty sections are left out.
pub fn compose_local_prompt(
    prompt: &str,
    snippets: &[String],
    history: &[ConversationTurn],
    max_turns: usize,
) -> String {
    let mut composed = String::new();

    // Writing into a String cannot fail
    if !snippets.is_empty() {
        composed.push_str("# Relevant Knowledge Base:\n");
        for (i, snippet) in snippets.iter().enumerate() {
            let _ = writeln!(composed, "{}. {snippet}", i + 1);
        }
        composed.push('\n');
    }

    let recent = trailing(history, max_turns);
    if !recent.is_empty() {
        composed.push_str("# Conversation History:\n");
        for turn in recent {
            let _ = writeln!(composed, "{}: {}", turn.role.as_str(), turn.content);
        }
        composed.push('\n');
    }

    let _ = write!(composed, "# Current Query:\n{prompt}\n\n# Response:");
    composed
}

/// System message, trailing history, then the user turn
pub fn chat_messages(
    system_prompt: &str,
    history: &[ConversationTurn],
    max_messages: usize,
    prompt: &str,
) -> Vec<OpenAiMessage> {
    let recent = trailing(history, max_messages);
    let mut messages = Vec::with_capacity(recent.len() + 2);

    messages.push(OpenAiMessage::new(Role::System.as_str(), system_prompt));
    messages.extend(
        recent
            .iter()
            .map(|turn| OpenAiMessage::new(turn.role.as_str(), turn.content.clone())),
    );
    messages.push(OpenAiMessage::new(Role::User.as_str(), prompt));

    messages
}

/// Single user turn for search-augmented backends
pub fn single_turn(prompt: &str) -> Vec<OpenAiMessage> {
    vec![OpenAiMessage::new(Role::User.as_str(), prompt)]
}

fn trailing(history: &[ConversationTurn], n: usize) -> &[ConversationTurn] {
    &history[history.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<ConversationTurn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("question {i}"))
                } else {
                    ConversationTurn::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn bare_prompt_has_only_query_section() {
        assert_eq!(
            compose_local_prompt("What is Rust?", &[], &[], 5),
            "# Current Query:\nWhat is Rust?\n\n# Response:"
        );
    }

    #[test]
    fn all_sections_in_order() {
        let snippets = vec!["Rust is a systems language.".to_owned(), "It has no GC.".to_owned()];
        let composed = compose_local_prompt("Why no GC?", &snippets, &history(2), 5);

        assert_eq!(
            composed,
            "# Relevant Knowledge Base:\n\
             1. Rust is a systems language.\n\
             2. It has no GC.\n\
             \n\
             # Conversation History:\n\
             user: question 0\n\
             assistant: answer 1\n\
             \n\
             # Current Query:\n\
             Why no GC?\n\
             \n\
             # Response:"
        );
    }

    #[test]
    fn history_is_trimmed_to_trailing_turns() {
        let composed = compose_local_prompt("next", &[], &history(8), 5);

        assert!(!composed.contains("question 2\n"));
        assert!(composed.contains("answer 3\n"));
        assert!(composed.contains("answer 7\n"));
        assert_eq!(composed.matches(": ").count(), 5);
    }

    #[test]
    fn chat_messages_wrap_history_with_system_and_user() {
        let messages = chat_messages("You are a helpful AI assistant.", &history(12), 10, "final");

        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0], OpenAiMessage::new("system", "You are a helpful AI assistant."));
        assert_eq!(messages[1].content, "question 2");
        assert_eq!(messages[10].content, "answer 11");
        assert_eq!(messages[11], OpenAiMessage::new("user", "final"));
    }

    #[test]
    fn single_turn_has_no_system_message() {
        let messages = single_turn("latest rust release");
        assert_eq!(messages, vec![OpenAiMessage::new("user", "latest rust release")]);
    }
}
