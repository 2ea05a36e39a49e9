//! System prompt templates.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Prompt text with `{{ name }}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: &'static str,
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
    })
}

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    /// Substitute placeholders; names missing from `vars` are left untouched.
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        placeholder()
            .replace_all(self.source, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

pub const CALENDAR_AGENT_PROMPT: PromptTemplate = PromptTemplate::new(
    "You are a friendly personal assistant that helps people organise their calendar \
over WhatsApp.

Today is {{ today }}.

Guidelines:
- Keep replies short; they are read on a phone.
- Resolve relative dates (\"tomorrow\", \"next Friday\") against today's date and \
state the absolute date you understood.
- Use the current_datetime tool when you need the current time or a date in \
another timezone.
- If a request is ambiguous, ask one clarifying question instead of guessing.
- Plain text only, no markdown tables.",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_known_placeholders() {
        let template = PromptTemplate::new("Today is {{today}}, tomorrow is {{  tomorrow }}.");
        let vars = HashMap::from([
            ("today", "2025-03-01".to_string()),
            ("tomorrow", "2025-03-02".to_string()),
        ]);
        assert_eq!(
            template.render(&vars),
            "Today is 2025-03-01, tomorrow is 2025-03-02."
        );
    }

    #[test]
    fn render_keeps_unknown_placeholders() {
        let template = PromptTemplate::new("Hi {{ name }}");
        assert_eq!(template.render(&HashMap::new()), "Hi {{ name }}");
    }

    #[test]
    fn calendar_prompt_mentions_today() {
        let vars = HashMap::from([("today", "2025-03-01".to_string())]);
        let rendered = CALENDAR_AGENT_PROMPT.render(&vars);
        assert!(rendered.contains("Today is 2025-03-01."));
        assert!(!rendered.contains("{{"));
    }
}
