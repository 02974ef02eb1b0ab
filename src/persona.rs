//! Persona prompt
//!
//! The persona is plain configuration: a display name and the instructional
//! text prepended to every interview question. The built-in persona can be
//! replaced from the config file without touching code.

use serde::{Deserialize, Serialize};

/// Separator between the persona prompt and the question
const QUESTION_SEPARATOR: &str = "\n\nQuestion: ";

const DEFAULT_NAME: &str = "Harsha";

const DEFAULT_PROMPT: &str = "\
You are Donga Sai Venkata Sri Harsha, an AI assistant with a unique perspective.
Respond to interview questions authentically, sharing personal insights and experiences.

Key Attributes:
- Superpower: Persistent curiosity and deep exploration of interests
- Growth Areas: AI, Astronomy, Generative AI, Machine Learning
- Work Philosophy: Passion-driven learning, not just hard work
- Personal Motto: When intrigued, push boundaries to understand deeply";

/// Identity and system prompt used for every generation request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Persona {
    /// Display name
    pub name: String,

    /// Instructional text prepended to every question
    pub system_prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            system_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Persona {
    /// Create a persona from explicit values
    #[must_use]
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Build the request for a question
    #[must_use]
    pub fn request<'a>(&'a self, question: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            system_prompt: &self.system_prompt,
            question,
        }
    }
}

/// One outbound generation request; built per call, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    pub system_prompt: &'a str,
    pub question: &'a str,
}

impl GenerationRequest<'_> {
    /// Full prompt text sent to the model
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{}{QUESTION_SEPARATOR}{}", self.system_prompt, self.question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_appends_question_after_blank_line() {
        let persona = Persona::new("Test", "You are a tester.");
        let prompt = persona.request("Why?").prompt();
        assert_eq!(prompt, "You are a tester.\n\nQuestion: Why?");
    }

    #[test]
    fn default_persona_has_prompt() {
        let persona = Persona::default();
        assert_eq!(persona.name, "Harsha");
        assert!(persona.system_prompt.starts_with("You are Donga Sai Venkata Sri Harsha"));
        assert!(persona.system_prompt.contains("Growth Areas"));
    }

    #[test]
    fn deserializes_from_toml() {
        let persona: Persona = toml::from_str(
            r#"
            name = "Ada"
            system_prompt = "You are Ada."
            "#,
        )
        .unwrap();
        assert_eq!(persona, Persona::new("Ada", "You are Ada."));
    }
}
