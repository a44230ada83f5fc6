// response generation - history into the user template, json back out

use crate::core::ai::{ChatClient, Message, strip_code_fences};
use crate::core::classifier::Category;
use crate::core::conversation::{Turn, render_history};
use crate::core::prompts::{Prompts, render};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const PARSING_ERROR: &str = "Parsing error.";
pub const NO_RESPONSE: &str = "There was an issue getting a response. Please try again later.";

// used when no model is configured
pub const QUIET_ENCOURAGEMENT: &str =
    "Every day has something in it. What is one small moment you remember from today?";
pub const POSITIVE_ENCOURAGEMENT: &str = "That sounds lovely! What made it feel so good?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Relevant,
    NotRelevant,
}

impl Relevance {
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "relevant" => Some(Self::Relevant),
            "not_relevant" | "irrelevant" => Some(Self::NotRelevant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<Relevance>,
}

impl ClassificationResult {
    pub fn new(category: Category, response_text: impl Into<String>) -> Self {
        Self {
            category,
            response_text: response_text.into(),
            relevance: None,
        }
    }

    pub fn parsing_error() -> Self {
        Self::new(Category::Unclear, PARSING_ERROR)
    }

    /// Transport failure: the classification stands, the text is the apology.
    pub fn no_response(category: Category) -> Self {
        Self::new(category, NO_RESPONSE)
    }

    /// Canned reply for when no model is configured.
    pub fn encouragement(category: Category) -> Self {
        match category {
            Category::Positive => Self::new(category, POSITIVE_ENCOURAGEMENT),
            Category::Quiet => Self::new(category, QUIET_ENCOURAGEMENT),
            _ => Self::no_response(category),
        }
    }

    pub fn is_apology(&self) -> bool {
        self.response_text == NO_RESPONSE
    }
}

// raw shape of the model's reply; both keys are required
#[derive(Deserialize)]
struct Reply {
    category: String,
    response_text: String,
    #[serde(default)]
    relevance: Option<String>,
}

// what we ask of the model for each category
struct Constraints {
    task: &'static str,
    max_characters: u32,
    tone: &'static str,
}

fn constraints(category: Category) -> Constraints {
    match category {
        Category::Positive => Constraints {
            task: "acknowledge_and_check_relevance",
            max_characters: 100,
            tone: "enthusiastic_celebratory",
        },
        Category::Quiet => Constraints {
            task: "encourage_elaboration_and_check_relevance",
            max_characters: 150,
            tone: "empathetic_cheerleader",
        },
        _ => Constraints {
            task: "respond_and_check_relevance",
            max_characters: 150,
            tone: "gentle_supportive",
        },
    }
}

pub struct ResponseGenerator {
    client: Option<ChatClient>,
    system: String,
    template: String,
}

impl ResponseGenerator {
    pub fn new(client: Option<ChatClient>, prompts: &Prompts) -> Self {
        Self {
            client,
            system: prompts.system.clone(),
            template: prompts.user.clone(),
        }
    }

    /// The user message: prior turns, the shown prompt and the new entry.
    pub fn build_prompt(&self, turns: &[Turn], prompt: &str, entry: &str, category: Category) -> String {
        let history = if turns.is_empty() {
            "(none)".to_string()
        } else {
            render_history(turns)
        };
        let c = constraints(category);
        let max_characters = c.max_characters.to_string();

        render(
            &self.template,
            &[
                ("task", c.task),
                ("category", category.as_str()),
                ("prompt", prompt),
                ("history", history.as_str()),
                ("entry", entry),
                ("max_characters", max_characters.as_str()),
                ("tone", c.tone),
            ],
        )
    }

    pub async fn respond(
        &self,
        turns: &[Turn],
        prompt: &str,
        entry: &str,
        category: Category,
    ) -> ClassificationResult {
        let Some(client) = &self.client else {
            debug!("no model configured, using canned response");
            return ClassificationResult::encouragement(category);
        };

        let messages = [
            Message::system(self.system.clone()),
            Message::user(self.build_prompt(turns, prompt, entry, category)),
        ];

        match client.complete(&messages).await {
            Ok(reply) => parse_reply(&reply),
            Err(e) => {
                warn!(error = %e, "response call failed");
                ClassificationResult::no_response(category)
            }
        }
    }
}

/// Parse `{"category", "response_text"[, "relevance"]}`, fences and all.
/// Anything that doesn't fit is the parsing-error result.
pub fn parse_reply(reply: &str) -> ClassificationResult {
    let reply: Reply = match serde_json::from_str(strip_code_fences(reply)) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable model reply");
            return ClassificationResult::parsing_error();
        }
    };

    ClassificationResult {
        category: Category::parse(&reply.category),
        response_text: reply.response_text.trim().to_string(),
        relevance: reply.relevance.as_deref().and_then(Relevance::parse),
    }
}
