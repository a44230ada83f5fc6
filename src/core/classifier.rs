// entry classification
// local checks first, then the model if one is configured, else keyword/sentiment heuristics

use crate::core::ai::{ChatClient, Message, strip_code_fences};
use crate::core::conversation::{Turn, render_history};
use crate::core::safety::{self, Safety};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub const TECH_KEYWORDS: &[&str] = &[
    "react",
    "javascript",
    "python",
    "html",
    "api",
    "component",
    "code",
    "bug",
    "error",
    "debug",
    "function",
    "variable",
];

pub const INSTRUCTION_PHRASES: &[&str] = &[
    "write me",
    "how do i",
    "generate",
    "make this",
    "summarise",
    "summarize",
    "explain",
    "create a",
    "give me",
    "tell me about",
];

pub const QUIET_RESPONSES: &[&str] = &[
    "ok", "okay", "fine", ".", "...", "idk", "nah", "nope", "nothing", "meh", "no", "yes",
];

// trimmed entries shorter than this (in chars) are quiet
pub const SHORT_ENTRY_THRESHOLD: usize = 15;

// vader compound bounds
const NEGATIVE_COMPOUND: f64 = -0.3;
const POSITIVE_COMPOUND: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safety,
    Instruction,
    Quiet,
    Positive,
    Unclear,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Safety,
        Category::Instruction,
        Category::Quiet,
        Category::Positive,
        Category::Unclear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safety => "safety",
            Category::Instruction => "instruction",
            Category::Quiet => "quiet",
            Category::Positive => "positive",
            Category::Unclear => "unclear",
        }
    }

    /// Lenient parse: case and whitespace are ignored, anything unknown is `Unclear`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(text))
            .unwrap_or(Category::Unclear)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment polarity in [-1, 1].
pub trait Sentiment: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

pub struct Vader;

impl Sentiment for Vader {
    fn compound(&self, text: &str) -> f64 {
        vader_sentiment::SentimentIntensityAnalyzer::new()
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

pub struct Classifier {
    remote: Option<ChatClient>,
    instructions: String,
    sentiment: Box<dyn Sentiment>,
    threshold: f64,
}

#[derive(Deserialize)]
struct CategoryReply {
    category: String,
}

impl Classifier {
    /// `instructions` is the system prompt for the remote call.
    pub fn new(remote: Option<ChatClient>, instructions: impl Into<String>) -> Self {
        Self {
            remote,
            instructions: instructions.into(),
            sentiment: Box::new(Vader),
            threshold: safety::DEFAULT_THRESHOLD,
        }
    }

    pub fn heuristic() -> Self {
        Self::new(None, String::new())
    }

    pub fn with_sentiment(mut self, sentiment: impl Sentiment + 'static) -> Self {
        self.sentiment = Box::new(sentiment);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Never fails: anything that goes wrong ends up as `Unclear`.
    pub async fn classify(&self, entry: &str, turns: &[Turn]) -> Category {
        let trimmed = entry.trim();

        if trimmed.is_empty() {
            return Category::Quiet;
        }

        // safety beats everything, and skips the model
        let safety = Safety::check_with(trimmed, self.threshold);
        if safety.is_flagged {
            info!(
                phrase = safety.phrase.unwrap_or_default(),
                score = safety.score,
                "safety phrase matched"
            );
            return Category::Safety;
        }

        match &self.remote {
            Some(client) => {
                if is_short(trimmed) {
                    return Category::Quiet;
                }
                self.classify_remote(client, trimmed, turns).await
            }
            None => self.heuristics(trimmed),
        }
    }

    /// Keyword, length and sentiment rules used when no model is configured.
    pub fn heuristics(&self, entry: &str) -> Category {
        let lower = entry.trim().to_lowercase();
        let normalized = safety::normalize(&lower);

        if Safety::check_with(&lower, self.threshold).is_flagged {
            return Category::Safety;
        }

        let is_tech = normalized
            .split_whitespace()
            .any(|word| TECH_KEYWORDS.contains(&word));
        let is_instruction = INSTRUCTION_PHRASES.iter().any(|p| normalized.contains(p));
        if is_tech || is_instruction {
            return Category::Instruction;
        }

        if is_short(&lower) {
            return Category::Quiet;
        }

        let compound = self.sentiment.compound(entry);
        debug!(compound, "sentiment scored");

        if compound < NEGATIVE_COMPOUND {
            Category::Safety
        } else if compound <= POSITIVE_COMPOUND {
            Category::Quiet
        } else {
            Category::Positive
        }
    }

    async fn classify_remote(&self, client: &ChatClient, entry: &str, turns: &[Turn]) -> Category {
        let content = if turns.is_empty() {
            entry.to_string()
        } else {
            format!(
                "Conversation so far:\n{}\n\nLatest entry:\n{entry}",
                render_history(turns)
            )
        };

        let messages = [
            Message::system(self.instructions.clone()),
            Message::user(content),
        ];

        match client.complete(&messages).await {
            Ok(reply) => {
                let category = parse_category(&reply);
                debug!(%category, "remote classification");
                category
            }
            Err(e) => {
                warn!(error = %e, "classification call failed");
                Category::Unclear
            }
        }
    }
}

fn is_short(entry: &str) -> bool {
    let trimmed = entry.trim();
    let lower = trimmed.to_lowercase();
    QUIET_RESPONSES.contains(&lower.as_str()) || trimmed.chars().count() < SHORT_ENTRY_THRESHOLD
}

/// Read `{"category": ...}` out of a model reply. Malformed or unknown is `Unclear`.
pub fn parse_category(reply: &str) -> Category {
    match serde_json::from_str::<CategoryReply>(strip_code_fences(reply)) {
        Ok(parsed) => Category::parse(&parsed.category),
        Err(e) => {
            warn!(error = %e, "unparseable classification reply");
            Category::Unclear
        }
    }
}
