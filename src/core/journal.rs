// one submission: classify, respond, log, remember the turn

use crate::core::classifier::{Category, Classifier};
use crate::core::conversation::{Session, Turn};
use crate::core::logbook::{LogRecord, LogTags, Logbook};
use crate::core::prompts::Prompts;
use crate::core::response::{ClassificationResult, Relevance, ResponseGenerator};
use serde::Serialize;
use tracing::info;

pub const SAFETY_MESSAGE: &str = "You mentioned something serious. Please reach out to someone you trust or contact a professional.

Resources:
- Samaritans (UK): 116 123
- Shout (UK): Text SHOUT to 85258
- NHS 111: Call 111";

pub const INSTRUCTION_MESSAGE: &str =
    "That looks like a command or tech question. Try journaling about your day instead.";

pub const UNCLEAR_MESSAGE: &str = "Not quite sure what that was. Try reflecting a bit more deeply.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    // the prompt the entry answered
    pub prompt: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub safety_flagged: bool,
}

impl Outcome {
    pub fn category(&self) -> Category {
        self.result.category
    }

    pub fn relevance(&self) -> Option<Relevance> {
        self.result.relevance
    }
}

pub struct Journal {
    prompts: Prompts,
    classifier: Classifier,
    responder: ResponseGenerator,
    logbook: Logbook,
}

impl Journal {
    pub fn new(
        prompts: Prompts,
        classifier: Classifier,
        responder: ResponseGenerator,
        logbook: Logbook,
    ) -> Self {
        Self {
            prompts,
            classifier,
            responder,
            logbook,
        }
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    /// New session for `mood`, or the default mood. `None` for an unknown mood.
    pub fn start(&self, mood: Option<&str>) -> Option<Session> {
        let mood = match mood {
            Some(m) => self.prompts.resolve_mood(m)?,
            None => self.prompts.default_mood(),
        };
        Some(Session::new(mood))
    }

    pub async fn submit(&self, session: &mut Session, entry: &str) -> Outcome {
        let prompt = session.current_prompt(&self.prompts);
        let category = self.classifier.classify(entry, session.turns()).await;

        let result = match category {
            Category::Safety => ClassificationResult::new(Category::Safety, SAFETY_MESSAGE),
            Category::Instruction => {
                ClassificationResult::new(Category::Instruction, INSTRUCTION_MESSAGE)
            }
            Category::Unclear => ClassificationResult::new(Category::Unclear, UNCLEAR_MESSAGE),
            Category::Quiet | Category::Positive => {
                let reply = self
                    .responder
                    .respond(session.turns(), &prompt, entry, category)
                    .await;
                // the model can still spot a crisis the local checks missed
                if reply.category == Category::Safety {
                    ClassificationResult::new(Category::Safety, SAFETY_MESSAGE)
                } else {
                    reply
                }
            }
        };

        let outcome = Outcome {
            safety_flagged: result.category == Category::Safety,
            prompt: prompt.clone(),
            result,
        };

        info!(
            session = %session.id,
            category = %outcome.category(),
            safety_flagged = outcome.safety_flagged,
            "entry classified"
        );

        let record = LogRecord::new(&prompt, entry, &outcome.result);
        let tags = LogTags::new(session.id, self.prompts.version());
        self.logbook.record(&record, &tags).await;

        session.push(Turn::new(prompt, entry));
        // an apology makes a poor next question
        match outcome.category() {
            Category::Quiet | Category::Positive
                if !outcome.result.response_text.is_empty() && !outcome.result.is_apology() =>
            {
                session.set_follow_up(Some(outcome.result.response_text.clone()));
            }
            _ => {}
        }

        outcome
    }
}
