use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::level::{AssessedLevel, ReportedLevel};
use crate::{CONFIDENCE_MEDIUM, ENGINE_VERSION};

/// Free-form attribute map carried by a request.
pub type Attributes = Map<String, Value>;

/// Body of `POST /v1/inference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub request_id: String,
    pub user: Attributes,
    pub context: Attributes,
    pub interaction: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_summary: Option<Attributes>,
}

impl InferenceRequest {
    /// Raw `user.assessed_level` value, if the caller sent one.
    pub fn raw_assessed_level(&self) -> Option<&Value> {
        self.user.get("assessed_level")
    }

    pub fn assessed_level(&self) -> AssessedLevel {
        AssessedLevel::resolve(self.raw_assessed_level())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub level: ReportedLevel,
    pub derailer_id: String,
    pub confidence_bucket: String,
}

impl ClassificationResult {
    pub fn new(level: ReportedLevel, derailer_id: impl Into<String>) -> Self {
        Self {
            level,
            derailer_id: derailer_id.into(),
            confidence_bucket: CONFIDENCE_MEDIUM.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextStep {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroAction {
    pub id: String,
    pub title: String,
    pub steps: Vec<String>,
}

impl MicroAction {
    fn fixed(id: &str, title: &str, steps: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            steps: steps.iter().map(|step| step.to_string()).collect(),
        }
    }
}

const RATIONALE_BULLETS: [&str; 2] = [
    "Stubbed response: LNAC API is reachable and authenticated.",
    "Swap this stub with the real LNAC engine when ready.",
];

const CLARIFYING_QUESTIONS: [&str; 2] = [
    "What was the trigger in the situation?",
    "What outcome were you trying to protect?",
];

const NEXT_STEP_MESSAGE: &str = "Pick one micro-action and run it once this week.";

/// Micro-actions returned verbatim to every caller.
pub fn default_micro_actions() -> Vec<MicroAction> {
    vec![
        MicroAction::fixed(
            "MA_001",
            "Pause before acting",
            &["Pause 5 seconds", "Ask one clarifying question before deciding"],
        ),
        MicroAction::fixed(
            "MA_002",
            "Delegate one decision",
            &["Pick a decision", "Assign an owner", "Set a 24-hour deadline"],
        ),
    ]
}

/// Body returned by `POST /v1/inference`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResponse {
    pub engine_version: String,
    pub library_version: String,
    pub primary_classification: ClassificationResult,
    pub rationale_bullets: Vec<String>,
    pub clarifying_questions: Vec<String>,
    pub next_step: NextStep,
    pub micro_actions: Vec<MicroAction>,
    pub policy_flags: Vec<String>,
}

impl InferenceResponse {
    /// Wraps a classification in the static explanatory content.
    pub fn assemble(
        classification: ClassificationResult,
        library_version: impl Into<String>,
    ) -> Self {
        Self {
            engine_version: ENGINE_VERSION.to_string(),
            library_version: library_version.into(),
            primary_classification: classification,
            rationale_bullets: RATIONALE_BULLETS.iter().map(|s| s.to_string()).collect(),
            clarifying_questions: CLARIFYING_QUESTIONS.iter().map(|s| s.to_string()).collect(),
            next_step: NextStep {
                kind: "micro_action".to_string(),
                message: NEXT_STEP_MESSAGE.to_string(),
            },
            micro_actions: default_micro_actions(),
            policy_flags: Vec::new(),
        }
    }
}
