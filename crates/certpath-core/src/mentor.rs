//! Mentor chat seam
//!
//! The model call is opaque behind [`MentorBackend`]. [`MentorSession`]
//! keeps the conversation, grounds each request in the live roadmap and
//! turns every failure into a friendly reply.

use crate::error::MentorError;
use certpath_model::RoadmapDocument;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persona and guidelines sent with every request
pub const MENTOR_INSTRUCTION: &str = "\
You are a Senior Agentic AI Architect at Microsoft and a personal mentor to the user.
The user is following a strict certification roadmap based on the \"Agent Expert Certification Roadmap\":
Phase 1: AI-900 -> Copilot Studio Academy -> PL-900.
Phase 2: PL-200 -> AB-900.
Phase 3: Splits into AI-102 (Engineering) and AB-730 (Business).
Phase 4: Culminates in AB-731 (Leader) and AB-100 (Architect).

Your goal is to help them navigate this path to becoming an Agentic AI Architect.

Guidelines:
1. **Be Motivational**: Remind the user that Agentic AI is a transformative career path.
2. **Be Technical**: Use precise Microsoft terminology (e.g., \"Semantic Kernel\", \"Azure AI Foundry\", \"Dataverse\", \"Orchestration\", \"Agentic Frameworks\").
3. **Be Practical**: If asked about exams, provide tips based on the study guides (AB-900, AB-730, AB-731).
4. **Agentic Focus**: Explain AI agents not just as chatbots, but as autonomous systems that use tools to perform work.

Keep your responses concise, actionable, and encouraging.";

const SEARCH_NOTE: &str = "You have access to web search. Use it to provide up-to-date information about Microsoft certifications, Azure services, and AI news when relevant.";

/// Reply used when the model returns no text
pub const EMPTY_REPLY: &str = "I pondered that, but couldn't formulate a response. Try again.";

/// Reply used when no backend is configured
pub const NO_BACKEND_REPLY: &str =
    "The mentor is not configured, so I cannot connect to the Microsoft Architect brain.";

/// Reply used when the backend fails
pub const FAILURE_REPLY: &str =
    "I'm having trouble connecting to the mentor service right now. Please check your connection or API key.";

/// Default citation title
const DEFAULT_SOURCE_TITLE: &str = "Reference";

/// Who said it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The learner
    User,
    /// The mentor
    Model,
}

/// A cited web page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Page title, may be empty from the backend
    pub title: String,
    /// Page address
    pub uri: String,
}

/// One chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: ChatRole,
    /// Text
    pub text: String,
    /// Citations, model turns only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

/// Everything the backend needs for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorRequest {
    /// Persona, roadmap context and tool note
    pub system_instruction: String,
    /// Earlier turns, oldest first
    pub history: Vec<ChatMessage>,
    /// New user message
    pub prompt: String,
}

/// Raw backend answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorReply {
    /// Generated text, possibly empty
    pub text: String,
    /// Grounding citations, possibly repeated
    pub sources: Vec<Source>,
}

/// Opaque model call
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MentorBackend: Send + Sync {
    /// Generate a reply
    async fn generate(&self, request: MentorRequest) -> Result<MentorReply, MentorError>;
}

#[derive(Serialize)]
struct PhaseContext<'a> {
    phase: &'a str,
    focus: &'a str,
    certs: Vec<&'a str>,
    projects: Vec<&'a str>,
}

/// Compact JSON summary of the roadmap for the system instruction
#[must_use]
pub fn roadmap_context(doc: &RoadmapDocument) -> String {
    let phases: Vec<PhaseContext<'_>> = doc
        .phases()
        .iter()
        .map(|p| PhaseContext {
            phase: &p.title,
            focus: &p.focus,
            certs: p.certs.iter().map(|c| c.name.as_str()).collect(),
            projects: p.projects.iter().map(|pr| pr.title.as_str()).collect(),
        })
        .collect();
    serde_json::to_string(&phases).unwrap_or_else(|_| "[]".to_string())
}

/// Full system instruction for `doc`
#[must_use]
pub fn system_instruction(doc: &RoadmapDocument) -> String {
    format!(
        "{MENTOR_INSTRUCTION}\n\nCurrent Roadmap Context: {}\n\n{SEARCH_NOTE}",
        roadmap_context(doc)
    )
}

/// Drop repeated citations by URI
///
/// First-seen order is kept, the last title wins, and blank titles become
/// "Reference". Sources without a URI are dropped.
#[must_use]
pub fn dedup_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut out: Vec<Source> = Vec::with_capacity(sources.len());
    for source in sources {
        if source.uri.is_empty() {
            continue;
        }
        let title = if source.title.trim().is_empty() {
            DEFAULT_SOURCE_TITLE.to_string()
        } else {
            source.title
        };
        match out.iter_mut().find(|s| s.uri == source.uri) {
            Some(existing) => existing.title = title,
            None => out.push(Source {
                title,
                uri: source.uri,
            }),
        }
    }
    out
}

/// A conversation with the mentor
pub struct MentorSession {
    backend: Option<Arc<dyn MentorBackend>>,
    history: Vec<ChatMessage>,
}

impl std::fmt::Debug for MentorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentorSession")
            .field("configured", &self.backend.is_some())
            .field("turns", &self.history.len())
            .finish()
    }
}

impl MentorSession {
    /// Session over `backend`; `None` answers with a configuration hint
    #[must_use]
    pub fn new(backend: Option<Arc<dyn MentorBackend>>) -> Self {
        Self {
            backend,
            history: Vec::new(),
        }
    }

    /// Conversation so far
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Ask a question about the roadmap in `doc`
    ///
    /// Never fails: backend problems are logged and answered with a
    /// friendly message. Both turns are appended to the history.
    pub async fn ask(&mut self, doc: &RoadmapDocument, prompt: &str) -> ChatMessage {
        let reply = match &self.backend {
            None => MentorReply {
                text: NO_BACKEND_REPLY.to_string(),
                sources: Vec::new(),
            },
            Some(backend) => {
                let request = MentorRequest {
                    system_instruction: system_instruction(doc),
                    history: self.history.clone(),
                    prompt: prompt.to_string(),
                };
                match backend.generate(request).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::warn!(error = %e, "mentor request failed");
                        MentorReply {
                            text: FAILURE_REPLY.to_string(),
                            sources: Vec::new(),
                        }
                    }
                }
            }
        };

        let text = if reply.text.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply.text
        };
        let answer = ChatMessage {
            role: ChatRole::Model,
            text,
            sources: dedup_sources(reply.sources),
        };
        self.history.push(ChatMessage {
            role: ChatRole::User,
            text: prompt.to_string(),
            sources: Vec::new(),
        });
        self.history.push(answer.clone());
        answer
    }
}
