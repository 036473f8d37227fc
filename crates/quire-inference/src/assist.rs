//! Writing assist actions.
//!
//! An [`AssistRequest`] names an action and the text it applies to. The
//! [`AssistCoordinator`] turns it into a prompt, bounds the call with a
//! timeout, and applies the fallback policy when the backend fails:
//! summaries and answers get a fixed apology, editing actions hand back the
//! original text. Failures are reported in the outcome rather than as
//! errors so the caller can show both the text and a failure state.
//!
//! Calls carrying a session key are ticketed. When a newer call for the same
//! session was issued before an older one finished, the older result is
//! reported as superseded and its text dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quire_core::logging::SUBSYSTEM_INFERENCE;
use quire_core::{Error, GenerationBackend, Result};

use crate::cleanup::clean_response;

/// Returned for a failed summary.
pub const SUMMARY_FALLBACK: &str = "Failed to generate summary.";

/// Returned for a failed question.
pub const ASK_FALLBACK: &str = "Sorry, I encountered an error.";

/// Context used for a question asked without any.
pub const NO_CONTEXT: &str = "No context provided.";

const SYSTEM_PROMPT: &str = "You are a writing assistant inside a notes and project \
    management app. Reply with the requested text only, without preamble or commentary.";

/// What to do with the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AssistAction {
    Summarize,
    Improve,
    FixGrammar,
    Shorten,
    Expand,
    Continue,
    Translate {
        language: String,
    },
    Ask {
        question: String,
        #[serde(default)]
        context: Option<String>,
    },
}

impl AssistAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AssistAction::Summarize => "summarize",
            AssistAction::Improve => "improve",
            AssistAction::FixGrammar => "fixGrammar",
            AssistAction::Shorten => "shorten",
            AssistAction::Expand => "expand",
            AssistAction::Continue => "continue",
            AssistAction::Translate { .. } => "translate",
            AssistAction::Ask { .. } => "ask",
        }
    }

    /// Whether the action rewrites the given text in place.
    pub fn is_edit(&self) -> bool {
        !matches!(self, AssistAction::Summarize | AssistAction::Ask { .. })
    }

    /// User prompt for this action applied to `text`.
    pub fn prompt(&self, text: &str) -> String {
        match self {
            AssistAction::Summarize => {
                format!("Summarize the following note concisely:\n\n{}", text)
            }
            AssistAction::Improve => format!(
                "Improve the writing of the following text, fixing grammar and making it more \
                 professional. Return ONLY the improved text:\n\n{}",
                text
            ),
            AssistAction::FixGrammar => format!(
                "Fix the spelling and grammar of the following text without changing its \
                 meaning or tone. Return ONLY the corrected text:\n\n{}",
                text
            ),
            AssistAction::Shorten => format!(
                "Make the following text shorter while keeping its key points. Return ONLY \
                 the shortened text:\n\n{}",
                text
            ),
            AssistAction::Expand => format!(
                "Expand the following text with more detail and explanation. Return ONLY the \
                 expanded text:\n\n{}",
                text
            ),
            AssistAction::Continue => format!(
                "Continue writing the following text in the same style. Return ONLY the \
                 continuation:\n\n{}",
                text
            ),
            AssistAction::Translate { language } => format!(
                "Translate the following text into {}. Return ONLY the translation:\n\n{}",
                language, text
            ),
            AssistAction::Ask { question, context } => {
                let context = context
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .or(Some(text).filter(|t| !t.trim().is_empty()))
                    .unwrap_or(NO_CONTEXT);
                format!(
                    "Answer the question using the context below.\n\nContext:\n{}\n\nQuestion: {}",
                    context, question
                )
            }
        }
    }

    /// Text returned when generation fails.
    pub fn fallback(&self, original: &str) -> String {
        match self {
            AssistAction::Summarize => SUMMARY_FALLBACK.to_string(),
            AssistAction::Ask { .. } => ASK_FALLBACK.to_string(),
            _ => original.to_string(),
        }
    }
}

/// One assist call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    #[serde(flatten)]
    pub action: AssistAction,
    /// Text the action applies to; for `ask`, the default context.
    #[serde(default)]
    pub text: String,
    /// Calls sharing a session supersede each other.
    #[serde(default)]
    pub session: Option<String>,
}

impl AssistRequest {
    pub fn new(action: AssistAction, text: impl Into<String>) -> Self {
        Self {
            action,
            text: text.into(),
            session: None,
        }
    }

    pub fn in_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Reject requests with nothing to work on.
    pub fn validate(&self) -> Result<()> {
        match &self.action {
            AssistAction::Ask { question, .. } if question.trim().is_empty() => {
                Err(Error::InvalidInput("Question must not be empty".into()))
            }
            AssistAction::Ask { .. } => Ok(()),
            AssistAction::Translate { language } if language.trim().is_empty() => {
                Err(Error::InvalidInput("Target language must not be empty".into()))
            }
            _ if self.text.trim().is_empty() => {
                Err(Error::InvalidInput("Text must not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Result of an assist call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistOutcome {
    /// Generated text, the fallback, or empty when superseded.
    pub text: String,
    /// True when `text` is the fallback.
    pub fallback: bool,
    /// True when a newer call for the same session replaced this one.
    pub superseded: bool,
    /// Failure description when `fallback` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub model: String,
    pub duration_ms: u64,
}

type SessionMap = Mutex<HashMap<String, u64>>;

fn lock_sessions(latest: &SessionMap) -> MutexGuard<'_, HashMap<String, u64>> {
    latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The newest call issued for a session. Dropping the ticket clears the
/// session entry if no newer call replaced it, including when the call
/// future is dropped before it finishes.
struct SessionTicket<'a> {
    latest: &'a SessionMap,
    session: String,
    ticket: u64,
}

impl SessionTicket<'_> {
    fn is_newest(&self) -> bool {
        lock_sessions(self.latest).get(&self.session) == Some(&self.ticket)
    }
}

impl Drop for SessionTicket<'_> {
    fn drop(&mut self) {
        let mut latest = lock_sessions(self.latest);
        if latest.get(&self.session) == Some(&self.ticket) {
            latest.remove(&self.session);
        }
    }
}

/// Runs assist calls against a backend.
pub struct AssistCoordinator {
    backend: Arc<dyn GenerationBackend>,
    timeout: Duration,
    latest: SessionMap,
    next_ticket: AtomicU64,
}

impl AssistCoordinator {
    pub fn new(backend: Arc<dyn GenerationBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            latest: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn issue(&self, session: &str) -> SessionTicket<'_> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        lock_sessions(&self.latest).insert(session.to_string(), ticket);
        SessionTicket {
            latest: &self.latest,
            session: session.to_string(),
            ticket,
        }
    }

    async fn generate(&self, request: &AssistRequest) -> Result<String> {
        let prompt = request.action.prompt(&request.text);
        let raw = tokio::time::timeout(
            self.timeout,
            self.backend.generate_with_system(SYSTEM_PROMPT, &prompt),
        )
        .await
        .map_err(|_| {
            Error::Inference(format!(
                "AI request timed out after {}s",
                self.timeout.as_secs_f32()
            ))
        })??;

        let text = clean_response(&raw);
        if text.is_empty() {
            return Err(Error::Inference("AI backend returned an empty response".into()));
        }
        Ok(text)
    }

    /// Run one call. Only invalid requests are errors; backend failures
    /// produce a fallback outcome.
    pub async fn run(&self, request: &AssistRequest) -> Result<AssistOutcome> {
        request.validate()?;

        let ticket = request.session.as_deref().map(|session| self.issue(session));

        let start = Instant::now();
        let result = self.generate(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if let Some(ticket) = ticket.as_ref().filter(|t| !t.is_newest()) {
            debug!(
                subsystem = SUBSYSTEM_INFERENCE,
                component = "assist",
                op = request.action.name(),
                session = %ticket.session,
                duration_ms,
                "Discarding superseded assist result"
            );
            return Ok(AssistOutcome {
                text: String::new(),
                fallback: false,
                superseded: true,
                error: None,
                model: self.model_name().to_string(),
                duration_ms,
            });
        }
        drop(ticket);

        let outcome = match result {
            Ok(text) => {
                debug!(
                    subsystem = SUBSYSTEM_INFERENCE,
                    component = "assist",
                    op = request.action.name(),
                    model = %self.model_name(),
                    prompt_len = request.text.len(),
                    response_len = text.len(),
                    duration_ms,
                    "Assist complete"
                );
                AssistOutcome {
                    text,
                    fallback: false,
                    superseded: false,
                    error: None,
                    model: self.model_name().to_string(),
                    duration_ms,
                }
            }
            Err(e) => {
                warn!(
                    subsystem = SUBSYSTEM_INFERENCE,
                    component = "assist",
                    op = request.action.name(),
                    model = %self.model_name(),
                    error = %e,
                    duration_ms,
                    "Assist failed, using fallback"
                );
                AssistOutcome {
                    text: request.action.fallback(&request.text),
                    fallback: true,
                    superseded: false,
                    error: Some(e.to_string()),
                    model: self.model_name().to_string(),
                    duration_ms,
                }
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use serde_json::json;

    fn coordinator(backend: MockGenerationBackend) -> AssistCoordinator {
        AssistCoordinator::new(Arc::new(backend), Duration::from_secs(5))
    }

    #[test]
    fn test_action_deserialization() {
        let req: AssistRequest = serde_json::from_value(json!({
            "action": "fixGrammar",
            "text": "teh cat"
        }))
        .unwrap();
        assert_eq!(req.action, AssistAction::FixGrammar);

        let req: AssistRequest = serde_json::from_value(json!({
            "action": "translate",
            "language": "French",
            "text": "Hello",
            "session": "page-1"
        }))
        .unwrap();
        assert_eq!(
            req.action,
            AssistAction::Translate {
                language: "French".into()
            }
        );
        assert_eq!(req.session.as_deref(), Some("page-1"));
    }

    #[test]
    fn test_validation() {
        assert!(AssistRequest::new(AssistAction::Summarize, "  ").validate().is_err());
        let ask = AssistRequest::new(
            AssistAction::Ask {
                question: "What's next?".into(),
                context: None,
            },
            "",
        );
        assert!(ask.validate().is_ok());
    }

    #[test]
    fn test_ask_prompt_uses_placeholder_context() {
        let action = AssistAction::Ask {
            question: "Why?".into(),
            context: None,
        };
        assert!(action.prompt("").contains(NO_CONTEXT));
        assert!(action.prompt("The note body").contains("The note body"));
    }

    #[test]
    fn test_fallback_policy() {
        assert_eq!(AssistAction::Summarize.fallback("x"), SUMMARY_FALLBACK);
        assert_eq!(AssistAction::Shorten.fallback("original"), "original");
        let ask = AssistAction::Ask {
            question: "q".into(),
            context: None,
        };
        assert_eq!(ask.fallback("x"), ASK_FALLBACK);
        assert!(!ask.is_edit());
        assert!(AssistAction::Improve.is_edit());
    }

    #[tokio::test]
    async fn test_run_success_cleans_output() {
        let backend = MockGenerationBackend::new().with_fixed_response("<think>hmm</think>Polished.");
        let assist = coordinator(backend.clone());
        let outcome = assist
            .run(&AssistRequest::new(AssistAction::Improve, "rough draft"))
            .await
            .unwrap();
        assert_eq!(outcome.text, "Polished.");
        assert!(!outcome.fallback);
        assert_eq!(outcome.model, "mock");

        let calls = backend.get_calls();
        assert_eq!(calls[0].system, SYSTEM_PROMPT);
        assert!(calls[0].prompt.ends_with("rough draft"));
    }

    #[tokio::test]
    async fn test_run_failure_returns_original_for_edits() {
        let assist = coordinator(MockGenerationBackend::new().with_failure("quota"));
        let outcome = assist
            .run(&AssistRequest::new(AssistAction::Improve, "keep me"))
            .await
            .unwrap();
        assert!(outcome.fallback);
        assert_eq!(outcome.text, "keep me");
        assert!(outcome.error.unwrap().contains("quota"));
    }

    #[tokio::test]
    async fn test_run_failure_summary_message() {
        let assist = coordinator(MockGenerationBackend::new().with_failure("down"));
        let outcome = assist
            .run(&AssistRequest::new(AssistAction::Summarize, "long note"))
            .await
            .unwrap();
        assert_eq!(outcome.text, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_empty_generation_falls_back() {
        let assist = coordinator(MockGenerationBackend::new().with_fixed_response("   "));
        let outcome = assist
            .run(&AssistRequest::new(AssistAction::Expand, "seed"))
            .await
            .unwrap();
        assert!(outcome.fallback);
        assert_eq!(outcome.text, "seed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let backend = MockGenerationBackend::new().with_latency(Duration::from_secs(60));
        let assist = AssistCoordinator::new(Arc::new(backend), Duration::from_secs(1));
        let outcome = assist
            .run(&AssistRequest::new(AssistAction::Shorten, "original"))
            .await
            .unwrap();
        assert!(outcome.fallback);
        assert_eq!(outcome.text, "original");
        assert!(outcome.error.unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_call_supersedes_older() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("result")
            .with_latency(Duration::from_millis(100));
        let assist = Arc::new(coordinator(backend));

        let first = {
            let assist = assist.clone();
            tokio::spawn(async move {
                assist
                    .run(&AssistRequest::new(AssistAction::Summarize, "v1").in_session("page-1"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = assist
            .run(&AssistRequest::new(AssistAction::Summarize, "v2").in_session("page-1"))
            .await
            .unwrap();
        let first = first.await.unwrap().unwrap();

        assert!(first.superseded);
        assert!(first.text.is_empty());
        assert!(!second.superseded);
        assert_eq!(second.text, "result");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_call_releases_its_session() {
        let backend = MockGenerationBackend::new().with_latency(Duration::from_secs(30));
        let assist = coordinator(backend);

        let request = AssistRequest::new(AssistAction::Improve, "draft").in_session("page-9");
        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), assist.run(&request)).await;
        assert!(abandoned.is_err());
        assert!(lock_sessions(&assist.latest).is_empty());
    }

    #[tokio::test]
    async fn test_finished_calls_leave_no_session_entries() {
        let assist = coordinator(MockGenerationBackend::new().with_failure("down"));
        for session in ["a", "b", "c"] {
            assist
                .run(&AssistRequest::new(AssistAction::Summarize, "x").in_session(session))
                .await
                .unwrap();
        }
        assert!(lock_sessions(&assist.latest).is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let assist = coordinator(MockGenerationBackend::new());
        let a = assist
            .run(&AssistRequest::new(AssistAction::Summarize, "a").in_session("one"))
            .await
            .unwrap();
        let b = assist
            .run(&AssistRequest::new(AssistAction::Summarize, "b").in_session("two"))
            .await
            .unwrap();
        assert!(!a.superseded && !b.superseded);
    }
}
