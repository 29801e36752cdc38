use std::sync::Arc;

use notes_logging::{notes_debug, notes_warn};
use serde::Deserialize;

use crate::api::NotesApi;
use crate::{ApiError, ExplainRequest, Explanation, ExplanationError, FailureKind};

/// Error payload shapes the explanation service is known to send.
#[derive(Deserialize)]
struct ErrorPayload {
    answer: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// On-demand explanation lookups. Independent of the task lifecycle; each
/// call is one request with no cancellation.
pub struct Annotator {
    api: Arc<dyn NotesApi>,
}

impl Annotator {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        Self { api }
    }

    pub async fn lookup(&self, request: &ExplainRequest) -> Result<Explanation, ExplanationError> {
        notes_debug!(
            "Explaining term={:?} context_len={}",
            request.term,
            request.context.len()
        );
        match self.api.explain(request).await {
            Ok(answer) => Ok(Explanation {
                term: request.term.clone(),
                answer,
            }),
            Err(err) => {
                notes_warn!("Explanation for {:?} failed: {}", request.term, err);
                Err(interpret_failure(err))
            }
        }
    }
}

fn interpret_failure(err: ApiError) -> ExplanationError {
    match err.kind {
        FailureKind::HttpStatus(status) => err
            .body
            .as_deref()
            .and_then(structured_message)
            .map(ExplanationError::Rejected)
            .unwrap_or(ExplanationError::Service { status }),
        FailureKind::InvalidResponse => ExplanationError::MalformedResponse(err.message),
        _ => ExplanationError::Network(err.to_string()),
    }
}

/// First non-blank of `answer`, `message` and `error`.
fn structured_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    [payload.answer, payload.message, payload.error]
        .into_iter()
        .flatten()
        .find(|message| !message.trim().is_empty())
}
