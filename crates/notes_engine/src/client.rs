use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::NotesApi;
use crate::settings::ClientSettings;
use crate::{
    ApiError, ExplainRequest, FailureKind, GenerateRequest, NoteId, NotePayload,
    ProviderSelection, TaskId, TaskSnapshot, TaskStatus,
};

const PROVIDER_HEADER: &str = "X-Provider";
const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    user_id: u64,
    url: &'a str,
    mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReply {
    task_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusReply {
    status: String,
    #[serde(default)]
    status_message: Option<String>,
}

#[derive(Deserialize)]
struct ResultReply {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExplainBody<'a> {
    term: &'a str,
    context: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_explanation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct ExplainReply {
    answer: Option<String>,
}

/// `NotesApi` over HTTP with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestNotesApi {
    client: reqwest::Client,
    base: Url,
    user_id: u64,
    max_export_bytes: u64,
}

impl ReqwestNotesApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base,
            user_id: settings.user_id,
            max_export_bytes: settings.max_export_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Best effort: the body usually explains the failure.
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string()).with_body(body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&text).map_err(|err| {
            ApiError::new(FailureKind::InvalidResponse, err.to_string()).with_body(text)
        })
    }

    fn post_json<B: Serialize>(&self, url: Url, body: &B) -> Result<RequestBuilder, ApiError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(bytes))
    }
}

#[async_trait::async_trait]
impl NotesApi for ReqwestNotesApi {
    async fn create_task(&self, request: &GenerateRequest) -> Result<TaskId, ApiError> {
        let url = self.endpoint(&["api", "notes", "generate"])?;
        let body = GenerateBody {
            user_id: self.user_id,
            url: &request.url,
            mode: &request.mode,
            provider: request.selection.provider.as_deref(),
            api_key: request.selection.api_key.as_deref(),
        };
        let reply: GenerateReply = self.send_json(self.post_json(url, &body)?).await?;
        reply
            .task_id
            .filter(|id| !id.trim().is_empty())
            .map(TaskId)
            .ok_or_else(|| ApiError::new(FailureKind::InvalidResponse, "response has no taskId"))
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot, ApiError> {
        let url = self.endpoint(&["api", "tasks", &task_id.0, "status"])?;
        let reply: StatusReply = self.send_json(self.client.get(url)).await?;
        Ok(TaskSnapshot {
            status: TaskStatus::from_label(&reply.status),
            status_message: reply.status_message.unwrap_or_default(),
        })
    }

    async fn task_result(&self, task_id: &TaskId) -> Result<NotePayload, ApiError> {
        let url = self.endpoint(&["api", "tasks", &task_id.0, "result"])?;
        let reply: ResultReply = self.send_json(self.client.get(url)).await?;
        Ok(NotePayload {
            id: reply.id.and_then(note_id_from_json),
            content: reply.content,
        })
    }

    async fn export_note(
        &self,
        note_id: &NoteId,
        selection: &ProviderSelection,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "notes", "export", &note_id.0])?;
        let mut request = self.client.post(url);
        if let Some(provider) = selection.provider.as_deref() {
            request = request.header(PROVIDER_HEADER, provider);
        }
        if let Some(api_key) = selection.api_key.as_deref() {
            request = request.header(API_KEY_HEADER, api_key);
        }
        let response = self.send(request).await?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_export_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_export_bytes,
                        actual: Some(content_len),
                    },
                    "export too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_export_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_export_bytes,
                        actual: Some(next_len),
                    },
                    "export too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        String::from_utf8(bytes)
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    async fn explain(&self, request: &ExplainRequest) -> Result<String, ApiError> {
        let url = self.endpoint(&["api", "ai", "explain"])?;
        let body = ExplainBody {
            term: &request.term,
            context: &request.context,
            short_explanation: request.short_explanation.as_deref(),
            provider: request.selection.provider.as_deref(),
            api_key: request.selection.api_key.as_deref(),
        };
        let reply: ExplainReply = self.send_json(self.post_json(url, &body)?).await?;
        reply
            .answer
            .ok_or_else(|| ApiError::new(FailureKind::InvalidResponse, "response has no answer"))
    }
}

/// The backend sends numeric ids; keep whatever arrives as an opaque string.
fn note_id_from_json(value: serde_json::Value) -> Option<NoteId> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(NoteId(s)),
        serde_json::Value::Number(n) => Some(NoteId(n.to_string())),
        _ => None,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
