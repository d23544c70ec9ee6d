//! Request records for each remote operation.
//!
//! Responses are returned as [`serde_json::Value`] exactly as decoded; only
//! the outgoing shapes are typed here.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Offset pagination (`skip` / `limit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// First page holding up to `limit` items.
    pub fn first(limit: u32) -> Self {
        Self { skip: 0, limit }
    }
}

/// Register a provider API key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ApiKeyCreateRequest {
    pub model_provider: String,
    pub api_key_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiKeyCreateRequest {
    pub fn new(model_provider: impl Into<String>, api_key_value: impl Into<String>) -> Self {
        Self {
            model_provider: model_provider.into(),
            api_key_value: api_key_value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ApiKeyUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Create a conversation session. `memory_mode` defaults to `"auto"`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionCreateRequest {
    pub memory_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for SessionCreateRequest {
    fn default() -> Self {
        Self {
            memory_mode: "auto".to_string(),
            alias: None,
            system_prompt: None,
        }
    }
}

impl SessionCreateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_memory_mode(mut self, memory_mode: impl Into<String>) -> Self {
        self.memory_mode = memory_mode.into();
        self
    }
}

/// Partial session update; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SessionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_mode: Option<String>,
}

/// A role-tagged message, used both for session history and stateless chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Provider-specific generation parameters (temperature, max_tokens, ...).
pub type LlmParams = Map<String, Value>;

/// Single-prompt completion, optionally recorded in a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextCompletionRequest {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_params: Option<LlmParams>,
}

impl TextCompletionRequest {
    pub fn new(text: impl Into<String>, provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model: model.into(),
            session_id: None,
            llm_params: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.llm_params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Stateless chat completion over an explicit message list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_params: Option<LlmParams>,
}

impl ChatCompletionRequest {
    pub fn new(
        messages: Vec<ChatMessage>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            messages,
            provider: provider.into(),
            model: model.into(),
            llm_params: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.llm_params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Vision completion. Sent as multipart, so this type is not serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCompletionRequest {
    pub image_path: PathBuf,
    pub provider: String,
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub session_id: Option<String>,
}

impl ImageCompletionRequest {
    pub fn new(image_path: impl Into<PathBuf>, provider: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            provider: provider.into(),
            model: None,
            prompt: None,
            session_id: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// One text or a batch of texts to embed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            EmbeddingInput::Single(text) => text.is_empty(),
            EmbeddingInput::Batch(texts) => texts.is_empty(),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(value: &str) -> Self {
        EmbeddingInput::Single(value.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(value: String) -> Self {
        EmbeddingInput::Single(value)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(value: Vec<String>) -> Self {
        EmbeddingInput::Batch(value)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(value: Vec<&str>) -> Self {
        EmbeddingInput::Batch(value.into_iter().map(str::to_string).collect())
    }
}

pub(crate) const DEFAULT_EMBEDDING_PROVIDER: &str = "openai";
pub(crate) const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbeddingRequest {
    pub input: EmbeddingInput,
    pub provider: String,
    pub model: String,
}

impl EmbeddingRequest {
    /// Uses the `openai` / `text-embedding-3-large` defaults.
    pub fn new(input: impl Into<EmbeddingInput>) -> Self {
        Self {
            input: input.into(),
            provider: DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct McpConnectionCreateRequest {
    pub mcp_server_url: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl McpConnectionCreateRequest {
    pub fn new(mcp_server_url: impl Into<String>) -> Self {
        Self {
            mcp_server_url: mcp_server_url.into(),
            is_active: true,
            alias: None,
            description: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct McpConnectionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McpConnectionFilter {
    pub is_active: Option<bool>,
    pub page: Option<Page>,
}

/// A memory entry attached to a session.
///
/// Server-specific fields beyond the typed ones go in `extra` and are
/// flattened into the JSON body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemoryEntryCreateRequest {
    pub memory_type: String,
    pub scope: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_message_ids: Option<Vec<i64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemoryEntryCreateRequest {
    pub fn new(
        memory_type: impl Into<String>,
        scope: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            memory_type: memory_type.into(),
            scope: scope.into(),
            content: content.into(),
            keywords: None,
            source_message_ids: None,
            extra: Map::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    pub fn with_source_messages(mut self, ids: Vec<i64>) -> Self {
        self.source_message_ids = Some(ids);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Partial memory update, sent with `PATCH`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MemoryEntryUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFilter {
    pub session_id: Option<String>,
    pub scope: Option<String>,
    pub memory_type: Option<String>,
    pub page: Option<Page>,
}

/// Filters for the cost estimate. Dates are inclusive, rendered `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostEstimationFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub session_id: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let req = SessionCreateRequest::new().with_alias("test");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"memory_mode": "auto", "alias": "test"})
        );
        assert_eq!(
            serde_json::to_value(ApiKeyUpdateRequest::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn embedding_input_is_untagged() {
        let single = EmbeddingRequest::new("hello");
        assert_eq!(
            serde_json::to_value(&single).unwrap(),
            json!({"input": "hello", "provider": "openai", "model": "text-embedding-3-large"})
        );
        let batch = EmbeddingRequest::new(vec!["a", "b"]).with_model("text-embedding-3-small");
        assert_eq!(
            serde_json::to_value(&batch).unwrap()["input"],
            json!(["a", "b"])
        );
    }

    #[test]
    fn memory_extra_fields_are_flattened() {
        let req = MemoryEntryCreateRequest::new("Fact", "Session", "likes tea")
            .with_keywords(vec!["tea".into()])
            .with_field("importance", "high");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "memory_type": "Fact",
                "scope": "Session",
                "content": "likes tea",
                "keywords": ["tea"],
                "importance": "high"
            })
        );
    }

    #[test]
    fn llm_params_accumulate() {
        let req = TextCompletionRequest::new("hi", "openai", "gpt-4o")
            .with_param("temperature", 0.7)
            .with_param("max_tokens", 64);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["llm_params"]["temperature"], json!(0.7));
        assert_eq!(body["llm_params"]["max_tokens"], json!(64));
        assert!(body.get("session_id").is_none());
    }
}
