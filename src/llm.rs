//! Completion and embedding calls.
//!
//! Text, chat and embedding requests are JSON; image completions are sent as
//! `multipart/form-data` with the image as a binary `image_file` part.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    multipart::MultipartForm,
    types::{ChatCompletionRequest, EmbeddingRequest, ImageCompletionRequest, TextCompletionRequest},
};

/// Multipart field name of the uploaded image.
const IMAGE_PART: &str = "image_file";

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(ValidationError::required(field)));
    }
    Ok(())
}

/// Client for LLM completions and embeddings.
#[derive(Clone)]
pub struct LlmClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl LlmClient {
    /// Complete a single prompt. With a `session_id` the exchange is stored in
    /// that session's history.
    pub async fn text_completion(&self, req: TextCompletionRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        require(&req.text, "text")?;
        require(&req.provider, "provider")?;
        require(&req.model, "model")?;
        self.inner
            .send_json(Method::POST, "/llm/text-completion/", &req)
            .await
    }

    /// Stateless completion over an explicit message list.
    pub async fn chat_completion(&self, req: ChatCompletionRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req.messages.is_empty() {
            return Err(Error::Validation(ValidationError::required("messages")));
        }
        require(&req.provider, "provider")?;
        require(&req.model, "model")?;
        self.inner
            .send_json(Method::POST, "/llm/chat-completions/", &req)
            .await
    }

    /// Describe an image with a vision-capable model.
    ///
    /// The file is checked and read before anything is sent: a missing path
    /// fails with [`Error::FileNotFound`] and no request reaches the server.
    /// The media type is guessed from the extension and falls back to
    /// `application/octet-stream`.
    pub async fn image_completion(&self, req: ImageCompletionRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        require(&req.provider, "provider")?;
        let form = MultipartForm::new()
            .text("provider", req.provider)
            .text_opt("prompt", req.prompt)
            .text_opt("model", req.model)
            .text_opt("session_id", req.session_id)
            .file_from_path(IMAGE_PART, &req.image_path)
            .await?;
        self.inner
            .send_multipart("/llm/image-completion/", form)
            .await
    }

    /// Generate embeddings for one text or a batch.
    pub async fn embeddings(&self, req: EmbeddingRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req.input.is_empty() {
            return Err(Error::Validation(ValidationError::required("input")));
        }
        require(&req.provider, "provider")?;
        require(&req.model, "model")?;
        self.inner
            .send_json(Method::POST, "/llm/embeddings/", &req)
            .await
    }
}
