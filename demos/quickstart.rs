//! End-to-end walkthrough against a running Rini server.
//!
//! ```text
//! RINI_BASE_URL=http://localhost:8000 OPENAI_API_KEY=sk-... cargo run --example quickstart
//! ```
//!
//! Values may also come from a `.env` file in the working directory.

use rini::{
    ApiKeyCreateRequest, Client, Config, CostEstimationFilter, EmbeddingRequest, SessionCreateRequest,
    TextCompletionRequest,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rini=debug")),
        )
        .init();

    let provider_key = std::env::var("OPENAI_API_KEY").ok();

    let cfg = Config::from_env()?;
    let reply = Client::scoped(cfg, |client| async move {
        if client.token().is_none() {
            let user = client.users().create_and_adopt_token().await?;
            tracing::info!(user = %user, "created user");
        }

        if let Some(key) = provider_key {
            client
                .api_keys()
                .register(ApiKeyCreateRequest::new("openai", key).with_description("quickstart"))
                .await?;
        }

        let session = client
            .sessions()
            .create(
                SessionCreateRequest::new()
                    .with_alias("quickstart")
                    .with_system_prompt("You are a concise assistant."),
            )
            .await?;
        let session_id = session["id"].as_str().unwrap_or_default().to_string();
        tracing::info!(%session_id, "session ready");

        let reply = client
            .llm()
            .text_completion(
                TextCompletionRequest::new("Say hello in three languages.", "openai", "gpt-4o-mini")
                    .with_session(&session_id)
                    .with_param("temperature", 0.3),
            )
            .await?;

        let history = client.messages().list(&session_id, None).await?;
        tracing::info!(
            messages = history.as_array().map(Vec::len).unwrap_or(0),
            "session history"
        );

        let embedding = client
            .llm()
            .embeddings(EmbeddingRequest::new("hello world"))
            .await?;
        tracing::debug!(embedding = %embedding, "embedding");

        let cost = client
            .usage()
            .cost_estimation(CostEstimationFilter {
                session_id: Some(session_id.clone()),
                ..Default::default()
            })
            .await?;
        tracing::info!(cost = %cost, "cost estimation");

        client.sessions().delete(&session_id).await?;
        Ok::<_, rini::Error>(reply)
    })
    .await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
