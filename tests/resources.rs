//! Paths, methods and query parameters for the CRUD resource families.

use chrono::NaiveDate;
use rini::{
    testing::test_client_with_token, ApiKeyCreateRequest, ApiKeyUpdateRequest, ChatMessage,
    CostEstimationFilter, Error, McpConnectionCreateRequest, McpConnectionFilter,
    McpConnectionUpdateRequest, MemoryEntryCreateRequest, MemoryEntryUpdateRequest, MemoryFilter,
    Page, SessionUpdateRequest,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn api_key_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api-keys/"))
        .and(body_json(json!({
            "model_provider": "openai",
            "api_key_value": "sk-test",
            "description": "dev key"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-keys/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api-keys/7"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "is_active": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api-keys/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let keys = client.api_keys();
    let created = keys
        .register(ApiKeyCreateRequest::new("openai", "sk-test").with_description("dev key"))
        .await
        .expect("register");
    assert_eq!(created["id"], 7);
    assert_eq!(keys.list(None).await.expect("list"), json!([{"id": 7}]));
    keys.update(
        7,
        ApiKeyUpdateRequest {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    keys.revoke(7).await.expect("revoke");

    let err = keys.update(7, ApiKeyUpdateRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn session_routes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let session_id = uuid::Uuid::new_v4().to_string();
    Mock::given(method("PUT"))
        .and(path(format!("/sessions/{session_id}")))
        .and(body_json(json!({"memory_mode": "manual"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": session_id})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    client
        .sessions()
        .list(Some(Page::new(20, 5)))
        .await
        .expect("list");
    client
        .sessions()
        .update(
            &session_id,
            SessionUpdateRequest {
                memory_mode: Some("manual".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    let err = client.sessions().get("  ").await.unwrap_err();
    match err {
        Error::Validation(v) => assert_eq!(v.field.as_deref(), Some("session_id")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn session_ids_are_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let session = client.sessions().get("a/b").await.expect("get");
    assert_eq!(session["id"], "a/b");
}

#[tokio::test]
async fn message_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions/s-1/messages/"))
        .and(body_json(json!({"role": "user", "content": "Hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 11})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions/s-1/messages/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 11}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages/11/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 10}, {"id": 11}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let messages = client.messages();
    let added = messages
        .add("s-1", ChatMessage::user("Hello"))
        .await
        .expect("add");
    assert_eq!(added["id"], 11);
    messages.list("s-1", None).await.expect("list");
    messages.get(11).await.expect("get");
    let history = messages.history(11).await.expect("history");
    assert_eq!(history.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn mcp_connection_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp-connections/"))
        .and(body_json(json!({
            "mcp_server_url": "http://localhost:9000/mcp",
            "is_active": true,
            "alias": "local tools"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mcp-connections/"))
        .and(query_param("is_active", "true"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/mcp-connections/3"))
        .and(body_json(json!({"description": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/mcp-connections/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let mcp = client.mcp_connections();
    mcp.add(McpConnectionCreateRequest::new("http://localhost:9000/mcp").with_alias("local tools"))
        .await
        .expect("add");
    mcp.list(McpConnectionFilter {
        is_active: Some(true),
        page: None,
    })
    .await
    .expect("list");
    mcp.update(
        3,
        McpConnectionUpdateRequest {
            description: Some("renamed".into()),
            ..Default::default()
        },
    )
    .await
    .expect("update");
    mcp.delete(3).await.expect("delete");
}

#[tokio::test]
async fn memory_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sessions/s-1/memory"))
        .and(body_json(json!({
            "memory_type": "Fact",
            "scope": "Session",
            "content": "prefers tea"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/memory/"))
        .and(query_param("session_id", "s-1"))
        .and(query_param("scope", "Session"))
        .and(query_param_is_missing("memory_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/memory/5"))
        .and(body_json(json!({"content": "prefers green tea"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/memory/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let memory = client.memory();
    memory
        .add("s-1", MemoryEntryCreateRequest::new("Fact", "Session", "prefers tea"))
        .await
        .expect("add");
    memory
        .list(MemoryFilter {
            session_id: Some("s-1".into()),
            scope: Some("Session".into()),
            memory_type: Some(" ".into()),
            page: None,
        })
        .await
        .expect("list");
    memory
        .update(
            5,
            MemoryEntryUpdateRequest {
                content: Some("prefers green tea".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    memory.delete(5).await.expect("delete");
}

#[tokio::test]
async fn cost_estimation_formats_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/usage/cost-estimation/"))
        .and(query_param("start_date", "2025-01-01"))
        .and(query_param("end_date", "2025-01-31"))
        .and(query_param("provider", "openai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_cost": 1.25})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_token(&server.uri(), "tok");
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
    let end = NaiveDate::from_ymd_opt(2025, 1, 31).expect("date");
    let cost = client
        .usage()
        .cost_estimation(CostEstimationFilter {
            start_date: Some(start),
            end_date: Some(end),
            provider: Some("openai".into()),
            ..Default::default()
        })
        .await
        .expect("cost estimation");
    assert_eq!(cost["total_cost"], 1.25);

    let err = client
        .usage()
        .cost_estimation(CostEstimationFilter {
            start_date: Some(end),
            end_date: Some(start),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
