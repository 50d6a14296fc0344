//! Integration tests for the memory service client with a mocked server
//!
//! These tests use wiremock to simulate the memory service REST API,
//! exercising every endpoint plus the error mapping and the empty-context
//! fallback without a real deployment.

use memstack::context::recall_or_empty;
use memstack::{AppError, ConversationTurn, MemoryClient, MemoryStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> MemoryClient {
    MemoryClient::new(server.uri()).unwrap()
}

// ============================================================================
// Add
// ============================================================================

#[tokio::test]
async fn test_add_submits_turns_and_returns_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/memories"))
        .and(body_partial_json(json!({
            "user_id": "alice",
            "messages": [{"role": "user", "content": "I'm vegetarian"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "m1", "memory": "Is vegetarian", "user_id": "alice", "event": "ADD"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let extracted = client
        .add(vec![ConversationTurn::user("I'm vegetarian")], "alice", None)
        .await
        .unwrap();

    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0].memory, "Is vegetarian");
}

#[tokio::test]
async fn test_add_sends_metadata_when_given() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/memories"))
        .and(body_partial_json(json!({"metadata": {"channel": "support"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .add(
            vec![ConversationTurn::user("hi")],
            "alice",
            Some(json!({"channel": "support"})),
        )
        .await
        .unwrap();
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_returns_scored_hits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "query": "food preferences",
            "user_id": "alice",
            "limit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "m1", "memory": "Is vegetarian", "user_id": "alice", "score": 0.92},
                {"id": "m2", "memory": "Likes ramen", "user_id": "alice", "score": 0.81}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let hits = client
        .search("food preferences", "alice", Some(5))
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].score, Some(0.92));
}

#[tokio::test]
async fn test_search_accepts_bare_array_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "m1", "memory": "Is vegetarian", "user_id": "alice"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let hits = client.search("food", "alice", None).await.unwrap();
    assert_eq!(hits.len(), 1);
}

// ============================================================================
// List / Get / Update
// ============================================================================

#[tokio::test]
async fn test_list_passes_user_id_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/memories"))
        .and(query_param("user_id", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "m1", "memory": "Is vegetarian", "user_id": "alice"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let records = client.list("alice").await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_get_single_memory() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/memories/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1", "memory": "Is vegetarian", "user_id": "alice"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let record = client.get("m1").await.unwrap();
    assert_eq!(record.id, "m1");
}

#[tokio::test]
async fn test_get_missing_memory_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/memories/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.get("ghost").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_update_replaces_memory_text() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/memories/m1"))
        .and(body_partial_json(json!({"data": "Is vegan now"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1", "memory": "Is vegan now", "user_id": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let record = client.update("m1", "Is vegan now").await.unwrap();
    assert_eq!(record.memory, "Is vegan now");
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_single_memory() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/memories/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete("m1").await.unwrap();
}

#[tokio::test]
async fn test_delete_all_scopes_to_user() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/memories"))
        .and(query_param("user_id", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete_all("alice").await.unwrap();
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_server_error_detail_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "vector store offline"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.search("food", "alice", None).await;

    match result {
        Err(AppError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "vector store offline");
        }
        other => panic!("expected Api error, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_non_json_error_body_kept_raw() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.search("food", "alice", None).await {
        Err(AppError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn test_health_probe() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>docs</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.health().await.unwrap();
}

// ============================================================================
// Fallback (no memory context available)
// ============================================================================

#[tokio::test]
async fn test_recall_falls_back_on_5xx() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let memories = recall_or_empty(&client, "food", "alice", None).await.unwrap();
    assert!(memories.is_empty());
}

#[tokio::test]
async fn test_recall_falls_back_when_unreachable() {
    // No server at all: connect error must degrade to empty context.
    let client = MemoryClient::new("http://127.0.0.1:1").unwrap();
    let memories = recall_or_empty(&client, "food", "alice", None).await.unwrap();
    assert!(memories.is_empty());
}

#[tokio::test]
async fn test_recall_propagates_bad_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "missing user_id"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = recall_or_empty(&client, "food", "alice", None).await;
    assert!(matches!(result, Err(AppError::Api { status: 400, .. })));
}
