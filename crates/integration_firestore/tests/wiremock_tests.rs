//! Integration tests for the Firestore client using wiremock
//!
//! These tests run the client against a mock HTTP server standing in for the
//! Firestore REST API.

use std::collections::HashMap;

use integration_firestore::{
    FieldOperator, FirestoreClient, FirestoreConfig, FirestoreError, StructuredQuery, Value,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param, query_param_is_missing},
};

const ROOT: &str = "/v1/projects/demo/databases/(default)/documents";

fn config(server: &MockServer) -> FirestoreConfig {
    FirestoreConfig {
        base_url: format!("{}/v1", server.uri()),
        project_id: "demo".to_string(),
        ..FirestoreConfig::default()
    }
}

fn client(server: &MockServer) -> FirestoreClient {
    FirestoreClient::new(config(server)).unwrap()
}

fn tag_document(id: &str, slug: &str) -> serde_json::Value {
    serde_json::json!({
        "name": format!("projects/demo/databases/(default)/documents/tags/{id}"),
        "fields": {
            "tag": {"stringValue": slug.to_uppercase()},
            "slug": {"stringValue": slug},
            "img": {"stringValue": format!("{slug}.png")}
        },
        "createTime": "2024-01-15T12:00:00.000000Z",
        "updateTime": "2024-01-15T12:00:00.000000Z"
    })
}

// ============================================================================
// List documents
// ============================================================================

#[tokio::test]
async fn list_documents_returns_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .and(query_param("pageSize", "300"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [tag_document("t1", "wisdom"), tag_document("t2", "life")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = client(&server).list_documents("tags").await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id(), "t1");
    assert_eq!(documents[1].string_field("slug"), Some("life"));
}

#[tokio::test]
async fn list_documents_follows_page_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [tag_document("t1", "a")],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [tag_document("t2", "b")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = client(&server).list_documents("tags").await.unwrap();

    let ids: Vec<&str> = documents.iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/quotes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let documents = client(&server).list_documents("quotes").await.unwrap();

    assert!(documents.is_empty());
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn run_query_sends_field_filter_and_skips_metadata_items() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}:runQuery")))
        .and(body_json(serde_json::json!({
            "structuredQuery": {
                "from": [{"collectionId": "quotes"}],
                "where": {"fieldFilter": {
                    "field": {"fieldPath": "slugs"},
                    "op": "ARRAY_CONTAINS",
                    "value": {"stringValue": "wisdom"}
                }}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "document": {
                    "name": "projects/demo/databases/(default)/documents/quotes/abc",
                    "fields": {
                        "author": {"stringValue": "Seneca"},
                        "quote": {"stringValue": "Luck is preparation."},
                        "slugs": {"arrayValue": {"values": [{"stringValue": "wisdom"}]}}
                    }
                },
                "readTime": "2024-01-15T12:00:00Z"
            },
            {"readTime": "2024-01-15T12:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = StructuredQuery::field_filter(
        "quotes",
        "slugs",
        FieldOperator::ArrayContains,
        Value::string("wisdom"),
    );
    let documents = client(&server).run_query(query).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id(), "abc");
    assert_eq!(documents[0].string_array_field("slugs"), Some(vec!["wisdom"]));
}

#[tokio::test]
async fn run_query_with_no_matches_returns_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}:runQuery")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"readTime": "2024-01-15T12:00:00Z"}])),
        )
        .mount(&server)
        .await;

    let query =
        StructuredQuery::field_filter("tags", "slug", FieldOperator::In, Value::string_array(["x"]));
    let documents = client(&server).run_query(query).await.unwrap();

    assert!(documents.is_empty());
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn set_document_patches_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{ROOT}/quotes/abc123")))
        .and(body_json(serde_json::json!({
            "fields": {"author": {"stringValue": "Seneca"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/demo/databases/(default)/documents/quotes/abc123",
            "fields": {"author": {"stringValue": "Seneca"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = HashMap::new();
    fields.insert("author".to_string(), Value::string("Seneca"));
    let document = client(&server)
        .set_document("quotes", "abc123", fields)
        .await
        .unwrap();

    assert_eq!(document.id(), "abc123");
}

#[tokio::test]
async fn add_document_returns_generated_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/tags")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tag_document("Gen3r4t3dId0000000000", "new")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = HashMap::new();
    fields.insert("slug".to_string(), Value::string("new"));
    let document = client(&server).add_document("tags", fields).await.unwrap();

    assert_eq!(document.id(), "Gen3r4t3dId0000000000");
}

// ============================================================================
// Credentials and errors
// ============================================================================

#[tokio::test]
async fn credentials_are_attached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .and(query_param("key", "web-key"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirestoreClient::new(FirestoreConfig {
        api_key: Some("web-key".to_string()),
        access_token: Some("token-1".to_string()),
        ..config(&server)
    })
    .unwrap();

    client.list_documents("tags").await.unwrap();
}

#[tokio::test]
async fn error_status_carries_firestore_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": 403,
                "message": "Missing or insufficient permissions.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let result = client(&server).list_documents("tags").await;

    match result {
        Err(FirestoreError::Status { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "PERMISSION_DENIED: Missing or insufficient permissions.");
        },
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/tags")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = client(&server).add_document("tags", HashMap::new()).await;

    assert!(matches!(
        result,
        Err(FirestoreError::Status { status: 503, ref message }) if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/tags")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).list_documents("tags").await;

    assert!(matches!(result, Err(FirestoreError::ParseError(_))));
}

#[tokio::test]
async fn unreachable_server_is_an_error() {
    let client = FirestoreClient::new(FirestoreConfig {
        base_url: "http://127.0.0.1:1/v1".to_string(),
        project_id: "demo".to_string(),
        timeout_secs: 1,
        ..FirestoreConfig::default()
    })
    .unwrap();

    let result = client.list_documents("tags").await;

    assert!(matches!(
        result,
        Err(FirestoreError::ConnectionFailed(_) | FirestoreError::RequestFailed(_))
    ));
}
