//! Integration tests for image record CRUD routes.

mod common;

use common::TestHarness;
use snapvault_db::models::ImageRecord;
use snapvault_db::queries::images;

fn seeded(id: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        uri: format!("https://cdn.example.com/{id}.jpg"),
        hits: 1,
        is_deleted: false,
    }
}

#[tokio::test]
async fn get_record_by_id() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let resp = reqwest::get(format!("http://{addr}/api/images/abc123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["id"], "abc123");
    assert_eq!(json["uri"], "https://cdn.example.com/abc123.jpg");
    assert_eq!(json["hits"], 1);
    assert_eq!(json["is_deleted"], false);
}

#[tokio::test]
async fn get_record_not_found() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/api/images/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], 404);
    assert_eq!(json["error"], "Not Found");
    assert!(json["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn get_record_includes_soft_deleted() {
    let (h, addr) = TestHarness::with_server().await;
    let conn = h.conn();
    images::upsert_record(&conn, &seeded("gone")).unwrap();
    images::soft_delete(&conn, "gone").unwrap();

    let resp = reqwest::get(format!("http://{addr}/api/images/gone"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["is_deleted"], true);
}

#[tokio::test]
async fn patch_hits_only_keeps_uri() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .patch(format!("http://{addr}/api/images/abc123"))
        .json(&serde_json::json!({ "hits": 7 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["hits"], 7);
    assert_eq!(json["uri"], "https://cdn.example.com/abc123.jpg");
}

#[tokio::test]
async fn patch_uri_only_keeps_hits() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .patch(format!("http://{addr}/api/images/abc123"))
        .json(&serde_json::json!({ "uri": "https://cdn.example.com/relocated.jpg" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["uri"], "https://cdn.example.com/relocated.jpg");
    assert_eq!(json["hits"], 1);
}

#[tokio::test]
async fn patch_empty_body_returns_record_unchanged() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .patch(format!("http://{addr}/api/images/abc123"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["uri"], "https://cdn.example.com/abc123.jpg");
    assert_eq!(json["hits"], 1);
}

#[tokio::test]
async fn patch_negative_hits_rejected() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .patch(format!("http://{addr}/api/images/abc123"))
        .json(&serde_json::json!({ "hits": -5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert!(json["message"].as_str().unwrap().contains("negative"));

    // The record is untouched.
    let stored = images::find_by_id(&h.conn(), "abc123").unwrap().unwrap();
    assert_eq!(stored.hits, 1);
}

#[tokio::test]
async fn patch_missing_record_not_found() {
    let (_h, addr) = TestHarness::with_server().await;

    let client = reqwest::Client::new();
    let resp = client
        .patch(format!("http://{addr}/api/images/missing"))
        .json(&serde_json::json!({ "hits": 2 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_marks_record_and_reports_match() {
    let (h, addr) = TestHarness::with_server().await;
    images::upsert_record(&h.conn(), &seeded("abc123")).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("http://{addr}/api/images/abc123"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["matched"], 1);

    // Still readable, now flagged.
    let resp = reqwest::get(format!("http://{addr}/api/images/abc123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["is_deleted"], true);

    // Deleting again still matches the row.
    let resp = client
        .delete(format!("http://{addr}/api/images/abc123"))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["matched"], 1);
}

#[tokio::test]
async fn delete_missing_record_matches_nothing() {
    let (_h, addr) = TestHarness::with_server().await;

    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("http://{addr}/api/images/missing"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["matched"], 0);
}

#[tokio::test]
async fn unknown_route_gets_error_envelope() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/api/nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["status"], 404);
    assert_eq!(json["error"], "Not Found");
    assert!(json["message"].as_str().unwrap().contains("/api/nope"));
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn ingest_then_crud_end_to_end() {
    let (h, addr) = TestHarness::with_server().await;
    h.mount_curated(&["pic"]).await;
    h.mount_upload_ok("pic").await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}/api/images/ingest"))
        .json(&serde_json::json!({ "limit": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    let id = json["records"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(id, "pic-stored");

    // Read it back over the API.
    let resp = reqwest::get(format!("http://{addr}/api/images/{id}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Bump hits, then retire it.
    let resp = client
        .patch(format!("http://{addr}/api/images/{id}"))
        .json(&serde_json::json!({ "hits": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(format!("http://{addr}/api/images/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let stored = images::find_by_id(&h.conn(), &id).unwrap().unwrap();
    assert_eq!(stored.hits, 2);
    assert!(stored.is_deleted);
}
