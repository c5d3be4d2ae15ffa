use reqwest::StatusCode;
use serde_json::json;

use super::common::{fixture, TestServer};

#[tokio::test]
async fn test_seeded_profile_is_served_verbatim() {
    let server = TestServer::start_seeded().await;

    let (status, profile) = server.get("/profiles/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], json!({"first": "User", "last": "1"}));
    assert_eq!(profile["dateOfBirth"], json!({"year": 1976, "month": 4, "day": 1}));
    assert_eq!(profile["email"], "user1@internetofus.eu");
    assert_eq!(profile["phoneNumber"], "+34987654321");
    assert_eq!(profile["locale"], "es_ES");
    assert_eq!(profile["avatar"], "avatar_1");
    assert_eq!(profile["_creationTs"], 0);
    assert_eq!(profile["_lastUpdateTs"], 1234567992);
    assert_eq!(profile["relationships"], json!([]));
}

#[tokio::test]
async fn test_seeded_profile_is_listed_first() {
    let server = TestServer::start_seeded().await;
    server.create(&json!({"id": "2"})).await;

    let (_, page) = server.get("/profiles").await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["profiles"][0]["id"], "1");
    assert_eq!(page["profiles"][1]["id"], "2");
}

#[tokio::test]
async fn test_seeded_profile_can_be_merged() {
    let server = TestServer::start_seeded().await;
    let (status, merged) = server
        .patch("/profiles/1", &json!({"occupation": "Tester"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["occupation"], "Tester");
    assert_eq!(merged["_creationTs"], 0);

    let (_, page) = server.get("/profiles/1/historic").await;
    assert_eq!(page["profiles"][0]["from"], 1234567992);
}

#[test]
fn test_fixture_is_bundled() {
    assert!(fixture("profiles.json").exists());
}
