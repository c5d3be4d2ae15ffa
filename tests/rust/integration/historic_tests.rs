use reqwest::StatusCode;
use serde_json::json;

use super::common::TestServer;

#[tokio::test]
async fn test_update_stores_previous_version() {
    let server = TestServer::start().await;
    let id = server.create(&json!({"occupation": "Pilot"})).await;
    let path = format!("/profiles/{}", id);

    let (status, body) = server.get(&format!("{}/historic", path)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (_, original) = server.get(&path).await;
    let (status, updated) = server.put(&path, &json!({"occupation": "Astronaut"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, page) = server.get(&format!("{}/historic", path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    let historic = &page["profiles"][0];
    assert_eq!(historic["from"], original["_lastUpdateTs"]);
    assert_eq!(historic["to"], updated["_lastUpdateTs"]);
    assert_eq!(historic["profile"], original);
}

#[tokio::test]
async fn test_historic_order_and_paging() {
    let server = TestServer::start().await;
    let id = server.create(&json!({"occupation": "v0"})).await;
    let path = format!("/profiles/{}", id);
    for version in 1..=3 {
        let (status, _) = server
            .patch(&path, &json!({"occupation": format!("v{}", version)}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, page) = server.get(&format!("{}/historic?order=-", path)).await;
    assert_eq!(page["total"], 3);
    let occupations: Vec<_> = page["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|historic| historic["profile"]["occupation"].clone())
        .collect();
    // Versions stamped within the same second keep their insertion order.
    assert_eq!(occupations, vec![json!("v2"), json!("v1"), json!("v0")]);

    let (_, page) = server
        .get(&format!("{}/historic?offset=2&limit=5", path))
        .await;
    assert_eq!(page["offset"], 2);
    assert_eq!(page["profiles"].as_array().unwrap().len(), 1);
    assert_eq!(page["profiles"][0]["profile"]["occupation"], "v2");

    let (status, body) = server
        .get(&format!("{}/historic?order=sideways", path))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_order");
}

#[tokio::test]
async fn test_historic_window_outside_versions() {
    let server = TestServer::start().await;
    let id = server.create(&json!({"occupation": "Pilot"})).await;
    let path = format!("/profiles/{}", id);
    server.put(&path, &json!({"occupation": "Astronaut"})).await;

    let (status, _) = server.get(&format!("{}/historic?to=0", path)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server.get(&format!("{}/historic?from=0", path)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_historic_offset_past_the_end() {
    let server = TestServer::start().await;
    let id = server.create(&json!({"occupation": "Pilot"})).await;
    let path = format!("/profiles/{}", id);
    server.put(&path, &json!({"occupation": "Astronaut"})).await;

    let (status, page) = server.get(&format!("{}/historic?offset=5", path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!({"offset": 5, "total": 1, "profiles": []}));
}

#[tokio::test]
async fn test_deleting_profile_drops_history() {
    let server = TestServer::start().await;
    let id = server.create(&json!({"id": "gone", "occupation": "Pilot"})).await;
    let path = format!("/profiles/{}", id);
    server.put(&path, &json!({"occupation": "Astronaut"})).await;
    server.delete(&path).await;

    server.create(&json!({"id": "gone"})).await;
    let (status, _) = server.get(&format!("{}/historic", path)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
