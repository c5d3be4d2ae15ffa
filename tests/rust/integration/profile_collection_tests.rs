use reqwest::StatusCode;
use serde_json::json;

use super::common::TestServer;

#[tokio::test]
async fn test_planned_activities_lifecycle() {
    let server = TestServer::start().await;
    let owner = server.create(&json!({})).await;
    let mate = server.create(&json!({})).await;
    let base = format!("/profiles/{}/plannedActivities", owner);

    let (status, body) = server
        .post(&base, &json!({"description": "Go", "attendees": ["ghost"]}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_planned_activity.attendees[0]");

    let (status, activity) = server
        .post(
            &base,
            &json!({
                "startTime": "2017-07-21T17:32:03Z",
                "endTime": "2019-07-21T17:32:23Z",
                "description": "Visit Dallas",
                "attendees": [mate],
                "status": "tentative"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let activity_id = activity["id"].as_str().unwrap().to_string();
    let item = format!("{}/{}", base, activity_id);

    let (status, updated) = server
        .put(&item, &json!({"description": "Stay home", "status": "cancelled"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], activity_id.as_str());
    assert!(updated.get("attendees").is_none());

    let (status, body) = server
        .put(&item, &json!({"description": "Stay home", "status": "cancelled"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "planned_activity_to_update_equal_to_original");

    let (_, profile) = server.get(&format!("/profiles/{}", owner)).await;
    assert_eq!(profile["plannedActivities"][0]["description"], "Stay home");
}

#[tokio::test]
async fn test_relevant_locations_by_identifier() {
    let server = TestServer::start().await;
    let owner = server.create(&json!({})).await;
    let base = format!("/profiles/{}/relevantLocations", owner);

    let (status, created) = server
        .post(
            &base,
            &json!({"id": "home", "label": "Home", "latitude": 41.38, "longitude": 2.17}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], "home");

    let (status, body) = server.post(&base, &json!({"id": "home"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicated_relevant_location_identifier");

    let (status, location) = server.get(&format!("{}/home", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(location["label"], "Home");

    let (status, body) = server.get(&format!("{}/office", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "relevant_location_not_defined");

    let (status, body) = server
        .patch(&format!("{}/home", base), &json!({"longitude": 200.0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_relevant_location.longitude");
}

#[tokio::test]
async fn test_relationships_by_index() {
    let server = TestServer::start().await;
    let owner = server.create(&json!({})).await;
    let friend = server.create(&json!({})).await;
    let colleague = server.create(&json!({})).await;
    let base = format!("/profiles/{}/relationships", owner);

    for (user, kind) in [(&friend, "friend"), (&colleague, "colleague")] {
        let (status, _) = server
            .post(&base, &json!({"userId": user, "type": kind}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = server
        .post(&base, &json!({"userId": friend, "type": "friend"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicated_relationship_identifier");

    let (status, second) = server.get(&format!("{}/1", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["userId"], colleague.as_str());

    let (status, merged) = server
        .patch(&format!("{}/1", base), &json!({"type": "acquaintance"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["userId"], colleague.as_str());
    assert_eq!(merged["type"], "acquaintance");

    let (status, _) = server.delete(&format!("{}/0", base)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, relationships) = server.get(&base).await;
    assert_eq!(relationships.as_array().unwrap().len(), 1);

    let (status, _) = server.get(&format!("{}/1", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_relationship_replacement_cannot_duplicate_another() {
    let server = TestServer::start().await;
    let first = server.create(&json!({})).await;
    let second = server.create(&json!({})).await;
    let owner = server
        .create(&json!({"relationships": [
            {"userId": first, "type": "friend"},
            {"userId": second, "type": "friend"}
        ]}))
        .await;
    let base = format!("/profiles/{}/relationships", owner);

    let (status, body) = server
        .put(&format!("{}/1", base), &json!({"userId": first, "type": "friend"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicated_relationship_identifier");

    let (status, body) = server
        .patch(&format!("{}/1", base), &json!({"userId": first}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicated_relationship_identifier");

    let (_, relationships) = server.get(&base).await;
    assert_eq!(relationships[1]["userId"], second.as_str());

    // The profile is still consistent, so it can be merged.
    let (status, _) = server
        .patch(&format!("/profiles/{}", owner), &json!({"occupation": "Pilot"}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_item_body_that_is_not_the_model() {
    let server = TestServer::start().await;
    let owner = server.create(&json!({})).await;

    let (status, body) = server
        .post(
            &format!("/profiles/{}/norms", owner),
            &json!({"operator": "SOMETIMES"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_json");
}

#[tokio::test]
async fn test_collection_of_missing_profile() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/profiles/ghost/norms").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "profile_not_defined");
}

#[tokio::test]
async fn test_norm_change_is_recorded_in_history() {
    let server = TestServer::start().await;
    let owner = server.create(&json!({})).await;
    let (status, _) = server
        .post(
            &format!("/profiles/{}/norms", owner),
            &json!({"attribute": "has_car", "operator": "EQUALS", "comparison": "true"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, page) = server.get(&format!("/profiles/{}/historic", owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["profiles"][0]["profile"]["norms"], json!([]));
}
