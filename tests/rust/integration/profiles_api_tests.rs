use reqwest::StatusCode;
use serde_json::json;

use super::common::TestServer;

/// The create, retrieve, list, delete, verify-gone cycle run by the load test.
#[tokio::test]
async fn test_load_test_scenario() {
    let server = TestServer::start().await;
    let payload = json!({"name": {"prefix": "k6", "first": "performance", "last": "test"}});

    let (status, created) = server.post("/profiles", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("created profile has an id");
    assert_eq!(created["name"], payload["name"]);
    assert_eq!(created["_creationTs"], created["_lastUpdateTs"]);

    let (status, retrieved) = server.get(&format!("/profiles/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(retrieved, created);

    let (status, page) = server.get("/profiles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (status, body) = server.delete(&format!("/profiles/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = server.get(&format!("/profiles/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found_profile");

    let (status, _) = server.delete(&format!("/profiles/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_created_profile_carries_empty_collections() {
    let server = TestServer::start().await;
    let (_, created) = server.post("/profiles", &json!({"gender": "F"})).await;
    for collection in [
        "norms",
        "plannedActivities",
        "relevantLocations",
        "relationships",
        "personalBehaviors",
        "languages",
        "socialPractices",
    ] {
        assert_eq!(created[collection], json!([]), "{} should be empty", collection);
    }
    assert!(created.get("email").is_none());
}

#[tokio::test]
async fn test_profiles_page_slices() {
    let server = TestServer::start().await;
    for index in 0..5 {
        server
            .create(&json!({"id": format!("user{}", index)}))
            .await;
    }

    let (status, page) = server.get("/profiles?offset=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["offset"], 1);
    assert_eq!(page["total"], 5);
    assert_eq!(page["profiles"].as_array().unwrap().len(), 2);

    let (_, page) = server.get("/profiles?offset=10").await;
    assert_eq!(page["total"], 5);
    assert_eq!(page["profiles"], json!([]));
}

#[tokio::test]
async fn test_create_with_taken_id() {
    let server = TestServer::start().await;
    server.create(&json!({"id": "same"})).await;
    let (status, body) = server.post("/profiles", &json!({"id": "same"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_profile.id");
}

#[tokio::test]
async fn test_validation_errors_name_the_field() {
    let server = TestServer::start().await;
    let cases = [
        (json!({"email": "jfk"}), "bad_profile.email"),
        (json!({"gender": "Z"}), "bad_profile.gender"),
        (json!({"locale": "english"}), "bad_profile.locale"),
        (
            json!({"dateOfBirth": {"year": 2999, "month": 1, "day": 1}}),
            "bad_profile.dateOfBirth",
        ),
        (
            json!({"dateOfBirth": {"year": 2000, "month": 2, "day": 30}}),
            "bad_profile.dateOfBirth",
        ),
        (json!({"name": {"prefix": "Professor Doctor"}}), "bad_profile.name.prefix"),
        (
            json!({"relevantLocations": [{"latitude": 91.0, "longitude": 0.0}]}),
            "bad_profile.relevantLocations[0].latitude",
        ),
    ];
    for (body, code) in cases {
        let (status, error) = server.post("/profiles", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} should be rejected", body);
        assert_eq!(error["code"], code);
        assert!(error["message"].is_string());
    }
}

#[tokio::test]
async fn test_create_requires_object() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/profiles", &json!(["not", "a", "profile"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_profile");
}

#[tokio::test]
async fn test_update_replaces_all_values() {
    let server = TestServer::start().await;
    let id = server
        .create(&json!({"email": "jfk@president.gov", "occupation": "President"}))
        .await;
    let path = format!("/profiles/{}", id);

    let (status, updated) = server
        .put(&path, &json!({"id": "ignored", "occupation": "Senator"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["occupation"], "Senator");
    assert!(updated.get("email").is_none());

    let (status, body) = server
        .put(&path, &json!({"occupation": "Senator"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "profile_to_update_equal_to_original");

    let (status, body) = server.put(&path, &json!({"gender": "Q"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_new_profile.gender");

    let (status, body) = server
        .put("/profiles/undefined", &json!({"occupation": "Senator"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found_profile_to_update");
}

#[tokio::test]
async fn test_merge_keeps_other_values() {
    let server = TestServer::start().await;
    let id = server
        .create(&json!({
            "name": {"first": "John", "last": "Kenedy"},
            "email": "jfk@president.gov"
        }))
        .await;
    let path = format!("/profiles/{}", id);

    let (status, merged) = server
        .patch(&path, &json!({"name": {"middle": "Fitzgerald"}}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        merged["name"],
        json!({"first": "John", "middle": "Fitzgerald", "last": "Kenedy"})
    );
    assert_eq!(merged["email"], "jfk@president.gov");

    let (status, body) = server.patch(&path, &json!({"email": "bad"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_new_profile.email");

    let (status, body) = server
        .patch("/profiles/undefined", &json!({"email": "a@b.cd"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found_profile_to_merge");
}

#[tokio::test]
async fn test_relationship_to_existing_profile() {
    let server = TestServer::start().await;
    let friend = server.create(&json!({})).await;
    let (status, created) = server
        .post(
            "/profiles",
            &json!({"relationships": [{"userId": friend, "type": "friend"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["relationships"][0]["type"], "friend");
}

#[tokio::test]
async fn test_health_and_help() {
    let server = TestServer::start().await;
    let (status, health) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, info) = server.get("/help/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "wenet/profile-manager");
    assert_eq!(info["license"], "MIT");
}
