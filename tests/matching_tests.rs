// Matching service client tests against a mock server

use lume_deck::models::{Decision, DecisionRecord};
use lume_deck::services::{DecisionSink, MatchingClient, MatchingError, ProfileSource};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn client(base_url: &str) -> MatchingClient {
    MatchingClient::new(base_url, Duration::from_secs(5), "https://cdn.lume.test/{id}").unwrap()
}

#[tokio::test]
async fn test_fetch_maps_matches_to_profiles() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/matches/find")
        .match_body(Matcher::PartialJson(json!({
            "userId": "viewer",
            "limit": 10,
            "excludeUserIds": ["seen-1"],
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "matches": [
                    {
                        "userId": "u1",
                        "name": "Ana",
                        "age": 27,
                        "heightCm": 168,
                        "matchScore": 82.5,
                        "imageFileIds": ["f1", "f2"],
                        "description": "Runs marathons"
                    },
                    { "userId": "u2", "name": "Bea", "age": 31, "imageFileIds": [] },
                    { "userId": "", "name": "Broken", "age": 40 }
                ],
                "next_cursor": null,
                "total_results": 3
            })
            .to_string(),
        )
        .create_async()
        .await;

    let profiles = client(&server.url())
        .fetch("viewer", 10, &["seen-1".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].id, "u1");
    assert_eq!(profiles[0].photos, vec!["https://cdn.lume.test/f1", "https://cdn.lume.test/f2"]);
    assert_eq!(profiles[0].bio.as_deref(), Some("Runs marathons"));
    assert!(profiles[1].photos.is_empty());
}

#[tokio::test]
async fn test_fetch_caps_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/matches/find")
        .match_body(Matcher::PartialJson(json!({ "limit": 100 })))
        .with_status(200)
        .with_body(r#"{"matches":[]}"#)
        .create_async()
        .await;

    let profiles = client(&server.url()).fetch("viewer", 500, &[]).await.unwrap();

    mock.assert_async().await;
    assert!(profiles.is_empty());
}

#[tokio::test]
async fn test_fetch_surfaces_server_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/matches/find")
        .with_status(500)
        .create_async()
        .await;

    let result = client(&server.url()).fetch("viewer", 10, &[]).await;
    assert!(matches!(result, Err(MatchingError::ApiError(_))));
}

#[tokio::test]
async fn test_fetch_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/matches/find")
        .with_status(401)
        .create_async()
        .await;

    let result = client(&server.url()).fetch("viewer", 10, &[]).await;
    assert!(matches!(result, Err(MatchingError::Unauthorized)));
}

#[tokio::test]
async fn test_report_posts_match_event() {
    let mut server = mockito::Server::new_async().await;
    let like = server
        .mock("POST", "/api/v1/matches/event")
        .match_body(Matcher::Json(json!({
            "userId": "viewer",
            "targetUserId": "u1",
            "eventType": "liked",
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"event_id":"e1"}"#)
        .create_async()
        .await;
    let pass = server
        .mock("POST", "/api/v1/matches/event")
        .match_body(Matcher::PartialJson(json!({ "eventType": "passed" })))
        .with_status(200)
        .create_async()
        .await;

    let client = client(&server.url());
    let record = |id: &str, decision| DecisionRecord {
        profile_id: id.to_string(),
        decision,
        decided_at: chrono::Utc::now(),
    };

    client.report("viewer", &record("u1", Decision::SuperLike)).await.unwrap();
    client.report("viewer", &record("u2", Decision::Nope)).await.unwrap();

    like.assert_async().await;
    pass.assert_async().await;
}
