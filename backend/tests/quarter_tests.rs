//! Quarter authoring and lookup over HTTP

mod common;

use axum::http::StatusCode;
use common::{open_quarter_body, TestApp};
use serde_json::json;
use whiskey_wiz_backend::GameEvent;

#[tokio::test]
async fn health_reports_memory_store() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["storage_status"], "connected");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/v1/quarters", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send("GET", "/api/v1/quarters", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_admins_create_quarters() {
    let app = TestApp::new();
    let player = app.token("taster", false);

    let (status, body) = app
        .send("POST", "/api/v1/quarters", Some(&player), Some(open_quarter_body()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn created_quarter_uses_default_rules_and_sorted_samples() {
    let app = TestApp::new();
    let mut body = open_quarter_body();
    body["samples"].as_array_mut().unwrap().reverse();

    let (status, quarter) = app
        .send("POST", "/api/v1/quarters", Some(&app.admin_token()), Some(body))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", quarter);

    let ids: Vec<_> = quarter["samples"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert_eq!(quarter["scoringRules"]["age"]["maxPoints"], "35");

    assert!(app
        .analytics
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::QuarterCreated { name, .. } if name == "Winter Pour")));
}

#[tokio::test]
async fn invalid_quarter_reports_every_violation() {
    let app = TestApp::new();
    let mut body = open_quarter_body();
    body["samples"][3]["id"] = json!("A");
    body["samples"][1]["proof"] = json!("200");
    body["scoringRules"] = json!({
        "age": { "maxPoints": "-1", "penaltyPerUnit": "6", "exactMatchBonus": "20" },
        "proof": { "maxPoints": "35", "penaltyPerUnit": "3", "exactMatchBonus": "20",
                   "hasLowerLimit": true, "minValue": "80", "hasUpperLimit": true, "maxValue": "160" },
        "mashbill": { "exactMatchBonus": "20" }
    });

    let (status, error) = app
        .send("POST", "/api/v1/quarters", Some(&app.admin_token()), Some(body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", error);
    assert_eq!(error["error"]["code"], "INVALID_CONFIGURATION");

    let fields: Vec<_> = error["error"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert!(fields.contains(&"age.maxPoints".to_string()));
    assert!(fields.contains(&"samples.A".to_string()));
    assert!(fields.contains(&"samples.B.proof".to_string()));
    assert!(fields.contains(&"samples.D".to_string()));
}

#[tokio::test]
async fn oversized_point_values_are_a_configuration_error() {
    let app = TestApp::new();
    let mut body = open_quarter_body();
    body["scoringRules"] = json!({
        "age": { "maxPoints": "79228162514264337593543950335", "penaltyPerUnit": "6",
                 "exactMatchBonus": "20" },
        "proof": { "maxPoints": "50", "penaltyPerUnit": "3", "exactMatchBonus": "20" },
        "mashbill": { "exactMatchBonus": "30" }
    });

    let (status, error) = app
        .send("POST", "/api/v1/quarters", Some(&app.admin_token()), Some(body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", error);
    assert_eq!(error["error"]["code"], "INVALID_CONFIGURATION");
    assert!(error["error"]["violations"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["field"] == "scoringRules" && v["message"] == "point values are too large"));
}

#[tokio::test]
async fn quarter_must_end_after_it_starts() {
    let app = TestApp::new();
    let mut body = open_quarter_body();
    body["endDate"] = body["startDate"].clone();

    let (status, error) = app
        .send("POST", "/api/v1/quarters", Some(&app.admin_token()), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["field"], "endDate");
}

#[tokio::test]
async fn players_never_see_the_answers() {
    let app = TestApp::new();
    let quarter_id = app.create_open_quarter().await;
    let player = app.token("taster", false);

    let (status, active) = app.send("GET", "/api/v1/quarters/active", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["id"], quarter_id.to_string());
    assert!(active.get("samples").is_none());
    assert_eq!(active["sampleIds"], json!(["A", "B", "C", "D"]));
    assert_eq!(active["maxScorePerSample"], "130");

    let uri = format!("/api/v1/quarters/{}", quarter_id);
    let (status, summary) = app.send("GET", &uri, Some(&player), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(summary.get("samples").is_none());

    let full = format!("/api/v1/quarters/{}/full", quarter_id);
    let (status, _) = app.send("GET", &full, Some(&player), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, quarter) = app
        .send("GET", &full, Some(&app.admin_token()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quarter["samples"][0]["mashbill"], "Bourbon");
}

#[tokio::test]
async fn closed_quarter_is_not_active() {
    let app = TestApp::new();
    let quarter_id = app.create_open_quarter().await;

    let uri = format!("/api/v1/quarters/{}/active", quarter_id);
    let (status, summary) = app
        .send("PUT", &uri, Some(&app.admin_token()), Some(json!({ "isActive": false })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["isActive"], false);

    let (status, error) = app.send("GET", "/api/v1/quarters/active", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn rules_lock_after_first_submission() {
    let app = TestApp::new();
    let quarter_id = app.create_open_quarter().await;
    let uri = format!("/api/v1/quarters/{}/rules", quarter_id);

    let mut rules = serde_json::to_value(shared::DEFAULT_SCORING_CONFIG).unwrap();
    rules["mashbill"]["exactMatchBonus"] = json!("30");

    let (status, quarter) = app
        .send("PUT", &uri, Some(&app.admin_token()), Some(rules.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", quarter);
    assert_eq!(quarter["scoringRules"]["mashbill"]["exactMatchBonus"], "30");

    let (status, _) = app
        .submit(
            "taster",
            quarter_id,
            json!({ "guesses": common::exact_guesses() }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = app
        .send("PUT", &uri, Some(&app.admin_token()), Some(rules))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn unknown_quarter_is_not_found() {
    let app = TestApp::new();
    let uri = format!("/api/v1/quarters/{}", uuid::Uuid::new_v4());

    let (status, _) = app
        .send("GET", &uri, Some(&app.token("taster", false)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
