//! Integration tests for the goals API client.
//!
//! Each test runs against a local mockito server; no real credentials or
//! network access are needed.

use std::io::Write;
use std::time::Duration;

use lockin_core::{
    CoreError, GoalId, GoalInterval, GoalsClient, NewGoal, ProofSubmission, ProofType,
    StaticToken, UserRegistration,
};
use mockito::Matcher;
use serde_json::json;

const TOKEN: &str = "test-id-token";

fn client(server: &mockito::Server) -> GoalsClient {
    GoalsClient::new(&server.url(), StaticToken::new(TOKEN), Duration::from_secs(5)).unwrap()
}

fn goal_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "targetAmount": 30,
        "interval": "daily",
        "stakeAmount": 10,
        "deadlineTime": "21:00:00",
        "nextDeadlineDateTime": "2030-01-15T21:00:00Z",
        "isActive": true,
        "currentStreak": 4,
        "status": "active",
        "statusDescription": {"message": "On track", "timeDetail": null},
        "lastProofDate": null
    })
}

#[tokio::test]
async fn list_goals_sends_bearer_and_unwraps_nested_envelope() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({"data": {"data": {"data": [goal_json(1, "Read"), goal_json(2, "Run")]}}});
    let mock = server
        .mock("GET", "/api/goals")
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let goals = client(&server).list_goals().await.unwrap();

    mock.assert_async().await;
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].name, "Read");
    assert_eq!(goals[1].id, GoalId("2".into()));
    assert_eq!(
        goals[0].status_description.as_ref().map(|d| d.message.as_str()),
        Some("On track")
    );
}

#[tokio::test]
async fn list_goals_with_unknown_envelope_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals")
        .with_status(200)
        .with_body(r#"{"result": {"items": []}}"#)
        .create_async()
        .await;

    let goals = client(&server).list_goals().await.unwrap();
    assert!(goals.is_empty());
}

#[tokio::test]
async fn missing_token_is_authentication_required_without_a_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/goals")
        .expect(0)
        .create_async()
        .await;

    let client = GoalsClient::new(&server.url(), StaticToken::none(), Duration::from_secs(5)).unwrap();
    let err = client.list_goals().await.unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationRequired));
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals")
        .with_status(500)
        .with_body(r#"{"message": "Database unavailable"}"#)
        .create_async()
        .await;

    let err = client(&server).list_goals().await.unwrap_err();
    match err {
        CoreError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_message_uses_status_line() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals/99")
        .with_status(404)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server)
        .get_goal(&GoalId("99".into()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn get_goal_unwraps_single_record() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals/7")
        .with_status(200)
        .with_body(json!({"data": goal_json(7, "Meditate")}).to_string())
        .create_async()
        .await;

    let goal = client(&server).get_goal(&GoalId("7".into())).await.unwrap();
    assert_eq!(goal.name, "Meditate");
    assert_eq!(goal.interval, GoalInterval::Daily);
}

#[tokio::test]
async fn create_goal_posts_normalized_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/goals")
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_body(Matcher::Json(json!({
            "name": "Code",
            "targetAmount": 60.0,
            "interval": "weekly",
            "hardCoreMode": true,
            "proofType": "screenshot",
            "stakeAmount": 20.0,
            "deadlineTime": "18:30:00"
        })))
        .with_status(201)
        .with_body(r#"{"message": "Goal created"}"#)
        .create_async()
        .await;

    let goal = NewGoal {
        name: "Code".into(),
        target_amount: 60.0,
        interval: GoalInterval::Weekly,
        hard_core_mode: true,
        proof_type: ProofType::Screenshot,
        stake_amount: 20.0,
        deadline_time: "18:30".into(),
    };
    let resp = client(&server).create_goal(goal).await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp["message"], "Goal created");
}

#[tokio::test]
async fn create_goal_rejects_invalid_input_locally() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/goals")
        .expect(0)
        .create_async()
        .await;

    let goal = NewGoal {
        name: "Code".into(),
        target_amount: 0.0,
        interval: GoalInterval::Daily,
        hard_core_mode: false,
        proof_type: ProofType::Photo,
        stake_amount: 5.0,
        deadline_time: "18:30".into(),
    };
    let err = client(&server).create_goal(goal).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn update_and_delete_hit_goal_paths() {
    let mut server = mockito::Server::new_async().await;
    let put = server
        .mock("PUT", "/api/goals/abc")
        .match_body(Matcher::Json(json!({"stakeAmount": 15})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/goals/abc")
        .with_status(204)
        .create_async()
        .await;

    let client = client(&server);
    let id = GoalId("abc".into());
    client.update_goal(&id, &json!({"stakeAmount": 15})).await.unwrap();
    let deleted = client.delete_goal(&id).await.unwrap();

    put.assert_async().await;
    delete.assert_async().await;
    assert!(deleted.is_null());
}

#[tokio::test]
async fn submit_proof_sends_multipart_files_and_description() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/goals/3/proof")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="ProofFile"; filename="run.png""#.into()),
            Matcher::Regex(r#"name="ProofFile"; filename="log.csv""#.into()),
            Matcher::Regex(r#"name="description""#.into()),
            Matcher::Regex("5k before breakfast".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"message": "Proof accepted"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("run.png");
    let csv = dir.path().join("log.csv");
    std::fs::File::create(&png).unwrap().write_all(b"fake-png-bytes").unwrap();
    std::fs::write(&csv, "km,minutes\n5,27\n").unwrap();

    let proof = ProofSubmission {
        files: vec![png, csv],
        description: Some("5k before breakfast".into()),
    };
    let resp = client(&server)
        .submit_proof(&GoalId("3".into()), &proof)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp["message"], "Proof accepted");
}

#[tokio::test]
async fn submit_proof_requires_files() {
    let server = mockito::Server::new_async().await;
    let err = client(&server)
        .submit_proof(&GoalId("3".into()), &ProofSubmission::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn export_returns_csv_bytes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals/5/export")
        .match_query(Matcher::UrlEncoded("format".into(), "csv".into()))
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body("date,submitted,charged\n2024-01-14,Y,0\n")
        .create_async()
        .await;

    let csv = client(&server)
        .export_goal_history(&GoalId("5".into()))
        .await
        .unwrap();
    assert!(String::from_utf8(csv).unwrap().starts_with("date,submitted"));
}

#[tokio::test]
async fn export_failure_uses_server_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/goals/5/export")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"message": "Not your goal"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .export_goal_history(&GoalId("5".into()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not your goal");
}

#[tokio::test]
async fn payment_endpoints() {
    let mut server = mockito::Server::new_async().await;
    let save = server
        .mock("POST", "/api/users/payment/save-payment-method")
        .match_body(Matcher::Json(json!({"paymentMethodId": "pm_123"})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/api/users/payment/verify-card")
        .with_status(200)
        .with_body(r#"{"verified": true}"#)
        .create_async()
        .await;

    let client = client(&server);
    client.save_payment_method("pm_123").await.unwrap();
    let verified = client.verify_card().await.unwrap();

    save.assert_async().await;
    verify.assert_async().await;
    assert_eq!(verified["verified"], true);
}

#[tokio::test]
async fn register_needs_no_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/users/register")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "email": "a@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace"
        })))
        .with_status(409)
        .with_body(r#"{"message": "Email already registered"}"#)
        .create_async()
        .await;

    let client = GoalsClient::new(&server.url(), StaticToken::none(), Duration::from_secs(5)).unwrap();
    let user = UserRegistration {
        email: "a@example.com".into(),
        password: "hunter22".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    };
    let err = client.register_user(&user).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.to_string(), "Email already registered");
}
