use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use foodorder_server::{router, AppState};
use foodorder_store::Store;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const NOW: i64 = 1_700_000_000;

fn app() -> Router {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    router(AppState::new(store).with_clock(|| NOW))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn post_json(body: Value) -> Request<Body> {
    Request::post("/api/survey-data/add")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn sample_orders() -> Value {
    json!([
        {"Timestamp": "2020-01-01", "Email Address": "a@x.com", "meal": "[Fafa] Salad"},
        {"Timestamp": "2020-01-01", "Email Address": "b@x.com", "meal": "[Sushi] Maki", "Notes": "no soy"}
    ])
}

#[tokio::test]
async fn add_then_latest_returns_submitted_rows() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(json!({"surveyData": sample_orders(), "username": "omid"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1}));

    let (status, latest) = send(&app, get("/api/survey-data/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["survey_data"], sample_orders());
    assert_eq!(latest["created_at"], json!(NOW));
    assert_eq!(latest["username"], json!("omid"));
}

#[tokio::test]
async fn invalid_batch_is_rejected_with_details() {
    let app = app();
    let orders = json!([
        {"Timestamp": "2020-01-01", "Email Address": "a@x.com", "meal": "[Fafa] Salad"},
        {"Timestamp": "soon", "Email Address": "broken", "meal": "Salad"}
    ]);
    let (status, body) = send(&app, post_json(json!({"surveyData": orders}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let details = body["details"].as_array().expect("details");
    assert_eq!(details.len(), 3);
    assert!(details.iter().all(|d| d["row"] == json!(1)));
    let fields: Vec<&str> = details
        .iter()
        .map(|d| d["field"].as_str().expect("field"))
        .collect();
    assert_eq!(fields, vec!["Timestamp", "Email Address", "meal"]);

    let (status, _) = send(&app, get("/api/survey-data/latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::post("/api/survey-data/add")
        .header("content-type", "application/json")
        .body(Body::from("{\"surveyData\": "))
        .expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("malformed payload"));
}

#[tokio::test]
async fn empty_batch_is_accepted_and_becomes_latest() {
    let app = app();
    send(&app, post_json(json!({"surveyData": sample_orders()}))).await;
    let (status, body) = send(&app, post_json(json!({"surveyData": []}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2}));

    let (_, latest) = send(&app, get("/api/survey-data/latest")).await;
    assert_eq!(latest["survey_data"], json!([]));
    assert!(latest.get("username").is_none());
}

#[tokio::test]
async fn all_is_newest_first_and_by_id_lookups() {
    let app = app();
    send(&app, post_json(json!({"surveyData": sample_orders()}))).await;
    send(&app, post_json(json!({"surveyData": [], "username": "ada"}))).await;

    let (status, all) = send(&app, get("/api/survey-data/all")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = all
        .as_array()
        .expect("array")
        .iter()
        .map(|batch| batch["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(all[0]["archived"], json!(false));

    let (status, one) = send(&app, get("/api/survey-data/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["survey_data"], sample_orders());

    let (status, _) = send(&app, get("/api/survey-data/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/survey-data/first")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
