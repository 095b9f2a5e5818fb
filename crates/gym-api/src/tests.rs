//! Router tests driven through `tower::ServiceExt::oneshot` against an
//! in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use gym_core::{
  person::{Identity, NewWorker, Worker},
  service::GymService,
};
use gym_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{
  auth::{STAFF_CODE, STAFF_ID},
  router,
};

struct Harness {
  app:    Router,
  worker: Worker,
}

impl Harness {
  /// A store holding one worker whose code is `desk`.
  async fn new() -> Self {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let gym = GymService::new(Arc::new(store));
    let worker = gym
      .register_worker(NewWorker {
        identity: Identity {
          name:          "Wendy".into(),
          date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
          email:         "wendy@x.com".into(),
        },
        code:     "desk".into(),
      })
      .await
      .unwrap();
    Self { app: router(gym), worker }
  }

  async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(STAFF_ID, self.worker.id.to_string())
      .header(STAFF_CODE, "desk");
    send(self.app.clone(), req, body).await
  }

  async fn get(&self, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().method("GET").uri(uri);
    send(self.app.clone(), req, None).await
  }
}

async fn send(
  app: Router,
  req: axum::http::request::Builder,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let req = match body {
    Some(json) => req
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string())),
    None => req.body(Body::empty()),
  }
  .unwrap();

  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn identity(name: &str) -> Value {
  json!({
    "name": name,
    "date_of_birth": "1992-07-04",
    "email": format!("{}@x.com", name.to_lowercase()),
  })
}

async fn register_coach(h: &Harness, name: &str) -> String {
  let (status, body) = h
    .send(
      "POST",
      "/coaches",
      Some(json!({
        "identity": identity(name),
        "code": format!("{}-code", name.to_lowercase()),
        "workout_plans": ["5x5"],
      })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn register_member(h: &Harness, name: &str, bench: u32) -> String {
  let (status, body) = h
    .send(
      "POST",
      "/members",
      Some(json!({
        "identity": identity(name),
        "membership_date": "2024-01-01",
        "lifts": { "bench": bench, "squat": 0, "deadlift": 0 },
      })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_worker_registers_without_headers() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let app = router(GymService::new(Arc::new(store)));
  let body = json!({ "identity": identity("Wendy"), "code": "desk" });

  let req = Request::builder().method("POST").uri("/workers");
  let (status, _) = send(app.clone(), req, Some(body.clone())).await;
  assert_eq!(status, StatusCode::CREATED);

  let body = json!({ "identity": identity("Walt"), "code": "desk2" });
  let req = Request::builder().method("POST").uri("/workers");
  let (status, err) = send(app, req, Some(body)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(err["error"].is_string());
}

#[tokio::test]
async fn writes_without_staff_headers_are_rejected() {
  let h = Harness::new().await;
  let req = Request::builder().method("POST").uri("/coaches");
  let body = json!({ "identity": identity("Alex"), "code": "c", "workout_plans": ["5x5"] });
  let (status, _) = send(h.app.clone(), req, Some(body)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, body) = h.get("/coaches").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

#[tokio::test]
async fn removing_the_last_worker_keeps_registration_closed() {
  let h = Harness::new().await;
  let uri = format!("/workers/{}?code=desk", h.worker.id);
  let (status, _) = h.send("DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, body) = h.get("/workers").await;
  assert_eq!(body, json!([]));

  let body = json!({ "identity": identity("Mallory"), "code": "mine" });
  let req = Request::builder().method("POST").uri("/workers");
  let (status, _) = send(h.app.clone(), req, Some(body)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn member_view_hides_email_and_derives_total() {
  let h = Harness::new().await;
  let id = register_member(&h, "John", 120).await;

  let (status, body) = h.get(&format!("/members/{id}")).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.get("email").is_none());
  assert_eq!(body["lifts"]["total"], 120);
  assert!(body["age"].as_u64().unwrap() >= 30);
  assert_eq!(body["coached_by"], Value::Null);
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_member_is_404_with_message() {
  let h = Harness::new().await;
  let id = uuid::Uuid::new_v4();
  let (status, body) = h.get(&format!("/members/{id}")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], format!("Member with an id of: {id} doesn't exist"));
}

#[tokio::test]
async fn mismatched_credential_is_400() {
  let h = Harness::new().await;
  let john = register_member(&h, "John", 0).await;
  register_member(&h, "Jane", 0).await;

  let (status, body) = h
    .send(
      "PUT",
      &format!("/members/{john}/name"),
      Some(json!({ "email": "jane@x.com", "name": "Johnny" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("isn't the same entity"));
}

#[tokio::test]
async fn rankings_on_empty_registry_are_404() {
  let h = Harness::new().await;
  assert_eq!(h.get("/members/top/bench").await.0, StatusCode::NOT_FOUND);
  assert_eq!(h.get("/coaches/most-clients").await.0, StatusCode::NOT_FOUND);
  assert_eq!(h.get("/coaches/available").await.0, StatusCode::NOT_FOUND);

  let (status, body) = h.get("/members/above-total?threshold=0").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn moving_a_client_between_coaches() {
  let h = Harness::new().await;
  let alex = register_coach(&h, "Alex").await;
  let maria = register_coach(&h, "Maria").await;
  let john = register_member(&h, "John", 0).await;

  let (status, _) = h
    .send(
      "POST",
      &format!("/coaches/{alex}/clients"),
      Some(json!({ "credential": { "code": "alex-code" }, "member_ids": [john] })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = h
    .send(
      "POST",
      &format!("/coaches/{maria}/clients"),
      Some(json!({ "credential": { "email": "maria@x.com" }, "member_ids": [john] })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["clients"], json!([john]));

  let (_, body) = h.get(&format!("/coaches/{alex}/clients")).await;
  assert_eq!(body, json!([]));
  let (_, body) = h.get(&format!("/members/{john}/coach")).await;
  assert_eq!(body["id"], maria);
}

#[tokio::test]
async fn deleting_a_coach_by_code_releases_clients() {
  let h = Harness::new().await;
  let alex = register_coach(&h, "Alex").await;
  let john = register_member(&h, "John", 0).await;
  h.send(
    "PUT",
    &format!("/members/{john}/coach"),
    Some(json!({ "email": "john@x.com", "coach_id": alex })),
  )
  .await;

  let (status, _) = h.send("DELETE", &format!("/coaches/{alex}?code=alex-code"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, body) = h.get("/members/available").await;
  assert_eq!(body[0]["id"], john);
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn member_becomes_coach() {
  let h = Harness::new().await;
  let john = register_member(&h, "John", 0).await;

  let (status, body) = h
    .send(
      "POST",
      &format!("/members/{john}/role"),
      Some(json!({
        "email": "john@x.com",
        "role": "ROLE_COACH",
        "code": "john-code",
        "workout_plans": ["PPL"],
      })),
    )
    .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["role"], "ROLE_COACH");
  assert_eq!(body["record"]["workout_plans"], json!(["PPL"]));

  assert_eq!(h.get(&format!("/members/{john}")).await.0, StatusCode::NOT_FOUND);
  let (_, body) = h.get("/coaches/search?email=john@x.com").await;
  assert_eq!(body["name"], "John");
}

#[tokio::test]
async fn same_role_transition_is_400() {
  let h = Harness::new().await;
  let worker = h.worker.id;
  let (status, _) = h
    .send(
      "POST",
      &format!("/workers/{worker}/role"),
      Some(json!({ "credential": { "code": "desk" }, "role": "ROLE_WORKER", "code": "new" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
