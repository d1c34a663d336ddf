//! Client tests against a recording transport and a local axum server.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
};

use serde_json::{Value, json};
use uuid::Uuid;
use vectordemo_core::{
  Model, Record,
  filter::FilterValues,
  models::{LoginCredentials, NewJobDescription, Pagination, PasswordReset, User, UserCreate},
};
use vectordemo_session::{
  MemoryStorage, SessionStore, StorageKey,
  guard::{Navigation, navigate},
};

use crate::{
  Anonymous, ApiRequest, ApiResponse, ClientConfig, Credentials, Error, HttpClient, Method,
  ReqwestTransport, Result, Transport, job_description_api, user_api,
};

// ─── Recording transport ─────────────────────────────────────────────────────

/// Replays canned responses in order and records every request.
#[derive(Default)]
struct MockTransport {
  responses: Mutex<VecDeque<ApiResponse>>,
  requests:  Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
  fn replying(responses: Vec<ApiResponse>) -> Self {
    Self { responses: Mutex::new(responses.into()), ..Self::default() }
  }

  fn requests(&self) -> Vec<ApiRequest> { self.requests.lock().unwrap().clone() }
}

impl Transport for MockTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    self.requests.lock().unwrap().push(request);
    let next = self.responses.lock().unwrap().pop_front();
    Ok(next.unwrap_or_else(|| ApiResponse::json(204, Value::Null)))
  }
}

fn client(
  responses: Vec<ApiResponse>,
  credentials: Arc<dyn Credentials>,
) -> Arc<HttpClient<MockTransport>> {
  Arc::new(HttpClient::new(MockTransport::replying(responses), credentials))
}

const JOB_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
const USER_ID: &str = "0b7e7dee-87ba-4b8a-9d2c-4a1f0d4c9e11";

fn user_wire(token: Option<&str>) -> Value {
  json!({
    "id": USER_ID,
    "email": "jane@example.com",
    "first_name": "Jane",
    "last_name": "Doe",
    "full_name": "Jane Doe",
    "token": token,
  })
}

fn job_wire() -> Value {
  json!({
    "id": JOB_ID,
    "datetime_created": "2024-05-01T12:00:00Z",
    "title": "Cantor",
    "company": "St. Thomas",
    "location": "Leipzig",
  })
}

// ─── Validation before the network ───────────────────────────────────────────

#[tokio::test]
async fn invalid_create_input_never_reaches_the_network() {
  let http = client(vec![], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  let err = api
    .create_record(Record::new().with("company", "Acme"))
    .await
    .unwrap_err();
  match err {
    Error::Validation(v) => assert_eq!(v.fields(), vec!["title"]),
    other => panic!("expected validation error, got {other:?}"),
  }
  assert!(http.transport().requests().is_empty());
}

#[tokio::test]
async fn invalid_custom_call_input_never_reaches_the_network() {
  let http = client(vec![], Arc::new(Anonymous));
  let users = user_api(http.clone());

  let err = users
    .login(LoginCredentials { email: "not-an-email".into(), password: "pw".into() })
    .await
    .unwrap_err();
  assert!(matches!(&err, Error::Validation(v) if v.has_field("email")));
  assert!(http.transport().requests().is_empty());
}

// ─── CRUD ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_sends_snake_case_without_read_only_fields() {
  let http = client(vec![ApiResponse::json(201, job_wire())], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  let job = api
    .create(&NewJobDescription {
      title:       "Cantor".into(),
      company:     Some("St. Thomas".into()),
      location:    Some("Leipzig".into()),
      description: None,
      skills:      None,
      language:    None,
    })
    .await
    .unwrap();
  assert_eq!(job.title, "Cantor");
  assert_eq!(job.id.to_string(), JOB_ID);

  let requests = http.transport().requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].method, Method::Post);
  assert_eq!(requests[0].path, "/job-descriptions/");
  assert_eq!(
    requests[0].body,
    Some(json!({ "title": "Cantor", "company": "St. Thomas", "location": "Leipzig" }))
  );
}

#[tokio::test]
async fn create_record_strips_read_only_and_unknown_keys() {
  let http = client(vec![ApiResponse::json(201, job_wire())], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  api
    .create_record(
      Record::new()
        .with("id", JOB_ID)
        .with("title", "Cantor")
        .with("favouriteColour", "blue"),
    )
    .await
    .unwrap();
  assert_eq!(http.transport().requests()[0].body, Some(json!({ "title": "Cantor" })));
}

#[tokio::test]
async fn retrieve_rejects_invalid_response() {
  let mut bad = job_wire();
  bad["id"] = json!("nope");
  let http = client(vec![ApiResponse::json(200, bad)], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  let id: Uuid = JOB_ID.parse().unwrap();
  let err = api.retrieve(id).await.unwrap_err();
  assert!(matches!(&err, Error::Validation(v) if v.has_field("id")));
  assert_eq!(http.transport().requests()[0].path, format!("/job-descriptions/{JOB_ID}/"));
}

#[tokio::test]
async fn list_sends_filters_and_pagination() {
  let page = json!({ "count": 1, "next": null, "previous": null, "results": [job_wire()] });
  let http = client(vec![ApiResponse::json(200, page)], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  let values = FilterValues::new()
    .set("title", "Cantor")
    .set("company", "")
    .set("ids", json!([1, 2, 3]))
    .set("unknown", "x")
    .set_undefined("location");
  let page = api.list(&values, Pagination { page: 2, size: 10 }).await.unwrap();
  assert_eq!(page.count, 1);
  assert_eq!(page.results[0].title, "Cantor");

  let requests = http.transport().requests();
  let query = &requests[0].query;
  let expected: Vec<(String, String)> = [
    ("ids", "1,2,3"),
    ("title", "Cantor"),
    ("page", "2"),
    ("page_size", "10"),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_owned(), v.to_owned()))
  .collect();
  assert_eq!(query, &expected);
}

#[tokio::test]
async fn update_sends_only_provided_fields() {
  let http = client(vec![ApiResponse::json(200, job_wire())], Arc::new(Anonymous));
  let api = job_description_api(http.clone());
  let id: Uuid = JOB_ID.parse().unwrap();

  api.update(id, Record::new().with("location", "Leipzig")).await.unwrap();
  let requests = http.transport().requests();
  let request = &requests[0];
  assert_eq!(request.method, Method::Patch);
  assert_eq!(request.body, Some(json!({ "location": "Leipzig" })));
}

#[tokio::test]
async fn update_rejects_wrong_types() {
  let http = client(vec![], Arc::new(Anonymous));
  let api = job_description_api(http.clone());
  let id: Uuid = JOB_ID.parse().unwrap();

  let err = api.update(id, Record::new().with("title", 5)).await.unwrap_err();
  assert!(matches!(&err, Error::Validation(v) if v.has_field("title")));
  assert!(http.transport().requests().is_empty());
}

#[tokio::test]
async fn replace_requires_every_required_field() {
  let http = client(vec![], Arc::new(Anonymous));
  let api = job_description_api(http.clone());
  let id: Uuid = JOB_ID.parse().unwrap();

  let err = api
    .replace_record(id, Record::new().with("location", "Leipzig"))
    .await
    .unwrap_err();
  assert!(matches!(&err, Error::Validation(v) if v.fields() == vec!["title"]));
  assert!(http.transport().requests().is_empty());
}

#[tokio::test]
async fn remove_issues_delete() {
  let http = client(vec![ApiResponse::json(204, Value::Null)], Arc::new(Anonymous));
  let api = job_description_api(http.clone());
  let id: Uuid = JOB_ID.parse().unwrap();

  api.remove(id).await.unwrap();
  let requests = http.transport().requests();
  let request = &requests[0];
  assert_eq!(request.method, Method::Delete);
  assert_eq!(request.path, format!("/job-descriptions/{JOB_ID}/"));
}

// ─── Custom calls ────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_typed_results() {
  let results = json!([{
    "score": 0.92,
    "job_description": job_wire(),
    "chunks": [{
      "job_description_id": JOB_ID,
      "chunk": "Compose weekly cantatas.",
      "token_count": null,
      "embedding": [0.1, 0.2],
    }],
  }]);
  let http = client(vec![ApiResponse::json(200, results)], Arc::new(Anonymous));
  let api = job_description_api(http.clone());

  let results = api.search("choir director").await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].job_description.title, "Cantor");
  assert_eq!(results[0].chunks[0].token_count, None);

  let requests = http.transport().requests();
  let request = &requests[0];
  assert_eq!(request.path, "/job-descriptions/search/");
  assert_eq!(request.body, Some(json!({ "query": "choir director" })));
}

#[tokio::test]
async fn search_reports_nested_paths() {
  let results = json!([{
    "score": 0.5,
    "job_description": { "id": JOB_ID },
    "chunks": [],
  }]);
  let http = client(vec![ApiResponse::json(200, results)], Arc::new(Anonymous));
  let err = job_description_api(http).search("x").await.unwrap_err();
  assert!(matches!(&err, Error::Validation(v) if v.has_field("[0].jobDescription.title")));
}

#[tokio::test]
async fn reset_password_moves_uid_and_token_into_path() {
  let http = client(vec![ApiResponse::json(200, user_wire(Some("fresh")))], Arc::new(Anonymous));
  let users = user_api(http.clone());

  let user = users
    .reset_password(PasswordReset {
      uid:      "MQ".into(),
      token:    "set-abc".into(),
      password: "n3w-passw0rd".into(),
    })
    .await
    .unwrap();
  assert_eq!(user.token.as_deref(), Some("fresh"));

  let requests = http.transport().requests();
  let request = &requests[0];
  assert_eq!(request.path, "/password/reset/confirm/MQ/set-abc/");
  assert_eq!(request.body, Some(json!({ "password": "n3w-passw0rd" })));
}

#[tokio::test]
async fn signup_posts_to_users() {
  let http = client(vec![ApiResponse::json(201, user_wire(Some("T")))], Arc::new(Anonymous));
  let users = user_api(http.clone());

  let user = users
    .signup(&UserCreate {
      email:      "jane@example.com".into(),
      first_name: "Jane".into(),
      last_name:  "Doe".into(),
      password:   "longenough".into(),
    })
    .await
    .unwrap();
  assert_eq!(user.token.as_deref(), Some("T"));

  let requests = http.transport().requests();
  let request = &requests[0];
  assert_eq!(request.path, "/users/");
  assert_eq!(request.body.as_ref().unwrap()["first_name"], "Jane");
}

// ─── Headers and errors ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_then_requests_carry_token() {
  let session = Arc::new(
    SessionStore::load(Arc::new(MemoryStorage::new()), StorageKey::app()).unwrap(),
  );
  let http = client(
    vec![
      ApiResponse::json(200, user_wire(Some("T"))),
      ApiResponse::json(200, user_wire(None)),
    ],
    session.clone(),
  );
  let users = user_api(http.clone());

  let user = users
    .login(LoginCredentials { email: "jane@example.com".into(), password: "pw".into() })
    .await
    .unwrap();
  let requests = http.transport().requests();
  let first = &requests[0];
  assert_eq!(first.path, "/login/");
  assert_eq!(first.header("Authorization"), None);
  assert_eq!(first.header("Content-Type"), Some("application/json"));

  session.set_user(Some(user)).unwrap();
  let id: Uuid = USER_ID.parse().unwrap();
  let _: User = users.retrieve(id).await.unwrap();
  let requests = http.transport().requests();
  let second = &requests[1];
  assert_eq!(second.header("Authorization"), Some("Token T"));
}

fn signed_in_session(token: &str) -> Arc<SessionStore> {
  let session = Arc::new(
    SessionStore::load(Arc::new(MemoryStorage::new()), StorageKey::app()).unwrap(),
  );
  let user = User::from_api(&user_wire(Some(token))).unwrap();
  session.set_user(Some(user)).unwrap();
  session
}

#[tokio::test]
async fn rejected_token_signs_the_session_out() {
  let session = signed_in_session("stale");
  let http = client(
    vec![ApiResponse::json(401, json!({ "detail": "Invalid token." }))],
    session.clone(),
  );
  let id: Uuid = USER_ID.parse().unwrap();

  let err = user_api(http.clone()).retrieve(id).await.unwrap_err();
  assert!(matches!(&err, Error::Api(e) if e.status == 401));
  assert_eq!(http.transport().requests()[0].header("Authorization"), Some("Token stale"));
  assert!(!session.is_logged_in());
  assert_eq!(session.token(), None);

  // The login page is reachable again, and later requests go out anonymous.
  assert!(matches!(navigate("/login", session.is_logged_in()), Navigation::Allow(_)));
  let _ = user_api(http.clone()).retrieve(id).await;
  assert_eq!(http.transport().requests()[1].header("Authorization"), None);
}

#[tokio::test]
async fn other_failures_keep_the_session() {
  let session = signed_in_session("T");
  let http = client(
    vec![
      ApiResponse::json(403, json!({ "detail": "You do not have permission." })),
      ApiResponse::json(500, Value::Null),
    ],
    session.clone(),
  );
  let id: Uuid = USER_ID.parse().unwrap();

  user_api(http.clone()).retrieve(id).await.unwrap_err();
  user_api(http.clone()).retrieve(id).await.unwrap_err();
  assert!(session.is_logged_in());
  assert_eq!(session.token().as_deref(), Some("T"));
}

#[test]
fn rejected_token_does_not_clear_a_newer_session() {
  let session = signed_in_session("new");
  session.invalidate("old");
  assert_eq!(session.token().as_deref(), Some("new"));
  session.invalidate("new");
  assert!(!session.is_logged_in());
}

#[tokio::test]
async fn csrf_token_is_captured_and_echoed() {
  let mut first = ApiResponse::json(200, user_wire(None));
  first.set_cookies = vec!["csrftoken=abc; Path=/; SameSite=Lax".into()];
  let http = client(vec![first], Arc::new(Anonymous));
  let users = user_api(http.clone());
  let id: Uuid = USER_ID.parse().unwrap();

  users.retrieve(id).await.unwrap();
  assert_eq!(http.transport().requests()[0].header("X-CSRFToken"), None);
  assert_eq!(http.csrf_token().as_deref(), Some("abc"));

  users.logout().await.unwrap();
  assert_eq!(http.transport().requests()[1].header("X-CSRFToken"), Some("abc"));
}

#[tokio::test]
async fn non_success_becomes_api_error() {
  let http = client(
    vec![ApiResponse::json(400, json!({ "non_field_errors": ["Bad credentials."] }))],
    Arc::new(Anonymous),
  );
  let err = user_api(http)
    .login(LoginCredentials { email: "jane@example.com".into(), password: "pw".into() })
    .await
    .unwrap_err();
  let Error::Api(api) = &err else { panic!("expected api error, got {err:?}") };
  assert_eq!(api.status, 400);
  assert_eq!(api.path, "/login/");
  assert_eq!(err.report().summary.as_deref(), Some("Bad credentials."));
}

// ─── End to end over HTTP ────────────────────────────────────────────────────

mod server {
  use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
  };
  use serde_json::{Value, json};

  async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] != "pw" {
      return (
        StatusCode::BAD_REQUEST,
        HeaderMap::new(),
        Json(json!({ "non_field_errors": ["Unable to log in with provided credentials."] })),
      );
    }
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, "csrftoken=srv-token; Path=/".parse().unwrap());
    (StatusCode::OK, headers, Json(super::user_wire(Some("srv"))))
  }

  async fn list_jobs(headers: HeaderMap) -> impl IntoResponse {
    let authed = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      == Some("Token srv");
    let csrf = headers.get("x-csrftoken").and_then(|v| v.to_str().ok()) == Some("srv-token");
    if !(authed && csrf) {
      return (
        StatusCode::FORBIDDEN,
        Json(json!({ "detail": "Authentication credentials were not provided." })),
      );
    }
    (
      StatusCode::OK,
      Json(json!({ "count": 1, "next": null, "previous": null, "results": [super::job_wire()] })),
    )
  }

  async fn broken() -> impl IntoResponse { (StatusCode::OK, "<html>not json</html>") }

  pub async fn spawn() -> String {
    let app = Router::new()
      .route("/api/login/", post(login))
      .route("/api/job-descriptions/", get(list_jobs))
      .route("/api/users/", get(broken));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
  }
}

#[tokio::test]
async fn end_to_end_login_and_list() {
  let base_url = server::spawn().await;
  let transport = ReqwestTransport::new(&ClientConfig::new(base_url)).unwrap();
  let session = Arc::new(
    SessionStore::load(Arc::new(MemoryStorage::new()), StorageKey::app()).unwrap(),
  );
  let http = Arc::new(HttpClient::new(transport, session.clone()));
  let users = user_api(http.clone());
  let jobs = job_description_api(http.clone());

  let err = users
    .login(LoginCredentials { email: "jane@example.com".into(), password: "wrong".into() })
    .await
    .unwrap_err();
  assert!(matches!(&err, Error::Api(e) if e.status == 400));

  let anonymous = jobs.list(&FilterValues::new(), Pagination::default()).await.unwrap_err();
  assert!(matches!(&anonymous, Error::Api(e) if e.status == 403));

  let user = users
    .login(LoginCredentials { email: "jane@example.com".into(), password: "pw".into() })
    .await
    .unwrap();
  session.set_user(Some(user)).unwrap();
  assert!(session.is_logged_in());

  let page = jobs.list(&FilterValues::new(), Pagination::default()).await.unwrap();
  assert_eq!(page.results.len(), 1);
  assert_eq!(page.results[0].company.as_deref(), Some("St. Thomas"));
}

#[tokio::test]
async fn end_to_end_non_json_success_is_decode_error() {
  let base_url = server::spawn().await;
  let transport = ReqwestTransport::new(&ClientConfig::new(base_url)).unwrap();
  let http = HttpClient::new(transport, Arc::new(Anonymous));

  let err = http.get("/users/", Vec::new()).await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)));
}
