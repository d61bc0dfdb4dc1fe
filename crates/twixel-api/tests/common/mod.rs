#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use twixel_api::{AppState, AppStateInner, SessionKeys, router};
use twixel_db::Database;

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let state = AppStateInner::new(db, SessionKeys::new(SECRET, false));
        let router = router(state.clone());
        TestApp { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Inserts a user directly; the password hash is a dummy value.
    pub fn create_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .db
            .create_user(&id.to_string(), username, "not-a-real-hash", Utc::now())
            .expect("Failed to create user");
        id
    }

    pub fn create_twix(&self, author: Uuid, title: &str, at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .db
            .insert_twix(&id.to_string(), title, "abbastanza lungo", &author.to_string(), at)
            .expect("Failed to create twix");
        id
    }

    pub fn cookie_for(&self, user_id: Uuid, username: &str) -> String {
        let token = self
            .state
            .session
            .issue(user_id, username)
            .expect("Failed to issue session token");
        format!("twixel_session={token}")
    }

    pub fn twix_count(&self) -> u64 {
        self.state.db.count_twixes().expect("Failed to count twixes")
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    post_raw(uri, Some("application/x-www-form-urlencoded"), body, cookie)
}

/// POST with an arbitrary body; `content_type: None` omits the header.
pub fn post_raw(uri: &str, content_type: Option<&str>, body: String, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("missing Location header")
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
