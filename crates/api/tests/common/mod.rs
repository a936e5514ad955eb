#![allow(dead_code)]

use std::io::{Cursor, Read};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use formflow_api::auth::jwt::JwtConfig;
use formflow_api::config::ServerConfig;
use formflow_api::router::build_app_router;
use formflow_api::state::AppState;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the production router (same middleware stack) over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture helpers (all go through the HTTP surface)
// ---------------------------------------------------------------------------

/// Register `email` and return a bearer token for it.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        json!({ "email": email, "password": TEST_PASSWORD, "full_name": "Test User" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a form and return its id.
pub async fn create_form(app: &Router, token: &str, title: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/forms",
        json!({ "title": title, "description": "test form" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["form_id"].as_i64().unwrap()
}

/// Add a question and return its id.
pub async fn add_question(
    app: &Router,
    token: &str,
    form_id: i64,
    text: &str,
    required: bool,
) -> i64 {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/questions/forms/{form_id}/questions"),
        json!({ "question_text": text, "is_required": required }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["question_id"].as_i64().unwrap()
}

pub async fn publish(app: &Router, token: &str, form_id: i64) {
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/forms/{form_id}/publish"),
        json!({ "is_published": true }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Submit answers to a form anonymously.
pub async fn submit(app: &Router, form_id: i64, body: Value) -> Response {
    post_json(
        app.clone(),
        &format!("/api/v1/responses/forms/{form_id}/responses"),
        body,
    )
    .await
}

// ---------------------------------------------------------------------------
// Exported workbooks
// ---------------------------------------------------------------------------

/// The worksheet of an exported workbook, with cells looked up by A1 reference.
pub struct ExportedSheet {
    sheet: String,
    strings: Vec<String>,
}

impl ExportedSheet {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut read = |name: &str| {
            let mut body = String::new();
            if let Ok(mut file) = archive.by_name(name) {
                file.read_to_string(&mut body).unwrap();
            }
            body
        };
        let sheet = read("xl/worksheets/sheet1.xml");
        let strings = read("xl/sharedStrings.xml")
            .split("<si>")
            .skip(1)
            .map(|item| element_text(item, "t"))
            .collect();
        Self { sheet, strings }
    }

    /// Displayed text of a cell, `None` when the sheet has no such cell.
    pub fn cell(&self, reference: &str) -> Option<String> {
        let start = self.sheet.find(&format!("<c r=\"{reference}\""))?;
        let rest = &self.sheet[start..];
        let open_end = rest.find('>')?;
        if rest[..open_end].ends_with('/') {
            return Some(String::new());
        }
        let element = &rest[..rest.find("</c>")?];
        let value = element_text(element, "v");
        if rest[..open_end].contains("t=\"s\"") {
            let index: usize = value.parse().unwrap();
            Some(self.strings[index].clone())
        } else {
            Some(value)
        }
    }

    pub fn has_row(&self, row: usize) -> bool {
        self.sheet.contains(&format!("<row r=\"{row}\""))
    }
}

/// Unescaped text of the first `<tag>` inside `xml`, empty when absent.
fn element_text(xml: &str, tag: &str) -> String {
    let Some(start) = xml.find(&format!("<{tag}")) else {
        return String::new();
    };
    let rest = &xml[start..];
    let Some(open_end) = rest.find('>') else {
        return String::new();
    };
    if rest[..open_end].ends_with('/') {
        return String::new();
    }
    let body = &rest[open_end + 1..];
    let text = body.find(&format!("</{tag}>")).map_or(body, |end| &body[..end]);
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Fetch a form's export as its owner.
pub async fn export(app: &Router, token: &str, form_id: i64) -> ExportedSheet {
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/analytics/forms/{form_id}/export"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    ExportedSheet::from_bytes(body_bytes(response).await)
}
