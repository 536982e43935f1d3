// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supabase HTTP client (GoTrue auth + PostgREST tables).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{AuthOutcome, AuthSession, AuthUser, Baas, BaasError, Filter};
use crate::config::SupabaseConfig;

const AUTH_PATH: &str = "auth/v1";
const REST_PATH: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: url::Url,
    api_key: String,
    http: Client,
}

/// GoTrue answers sign-up with either a session (auto-confirm on) or the
/// bare user (confirmation email sent). Sign-in always returns a session.
#[derive(Debug, Deserialize)]
struct GoTrueResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueResponse> for AuthOutcome {
    fn from(response: GoTrueResponse) -> Self {
        let session = response
            .access_token
            .filter(|t| !t.is_empty())
            .map(|access_token| AuthSession { access_token });
        let user = response.user.or_else(|| {
            response.id.map(|id| AuthUser {
                id,
                email: response.email,
            })
        });
        AuthOutcome { user, session }
    }
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, BaasError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BaasError::Config(format!("failed to build HTTP client: {e}")))?;

        let mut base_url = config.url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            api_key: config.api_key,
            http,
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, BaasError> {
        self.base_url
            .join(path)
            .map_err(|e| BaasError::Config(format!("invalid Supabase endpoint {path}: {e}")))
    }

    fn auth_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.api_key)
    }

    fn table_request(&self, builder: RequestBuilder, filters: &[Filter]) -> RequestBuilder {
        let query: Vec<(&str, String)> = filters
            .iter()
            .map(|f| (f.column(), f.operand()))
            .collect();
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&query)
    }

    async fn auth_call(&self, path: &str, builder: RequestBuilder) -> Result<Value, BaasError> {
        debug!(path, "Supabase auth request");
        let response = self.auth_request(builder).send().await?;
        read_json(response).await
    }

    async fn table_call(
        &self,
        table: &str,
        builder: RequestBuilder,
        filters: &[Filter],
    ) -> Result<Vec<Value>, BaasError> {
        debug!(table, filters = filters.len(), "Supabase table request");
        let response = self.table_request(builder, filters).send().await?;
        match read_json(response).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(BaasError::InvalidResponse(format!(
                "expected a row array from {table}, got {other}"
            ))),
        }
    }

    fn table_url(&self, table: &str) -> Result<url::Url, BaasError> {
        self.endpoint(&format!("{REST_PATH}/{table}"))
    }
}

#[async_trait]
impl Baas for SupabaseClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        let path = format!("{AUTH_PATH}/signup");
        let builder = self
            .http
            .post(self.endpoint(&path)?)
            .json(&json!({ "email": email, "password": password }));
        let body = self.auth_call(&path, builder).await?;
        parse_auth(body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, BaasError> {
        let path = format!("{AUTH_PATH}/token");
        let builder = self
            .http
            .post(self.endpoint(&path)?)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let body = self.auth_call(&path, builder).await?;
        parse_auth(body)
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), BaasError> {
        let Some(token) = access_token else {
            return Ok(());
        };
        let path = format!("{AUTH_PATH}/logout");
        let builder = self
            .http
            .post(self.endpoint(&path)?)
            .header("Authorization", format!("Bearer {token}"));
        self.auth_call(&path, builder).await.map(|_| ())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), BaasError> {
        let path = format!("{AUTH_PATH}/recover");
        let builder = self
            .http
            .post(self.endpoint(&path)?)
            .json(&json!({ "email": email }));
        self.auth_call(&path, builder).await.map(|_| ())
    }

    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        let builder = self
            .http
            .get(self.table_url(table)?)
            .query(&[("select", "*")]);
        self.table_call(table, builder, filters).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, BaasError> {
        let builder = self
            .http
            .post(self.table_url(table)?)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&row);
        self.table_call(table, builder, &[]).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, BaasError> {
        let builder = self
            .http
            .patch(self.table_url(table)?)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch);
        self.table_call(table, builder, filters).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, BaasError> {
        let builder = self
            .http
            .delete(self.table_url(table)?)
            .header("Prefer", RETURN_REPRESENTATION);
        self.table_call(table, builder, filters).await
    }
}

/// Turn a response into JSON, mapping non-2xx statuses to [`BaasError`].
/// Empty 2xx bodies (e.g. `204 No Content`) read as `null`.
async fn read_json(response: Response) -> Result<Value, BaasError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BaasError::from_response(status, &body));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body)
        .map_err(|e| BaasError::InvalidResponse(format!("invalid JSON: {e}")))
}

fn parse_auth(body: Value) -> Result<AuthOutcome, BaasError> {
    let response: GoTrueResponse = serde_json::from_value(body)
        .map_err(|e| BaasError::InvalidResponse(format!("unexpected auth payload: {e}")))?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        body::Bytes,
        extract::{Query, State},
        http::{HeaderMap, Method, StatusCode, Uri},
        Json, Router,
    };
    use std::collections::HashMap;

    #[test]
    fn parse_auth_accepts_session_payload() {
        let outcome = parse_auth(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": {"id": "u1", "email": "a@b.com"}
        }))
        .expect("session payload parses");

        assert_eq!(outcome.session.unwrap().access_token, "jwt");
        assert_eq!(outcome.user.unwrap().id, "u1");
    }

    #[test]
    fn parse_auth_accepts_bare_user_payload() {
        let outcome = parse_auth(json!({
            "id": "u2",
            "email": "c@d.com",
            "confirmation_sent_at": "2026-01-01T00:00:00Z"
        }))
        .expect("user payload parses");

        assert!(outcome.session.is_none());
        assert_eq!(
            outcome.user,
            Some(AuthUser {
                id: "u2".into(),
                email: Some("c@d.com".into())
            })
        );
    }

    #[test]
    fn endpoint_keeps_project_path_prefix() {
        let config = SupabaseConfig::new(
            "http://localhost:54321/project",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        let client = SupabaseClient::new(config).unwrap();

        assert_eq!(
            client.table_url("profiles").unwrap().as_str(),
            "http://localhost:54321/project/rest/v1/profiles"
        );
    }

    /// One request as the fake Supabase saw it.
    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        path: String,
        query: HashMap<String, String>,
        headers: HeaderMap,
        body: Value,
    }

    impl Recorded {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }
    }

    type Seen = Arc<Mutex<Vec<Recorded>>>;

    async fn fake_supabase(
        State(seen): State<Seen>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("anon") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no apikey"})));
        }
        let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        seen.lock().unwrap().push(Recorded {
            method: method.clone(),
            path: uri.path().to_string(),
            query: query.clone(),
            headers,
            body: body.clone(),
        });

        match (method, uri.path()) {
            (Method::GET, "/rest/v1/profiles") => {
                if query.get("username").map(String::as_str) == Some("eq.alice") {
                    (StatusCode::OK, Json(json!([{"id": "u1", "username": "alice"}])))
                } else {
                    (StatusCode::OK, Json(json!([])))
                }
            }
            (Method::POST, "/rest/v1/profiles") => (StatusCode::CREATED, Json(json!([body]))),
            (Method::PATCH, "/rest/v1/profiles") => (
                StatusCode::OK,
                Json(json!([{"id": "u1", "username": "alice", "bio": body["bio"]}])),
            ),
            (Method::DELETE, "/rest/v1/profiles") => {
                (StatusCode::OK, Json(json!([{"id": "u1", "username": "alice"}])))
            }
            (Method::POST, "/auth/v1/signup") if body["email"] == "pending@b.com" => (
                StatusCode::OK,
                Json(json!({
                    "id": "u2",
                    "email": "pending@b.com",
                    "confirmation_sent_at": "2026-01-01T00:00:00Z"
                })),
            ),
            (Method::POST, "/auth/v1/signup") => (
                StatusCode::OK,
                Json(json!({
                    "access_token": "jwt",
                    "token_type": "bearer",
                    "user": {"id": "u1", "email": body["email"]}
                })),
            ),
            (Method::POST, "/auth/v1/token") => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            ),
            (Method::POST, "/auth/v1/logout") => (StatusCode::NO_CONTENT, Json(Value::Null)),
            (Method::POST, "/auth/v1/recover") => (StatusCode::OK, Json(json!({}))),
            _ => (StatusCode::NOT_FOUND, Json(json!({"message": "no route"}))),
        }
    }

    async fn spawn_fake_supabase() -> (SupabaseClient, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .fallback(fake_supabase)
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config =
            SupabaseConfig::new(&format!("http://{addr}"), "anon", Duration::from_secs(5)).unwrap();
        (SupabaseClient::new(config).unwrap(), seen)
    }

    fn only_request(seen: &Seen) -> Recorded {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "expected exactly one request: {seen:?}");
        seen[0].clone()
    }

    #[tokio::test]
    async fn select_sends_postgrest_filters() {
        let (client, seen) = spawn_fake_supabase().await;

        let rows = client
            .select(
                "profiles",
                &[Filter::eq("username", "alice"), Filter::neq("id", "u9")],
            )
            .await
            .expect("select succeeds");

        assert_eq!(rows, vec![json!({"id": "u1", "username": "alice"})]);
        let request = only_request(&seen);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query.get("select").map(String::as_str), Some("*"));
        assert_eq!(request.query.get("id").map(String::as_str), Some("neq.u9"));
        assert_eq!(request.header("authorization"), Some("Bearer anon"));
    }

    #[tokio::test]
    async fn insert_asks_for_the_stored_row() {
        let (client, seen) = spawn_fake_supabase().await;
        let row = json!({"id": "u1", "username": "alice", "is_premium": false});

        let rows = client
            .insert("profiles", row.clone())
            .await
            .expect("insert succeeds");

        assert_eq!(rows, vec![row.clone()]);
        let request = only_request(&seen);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header("prefer"), Some(RETURN_REPRESENTATION));
        assert!(request.query.is_empty());
        assert_eq!(request.body, row);
    }

    #[tokio::test]
    async fn update_is_scoped_to_the_owner_row() {
        let (client, seen) = spawn_fake_supabase().await;

        let rows = client
            .update("profiles", &[Filter::eq("id", "u1")], json!({"bio": "new"}))
            .await
            .expect("update succeeds");

        assert_eq!(rows[0]["bio"], "new");
        let request = only_request(&seen);
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "/rest/v1/profiles");
        assert_eq!(request.query.get("id").map(String::as_str), Some("eq.u1"));
        assert_eq!(request.query.len(), 1);
        assert_eq!(request.header("prefer"), Some(RETURN_REPRESENTATION));
        assert_eq!(request.header("authorization"), Some("Bearer anon"));
        assert_eq!(request.body, json!({"bio": "new"}));
    }

    #[tokio::test]
    async fn delete_is_scoped_to_the_owner_row() {
        let (client, seen) = spawn_fake_supabase().await;

        let rows = client
            .delete("profiles", &[Filter::eq("id", "u1")])
            .await
            .expect("delete succeeds");

        assert_eq!(rows.len(), 1);
        let request = only_request(&seen);
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.query.get("id").map(String::as_str), Some("eq.u1"));
        assert_eq!(request.query.len(), 1);
        assert_eq!(request.header("prefer"), Some(RETURN_REPRESENTATION));
    }

    #[tokio::test]
    async fn sign_up_handles_both_payload_shapes() {
        let (client, seen) = spawn_fake_supabase().await;

        let confirmed = client.sign_up("a@b.com", "secret").await.unwrap();
        assert_eq!(confirmed.session.unwrap().access_token, "jwt");
        assert_eq!(confirmed.user.unwrap().email.as_deref(), Some("a@b.com"));

        let pending = client.sign_up("pending@b.com", "secret").await.unwrap();
        assert!(pending.session.is_none());
        assert_eq!(pending.user.unwrap().id, "u2");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "/auth/v1/signup");
        assert_eq!(seen[0].body, json!({"email": "a@b.com", "password": "secret"}));
    }

    #[tokio::test]
    async fn sign_in_uses_password_grant() {
        let (client, seen) = spawn_fake_supabase().await;

        let _ = client.sign_in("a@b.com", "wrong").await;

        let request = only_request(&seen);
        assert_eq!(request.path, "/auth/v1/token");
        assert_eq!(
            request.query.get("grant_type").map(String::as_str),
            Some("password")
        );
    }

    #[tokio::test]
    async fn sign_in_failure_surfaces_provider_message() {
        let (client, _) = spawn_fake_supabase().await;

        let err = client
            .sign_in("a@b.com", "wrong")
            .await
            .expect_err("bad credentials are rejected");

        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(err.is_invalid_credentials());
    }

    #[tokio::test]
    async fn password_reset_posts_to_recover() {
        let (client, seen) = spawn_fake_supabase().await;

        client
            .send_password_reset("a@b.com")
            .await
            .expect("reset accepted");

        let request = only_request(&seen);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/auth/v1/recover");
        assert_eq!(request.body, json!({"email": "a@b.com"}));
    }

    #[tokio::test]
    async fn sign_out_forwards_the_user_token() {
        let (client, seen) = spawn_fake_supabase().await;

        client
            .sign_out(Some("user-jwt"))
            .await
            .expect("session revoked");

        let request = only_request(&seen);
        assert_eq!(request.path, "/auth/v1/logout");
        assert_eq!(request.header("authorization"), Some("Bearer user-jwt"));
        assert_eq!(request.header("apikey"), Some("anon"));
    }

    #[tokio::test]
    async fn sign_out_without_token_is_a_no_op() {
        let (client, seen) = spawn_fake_supabase().await;

        client.sign_out(None).await.expect("nothing to revoke");

        assert!(seen.lock().unwrap().is_empty());
    }
}
