// SPDX-License-Identifier: MPL-2.0

//! In-process stand-in for the REST backend. Serves the same routes with the
//! same status codes, used offline and by the test suites.

use crate::api::{ApiRequest, Backend, RemoteError};
use crate::config::{BLOGS_ENDPOINT, WRITERS_ENDPOINT};
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// How list responses are wrapped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// `[...]`
    #[default]
    Bare,
    /// `{ "blogs": [...] }` / `{ "writers": [...] }`
    Keyed,
    /// `{ "data": [...] }`
    Data,
}

#[derive(Default)]
struct MemoryState {
    blogs: Vec<Map<String, Value>>,
    writers: Vec<Map<String, Value>>,
    next_id: u64,
    log: Vec<(Method, String)>,
    style: ListStyle,
    latency: Option<Duration>,
    fail_next: Option<RemoteError>,
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: ListStyle) -> Self {
        let backend = Self::default();
        backend.state().style = style;
        backend
    }

    /// Delay every response. The body is computed before the delay, so a
    /// slow response can be stale by the time it arrives.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    /// Fail the next request with `error`, then behave normally.
    pub fn fail_next(&self, error: RemoteError) {
        self.state().fail_next = Some(error);
    }

    /// Number of `GET` requests made to `path`.
    pub fn get_count(&self, path: &str) -> usize {
        self.state()
            .log
            .iter()
            .filter(|(m, p)| *m == Method::GET && p == path)
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.state().log.len()
    }

    /// Insert a writer directly, bypassing validation. Returns its id.
    pub fn seed_writer(&self, name: &str, email: &str) -> String {
        let mut state = self.state();
        let mut map = Map::new();
        map.insert("name".into(), Value::String(name.to_string()));
        map.insert("email".into(), Value::String(email.to_string()));
        map.insert("isActive".into(), Value::Bool(true));
        let stored = state.insert(Collection::Writers, map);
        stored["_id"].as_str().unwrap_or_default().to_string()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn respond(&self, request: &ApiRequest) -> Result<Value, RemoteError> {
        let mut state = self.state();
        state.log.push((request.method.clone(), request.path.clone()));

        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }

        let (collection, id) = route(&request.path)?;
        match (&request.method, id) {
            (&Method::GET, None) => {
                let items: Vec<Value> = state
                    .items(collection)
                    .iter()
                    .filter(|item| matches_query(item, &request.query))
                    .cloned()
                    .map(Value::Object)
                    .collect();
                Ok(state.wrap(collection, items))
            }
            (&Method::POST, None) => {
                let body = object_body(request)?;
                collection.validate(&state, &body)?;
                Ok(Value::Object(state.insert(collection, body)))
            }
            (&Method::GET, Some(id)) => state
                .find(collection, id)
                .cloned()
                .map(Value::Object)
                .ok_or_else(|| collection.not_found()),
            (&Method::PUT, Some(id)) => {
                let body = object_body(request)?;
                let now = now();
                let item = state
                    .find_mut(collection, id)
                    .ok_or_else(|| collection.not_found())?;
                for (k, v) in body {
                    if k != "_id" {
                        item.insert(k, v);
                    }
                }
                item.insert("updatedAt".into(), now);
                Ok(Value::Object(item.clone()))
            }
            (&Method::DELETE, Some(id)) => {
                let items = state.items_mut(collection);
                let before = items.len();
                items.retain(|item| item.get("_id").and_then(Value::as_str) != Some(id));
                if items.len() == before {
                    return Err(collection.not_found());
                }
                Ok(json!({ "message": format!("{} deleted", collection.singular()) }))
            }
            _ => Err(RemoteError::new(405, "Method not allowed")),
        }
    }
}

impl Backend for InMemoryBackend {
    async fn request(&self, request: ApiRequest) -> Result<Value, RemoteError> {
        let response = self.respond(&request);
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        response
    }
}

#[derive(Debug, Clone, Copy)]
enum Collection {
    Blogs,
    Writers,
}

impl Collection {
    fn singular(self) -> &'static str {
        match self {
            Collection::Blogs => "Blog",
            Collection::Writers => "Writer",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Collection::Blogs => "blogs",
            Collection::Writers => "writers",
        }
    }

    fn not_found(self) -> RemoteError {
        RemoteError::new(404, format!("{} not found", self.singular()))
    }

    fn validate(self, state: &MemoryState, body: &Map<String, Value>) -> Result<(), RemoteError> {
        let required: &[&str] = match self {
            Collection::Blogs => &["title", "content", "writer"],
            Collection::Writers => &["name", "email"],
        };
        for field in required {
            let present = body
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !present {
                return Err(RemoteError::new(400, format!("{field} is required")));
            }
        }

        if let Collection::Writers = self {
            let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
            let taken = state.writers.iter().any(|w| {
                w.get("email")
                    .and_then(Value::as_str)
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            });
            if taken {
                return Err(RemoteError::new(
                    400,
                    "Writer with this email already exists",
                ));
            }
        }
        Ok(())
    }
}

impl MemoryState {
    fn items(&self, collection: Collection) -> &Vec<Map<String, Value>> {
        match collection {
            Collection::Blogs => &self.blogs,
            Collection::Writers => &self.writers,
        }
    }

    fn items_mut(&mut self, collection: Collection) -> &mut Vec<Map<String, Value>> {
        match collection {
            Collection::Blogs => &mut self.blogs,
            Collection::Writers => &mut self.writers,
        }
    }

    fn find(&self, collection: Collection, id: &str) -> Option<&Map<String, Value>> {
        self.items(collection)
            .iter()
            .find(|item| item.get("_id").and_then(Value::as_str) == Some(id))
    }

    fn find_mut(&mut self, collection: Collection, id: &str) -> Option<&mut Map<String, Value>> {
        self.items_mut(collection)
            .iter_mut()
            .find(|item| item.get("_id").and_then(Value::as_str) == Some(id))
    }

    fn insert(&mut self, collection: Collection, mut body: Map<String, Value>) -> Map<String, Value> {
        self.next_id += 1;
        let prefix = match collection {
            Collection::Blogs => "blog",
            Collection::Writers => "writer",
        };
        body.insert("_id".into(), Value::String(format!("{prefix}-{}", self.next_id)));
        let now = now();
        body.insert("createdAt".into(), now.clone());
        body.insert("updatedAt".into(), now);
        self.items_mut(collection).push(body.clone());
        body
    }

    fn wrap(&self, collection: Collection, items: Vec<Value>) -> Value {
        match self.style {
            ListStyle::Bare => Value::Array(items),
            ListStyle::Keyed => {
                let mut map = Map::new();
                map.insert(collection.key().to_string(), Value::Array(items));
                Value::Object(map)
            }
            ListStyle::Data => json!({ "data": items }),
        }
    }
}

fn route(path: &str) -> Result<(Collection, Option<&str>), RemoteError> {
    let (collection, rest) = if let Some(rest) = path.strip_prefix(BLOGS_ENDPOINT) {
        (Collection::Blogs, rest)
    } else if let Some(rest) = path.strip_prefix(WRITERS_ENDPOINT) {
        (Collection::Writers, rest)
    } else {
        return Err(RemoteError::new(404, format!("no route for {path}")));
    };

    match rest.strip_prefix('/') {
        None if rest.is_empty() => Ok((collection, None)),
        Some(id) if !id.is_empty() && !id.contains('/') => Ok((collection, Some(id))),
        _ => Err(RemoteError::new(404, format!("no route for {path}"))),
    }
}

fn matches_query(item: &Map<String, Value>, query: &[(String, String)]) -> bool {
    query.iter().all(|(key, expected)| match key.as_str() {
        "writer" => item.get("writer").and_then(Value::as_str) == Some(expected.as_str()),
        "tag" => item
            .get("tags")
            .and_then(Value::as_array)
            .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(expected.as_str()))),
        "isPublished" => {
            item.get("isPublished").and_then(Value::as_bool).unwrap_or(false).to_string()
                == *expected
        }
        _ => true,
    })
}

fn object_body(request: &ApiRequest) -> Result<Map<String, Value>, RemoteError> {
    match &request.body {
        Some(Value::Object(map)) => Ok(map.clone()),
        _ => Err(RemoteError::new(400, "expected a JSON object body")),
    }
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crud_round() {
        let backend = InMemoryBackend::with_style(ListStyle::Keyed);
        let created = backend
            .request(ApiRequest::post(
                "/blog",
                json!({ "title": "T", "content": "C", "writer": "w1" }),
            ))
            .await
            .unwrap();
        let id = created["_id"].as_str().unwrap().to_string();

        let listed = backend.request(ApiRequest::get("/blog")).await.unwrap();
        assert_eq!(listed["blogs"].as_array().unwrap().len(), 1);

        let updated = backend
            .request(ApiRequest::put(format!("/blog/{id}"), json!({ "title": "T2" })))
            .await
            .unwrap();
        assert_eq!(updated["title"], "T2");
        assert_eq!(updated["content"], "C");

        backend
            .request(ApiRequest::delete(format!("/blog/{id}")))
            .await
            .unwrap();
        let err = backend
            .request(ApiRequest::get(format!("/blog/{id}")))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn duplicate_writer_email_rejected() {
        let backend = InMemoryBackend::new();
        backend.seed_writer("Ada", "ada@example.com");
        let err = backend
            .request(ApiRequest::post(
                "/writer",
                json!({ "name": "Other", "email": "ADA@example.com" }),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn list_filters_by_writer() {
        let backend = InMemoryBackend::new();
        for writer in ["w1", "w2", "w1"] {
            backend
                .request(ApiRequest::post(
                    "/blog",
                    json!({ "title": "T", "content": "C", "writer": writer }),
                ))
                .await
                .unwrap();
        }
        let listed = backend
            .request(
                ApiRequest::get("/blog").with_query(vec![("writer".into(), "w1".into())]),
            )
            .await
            .unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }
}
