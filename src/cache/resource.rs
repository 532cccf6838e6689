// SPDX-License-Identifier: MPL-2.0

use crate::api::response::{decode_list, decode_one};
use crate::api::{
    ApiRequest, Backend, BlogPost, NewWriter, PostFilter, PostList, PostPayload, RemoteError,
    Resource, WriterList, WriterRecord, WriterUpdate,
};
use crate::cache::signature::{QuerySignature, Tag, invalidates};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A query result in its normalized shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Posts(PostList),
    Post(BlogPost),
    Writers(WriterList),
    Writer(WriterRecord),
}

impl CachedValue {
    fn decode(signature: &QuerySignature, body: Value) -> Result<Self, RemoteError> {
        let resource = signature.resource();
        match signature {
            QuerySignature::ListPosts(_) => Ok(CachedValue::Posts(PostList {
                blogs: decode_list(resource, body)?,
            })),
            QuerySignature::ListWriters => Ok(CachedValue::Writers(WriterList {
                writers: decode_list(resource, body)?,
            })),
            QuerySignature::GetPost(_) => decode_one(resource, body)?
                .map(CachedValue::Post)
                .ok_or_else(|| RemoteError::invalid_response("no blog in response")),
            QuerySignature::GetWriter(_) => decode_one(resource, body)?
                .map(CachedValue::Writer)
                .ok_or_else(|| RemoteError::invalid_response("no writer in response")),
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, RemoteError>>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

/// Stored results kept before the least recently used is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

struct Entry {
    value: CachedValue,
    last_used: u64,
}

struct CacheState {
    entries: HashMap<QuerySignature, Entry>,
    in_flight: HashMap<QuerySignature, InFlight>,
    next_request: u64,
    clock: u64,
    max_entries: usize,
}

impl CacheState {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            next_request: 0,
            clock: 0,
            max_entries: max_entries.max(1),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn hit(&mut self, signature: &QuerySignature) -> Option<CachedValue> {
        let now = self.tick();
        let entry = self.entries.get_mut(signature)?;
        entry.last_used = now;
        Some(entry.value.clone())
    }

    fn store(&mut self, signature: QuerySignature, value: CachedValue) {
        let last_used = self.tick();
        self.entries.insert(signature, Entry { value, last_used });

        while self.entries.len() > self.max_entries {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(sig, _)| sig.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
            tracing::debug!(signature = %oldest, "evicted least recently used");
        }
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Client-side cache of posts and writers.
///
/// Queries are served from memory until a mutation invalidates them.
/// Concurrent queries for the same signature share one request. Backend
/// errors are handed to every waiter and never stored. At most
/// [`DEFAULT_MAX_ENTRIES`] results are kept unless configured otherwise.
pub struct ResourceCache<B> {
    backend: Arc<B>,
    state: Arc<Mutex<CacheState>>,
}

impl<B> Clone for ResourceCache<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: Backend> ResourceCache<B> {
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<B>) -> Self {
        Self::with_max_entries(backend, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(backend: Arc<B>, max_entries: usize) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(CacheState::new(max_entries))),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn list_posts(&self, filter: &PostFilter) -> Result<PostList, RemoteError> {
        match self.query(QuerySignature::ListPosts(filter.clone())).await? {
            CachedValue::Posts(list) => Ok(list),
            other => Err(mismatch(&other)),
        }
    }

    pub async fn get_post(&self, id: &str) -> Result<BlogPost, RemoteError> {
        match self.query(QuerySignature::GetPost(id.to_string())).await? {
            CachedValue::Post(post) => Ok(post),
            other => Err(mismatch(&other)),
        }
    }

    pub async fn list_writers(&self) -> Result<WriterList, RemoteError> {
        match self.query(QuerySignature::ListWriters).await? {
            CachedValue::Writers(list) => Ok(list),
            other => Err(mismatch(&other)),
        }
    }

    pub async fn get_writer(&self, id: &str) -> Result<WriterRecord, RemoteError> {
        match self.query(QuerySignature::GetWriter(id.to_string())).await? {
            CachedValue::Writer(writer) => Ok(writer),
            other => Err(mismatch(&other)),
        }
    }

    /// Returns the created post when the backend echoes it.
    pub async fn create_post(
        &self,
        payload: &PostPayload,
    ) -> Result<Option<BlogPost>, RemoteError> {
        let request = ApiRequest::post(Resource::Blog.endpoint(), encode(payload)?);
        let body = self.mutate(request, &invalidates::create_post()).await?;
        decode_one(Resource::Blog, body)
    }

    pub async fn update_post(
        &self,
        id: &str,
        payload: &PostPayload,
    ) -> Result<Option<BlogPost>, RemoteError> {
        let request = ApiRequest::put(item_path(Resource::Blog, id), encode(payload)?);
        let body = self.mutate(request, &invalidates::change_post(id)).await?;
        decode_one(Resource::Blog, body)
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), RemoteError> {
        let request = ApiRequest::delete(item_path(Resource::Blog, id));
        self.mutate(request, &invalidates::change_post(id)).await?;
        Ok(())
    }

    pub async fn create_writer(
        &self,
        writer: &NewWriter,
    ) -> Result<Option<WriterRecord>, RemoteError> {
        let request = ApiRequest::post(Resource::Writer.endpoint(), encode(writer)?);
        let body = self.mutate(request, &invalidates::create_writer()).await?;
        decode_one(Resource::Writer, body)
    }

    pub async fn update_writer(
        &self,
        id: &str,
        update: &WriterUpdate,
    ) -> Result<Option<WriterRecord>, RemoteError> {
        let request = ApiRequest::put(item_path(Resource::Writer, id), encode(update)?);
        let body = self.mutate(request, &invalidates::change_writer(id)).await?;
        decode_one(Resource::Writer, body)
    }

    pub async fn delete_writer(&self, id: &str) -> Result<(), RemoteError> {
        let request = ApiRequest::delete(item_path(Resource::Writer, id));
        self.mutate(request, &invalidates::change_writer(id)).await?;
        Ok(())
    }

    /// Drop every cached result and in-flight request carrying one of `tags`.
    /// A dropped in-flight request still answers its waiters but is not stored.
    pub fn invalidate(&self, tags: &[Tag]) {
        let mut state = lock(&self.state);
        let before = state.entries.len() + state.in_flight.len();
        state.entries.retain(|sig, _| !sig.is_invalidated_by(tags));
        state.in_flight.retain(|sig, _| !sig.is_invalidated_by(tags));
        let dropped = before - (state.entries.len() + state.in_flight.len());
        tracing::debug!(?tags, dropped, "cache invalidated");
    }

    pub fn is_cached(&self, signature: &QuerySignature) -> bool {
        lock(&self.state).entries.contains_key(signature)
    }

    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.entries.clear();
        state.in_flight.clear();
    }

    async fn mutate(&self, request: ApiRequest, tags: &[Tag]) -> Result<Value, RemoteError> {
        let body = self.backend.request(request).await?;
        self.invalidate(tags);
        Ok(body)
    }

    async fn query(&self, signature: QuerySignature) -> Result<CachedValue, RemoteError> {
        let fetch = {
            let mut state = lock(&self.state);

            if let Some(hit) = state.hit(&signature) {
                tracing::debug!(%signature, "cache hit");
                return Ok(hit);
            }

            if let Some(in_flight) = state.in_flight.get(&signature) {
                tracing::debug!(%signature, "joining in-flight request");
                in_flight.fetch.clone()
            } else {
                state.next_request += 1;
                let id = state.next_request;
                tracing::debug!(%signature, id, "fetching");

                let fetch = Self::fetch(
                    Arc::clone(&self.backend),
                    Arc::clone(&self.state),
                    signature.clone(),
                    id,
                )
                .boxed()
                .shared();
                state.in_flight.insert(
                    signature,
                    InFlight {
                        id,
                        fetch: fetch.clone(),
                    },
                );
                fetch
            }
        };

        fetch.await
    }

    async fn fetch(
        backend: Arc<B>,
        state: Arc<Mutex<CacheState>>,
        signature: QuerySignature,
        id: u64,
    ) -> Result<CachedValue, RemoteError> {
        let result = match backend.request(signature.request()).await {
            Ok(body) => CachedValue::decode(&signature, body),
            Err(e) => Err(e),
        };

        let mut state = lock(&state);
        let still_current = state
            .in_flight
            .get(&signature)
            .is_some_and(|in_flight| in_flight.id == id);

        if still_current {
            state.in_flight.remove(&signature);
            match &result {
                Ok(value) => state.store(signature, value.clone()),
                Err(e) => tracing::debug!(%signature, error = %e, "fetch failed"),
            }
        } else {
            tracing::debug!(%signature, id, "invalidated while in flight, not storing");
        }

        result
    }
}

fn item_path(resource: Resource, id: &str) -> String {
    format!("{}/{}", resource.endpoint(), id)
}

fn encode<T: Serialize>(body: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(body)
        .map_err(|e| RemoteError::network(format!("could not encode request: {e}")))
}

fn mismatch(value: &CachedValue) -> RemoteError {
    RemoteError::invalid_response(format!("unexpected cached value {value:?}"))
}
