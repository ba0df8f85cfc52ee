//! Per-request state and cooperative chain flow control.

pub(crate) mod pool;
pub mod store;

use std::sync::atomic::Ordering;
use std::time::Instant;

use serde::Serialize;
use url::form_urlencoded;

use crate::handler::HandlersChain;
use crate::render::{body_allowed_for_status, Data, Json, Redirect, Render, Text};
use crate::request::Request;
use crate::response::ResponseWriter;
use crate::router::params::Params;
use self::store::{Store, StoreError};

/// Chain progression. `Aborted` stops future advancement; the currently
/// running handler is never unwound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowState {
    Running,
    Aborted,
}

/// Per-request context handed to every handler in the matched chain.
///
/// Instances are pooled: the same allocation serves many requests, with
/// [`Context::reset`] run between them. Captured params, the chain reference
/// and the key/value store never leak across requests.
pub struct Context {
    request: Request,
    writer: ResponseWriter,
    params: Params,
    handlers: Option<HandlersChain>,
    cursor: isize,
    state: FlowState,
    full_path: String,
    store: Store,
    query_cache: Option<Vec<(String, String)>>,
}

impl Context {
    pub(crate) fn with_params_capacity(capacity: usize) -> Self {
        Self {
            request: Request::default(),
            writer: ResponseWriter::new(),
            params: Params::with_capacity(capacity),
            handlers: None,
            cursor: -1,
            state: FlowState::Running,
            full_path: String::new(),
            store: Store::new(),
            query_cache: None,
        }
    }

    /// Scrub every trace of the previous request. Buffers are truncated, not
    /// reallocated.
    pub(crate) fn reset(&mut self) {
        self.request = Request::default();
        self.writer.reset();
        self.params.clear();
        self.handlers = None;
        self.cursor = -1;
        self.state = FlowState::Running;
        self.full_path.clear();
        self.store.clear();
        self.query_cache = None;
    }

    pub(crate) fn begin(&mut self, request: Request) {
        self.request = request;
    }

    pub(crate) fn install(&mut self, handlers: HandlersChain, full_path: String) {
        self.handlers = Some(handlers);
        self.full_path = full_path;
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub(crate) fn finish(&mut self) -> crate::response::Response {
        self.writer.write_header_now();
        self.writer.take_response()
    }

    /*** flow control ***/

    /// Run the rest of the chain. Called by the dispatcher to start
    /// execution, and by middleware to wrap downstream handlers: code after
    /// the `next()` call runs once everything downstream has returned.
    pub fn next(&mut self) {
        self.cursor += 1;
        loop {
            if self.state == FlowState::Aborted {
                return;
            }
            let Some(handler) = self
                .handlers
                .as_ref()
                .and_then(|chain| chain.get(self.cursor as usize))
                .cloned()
            else {
                return;
            };
            (*handler)(self);
            self.cursor += 1;
        }
    }

    /// Stop future chain progression. Cooperative: the caller's own
    /// remaining code still runs.
    pub fn abort(&mut self) {
        self.state = FlowState::Aborted;
    }

    /// Abort and commit `status` as the response head.
    pub fn abort_with_status(&mut self, status: u16) {
        self.writer.write_header(status);
        self.writer.write_header_now();
        self.abort();
    }

    pub fn is_aborted(&self) -> bool {
        self.state == FlowState::Aborted
    }

    /*** input data ***/

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Captured route parameter, e.g. `"id"` for a `/users/:id` route.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.by_name(key)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Canonical registered pattern of the matched route; for labeling, not
    /// matching.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// First query value for `key`. The query string is parsed once per
    /// request and cached.
    pub fn query(&mut self, key: &str) -> Option<&str> {
        let request = &self.request;
        let cache = self.query_cache.get_or_insert_with(|| {
            form_urlencoded::parse(request.query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        });
        cache
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Request header by name, ASCII-case-insensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.request.header(key)
    }

    /*** key/value store ***/

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Store a value for later handlers in this chain.
    pub fn set<T: std::any::Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.store.set(key, value);
    }

    /// Typed read of a stored value; absence and type mismatch are explicit
    /// errors.
    pub fn get<T: std::any::Any + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<std::sync::Arc<T>, StoreError> {
        self.store.get(key)
    }

    /*** cancellation pass-through ***/

    /// Deadline carried by the underlying request, if any. Pass-through
    /// only; nothing here enforces it.
    pub fn deadline(&self) -> Option<Instant> {
        self.request.deadline
    }

    /// Whether the underlying request was cancelled. Pass-through only.
    pub fn is_cancelled(&self) -> bool {
        self.request
            .cancelled
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    /*** response ***/

    pub fn writer(&mut self) -> &mut ResponseWriter {
        &mut self.writer
    }

    pub fn response_status(&self) -> u16 {
        self.writer.status()
    }

    /// Record the response status (committed when the head is flushed).
    pub fn status(&mut self, code: u16) {
        self.writer.write_header(code);
    }

    /// Set a response header; an empty value removes it.
    pub fn set_header(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.writer.remove_header(key);
        } else {
            self.writer.set_header(key, value);
        }
    }

    /// Run a renderer. Statuses that forbid bodies write the content type
    /// only; a failing renderer is logged and mapped to 500.
    pub fn render<R: Render>(&mut self, code: u16, renderer: R) {
        self.status(code);

        if !body_allowed_for_status(code) {
            renderer.write_content_type(&mut self.writer);
            self.writer.write_header_now();
            return;
        }

        if let Err(err) = renderer.render(&mut self.writer) {
            tracing::error!(error = %err, "response rendering failed");
            if !self.writer.written() {
                self.writer.write_header(500);
            }
            self.abort();
        }
    }

    /// Plain-text response body.
    pub fn string(&mut self, code: u16, body: &str) {
        self.render(code, Text(body));
    }

    /// JSON response body with the matching content type.
    pub fn json<T: Serialize>(&mut self, code: u16, value: &T) {
        self.render(code, Json(value));
    }

    /// Raw bytes with an explicit content type.
    pub fn data(&mut self, code: u16, content_type: &str, data: &[u8]) {
        self.render(code, Data { content_type, data });
    }

    /// Redirect response via the Location header.
    pub fn redirect(&mut self, code: u16, location: &str) {
        self.render(code, Redirect { location });
    }

    /*** detachment ***/

    /// A copy whose lifetime is independent of the pool, for handing to
    /// background work. The store is deep-copied under its own lock, the
    /// response surface is replaced with a detached sink, and the flow state
    /// is terminated so `next()` on the copy is inert.
    pub fn detached_copy(&self) -> Context {
        Context {
            request: self.request.clone(),
            writer: ResponseWriter::detached(),
            params: self.params.clone(),
            handlers: None,
            cursor: self.cursor,
            state: FlowState::Aborted,
            full_path: self.full_path.clone(),
            store: self.store.deep_copy(),
            query_cache: self.query_cache.clone(),
        }
    }
}
