//! Buffered response surface.
//!
//! Handlers write into an in-memory head+body buffer; the dispatcher flushes
//! the head once the chain finishes and hands the assembled [`Response`]
//! back to the transport. The writer mirrors the usual deferred-header
//! discipline: the status stays pending until the first body write (or an
//! explicit flush) commits it.

use serde::Serialize;

const DEFAULT_STATUS: u16 = 200;

/// Assembled response, read by the embedding transport.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status: u16,
    pub headers: hashbrown::HashMap<String, String>,
    #[serde(skip)]
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: DEFAULT_STATUS,
            headers: hashbrown::HashMap::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Per-request write surface owned by the pooled context. A detached context
/// copy gets its own independent instance so late writes can never reach the
/// pooled response.
#[derive(Debug)]
pub struct ResponseWriter {
    status: u16,
    headers: hashbrown::HashMap<String, String>,
    body: Vec<u8>,
    committed: bool,
    detached: bool,
}

impl ResponseWriter {
    pub(crate) fn new() -> Self {
        Self {
            status: DEFAULT_STATUS,
            headers: hashbrown::HashMap::new(),
            body: Vec::new(),
            committed: false,
            detached: false,
        }
    }

    /// Independent sink for a detached context copy.
    pub(crate) fn detached() -> Self {
        Self {
            detached: true,
            ..Self::new()
        }
    }

    pub(crate) fn reset(&mut self) {
        self.status = DEFAULT_STATUS;
        self.headers.clear();
        self.body.clear();
        self.committed = false;
    }

    /// Status that is (or will be) committed.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Bytes written into the body so far.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Whether the response head has been committed. Once committed the
    /// status can no longer change.
    pub fn written(&self) -> bool {
        self.committed
    }

    /// Whether this surface belongs to a detached context copy.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Record `code` as the pending status. Ignored after the head is
    /// committed.
    pub fn write_header(&mut self, code: u16) {
        if code > 0 && self.status != code {
            if self.committed {
                tracing::warn!(
                    committed = self.status,
                    requested = code,
                    "status change after response head was written"
                );
                return;
            }
            self.status = code;
        }
    }

    /// Commit the head (status + headers).
    pub fn write_header_now(&mut self) {
        self.committed = true;
    }

    /// Append body bytes, committing the head first.
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.write_header_now();
        self.body.extend_from_slice(data);
        data.len()
    }

    pub fn write_string(&mut self, data: &str) -> usize {
        self.write(data.as_bytes())
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.insert(key.to_string(), value.to_string());
    }

    pub fn remove_header(&mut self, key: &str) {
        self.headers.remove(key);
    }

    /// Move the assembled response out, leaving the writer empty for reuse.
    pub(crate) fn take_response(&mut self) -> Response {
        Response {
            status: self.status,
            headers: std::mem::take(&mut self.headers),
            body: std::mem::take(&mut self.body),
        }
    }
}
