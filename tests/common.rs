#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use arbor_http_server::{handler, Handler};

/// Shared execution log for ordering assertions.
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

/// Handler that appends `tag` to the log and nothing else.
pub fn recording(tag: &str, trace: &Trace) -> Handler {
    let trace = Arc::clone(trace);
    let tag = tag.to_string();
    handler(move |_ctx| {
        trace.lock().unwrap().push(tag.clone());
    })
}

/// Wrap-style middleware: logs `<tag>:before`, runs downstream, logs
/// `<tag>:after`.
pub fn wrapping(tag: &str, trace: &Trace) -> Handler {
    let trace = Arc::clone(trace);
    let tag = tag.to_string();
    handler(move |ctx| {
        trace.lock().unwrap().push(format!("{tag}:before"));
        ctx.next();
        trace.lock().unwrap().push(format!("{tag}:after"));
    })
}

/// Terminal handler writing a fixed plain-text body.
pub fn ok(body: &str) -> Handler {
    let body = body.to_string();
    handler(move |ctx| {
        ctx.string(200, &body);
    })
}
