//! Request entry point: pooled context lifecycle around tree lookup and
//! chain execution.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::ServerConfig;
use crate::context::pool::ContextPool;
use crate::method;
use crate::request::Request;
use crate::response::Response;
use crate::router::path::clean_path;
use crate::router::{Router, TreeHit};

const NOT_FOUND_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Advisory redirect computed on a miss. Surfaced to the embedding layer,
/// never applied here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHint {
    pub location: String,
    pub status: u16,
}

/// Outcome of one dispatch.
#[derive(Debug)]
pub enum Dispatch {
    Handled(Response),
    NotFound {
        response: Response,
        redirect: Option<RedirectHint>,
    },
}

/// Owns the frozen routing table and the context pool. Construction is the
/// freeze point: the router moves in, and from then on only shared reads
/// reach the trees, so concurrent dispatch needs no locking.
pub struct Server {
    router: Router,
    pool: ContextPool,
    config: ServerConfig,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Self::with_config(router, ServerConfig::default())
    }

    pub fn with_config(router: Router, config: ServerConfig) -> Self {
        let pool = ContextPool::new(config.context_pool_capacity, router.max_params());
        Self {
            router,
            pool,
            config,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Route one request and run its chain. The pooled context is recycled
    /// on every exit path, including a panicking handler.
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method, path = %request.path))]
    pub fn dispatch(&self, request: Request) -> Dispatch {
        let mut ctx = self.pool.acquire();
        ctx.reset();

        let method = request.method.clone();
        let mut path = request.path.clone();
        if self.config.remove_extra_slash {
            path = clean_path(&path);
        }
        ctx.begin(request);

        let hit = self.router.search(
            &method,
            &path,
            ctx.params_mut(),
            self.config.unescape_path_values,
        );

        match hit {
            TreeHit::Found {
                handlers,
                full_path,
            } => {
                ctx.install(handlers, full_path);
                let run = catch_unwind(AssertUnwindSafe(|| ctx.next()));
                if run.is_err() {
                    tracing::error!(%method, %path, "handler panicked; responding 500");
                    if !ctx.writer().written() {
                        ctx.writer().write_header(500);
                    }
                }
                let response = ctx.finish();
                self.pool.release(ctx);
                Dispatch::Handled(response)
            }
            TreeHit::Miss { tsr } => {
                self.pool.release(ctx);
                let redirect = self.redirect_hint(&method, &path, tsr);
                tracing::debug!(%method, %path, hint = redirect.is_some(), "no route matched");
                Dispatch::NotFound {
                    response: not_found_response(&path),
                    redirect,
                }
            }
        }
    }

    fn redirect_hint(&self, method: &str, path: &str, tsr: bool) -> Option<RedirectHint> {
        if path == "/" {
            return None;
        }

        if tsr && self.config.redirect_trailing_slash {
            let location = if path.len() > 1 && path.ends_with('/') {
                path[..path.len() - 1].to_string()
            } else {
                format!("{path}/")
            };
            let status = if method == method::GET { 301 } else { 307 };
            return Some(RedirectHint { location, status });
        }

        if self.config.redirect_fixed_path {
            let cleaned = clean_path(path);
            if let Some(fixed) = self.router.case_insensitive_path(
                method,
                &cleaned,
                self.config.redirect_trailing_slash,
            ) {
                let status = if method == method::GET { 301 } else { 308 };
                return Some(RedirectHint {
                    location: fixed,
                    status,
                });
            }
        }

        None
    }
}

fn not_found_response(path: &str) -> Response {
    let mut response = Response::default();
    response.status = 404;
    response
        .headers
        .insert("Content-Type".to_string(), NOT_FOUND_CONTENT_TYPE.to_string());
    response.body = format!("404 NOT FOUND: {path}\n").into_bytes();
    response
}
