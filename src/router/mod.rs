//! Method-keyed radix routing table.
//!
//! One tree per HTTP method, built single-threaded before serving and only
//! read afterwards. Patterns support static segments, `:name` params (one
//! segment) and a trailing `*name` catch-all; at any position static branches
//! win over the param branch, which wins over the catch-all.

pub mod errors;
pub mod params;

mod find;
mod group;
mod insert;
mod node;
pub(crate) mod path;

pub use group::RouteGroup;

use crate::handler::{chain_from, combine_chains, Handler, HandlersChain, MAX_CHAIN_LEN};
use crate::method;
use crate::router::errors::RegistrationError;
use crate::router::node::Node;
use crate::router::params::Params;

/// One method's tree. The set is scanned linearly; method counts are small
/// and bounded.
struct MethodTree {
    method: String,
    root: Node,
}

/// Result of a successful lookup: the chain exactly as registered (shared,
/// not copied), the ordered captures, and the canonical registered pattern.
pub struct RouteMatch {
    pub handlers: HandlersChain,
    pub params: Params,
    pub full_path: String,
}

/// Lookup outcome. Not-found is a normal result, never an error; the
/// trailing-slash flag is an advisory hint, nothing more.
pub enum Lookup {
    Matched(RouteMatch),
    NotFound { trailing_slash: bool },
}

/// Internal search result; captures land in the caller's buffer.
pub(crate) enum TreeHit {
    Found {
        handlers: HandlersChain,
        full_path: String,
    },
    Miss {
        tsr: bool,
    },
}

/// The routing table. Also acts as the root route group: middleware added
/// with [`Router::use_middleware`] runs ahead of every route registered
/// afterwards.
#[derive(Default)]
pub struct Router {
    trees: Vec<MethodTree>,
    global_handlers: Vec<Handler>,
    max_params: usize,
}

impl Router {
    pub fn new() -> Self {
        Self {
            trees: Vec::with_capacity(method::ALL.len()),
            global_handlers: Vec::new(),
            max_params: 0,
        }
    }

    /// Append middleware combined into every route registered from now on.
    pub fn use_middleware(&mut self, handlers: Vec<Handler>) -> &mut Self {
        self.global_handlers.extend(handlers);
        self
    }

    /// Open a registration scope under `prefix`; inherits the global
    /// middleware as it is right now.
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        let base = path::join_paths("/", prefix);
        let handlers = self.global_handlers.clone();
        RouteGroup::new(self, base, handlers)
    }

    /// Register `handlers` for `method` and `pattern`. The pattern must be
    /// absolute; `:name` binds one segment, a final `*name` binds the rest.
    pub fn add_route(
        &mut self,
        method: &str,
        pattern: &str,
        handlers: Vec<Handler>,
    ) -> Result<(), RegistrationError> {
        let combined = combine_chains(&self.global_handlers, handlers);
        self.register(method, pattern, combined)
    }

    pub fn get(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::GET, pattern, handlers)
    }

    pub fn post(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::POST, pattern, handlers)
    }

    pub fn put(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::PUT, pattern, handlers)
    }

    pub fn patch(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::PATCH, pattern, handlers)
    }

    pub fn delete(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::DELETE, pattern, handlers)
    }

    pub fn head(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::HEAD, pattern, handlers)
    }

    pub fn options(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        self.add_route(method::OPTIONS, pattern, handlers)
    }

    /// Register the same handlers under every standard method.
    pub fn any(&mut self, pattern: &str, handlers: Vec<Handler>) -> Result<(), RegistrationError> {
        for m in method::ALL {
            self.add_route(m, pattern, handlers.clone())?;
        }
        Ok(())
    }

    /// Validated insertion of an already combined chain.
    pub(crate) fn register(
        &mut self,
        method: &str,
        pattern: &str,
        handlers: Vec<Handler>,
    ) -> Result<(), RegistrationError> {
        if method.is_empty() {
            return Err(RegistrationError::EmptyMethod);
        }
        if !method::is_valid(method) {
            return Err(RegistrationError::InvalidMethod {
                method: method.to_string(),
            });
        }
        if !pattern.starts_with('/') {
            return Err(RegistrationError::PathMissingLeadingSlash {
                path: pattern.to_string(),
            });
        }
        if !pattern.is_ascii() {
            return Err(RegistrationError::PathNotAscii {
                path: pattern.to_string(),
            });
        }
        if handlers.is_empty() {
            return Err(RegistrationError::EmptyHandlerChain {
                path: pattern.to_string(),
            });
        }
        if handlers.len() >= MAX_CHAIN_LEN {
            return Err(RegistrationError::ChainTooLong {
                path: pattern.to_string(),
                len: handlers.len(),
            });
        }

        tracing::debug!(method, pattern, handlers = handlers.len(), "route registered");

        let chain = chain_from(handlers);
        let root = self.tree_root(method);
        root.add_route(pattern, chain)?;

        self.max_params = self.max_params.max(path::count_params(pattern));
        Ok(())
    }

    fn tree_root(&mut self, method: &str) -> &mut Node {
        if let Some(pos) = self.trees.iter().position(|t| t.method == method) {
            return &mut self.trees[pos].root;
        }
        let mut root = Node::default();
        root.full_path = "/".to_string();
        self.trees.push(MethodTree {
            method: method.to_string(),
            root,
        });
        &mut self.trees.last_mut().expect("tree just pushed").root
    }

    /// Match `path` under `method`. Pure read; captures are returned owned.
    pub fn lookup(&self, method: &str, path: &str) -> Lookup {
        let mut params = Params::with_capacity(self.max_params);
        match self.search(method, path, &mut params, false) {
            TreeHit::Found {
                handlers,
                full_path,
            } => Lookup::Matched(RouteMatch {
                handlers,
                params,
                full_path,
            }),
            TreeHit::Miss { tsr } => Lookup::NotFound {
                trailing_slash: tsr,
            },
        }
    }

    /// Match into a caller-owned capture buffer (the pooled context's).
    pub(crate) fn search(
        &self,
        method: &str,
        path: &str,
        params: &mut Params,
        unescape: bool,
    ) -> TreeHit {
        params.reserve(self.max_params.saturating_sub(params.len()));
        for tree in &self.trees {
            if tree.method != method {
                continue;
            }
            let value = tree.root.get_value(path, params, unescape);
            return match value.handlers {
                Some(handlers) => TreeHit::Found {
                    handlers,
                    full_path: value.full_path,
                },
                None => TreeHit::Miss { tsr: value.tsr },
            };
        }
        TreeHit::Miss { tsr: false }
    }

    /// Registered spelling of `path` under `method` when they differ only by
    /// ASCII case (and optionally a trailing slash). Advisory; read-only.
    pub fn case_insensitive_path(
        &self,
        method: &str,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        self.trees
            .iter()
            .find(|t| t.method == method)
            .and_then(|t| t.root.find_case_insensitive(path, fix_trailing_slash))
    }

    pub(crate) fn max_params(&self) -> usize {
        self.max_params
    }
}
