//! Radix-trie HTTP routing core.
//!
//! Routes are registered per method into a compressed prefix tree supporting
//! static segments, `:name` parameters and trailing `*name` catch-alls, then
//! matched with priority-ordered traversal and bounded backtracking. Matched
//! requests run an ordered handler chain on a pooled [`Context`] with
//! cooperative flow control (`next` / `abort`).
//!
//! ```rust
//! use arbor_http_server::{handler, method, Dispatch, Request, Router, Server};
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/:id", vec![handler(|ctx| {
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         ctx.string(200, &id);
//!     })])
//!     .unwrap();
//!
//! let server = Server::new(router);
//! match server.dispatch(Request::new(method::GET, "/users/42")) {
//!     Dispatch::Handled(res) => assert_eq!(res.body, b"42"),
//!     Dispatch::NotFound { .. } => unreachable!(),
//! }
//! ```

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod logging;
pub mod method;
pub mod render;
pub mod request;
pub mod response;
pub mod router;

pub use config::ServerConfig;
pub use context::store::{Store, StoreError};
pub use context::Context;
pub use dispatcher::{Dispatch, RedirectHint, Server};
pub use handler::{handler, Handler, HandlersChain, MAX_CHAIN_LEN};
pub use render::Render;
pub use request::Request;
pub use response::{Response, ResponseWriter};
pub use router::errors::RegistrationError;
pub use router::params::{Param, Params};
pub use router::{Lookup, RouteGroup, RouteMatch, Router};

/// Hash map used throughout the crate.
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V>;
