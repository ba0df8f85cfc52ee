//! Handler chain types.

use std::sync::Arc;

use crate::context::Context;

/// One unit of request processing. Middleware and terminal handlers share the
/// same shape; a middleware simply calls [`Context::next`] somewhere in its
/// body.
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// The ordered chain bound to a matched route. Shared by reference: the chain
/// a lookup returns is the same allocation registration produced.
pub type HandlersChain = Arc<[Handler]>;

/// Upper bound on a combined chain. Chains at or above this length are
/// rejected at registration time.
pub const MAX_CHAIN_LEN: usize = 63;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn chain_from(handlers: Vec<Handler>) -> HandlersChain {
    Arc::from(handlers)
}

/// Prepend a shared handler prefix (group or global middleware) to a route's
/// own handlers.
pub(crate) fn combine_chains(prefix: &[Handler], handlers: Vec<Handler>) -> Vec<Handler> {
    let mut combined = Vec::with_capacity(prefix.len() + handlers.len());
    combined.extend(prefix.iter().cloned());
    combined.extend(handlers);
    combined
}
