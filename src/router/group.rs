//! Route groups: a shared path prefix plus a shared handler prefix.

use crate::handler::{combine_chains, Handler};
use crate::router::errors::RegistrationError;
use crate::router::path::join_paths;
use crate::router::Router;
use crate::method;

/// A registration scope. Routes added through the group get the group's base
/// path prepended and its handlers run ahead of their own.
pub struct RouteGroup<'r> {
    router: &'r mut Router,
    base_path: String,
    handlers: Vec<Handler>,
}

impl<'r> RouteGroup<'r> {
    pub(crate) fn new(router: &'r mut Router, base_path: String, handlers: Vec<Handler>) -> Self {
        Self {
            router,
            base_path,
            handlers,
        }
    }

    /// The absolute prefix this group registers under.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Append middleware shared by every route registered through this group
    /// from now on.
    pub fn use_middleware(&mut self, handlers: Vec<Handler>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// Derive a nested group. The child inherits this group's handlers as
    /// they are right now.
    pub fn group(&mut self, relative_path: &str) -> RouteGroup<'_> {
        RouteGroup {
            base_path: join_paths(&self.base_path, relative_path),
            handlers: self.handlers.clone(),
            router: &mut *self.router,
        }
    }

    /// Register `handlers` for `method` under the group prefix. The last
    /// handler should be the terminal one; the rest act as middleware.
    pub fn add_route(
        &mut self,
        method: &str,
        relative_path: &str,
        handlers: Vec<Handler>,
    ) -> Result<&mut Self, RegistrationError> {
        let path = join_paths(&self.base_path, relative_path);
        let combined = combine_chains(&self.handlers, handlers);
        self.router.register(method, &path, combined)?;
        Ok(self)
    }

    pub fn get(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::GET, path, handlers)
    }

    pub fn post(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::POST, path, handlers)
    }

    pub fn put(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::PUT, path, handlers)
    }

    pub fn patch(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::PATCH, path, handlers)
    }

    pub fn delete(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::DELETE, path, handlers)
    }

    pub fn head(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::HEAD, path, handlers)
    }

    pub fn options(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        self.add_route(method::OPTIONS, path, handlers)
    }

    /// Register the same handlers for every standard method.
    pub fn any(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self, RegistrationError> {
        for m in method::ALL {
            self.add_route(m, path, handlers.clone())?;
        }
        Ok(self)
    }
}
