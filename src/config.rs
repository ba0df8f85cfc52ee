//! Serving-phase options.

/// Dispatch behavior knobs. All advisory behavior stays advisory: redirect
/// options only control whether hints are computed, never an automatic
/// redirect.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Compute a redirect hint when the path with its trailing slash toggled
    /// is registered (301 for GET, 307 otherwise).
    pub redirect_trailing_slash: bool,
    /// On a miss, clean the path (`..`, duplicate slashes) and try an
    /// ASCII-case-insensitive walk; hint 301 for GET, 308 otherwise.
    pub redirect_fixed_path: bool,
    /// Clean superfluous slashes before matching.
    pub remove_extra_slash: bool,
    /// Percent-decode captured parameter values.
    pub unescape_path_values: bool,
    /// Upper bound on pooled idle contexts.
    pub context_pool_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            redirect_trailing_slash: true,
            redirect_fixed_path: false,
            remove_extra_slash: false,
            unescape_path_values: true,
            context_pool_capacity: 1024,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    pub fn with_redirect_fixed_path(mut self, enabled: bool) -> Self {
        self.redirect_fixed_path = enabled;
        self
    }

    pub fn with_remove_extra_slash(mut self, enabled: bool) -> Self {
        self.remove_extra_slash = enabled;
        self
    }

    pub fn with_unescape_path_values(mut self, enabled: bool) -> Self {
        self.unescape_path_values = enabled;
        self
    }

    pub fn with_context_pool_capacity(mut self, capacity: usize) -> Self {
        self.context_pool_capacity = capacity;
        self
    }
}
