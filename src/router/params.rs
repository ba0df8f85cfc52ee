//! Captured route parameters.

use serde::Serialize;
use smallvec::SmallVec;

/// A single captured parameter. `key` is the name from the route pattern
/// (without the `:`/`*` marker), `value` the matched path slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// Ordered parameter captures, left to right in pattern order.
///
/// The buffer lives inside a pooled context and is cleared by truncation
/// between requests, so capacity survives reuse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Params(SmallVec<[Param; 4]>);

impl Params {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(SmallVec::with_capacity(capacity))
    }

    /// Value for `key`, or `None` if the pattern did not bind it.
    pub fn by_name(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, key: String, value: String) {
        self.0.push(Param { key, value });
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_returns_first_binding() {
        let mut params = Params::new();
        params.push("id".into(), "42".into());
        params.push("rest".into(), "a/b".into());
        assert_eq!(params.by_name("id"), Some("42"));
        assert_eq!(params.by_name("rest"), Some("a/b"));
        assert_eq!(params.by_name("missing"), None);
    }

    #[test]
    fn clear_keeps_order_semantics() {
        let mut params = Params::new();
        params.push("a".into(), "1".into());
        params.clear();
        assert!(params.is_empty());
        params.push("b".into(), "2".into());
        assert_eq!(params.iter().next().map(|p| p.key.as_str()), Some("b"));
    }
}
