//! Route lookup: priority-ordered traversal with bounded backtracking, plus
//! the advisory walks for trailing-slash and case-corrected alternates.

use percent_encoding::percent_decode_str;

use crate::handler::HandlersChain;
use crate::router::node::{Node, NodeKind};
use crate::router::params::Params;

/// Result of a tree walk. `handlers` is `None` for a miss; `tsr` then flags
/// that the same path with its trailing slash toggled would have matched.
pub(crate) struct NodeValue {
    pub(crate) handlers: Option<HandlersChain>,
    pub(crate) full_path: String,
    pub(crate) tsr: bool,
}

/// Internal walk outcome. `backtrack` distinguishes dead ends an ancestor
/// wildcard may still rescue from hard stops (a trailing-slash hint or a
/// wildcard's own failure ends the walk outright).
enum WalkOutcome<'t> {
    Match {
        handlers: &'t HandlersChain,
        full_path: &'t str,
    },
    Dead {
        tsr: bool,
        backtrack: bool,
    },
}

fn decode_value(raw: &str, unescape: bool) -> String {
    if !unescape {
        return raw.to_string();
    }
    percent_decode_str(raw)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn eq_ascii_ci(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes()
            .zip(b.bytes())
            .all(|(x, y)| x.eq_ignore_ascii_case(&y))
}

fn ci_starts_with(hay: &str, prefix: &str) -> bool {
    hay.len() >= prefix.len()
        && hay
            .as_bytes()
            .iter()
            .zip(prefix.as_bytes())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

impl Node {
    /// Match `path` against the subtree, writing captures into `params`.
    pub(crate) fn get_value(&self, path: &str, params: &mut Params, unescape: bool) -> NodeValue {
        match self.walk(path, params, unescape) {
            WalkOutcome::Match {
                handlers,
                full_path,
            } => NodeValue {
                handlers: Some(handlers.clone()),
                full_path: full_path.to_string(),
                tsr: false,
            },
            WalkOutcome::Dead { tsr, .. } => NodeValue {
                handlers: None,
                full_path: String::new(),
                tsr,
            },
        }
    }

    fn walk<'t>(&'t self, path: &str, params: &mut Params, unescape: bool) -> WalkOutcome<'t> {
        let prefix = self.path.as_str();

        // Byte comparison before slicing: patterns are ASCII, request paths
        // need not be, and a slice at a non-boundary would panic.
        if path.len() > prefix.len() && path.as_bytes().starts_with(prefix.as_bytes()) {
            let rest = &path[prefix.len()..];
            let idxc = rest.as_bytes()[0];

            // Static children first, selected by first byte.
            if let Some(pos) = self.indices.iter().position(|&b| b == idxc) {
                let saved = params.len();
                match self.children[pos].walk(rest, params, unescape) {
                    outcome @ WalkOutcome::Match { .. } => return outcome,
                    outcome @ WalkOutcome::Dead {
                        backtrack: false, ..
                    } => return outcome,
                    WalkOutcome::Dead {
                        tsr,
                        backtrack: true,
                    } => {
                        // Undo captures from the abandoned branch; the hint
                        // survives only if no wildcard alternative exists.
                        params.truncate(saved);
                        if !self.wild_child {
                            return WalkOutcome::Dead {
                                tsr,
                                backtrack: true,
                            };
                        }
                    }
                }
            } else if !self.wild_child {
                // Dead end between segments. A bare '/' remainder means the
                // path without it is registered here; nothing above can
                // rescue that, so the walk stops either way.
                if rest == "/" {
                    return WalkOutcome::Dead {
                        tsr: self.handlers.is_some(),
                        backtrack: false,
                    };
                }
                return WalkOutcome::Dead {
                    tsr: false,
                    backtrack: true,
                };
            }

            return self.walk_wildcard(rest, params, unescape);
        }

        if path == prefix {
            if let Some(handlers) = &self.handlers {
                return WalkOutcome::Match {
                    handlers,
                    full_path: &self.full_path,
                };
            }
            // No chain here; an ancestor wildcard may still match. The bare
            // '/' never backtracks.
            return WalkOutcome::Dead {
                tsr: self.trailing_slash_hint(path),
                backtrack: path != "/",
            };
        }

        // Prefix mismatch, or the path ran out inside this fragment. The one
        // recommendation possible here: the registered path is this fragment
        // plus a trailing slash.
        let tsr = path == "/"
            || (prefix.len() == path.len() + 1
                && prefix.as_bytes()[path.len()] == b'/'
                && path == &prefix[..path.len()]
                && self.handlers.is_some());
        WalkOutcome::Dead {
            tsr,
            backtrack: !tsr && path != "/",
        }
    }

    fn walk_wildcard<'t>(
        &'t self,
        rest: &str,
        params: &mut Params,
        unescape: bool,
    ) -> WalkOutcome<'t> {
        let Some(child) = self.children.last() else {
            return WalkOutcome::Dead {
                tsr: false,
                backtrack: false,
            };
        };

        match child.kind {
            NodeKind::Param => {
                // A param consumes exactly one segment.
                let end = rest.find('/').unwrap_or(rest.len());
                params.push(
                    child.path[1..].to_string(),
                    decode_value(&rest[..end], unescape),
                );

                if end < rest.len() {
                    if child.children.is_empty() {
                        return WalkOutcome::Dead {
                            tsr: rest.len() == end + 1,
                            backtrack: false,
                        };
                    }
                    return child.children[0].walk(&rest[end..], params, unescape);
                }

                if let Some(handlers) = &child.handlers {
                    return WalkOutcome::Match {
                        handlers,
                        full_path: &child.full_path,
                    };
                }
                if child.children.len() == 1 {
                    let grandchild = &child.children[0];
                    let tsr = (grandchild.path == "/" && grandchild.handlers.is_some())
                        || (grandchild.path.is_empty() && grandchild.indices == [b'/']);
                    return WalkOutcome::Dead {
                        tsr,
                        backtrack: false,
                    };
                }
                WalkOutcome::Dead {
                    tsr: false,
                    backtrack: false,
                }
            }
            NodeKind::CatchAll => {
                // Captures the remainder without the leading separator.
                let value = rest.strip_prefix('/').unwrap_or(rest);
                params.push(child.path[2..].to_string(), decode_value(value, unescape));

                match &child.handlers {
                    Some(handlers) => WalkOutcome::Match {
                        handlers,
                        full_path: &child.full_path,
                    },
                    None => WalkOutcome::Dead {
                        tsr: false,
                        backtrack: false,
                    },
                }
            }
            NodeKind::Static | NodeKind::Root => {
                debug_assert!(false, "wildcard child must be a param or catch-all node");
                WalkOutcome::Dead {
                    tsr: false,
                    backtrack: false,
                }
            }
        }
    }

    /// Trailing-slash recommendation when the path ended exactly on a node
    /// without a chain.
    fn trailing_slash_hint(&self, path: &str) -> bool {
        if path == "/" && self.wild_child && self.kind != NodeKind::Root {
            return true;
        }
        if path == "/" && self.kind == NodeKind::Static {
            return true;
        }
        if let Some(pos) = self.indices.iter().position(|&b| b == b'/') {
            let child = &self.children[pos];
            return (child.path.len() == 1 && child.handlers.is_some())
                || (child.kind == NodeKind::CatchAll && child.children[0].handlers.is_some());
        }
        false
    }

    /// ASCII-case-insensitive walk producing the registered spelling of a
    /// path that differs only by letter case (and, when `fix_trailing_slash`
    /// is set, by a trailing slash). Param and catch-all captures are copied
    /// from the request verbatim. Read-only; used for advisory hints.
    pub(crate) fn find_case_insensitive(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
        self.ci_walk(path, fix_trailing_slash, String::with_capacity(path.len() + 1))
    }

    fn ci_walk(&self, path: &str, fix: bool, mut out: String) -> Option<String> {
        let prefix = self.path.as_str();

        if ci_starts_with(path, prefix) {
            out.push_str(prefix);
            let rest = &path[prefix.len()..];

            if rest.is_empty() {
                if self.handlers.is_some() {
                    return Some(out);
                }
                if fix {
                    if let Some(pos) = self.indices.iter().position(|&b| b == b'/') {
                        let child = &self.children[pos];
                        if (child.path == "/" && child.handlers.is_some())
                            || (child.kind == NodeKind::CatchAll
                                && child.children[0].handlers.is_some())
                        {
                            out.push('/');
                            return Some(out);
                        }
                    }
                }
                return None;
            }

            let idxc = rest.as_bytes()[0];
            for (pos, &b) in self.indices.iter().enumerate() {
                if b.eq_ignore_ascii_case(&idxc) {
                    if let Some(found) = self.children[pos].ci_walk(rest, fix, out.clone()) {
                        return Some(found);
                    }
                }
            }

            if self.wild_child {
                let child = self.children.last().expect("wildcard child present");
                match child.kind {
                    NodeKind::Param => {
                        let end = rest.find('/').unwrap_or(rest.len());
                        out.push_str(&rest[..end]);

                        if end < rest.len() {
                            if !child.children.is_empty() {
                                return child.children[0].ci_walk(&rest[end..], fix, out);
                            }
                            if fix && rest.len() == end + 1 && child.handlers.is_some() {
                                return Some(out);
                            }
                            return None;
                        }

                        if child.handlers.is_some() {
                            return Some(out);
                        }
                        if fix && child.children.len() == 1 {
                            let grandchild = &child.children[0];
                            if grandchild.path == "/" && grandchild.handlers.is_some() {
                                out.push('/');
                                return Some(out);
                            }
                        }
                        return None;
                    }
                    NodeKind::CatchAll => {
                        out.push_str(rest);
                        return child.handlers.as_ref().map(|_| out);
                    }
                    NodeKind::Static | NodeKind::Root => return None,
                }
            }

            if fix && rest == "/" && self.handlers.is_some() {
                return Some(out);
            }
            return None;
        }

        // The path is one trailing slash short of this fragment.
        if fix
            && path.len() + 1 == prefix.len()
            && prefix.as_bytes()[path.len()] == b'/'
            && eq_ascii_ci(path, &prefix[..path.len()])
            && self.handlers.is_some()
        {
            out.push_str(prefix);
            return Some(out);
        }
        None
    }
}
