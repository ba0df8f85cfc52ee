//! Route insertion: prefix-sharing walk, edge splitting, wildcard nodes.

use crate::handler::HandlersChain;
use crate::router::errors::RegistrationError;
use crate::router::node::{find_wildcard, longest_common_prefix, Node, NodeKind};

impl Node {
    /// Insert a pattern into the tree rooted at `self`.
    ///
    /// The caller has already validated the leading `/`, the method token and
    /// the chain itself; everything structural about the pattern is checked
    /// here.
    pub(crate) fn add_route(
        &mut self,
        path: &str,
        chain: HandlersChain,
    ) -> Result<(), RegistrationError> {
        self.priority += 1;

        // Empty tree.
        if self.path.is_empty() && self.children.is_empty() {
            self.insert_child(path, path, chain)?;
            self.kind = NodeKind::Root;
            return Ok(());
        }

        self.walk_insert(path, path, chain)
    }

    fn walk_insert(
        &mut self,
        path: &str,
        full_path: &str,
        chain: HandlersChain,
    ) -> Result<(), RegistrationError> {
        // `path` is always a suffix of `full_path`; this node's fragment
        // begins where the suffix does.
        let offset = full_path.len() - path.len();
        let i = longest_common_prefix(path, &self.path);

        // Split the edge where the fragments diverge.
        if i < self.path.len() {
            let child = Node {
                path: self.path[i..].to_string(),
                wild_child: self.wild_child,
                kind: NodeKind::Static,
                indices: std::mem::take(&mut self.indices),
                children: std::mem::take(&mut self.children),
                handlers: self.handlers.take(),
                priority: self.priority - 1,
                full_path: std::mem::take(&mut self.full_path),
            };

            self.children = vec![child];
            self.indices = vec![self.path.as_bytes()[i]];
            self.path.truncate(i);
            self.wild_child = false;
            self.full_path = full_path[..offset + i].to_string();
        }

        // Descend with what remains of the pattern.
        if i < path.len() {
            let rest = &path[i..];
            let c = rest.as_bytes()[0];

            // '/' directly behind a param node continues in its single child.
            if self.kind == NodeKind::Param && c == b'/' && self.children.len() == 1 {
                let child = &mut self.children[0];
                child.priority += 1;
                return child.walk_insert(rest, full_path, chain);
            }

            // Existing static branch for the next byte.
            if let Some(pos) = self.indices.iter().position(|&b| b == c) {
                let pos = self.increment_child_priority(pos);
                return self.children[pos].walk_insert(rest, full_path, chain);
            }

            if c != b':' && c != b'*' && self.kind != NodeKind::CatchAll {
                self.indices.push(c);
                self.add_child(Node::with_full_path(full_path));
                let pos = self.increment_child_priority(self.indices.len() - 1);
                return self.children[pos].insert_child(rest, full_path, chain);
            }

            if self.wild_child {
                // The new pattern must re-use the existing wildcard exactly;
                // anything else is ambiguous at this position.
                let last = self.children.len() - 1;
                let existing = &mut self.children[last];
                existing.priority += 1;

                if rest.len() >= existing.path.len()
                    && existing.path == rest[..existing.path.len()]
                    && existing.kind != NodeKind::CatchAll
                    && (existing.path.len() >= rest.len()
                        || rest.as_bytes()[existing.path.len()] == b'/')
                {
                    return existing.walk_insert(rest, full_path, chain);
                }

                let segment = if existing.kind == NodeKind::CatchAll {
                    rest.to_string()
                } else {
                    rest.split('/').next().unwrap_or(rest).to_string()
                };
                let prefix = match full_path.find(segment.as_str()) {
                    Some(at) => format!("{}{}", &full_path[..at], existing.path),
                    None => existing.path.clone(),
                };
                return Err(RegistrationError::WildcardConflict {
                    segment,
                    path: full_path.to_string(),
                    existing: existing.path.clone(),
                    prefix,
                });
            }

            return self.insert_child(rest, full_path, chain);
        }

        // Pattern fully consumed at this node: attach (or amend) the chain.
        if self.handlers.is_some() {
            tracing::debug!(path = full_path, "amending handlers of re-registered route");
        }
        self.handlers = Some(chain);
        self.full_path = full_path.to_string();
        Ok(())
    }

    /// Build the chain of nodes for a pattern tail that has no counterpart in
    /// the tree yet. `self` is always a node without children.
    pub(crate) fn insert_child(
        &mut self,
        path: &str,
        full_path: &str,
        chain: HandlersChain,
    ) -> Result<(), RegistrationError> {
        let Some((start, wildcard, valid)) = find_wildcard(path) else {
            // Purely static tail.
            self.path = path.to_string();
            self.handlers = Some(chain);
            self.full_path = full_path.to_string();
            return Ok(());
        };

        if !valid {
            return Err(RegistrationError::MultipleWildcardsPerSegment {
                wildcard: wildcard.to_string(),
                path: full_path.to_string(),
            });
        }
        if wildcard.len() < 2 {
            return Err(RegistrationError::UnnamedWildcard {
                path: full_path.to_string(),
            });
        }

        let wildcard = wildcard.to_string();

        if wildcard.as_bytes()[0] == b':' {
            // Static prefix before the param stays on this node.
            if start > 0 {
                self.path = path[..start].to_string();
            }
            let rest = &path[start..];

            let mut child = Node {
                kind: NodeKind::Param,
                path: wildcard.clone(),
                full_path: full_path.to_string(),
                priority: 1,
                ..Node::default()
            };

            if wildcard.len() < rest.len() {
                // The pattern continues behind the param with a '/' subtree.
                let remainder = &rest[wildcard.len()..];
                let mut grandchild = Node::with_full_path(full_path);
                grandchild.priority = 1;
                child.add_child(grandchild);

                self.add_child(child);
                self.wild_child = true;
                let child = self.children.last_mut().expect("wildcard child just added");
                return child.children[0].insert_child(remainder, full_path, chain);
            }

            child.handlers = Some(chain);
            self.add_child(child);
            self.wild_child = true;
            return Ok(());
        }

        // Catch-all.
        if start + wildcard.len() != path.len() {
            return Err(RegistrationError::CatchAllNotAtEnd {
                path: full_path.to_string(),
            });
        }
        if !self.path.is_empty() && self.path.ends_with('/') {
            let segment = self
                .children
                .first()
                .and_then(|c| c.path.split('/').next())
                .unwrap_or_default()
                .to_string();
            return Err(RegistrationError::CatchAllConflict {
                path: full_path.to_string(),
                segment,
            });
        }
        if start == 0 || path.as_bytes()[start - 1] != b'/' {
            return Err(RegistrationError::CatchAllMissingSlash {
                path: full_path.to_string(),
            });
        }

        // The catch-all hangs off a dedicated '/'-indexed node: the indexed
        // node matches the separator, its single child holds the value.
        let sep = start - 1;
        self.path = path[..sep].to_string();

        let mut holder = Node {
            wild_child: true,
            kind: NodeKind::CatchAll,
            full_path: full_path.to_string(),
            priority: 1,
            ..Node::default()
        };
        let value_node = Node {
            path: path[sep..].to_string(),
            kind: NodeKind::CatchAll,
            handlers: Some(chain),
            priority: 1,
            full_path: full_path.to_string(),
            ..Node::default()
        };
        holder.children.push(value_node);

        self.add_child(holder);
        self.indices = vec![b'/'];
        Ok(())
    }
}
