//! Registration-time faults.
//!
//! These indicate defects in the registering code, not runtime conditions;
//! callers are expected to fail startup on any of them. Each variant maps to
//! a stable numeric code for log and boundary reporting.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Pattern does not begin with `/`.
    PathMissingLeadingSlash { path: String },
    /// Patterns are matched byte-wise and must be ASCII.
    PathNotAscii { path: String },
    /// Method token is empty.
    EmptyMethod,
    /// Method token contains something other than ASCII uppercase letters.
    InvalidMethod { method: String },
    /// A route must carry at least one handler.
    EmptyHandlerChain { path: String },
    /// Combined chain reached the flow-control ceiling.
    ChainTooLong { path: String, len: usize },
    /// More than one `:`/`*` marker inside a single segment.
    MultipleWildcardsPerSegment { wildcard: String, path: String },
    /// `:` or `*` with no name behind it.
    UnnamedWildcard { path: String },
    /// A catch-all segment must terminate the pattern.
    CatchAllNotAtEnd { path: String },
    /// A catch-all must be preceded by a `/`.
    CatchAllMissingSlash { path: String },
    /// Catch-all would shadow an already registered sibling subtree.
    CatchAllConflict { path: String, segment: String },
    /// A wildcard collides with an existing wildcard of a different name or
    /// shape at the same trie position.
    WildcardConflict {
        segment: String,
        path: String,
        existing: String,
        prefix: String,
    },
}

impl RegistrationError {
    /// Stable numeric code, grouped the way the match-time/registration-time
    /// split is reported at the boundary.
    pub fn code(&self) -> u16 {
        match self {
            Self::PathMissingLeadingSlash { .. } => 10001,
            Self::PathNotAscii { .. } => 10012,
            Self::EmptyMethod => 10002,
            Self::InvalidMethod { .. } => 10003,
            Self::EmptyHandlerChain { .. } => 10004,
            Self::ChainTooLong { .. } => 10005,
            Self::MultipleWildcardsPerSegment { .. } => 10006,
            Self::UnnamedWildcard { .. } => 10007,
            Self::CatchAllNotAtEnd { .. } => 10008,
            Self::CatchAllMissingSlash { .. } => 10009,
            Self::CatchAllConflict { .. } => 10010,
            Self::WildcardConflict { .. } => 10011,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathMissingLeadingSlash { .. } => "PathMissingLeadingSlash",
            Self::PathNotAscii { .. } => "PathNotAscii",
            Self::EmptyMethod => "EmptyMethod",
            Self::InvalidMethod { .. } => "InvalidMethod",
            Self::EmptyHandlerChain { .. } => "EmptyHandlerChain",
            Self::ChainTooLong { .. } => "ChainTooLong",
            Self::MultipleWildcardsPerSegment { .. } => "MultipleWildcardsPerSegment",
            Self::UnnamedWildcard { .. } => "UnnamedWildcard",
            Self::CatchAllNotAtEnd { .. } => "CatchAllNotAtEnd",
            Self::CatchAllMissingSlash { .. } => "CatchAllMissingSlash",
            Self::CatchAllConflict { .. } => "CatchAllConflict",
            Self::WildcardConflict { .. } => "WildcardConflict",
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMissingLeadingSlash { path } => {
                write!(f, "path '{path}' must begin with '/'")
            }
            Self::PathNotAscii { path } => {
                write!(f, "path '{path}' contains non-ASCII bytes")
            }
            Self::EmptyMethod => write!(f, "HTTP method must not be empty"),
            Self::InvalidMethod { method } => {
                write!(f, "HTTP method '{method}' is not an uppercase token")
            }
            Self::EmptyHandlerChain { path } => {
                write!(f, "route '{path}' registered without handlers")
            }
            Self::ChainTooLong { path, len } => {
                write!(
                    f,
                    "route '{path}' carries {len} handlers, above the chain ceiling"
                )
            }
            Self::MultipleWildcardsPerSegment { wildcard, path } => {
                write!(
                    f,
                    "only one wildcard per path segment is allowed, has '{wildcard}' in path '{path}'"
                )
            }
            Self::UnnamedWildcard { path } => {
                write!(f, "wildcards must be named with a non-empty name in path '{path}'")
            }
            Self::CatchAllNotAtEnd { path } => {
                write!(f, "catch-all routes are only allowed at the end of the path in path '{path}'")
            }
            Self::CatchAllMissingSlash { path } => {
                write!(f, "no '/' before catch-all in path '{path}'")
            }
            Self::CatchAllConflict { path, segment } => {
                write!(
                    f,
                    "catch-all wildcard in path '{path}' conflicts with existing path segment '{segment}'"
                )
            }
            Self::WildcardConflict {
                segment,
                path,
                existing,
                prefix,
            } => {
                write!(
                    f,
                    "'{segment}' in new path '{path}' conflicts with existing wildcard '{existing}' in existing prefix '{prefix}'"
                )
            }
        }
    }
}

impl Error for RegistrationError {}
