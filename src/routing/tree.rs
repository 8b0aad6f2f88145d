//! Segment trie mapping method + path to a handler chain.
//!
//! Each node is one path segment. A segment written as `{name}` is a
//! parameter: at lookup it matches any single segment and binds it under
//! `name`. Literal children always win over the parameter child of the same
//! node, and a node has at most one parameter child.

use std::collections::HashMap;

use crate::http::handler::Chain;
use crate::http::query::path_segments;
use crate::http::request::Method;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid path {0:?}: must start with '/'")]
    InvalidPath(String),

    #[error("empty parameter name in path {0:?}")]
    EmptyParam(String),

    #[error("parameter {new} in {path:?} conflicts with existing parameter {existing}")]
    ConflictingParam {
        path: String,
        existing: String,
        new: String,
    },
}

/// A resolved route: the chain to run and the bound path parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub chain: &'a Chain,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Node {
    key: String,
    children: HashMap<String, Node>,
    /// Key of the parameter child, if any.
    param_child: Option<String>,
    handlers: HashMap<Method, Chain>,
    terminal: bool,
    is_param: bool,
}

impl Node {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            is_param: param_name(key).is_some(),
            ..Self::default()
        }
    }

    fn count_routes(&self) -> usize {
        self.handlers.len()
            + self
                .children
                .values()
                .map(Node::count_routes)
                .sum::<usize>()
    }
}

/// Built once while routes are registered, then only read.
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `chain` for `method` on `path`.
    ///
    /// A trailing `/` is ignored. Registering the same method and path twice
    /// replaces the earlier chain. Introducing a second, differently named
    /// parameter at a level that already has one is rejected, since lookups
    /// could only ever bind one of the names.
    pub fn insert(&mut self, path: &str, method: Method, chain: Chain) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path.to_string()));
        }

        let segments = path_segments(path);
        if segments.iter().any(|s| param_name(s) == Some("")) {
            return Err(RouteError::EmptyParam(path.to_string()));
        }

        let mut node = &mut self.root;
        for segment in segments {
            if param_name(segment).is_some() {
                match &node.param_child {
                    Some(existing) if existing != segment => {
                        return Err(RouteError::ConflictingParam {
                            path: path.to_string(),
                            existing: existing.clone(),
                            new: segment.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => node.param_child = Some(segment.to_string()),
                }
            }

            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| Node::new(segment));
        }

        node.terminal = true;
        if node.handlers.insert(method, chain).is_some() {
            tracing::warn!(%method, path, "Replacing previously registered route");
        }

        Ok(())
    }

    /// Resolves a concrete request path.
    ///
    /// Returns `None` when no registered route matches the path, or when one
    /// does but has no chain for `method`. At each level a literal child is
    /// tried first; the parameter child is only consulted when no literal
    /// child exists, and there is no backtracking once a literal is taken.
    pub fn lookup(&self, path: &str, method: Method) -> Option<RouteMatch<'_>> {
        if path.is_empty() {
            return None;
        }

        let mut node = &self.root;
        let mut params = HashMap::new();

        for segment in path_segments(path) {
            node = match node.children.get(segment).filter(|child| !child.is_param) {
                Some(child) => child,
                None => {
                    let key = node.param_child.as_deref()?;
                    let child = node.children.get(key)?;
                    let name = param_name(&child.key)?;
                    params.insert(name.to_string(), segment.to_string());
                    child
                }
            };
        }

        if !node.terminal {
            return None;
        }

        let chain = node.handlers.get(&method)?;
        Some(RouteMatch { chain, params })
    }

    /// Number of registered method + path combinations.
    pub fn len(&self) -> usize {
        self.root.count_routes()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `{name}` -> `Some("name")`, anything else -> `None`.
fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
