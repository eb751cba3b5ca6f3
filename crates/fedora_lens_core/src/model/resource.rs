//! Graph-structured resource model.
//!
//! # Responsibility
//! - Define the statement graph held for one subject URI.
//! - Carry the optional cached GET response (and ETag) for that subject.
//!
//! # Invariants
//! - A predicate with no objects is never stored in a `Graph`.
//! - `Resource` is a value: mutation returns a new `Resource`.
//! - `Resource::handle` never carries a cached response or ETag.

use std::collections::BTreeMap;

/// Object position of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Plain literal lexical form.
    Literal(String),
    /// Reference to another resource.
    Uri(String),
}

impl Term {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Self::Uri(value.into())
    }

    /// Returns the literal lexical form, or `None` for URI terms.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value.as_str()),
            Self::Uri(_) => None,
        }
    }

    /// Returns the referenced URI, or `None` for literal terms.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(value) => Some(value.as_str()),
            Self::Literal(_) => None,
        }
    }
}

/// Predicate → objects statements for a single subject.
///
/// Object order within a predicate is preserved as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    statements: BTreeMap<String, Vec<Term>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all objects for `predicate` (empty when absent).
    pub fn objects(&self, predicate: &str) -> &[Term] {
        self.statements
            .get(predicate)
            .map_or(&[], |objects| objects.as_slice())
    }

    /// Replaces all objects for `predicate`. An empty list removes it.
    pub fn set_objects(&mut self, predicate: impl Into<String>, objects: Vec<Term>) {
        let predicate = predicate.into();
        if objects.is_empty() {
            self.statements.remove(&predicate);
        } else {
            self.statements.insert(predicate, objects);
        }
    }

    /// Appends one object to `predicate`.
    pub fn push(&mut self, predicate: impl Into<String>, object: Term) {
        self.statements
            .entry(predicate.into())
            .or_default()
            .push(object);
    }

    /// Removes `predicate` and returns its previous objects.
    pub fn remove(&mut self, predicate: &str) -> Vec<Term> {
        self.statements.remove(predicate).unwrap_or_default()
    }

    pub fn contains(&self, predicate: &str) -> bool {
        self.statements.contains_key(predicate)
    }

    /// Sorted predicate URIs present in this graph.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    /// Iterates `(predicate, object)` statements in predicate order.
    pub fn statements(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.statements.iter().flat_map(|(predicate, objects)| {
            objects
                .iter()
                .map(move |object| (predicate.as_str(), object))
        })
    }

    /// Number of statements (not predicates).
    pub fn len(&self) -> usize {
        self.statements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Marker for a retrieved GET response held alongside a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// Concurrency token returned by the store.
    pub etag: String,
    /// Server-computed modification stamp, epoch milliseconds.
    pub last_modified: i64,
}

/// One LDP RDF source as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    subject: Option<String>,
    container: Option<String>,
    graph: Graph,
    cache: Option<CachedResponse>,
}

impl Resource {
    /// Unsaved resource at a known, id-scoped location.
    pub fn new_at(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            container: None,
            graph: Graph::new(),
            cache: None,
        }
    }

    /// Unsaved resource without identity; the store mints a subject beneath
    /// `container` on create.
    pub fn new_in(container: impl Into<String>) -> Self {
        Self {
            subject: None,
            container: Some(container.into()),
            graph: Graph::new(),
            cache: None,
        }
    }

    /// Fresh handle for an existing subject with nothing retrieved yet.
    pub fn handle(subject: impl Into<String>) -> Self {
        Self::new_at(subject)
    }

    /// Resource as returned by a store read.
    pub fn retrieved(subject: impl Into<String>, graph: Graph, cache: CachedResponse) -> Self {
        Self {
            subject: Some(subject.into()),
            container: None,
            graph,
            cache: Some(cache),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn cache(&self) -> Option<&CachedResponse> {
        self.cache.as_ref()
    }

    /// ETag of the cached response, if any.
    pub fn etag(&self) -> Option<&str> {
        self.cache.as_ref().map(|cache| cache.etag.as_str())
    }

    /// Whether this handle carries a retrieved representation.
    pub fn is_retrieved(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns a copy with `graph` swapped in; identity and cache are kept.
    pub fn with_graph(&self, graph: Graph) -> Self {
        Self {
            subject: self.subject.clone(),
            container: self.container.clone(),
            graph,
            cache: self.cache.clone(),
        }
    }
}
