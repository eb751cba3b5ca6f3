//! Path segments used in attribute declarations.
//!
//! Each segment is a `Lens<Node, Node>` with a fixed input and output
//! `NodeKind`; a declared path is valid when consecutive kinds line up from
//! `Graph` to `Value`.
//!
//! # Invariants
//! - `get` on a node of the wrong kind yields the empty node of the output
//!   kind; `put` on a node of the wrong kind returns the source unchanged.
//! - Laws hold over well-formed sources: at most one object under `Single`,
//!   literal objects under the literal segments, URI objects under the URI
//!   segments.

use super::Lens;
use crate::model::attributes::Value;
use crate::model::resource::{Graph, Term};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Runtime focus universe traversed by declared paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Graph(Graph),
    Terms(Vec<Term>),
    Term(Option<Term>),
    Value(Value),
}

/// Shape tag for `Node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Graph,
    Terms,
    Term,
    Value,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Graph(_) => NodeKind::Graph,
            Self::Terms(_) => NodeKind::Terms,
            Self::Term(_) => NodeKind::Term,
            Self::Value(_) => NodeKind::Value,
        }
    }

    /// Empty node of `kind`.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Graph => Self::Graph(Graph::new()),
            NodeKind::Terms => Self::Terms(Vec::new()),
            NodeKind::Term => Self::Term(None),
            NodeKind::Value => Self::Value(Value::Null),
        }
    }

    /// Unwraps a value node; any other kind reads as `Null`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            _ => Value::Null,
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Graph => "graph",
            Self::Terms => "terms",
            Self::Term => "term",
            Self::Value => "value",
        };
        f.write_str(name)
    }
}

/// Value shape a finished path produces on `get` and accepts on `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// `Null` or one `Scalar`.
    Single,
    /// A `List` of scalars, possibly empty.
    Many,
}

impl ValueShape {
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Single, Value::Null | Value::Scalar(_)) => true,
            (Self::Many, Value::List(items)) => {
                items.iter().all(|item| matches!(item, Value::Scalar(_)))
            }
            _ => false,
        }
    }
}

impl Display for ValueShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("a single string or null"),
            Self::Many => f.write_str("a list of strings"),
        }
    }
}

/// One step of a declared attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Objects of one predicate.
    Predicate(String),
    /// First object of a term list.
    Single,
    /// Literal term as a scalar string.
    LiteralToString,
    /// URI term as a scalar string.
    UriToString,
    /// All literal objects as a list of strings.
    LiteralsToStrings,
    /// All URI objects as a list of strings.
    UrisToStrings,
}

impl Segment {
    pub fn predicate(uri: impl Into<String>) -> Self {
        Self::Predicate(uri.into())
    }

    pub fn input_kind(&self) -> NodeKind {
        match self {
            Self::Predicate(_) => NodeKind::Graph,
            Self::Single | Self::LiteralsToStrings | Self::UrisToStrings => NodeKind::Terms,
            Self::LiteralToString | Self::UriToString => NodeKind::Term,
        }
    }

    /// Shape of the value a path ending in this segment reads and writes.
    pub fn value_shape(&self) -> Option<ValueShape> {
        match self {
            Self::LiteralToString | Self::UriToString => Some(ValueShape::Single),
            Self::LiteralsToStrings | Self::UrisToStrings => Some(ValueShape::Many),
            Self::Predicate(_) | Self::Single => None,
        }
    }

    pub fn output_kind(&self) -> NodeKind {
        match self {
            Self::Predicate(_) => NodeKind::Terms,
            Self::Single => NodeKind::Term,
            Self::LiteralToString
            | Self::UriToString
            | Self::LiteralsToStrings
            | Self::UrisToStrings => NodeKind::Value,
        }
    }
}

impl Lens<Node, Node> for Segment {
    fn get(&self, source: &Node) -> Node {
        match (self, source) {
            (Self::Predicate(predicate), Node::Graph(graph)) => {
                Node::Terms(graph.objects(predicate).to_vec())
            }
            (Self::Single, Node::Terms(terms)) => Node::Term(terms.first().cloned()),
            (Self::LiteralToString, Node::Term(term)) => Node::Value(
                term.as_ref()
                    .and_then(Term::as_literal)
                    .map_or(Value::Null, Value::scalar),
            ),
            (Self::UriToString, Node::Term(term)) => Node::Value(
                term.as_ref()
                    .and_then(Term::as_uri)
                    .map_or(Value::Null, Value::scalar),
            ),
            (Self::LiteralsToStrings, Node::Terms(terms)) => {
                Node::Value(Value::list(terms.iter().filter_map(Term::as_literal)))
            }
            (Self::UrisToStrings, Node::Terms(terms)) => {
                Node::Value(Value::list(terms.iter().filter_map(Term::as_uri)))
            }
            _ => Node::empty(self.output_kind()),
        }
    }

    fn put(&self, source: &Node, value: Node) -> Node {
        match (self, source, value) {
            (Self::Predicate(predicate), Node::Graph(graph), Node::Terms(terms)) => {
                let mut graph = graph.clone();
                graph.set_objects(predicate.as_str(), terms);
                Node::Graph(graph)
            }
            (Self::Single, Node::Terms(_), Node::Term(term)) => {
                Node::Terms(term.into_iter().collect())
            }
            (Self::LiteralToString, Node::Term(_), Node::Value(value))
                if ValueShape::Single.accepts(&value) =>
            {
                Node::Term(scalar_string(value).map(Term::Literal))
            }
            (Self::UriToString, Node::Term(_), Node::Value(value))
                if ValueShape::Single.accepts(&value) =>
            {
                Node::Term(scalar_string(value).map(Term::Uri))
            }
            (Self::LiteralsToStrings, Node::Terms(terms), Node::Value(value))
                if ValueShape::Many.accepts(&value) =>
            {
                Node::Terms(replace_terms(
                    terms,
                    &value,
                    |term| term.as_uri().is_some(),
                    Term::Literal,
                ))
            }
            (Self::UrisToStrings, Node::Terms(terms), Node::Value(value))
                if ValueShape::Many.accepts(&value) =>
            {
                Node::Terms(replace_terms(
                    terms,
                    &value,
                    |term| term.as_literal().is_some(),
                    Term::Uri,
                ))
            }
            _ => source.clone(),
        }
    }
}

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::Scalar(text) => Some(text),
        _ => None,
    }
}

/// Keeps the terms `keep` selects, then appends `value` as new terms.
fn replace_terms(
    terms: &[Term],
    value: &Value,
    keep: impl Fn(&Term) -> bool,
    make: impl Fn(String) -> Term,
) -> Vec<Term> {
    terms
        .iter()
        .filter(|term| keep(term))
        .cloned()
        .chain(value.to_strings().into_iter().map(make))
        .collect()
}

/// Error for an unrecognized segment identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentParseError(pub String);

impl Display for SegmentParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown path segment `{}`; expected a predicate URI or \
             single|literal_to_string|uri_to_string|literals_to_strings|uris_to_strings",
            self.0
        )
    }
}

impl Error for SegmentParseError {}

impl FromStr for Segment {
    type Err = SegmentParseError;

    /// Parses a segment identifier. Anything containing `:` is a predicate.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed {
            "single" => Ok(Self::Single),
            "literal_to_string" => Ok(Self::LiteralToString),
            "uri_to_string" => Ok(Self::UriToString),
            "literals_to_strings" => Ok(Self::LiteralsToStrings),
            "uris_to_strings" => Ok(Self::UrisToStrings),
            other if other.contains(':') && !other.contains(char::is_whitespace) => {
                Ok(Self::Predicate(other.to_string()))
            }
            other => Err(SegmentParseError(other.to_string())),
        }
    }
}
