//! Per-model mapping between a resource graph and an attribute map.
//!
//! # Responsibility
//! - Fold each declared attribute path into one composed lens.
//! - Aggregate all attribute lenses into a single get/put over `Resource`.
//!
//! # Invariants
//! - Every declared attribute name maps to exactly one lens.
//! - The lens table is immutable once built.
//! - `put` applies attributes in declaration order; later declarations win
//!   when two paths touch the same statements.
//! - Undeclared keys are dropped on `put` and never produced by `get`.
//! - Attributes whose path finds nothing are absent from `get`, so
//!   `get(put(empty, m)) == m` for every map of present, well-shaped values.
//! - Values of the wrong shape for their path are never written.
//!
//! # See also
//! - `lens::segment` for the available path segments.

use crate::lens::{
    compose, Lens, Node, NodeKind, NodeLens, Segment, SegmentParseError, ValueShape,
};
use crate::model::attributes::{normalize_attribute_name, AttributeMap, Value};
use crate::model::resource::Resource;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod registry;

static ATTRIBUTE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid attribute name regex"));

/// Errors raised while building an attribute bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    InvalidAttributeName(String),
    DuplicateAttribute(String),
    EmptyPath(String),
    IllTypedPath {
        attribute: String,
        position: usize,
        expected: NodeKind,
        found: NodeKind,
    },
}

impl Display for BridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAttributeName(name) => write!(f, "attribute name is invalid: `{name}`"),
            Self::DuplicateAttribute(name) => write!(f, "attribute declared twice: `{name}`"),
            Self::EmptyPath(name) => write!(f, "attribute `{name}` has an empty path"),
            Self::IllTypedPath {
                attribute,
                position,
                expected,
                found,
            } => write!(
                f,
                "attribute `{attribute}` path segment {position} expects {expected} but receives {found}"
            ),
        }
    }
}

impl Error for BridgeError {}

/// Ordered attribute → path declaration for one model type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelDeclaration {
    name: String,
    attributes: Vec<(String, Vec<Segment>)>,
}

impl ModelDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends one attribute with its ordered path.
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        path: impl IntoIterator<Item = Segment>,
    ) -> Self {
        self.attributes
            .push((name.into(), path.into_iter().collect()));
        self
    }

    /// Appends one attribute whose path is given as segment identifiers.
    pub fn attribute_path(
        self,
        name: impl Into<String>,
        path: &[&str],
    ) -> Result<Self, SegmentParseError> {
        let segments = path
            .iter()
            .map(|segment| segment.parse::<Segment>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.attribute(name, segments))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &[Segment])> {
        self.attributes
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_slice()))
    }
}

struct AttributeLens {
    name: String,
    shape: ValueShape,
    lens: NodeLens,
}

/// Immutable composed-lens table for one model type.
pub struct AttributeBridge {
    model_name: String,
    attributes: Vec<AttributeLens>,
}

impl Debug for AttributeBridge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeBridge")
            .field("model_name", &self.model_name)
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .finish()
    }
}

impl AttributeBridge {
    /// Builds the lens table from a declaration.
    ///
    /// # Errors
    /// - Attribute names must match `[a-z_][a-z0-9_]*` after lowercasing
    ///   and be unique.
    /// - Every path must be non-empty and type-line up from graph to value.
    pub fn build(declaration: &ModelDeclaration) -> Result<Self, BridgeError> {
        let mut attributes: Vec<AttributeLens> = Vec::new();

        for (raw_name, path) in declaration.attributes() {
            let name = normalize_attribute_name(raw_name);
            if !ATTRIBUTE_NAME_RE.is_match(&name) {
                return Err(BridgeError::InvalidAttributeName(raw_name.to_string()));
            }
            if attributes.iter().any(|existing| existing.name == name) {
                return Err(BridgeError::DuplicateAttribute(name));
            }
            let shape = check_path(&name, path)?;

            let mut segments = path.iter().cloned();
            let Some(first) = segments.next() else {
                return Err(BridgeError::EmptyPath(name));
            };
            let lens = segments.fold(Box::new(first) as NodeLens, |outer, inner| {
                Box::new(compose::<Node, Node, Node, _, _>(outer, inner)) as NodeLens
            });

            attributes.push(AttributeLens { name, shape, lens });
        }

        debug!(
            "event=bridge_build module=bridge status=ok model={} attributes={}",
            declaration.name(),
            attributes.len()
        );

        Ok(Self {
            model_name: declaration.name().to_string(),
            attributes,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Declared attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attribute| attribute.name.as_str())
    }

    pub fn declares(&self, name: &str) -> bool {
        let name = normalize_attribute_name(name);
        self.attributes.iter().any(|attribute| attribute.name == name)
    }

    /// Value shape the attribute's path reads and writes.
    pub fn shape_of(&self, name: &str) -> Option<ValueShape> {
        let name = normalize_attribute_name(name);
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.shape)
    }

    /// Whether `value` is declared under `name` with a matching shape.
    pub fn accepts(&self, name: &str, value: &Value) -> bool {
        self.shape_of(name).is_some_and(|shape| shape.accepts(value))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Reads every declared attribute out of `resource`.
    ///
    /// Attributes whose path finds nothing (`Null` or an empty list) are
    /// left out.
    pub fn get(&self, resource: &Resource) -> AttributeMap {
        let root = Node::Graph(resource.graph().clone());
        self.attributes
            .iter()
            .map(|attribute| (attribute.name.as_str(), attribute.lens.get(&root).into_value()))
            .filter(|(_, value)| !is_nothing(value))
            .collect()
    }

    /// Writes `attributes` into a copy of `resource`.
    pub fn put(&self, resource: &Resource, attributes: &AttributeMap) -> Resource {
        let mut root = Node::Graph(resource.graph().clone());
        let mut applied = 0usize;
        for attribute in &self.attributes {
            if let Some(value) = attributes
                .get(&attribute.name)
                .filter(|value| attribute.shape.accepts(value))
            {
                root = attribute.lens.put(&root, Node::Value(value.clone()));
                applied += 1;
            }
        }

        let dropped = attributes.len() - applied;
        if dropped > 0 {
            debug!(
                "event=attributes_put module=bridge status=ok model={} applied={} dropped={}",
                self.model_name, applied, dropped
            );
        }

        match root {
            Node::Graph(graph) => resource.with_graph(graph),
            _ => resource.clone(),
        }
    }
}

fn is_nothing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::List(items) => items.is_empty(),
        Value::Scalar(_) => false,
    }
}

/// Type-checks `path` from graph to value and returns the value shape.
fn check_path(attribute: &str, path: &[Segment]) -> Result<ValueShape, BridgeError> {
    if path.is_empty() {
        return Err(BridgeError::EmptyPath(attribute.to_string()));
    }

    let mut expected = NodeKind::Graph;
    for (position, segment) in path.iter().enumerate() {
        if segment.input_kind() != expected {
            return Err(BridgeError::IllTypedPath {
                attribute: attribute.to_string(),
                position,
                expected: segment.input_kind(),
                found: expected,
            });
        }
        expected = segment.output_kind();
    }

    match path.last().and_then(Segment::value_shape) {
        Some(shape) if expected == NodeKind::Value => Ok(shape),
        _ => Err(BridgeError::IllTypedPath {
            attribute: attribute.to_string(),
            position: path.len(),
            expected: NodeKind::Value,
            found: expected,
        }),
    }
}
