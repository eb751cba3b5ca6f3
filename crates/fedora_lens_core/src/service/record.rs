//! Record lifecycle over a resource store.
//!
//! # Responsibility
//! - Hold one resource handle and its flat attribute view.
//! - Drive create/update/reload/delete through `ResourceStore`.
//!
//! # Invariants
//! - Attribute writes touch the attribute map only; the resource changes
//!   only through `save` and `reload`.
//! - A record becomes `Persisted` only through a successful create (or a
//!   successful reload of an existing subject).
//! - After every successful create or update the held resource is a fresh
//!   handle without cached response or ETag.
//! - A failed store call leaves the record exactly as it was.

use super::context::Context;
use crate::bridge::AttributeBridge;
use crate::identity::IdentityMapper;
use crate::lens::ValueShape;
use crate::model::attributes::{AttributeMap, Value};
use crate::model::resource::Resource;
use crate::model::validation::ValidationResult;
use crate::repo::resource_store::{ResourceStore, StoreError, StoreResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RecordResult<T> = Result<T, RecordError>;

/// Errors surfaced by record construction and lifecycle operations.
#[derive(Debug)]
pub enum RecordError {
    /// A factory was given an argument of the wrong shape.
    InputShape(String),
    NotFound(String),
    /// ETag mismatch on update; resolution is left to the caller.
    Conflict {
        uri: String,
        expected: String,
        actual: String,
    },
    /// Raised by `save_strict` when `save` reports failure.
    NotSaved,
    /// The record has no subject URI yet.
    NoIdentity,
    UnknownAttribute(String),
    Store(StoreError),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputShape(message) => write!(f, "invalid record input: {message}"),
            Self::NotFound(uri) => write!(f, "record not found: {uri}"),
            Self::Conflict {
                uri,
                expected,
                actual,
            } => write!(
                f,
                "record {uri} was modified concurrently (held etag {expected}, current {actual})"
            ),
            Self::NotSaved => write!(f, "record not saved"),
            Self::NoIdentity => write!(f, "record has no identity yet"),
            Self::UnknownAttribute(name) => write!(f, "attribute not declared: {name}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RecordError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(uri) => Self::NotFound(uri),
            StoreError::Conflict {
                uri,
                expected,
                actual,
            } => Self::Conflict {
                uri,
                expected,
                actual,
            },
            other => Self::Store(other),
        }
    }
}

/// Whether a record is backed by a confirmed store resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    New,
    Persisted,
}

/// Application entity mapped onto one store resource.
#[derive(Debug, Clone)]
pub struct Record {
    state: RecordState,
    resource: Resource,
    attributes: AttributeMap,
    bridge: Arc<AttributeBridge>,
    ids: IdentityMapper,
}

impl Record {
    /// Wraps an existing store resource.
    ///
    /// # Errors
    /// - `InputShape` when `resource` has no subject URI.
    pub fn from_resource<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        resource: Resource,
    ) -> RecordResult<Self> {
        if resource.subject().is_none() {
            return Err(RecordError::InputShape(
                "resource has no subject URI".to_string(),
            ));
        }
        let attributes = bridge.get(&resource);
        Ok(Self {
            state: RecordState::Persisted,
            resource,
            attributes,
            bridge,
            ids: ctx.ids().clone(),
        })
    }

    /// New record that will be created at `id`.
    ///
    /// # Errors
    /// - `InputShape` when `id` is blank or a declared attribute has the
    ///   wrong value shape.
    pub fn from_id<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        id: &str,
        attributes: AttributeMap,
    ) -> RecordResult<Self> {
        let trimmed = id.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(RecordError::InputShape(format!(
                "record id must not be blank, got `{id}`"
            )));
        }
        let resource = Resource::new_at(ctx.ids().id_to_uri(trimmed));
        Self::new_record(ctx, bridge, resource, attributes)
    }

    /// New record whose id the store assigns on create.
    ///
    /// # Errors
    /// - `InputShape` when a declared attribute has the wrong value shape.
    pub fn from_attributes<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        attributes: AttributeMap,
    ) -> RecordResult<Self> {
        let resource = Resource::new_in(ctx.ids().container_uri());
        Self::new_record(ctx, bridge, resource, attributes)
    }

    /// Empty new record.
    pub fn new<S: ResourceStore>(ctx: &Context<S>, bridge: Arc<AttributeBridge>) -> Self {
        Self {
            state: RecordState::New,
            resource: Resource::new_in(ctx.ids().container_uri()),
            attributes: AttributeMap::new(),
            bridge,
            ids: ctx.ids().clone(),
        }
    }

    /// Builds from attributes and saves once.
    ///
    /// The record is returned even when the store rejected the write; check
    /// `is_persisted`. Conflicts are returned as errors.
    pub fn create<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        attributes: AttributeMap,
    ) -> RecordResult<Self> {
        let mut record = Self::from_attributes(ctx, bridge, attributes)?;
        record.save(ctx)?;
        Ok(record)
    }

    /// Loads the record stored at `id`.
    ///
    /// # Errors
    /// - `NotFound` when no resource exists at `id_to_uri(id)`.
    pub fn find<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        id: &str,
    ) -> RecordResult<Self> {
        let uri = ctx.ids().id_to_uri(id);
        let resource = ctx.store().get(&uri)?;
        debug!(
            "event=record_find module=record status=ok model={} id={}",
            bridge.model_name(),
            ctx.ids().uri_to_id(&uri)
        );
        Self::from_resource(ctx, bridge, resource)
    }

    fn new_record<S: ResourceStore>(
        ctx: &Context<S>,
        bridge: Arc<AttributeBridge>,
        resource: Resource,
        attributes: AttributeMap,
    ) -> RecordResult<Self> {
        let mut declared = AttributeMap::new();
        for (name, value) in attributes.iter() {
            let Some(shape) = bridge.shape_of(name) else {
                continue;
            };
            check_shape(name, shape, value)?;
            declared.insert(name, value.clone());
        }
        let dropped = attributes.len() - declared.len();
        if dropped > 0 {
            debug!(
                "event=record_init module=record status=ok model={} dropped_attributes={}",
                bridge.model_name(),
                dropped
            );
        }

        Ok(Self {
            state: RecordState::New,
            resource,
            attributes: declared,
            bridge,
            ids: ctx.ids().clone(),
        })
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn is_new_record(&self) -> bool {
        self.state == RecordState::New
    }

    pub fn is_persisted(&self) -> bool {
        self.state == RecordState::Persisted
    }

    /// Absolute subject URI, once known.
    pub fn uri(&self) -> Option<&str> {
        self.resource.subject()
    }

    /// Record id derived from the subject URI.
    pub fn id(&self) -> Option<String> {
        self.uri().map(|uri| self.ids.uri_to_id(uri))
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn bridge(&self) -> &Arc<AttributeBridge> {
        &self.bridge
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets one declared attribute in memory; returns the previous value.
    ///
    /// # Errors
    /// - `UnknownAttribute` when the model does not declare `name`.
    /// - `InputShape` when `value` does not fit the attribute's path.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> RecordResult<Option<Value>> {
        let shape = self
            .bridge
            .shape_of(name)
            .ok_or_else(|| RecordError::UnknownAttribute(name.to_string()))?;
        let value = value.into();
        check_shape(name, shape, &value)?;
        Ok(self.attributes.insert(name, value))
    }

    /// Always-empty validation outcome.
    pub fn errors(&self) -> ValidationResult {
        ValidationResult::new()
    }

    pub fn read_attribute_for_validation(&self, name: &str) -> Option<&Value> {
        self.attribute(name)
    }

    /// Persists the record: create when new, conditional update otherwise.
    ///
    /// Returns `Ok(false)` when the store rejected the write for any reason
    /// other than an ETag conflict.
    ///
    /// # Errors
    /// - `Conflict` when the held ETag is stale.
    pub fn save<S: ResourceStore>(&mut self, ctx: &Context<S>) -> RecordResult<bool> {
        let (path, outcome) = match self.state {
            RecordState::New => ("create", self.create_record(ctx)),
            RecordState::Persisted => ("update", self.update_record(ctx)),
        };

        match outcome {
            Ok(()) => {
                info!(
                    "event=record_save module=record status=ok path={path} model={} id={}",
                    self.bridge.model_name(),
                    self.id().unwrap_or_default()
                );
                Ok(true)
            }
            Err(err @ StoreError::Conflict { .. }) => {
                warn!(
                    "event=record_save module=record status=conflict path={path} model={}",
                    self.bridge.model_name()
                );
                Err(err.into())
            }
            Err(err) => {
                warn!(
                    "event=record_save module=record status=error path={path} model={} error={err}",
                    self.bridge.model_name()
                );
                Ok(false)
            }
        }
    }

    /// `save`, failing with `NotSaved` when it reports `false`.
    pub fn save_strict<S: ResourceStore>(&mut self, ctx: &Context<S>) -> RecordResult<()> {
        if self.save(ctx)? {
            Ok(())
        } else {
            Err(RecordError::NotSaved)
        }
    }

    /// Replaces the held resource and attributes with the store's current
    /// state, discarding unsaved edits.
    pub fn reload<S: ResourceStore>(&mut self, ctx: &Context<S>) -> RecordResult<()> {
        let uri = self.uri().ok_or(RecordError::NoIdentity)?.to_string();
        let resource = ctx.store().get(&uri)?;
        self.attributes = self.bridge.get(&resource);
        self.resource = resource;
        self.state = RecordState::Persisted;
        Ok(())
    }

    /// Deletes the backing resource. The record is consumed.
    pub fn delete<S: ResourceStore>(self, ctx: &Context<S>) -> RecordResult<()> {
        let uri = self.uri().ok_or(RecordError::NoIdentity)?;
        ctx.store().delete(uri)?;
        info!(
            "event=record_delete module=record status=ok model={} id={}",
            self.bridge.model_name(),
            self.ids.uri_to_id(uri)
        );
        Ok(())
    }

    fn create_record<S: ResourceStore>(&mut self, ctx: &Context<S>) -> StoreResult<()> {
        let pushed = self.bridge.put(&self.resource, &self.attributes);
        let created = ctx.store().create(&pushed)?;
        let subject = created
            .subject()
            .ok_or_else(|| StoreError::InvalidData("store returned no subject".to_string()))?
            .to_string();

        // Creation metadata only exists after the round trip.
        let fetched = ctx.store().get(&subject)?;
        self.attributes = self.bridge.get(&fetched);
        self.resource = Resource::handle(subject);
        self.state = RecordState::Persisted;
        Ok(())
    }

    fn update_record<S: ResourceStore>(&mut self, ctx: &Context<S>) -> StoreResult<()> {
        let subject = self
            .resource
            .subject()
            .ok_or_else(|| StoreError::InvalidData("persisted record has no subject".to_string()))?
            .to_string();

        let current = if self.resource.is_retrieved() {
            self.resource.clone()
        } else {
            ctx.store().get(&subject)?
        };
        let pushed = self.bridge.put(&current, &self.attributes);
        ctx.store().update(&pushed, pushed.etag())?;

        let fetched = ctx.store().get(&subject)?;
        self.attributes = self.bridge.get(&fetched);
        self.resource = Resource::handle(subject);
        Ok(())
    }
}

fn check_shape(name: &str, shape: ValueShape, value: &Value) -> RecordResult<()> {
    if shape.accepts(value) {
        Ok(())
    } else {
        Err(RecordError::InputShape(format!(
            "attribute `{name}` expects {shape}"
        )))
    }
}
