//! In-process model registry.
//!
//! Each model declaration is built into an `AttributeBridge` exactly once at
//! registration; records receive the shared bridge handle explicitly.

use super::{AttributeBridge, BridgeError, ModelDeclaration};
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Model registration/lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidModelName(String),
    DuplicateModel(String),
    Bridge(BridgeError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidModelName(value) => write!(f, "model name is invalid: {value}"),
            Self::DuplicateModel(value) => write!(f, "model already registered: {value}"),
            Self::Bridge(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bridge(err) => Some(err),
            Self::InvalidModelName(_) | Self::DuplicateModel(_) => None,
        }
    }
}

impl From<BridgeError> for RegistryError {
    fn from(value: BridgeError) -> Self {
        Self::Bridge(value)
    }
}

/// Registered model bridges keyed by model name.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<AttributeBridge>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers one model; returns the shared bridge.
    pub fn register(
        &mut self,
        declaration: &ModelDeclaration,
    ) -> Result<Arc<AttributeBridge>, RegistryError> {
        let model_name = declaration.name().trim().to_string();
        if !is_valid_model_name(&model_name) {
            return Err(RegistryError::InvalidModelName(model_name));
        }
        if self.models.contains_key(model_name.as_str()) {
            return Err(RegistryError::DuplicateModel(model_name));
        }

        let bridge = Arc::new(AttributeBridge::build(declaration)?);
        info!(
            "event=model_register module=bridge status=ok model={} attributes={}",
            model_name,
            bridge.len()
        );
        self.models.insert(model_name, Arc::clone(&bridge));
        Ok(bridge)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns sorted model names.
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Returns one bridge by model name.
    pub fn get(&self, model_name: &str) -> Option<Arc<AttributeBridge>> {
        self.models.get(model_name.trim()).cloned()
    }
}

fn is_valid_model_name(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{ModelRegistry, RegistryError};
    use crate::bridge::{BridgeError, ModelDeclaration};
    use crate::lens::Segment;
    use std::sync::Arc;

    fn book() -> ModelDeclaration {
        ModelDeclaration::new("Book").attribute(
            "title",
            [
                Segment::predicate("http://purl.org/dc/terms/title"),
                Segment::Single,
                Segment::LiteralToString,
            ],
        )
    }

    #[test]
    fn registers_and_returns_shared_bridge() {
        let mut registry = ModelRegistry::new();
        let bridge = registry.register(&book()).expect("model should register");
        assert_eq!(registry.len(), 1);

        let looked_up = registry.get("  Book  ").expect("model should be found");
        assert!(Arc::ptr_eq(&bridge, &looked_up));
        assert_eq!(registry.model_names(), vec!["Book".to_string()]);
    }

    #[test]
    fn rejects_invalid_or_duplicate_model_name() {
        let mut registry = ModelRegistry::new();
        let blank = registry.register(&ModelDeclaration::new("   "));
        assert!(matches!(blank, Err(RegistryError::InvalidModelName(_))));
        let spaced = registry.register(&ModelDeclaration::new("Book Shelf"));
        assert!(matches!(spaced, Err(RegistryError::InvalidModelName(_))));

        registry.register(&book()).expect("first model should register");
        let duplicate = registry.register(&book());
        assert!(matches!(duplicate, Err(RegistryError::DuplicateModel(_))));
    }

    #[test]
    fn surfaces_bridge_build_errors_without_registering() {
        let mut registry = ModelRegistry::new();
        let broken = ModelDeclaration::new("Broken").attribute("title", [Segment::Single]);
        let err = registry.register(&broken).expect_err("ill-typed path must fail");
        assert!(matches!(
            err,
            RegistryError::Bridge(BridgeError::IllTypedPath { .. })
        ));
        assert!(registry.is_empty());
        assert!(registry.get("Broken").is_none());
    }
}
