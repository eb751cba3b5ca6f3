//! Explicit store context shared by record operations.

use crate::config::StoreConfig;
use crate::identity::IdentityMapper;
use crate::repo::resource_store::ResourceStore;

/// Store handle plus id scoping, constructed once and passed to every
/// store-touching record operation.
#[derive(Debug, Clone)]
pub struct Context<S> {
    store: S,
    ids: IdentityMapper,
}

impl<S: ResourceStore> Context<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        Self {
            store,
            ids: IdentityMapper::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ids(&self) -> &IdentityMapper {
        &self.ids
    }
}
