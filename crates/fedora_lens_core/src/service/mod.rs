//! Record lifecycle services.
//!
//! # Responsibility
//! - Orchestrate bridge translation and store calls into record operations.
//! - Keep application callers decoupled from store details.
//!
//! # See also
//! - `repo::resource_store` for the consumed store contract.

pub mod context;
pub mod record;
