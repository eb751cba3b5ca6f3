//! Resource store contract and the embedded implementation.
//!
//! # Responsibility
//! - Define the narrow store interface the record lifecycle consumes.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `Conflict`,
//!   `AlreadyExists`) in addition to transport errors.
//! - Reads always attach the current ETag.

pub mod resource_store;
pub mod sqlite_store;
